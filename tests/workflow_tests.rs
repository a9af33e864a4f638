//! Publish workflow tests against an in-memory backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use experts15_admin::clients::{AdminApi, UploadPurpose, UploadResponse};
use experts15_admin::error::{ApiError, AppError, WorkflowError};
use experts15_admin::models::{Question, TestDraft};
use experts15_admin::workflow::{PublishFlow, Stage};

/// Records every call and replays configurable responses.
#[derive(Default)]
struct MockApi {
    calls: Mutex<Vec<String>>,
    parsed_questions: Mutex<Vec<Question>>,
    // Consumed by the next call that reaches the network.
    fail_next: Mutex<Option<ApiError>>,
}

impl MockApi {
    fn with_parsed(questions: Vec<Question>) -> Self {
        Self {
            parsed_questions: Mutex::new(questions),
            ..Default::default()
        }
    }

    fn fail_next(&self, error: ApiError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call.into());
        match self.fail_next.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AdminApi for MockApi {
    async fn create_test(&self, draft: &TestDraft) -> Result<String, ApiError> {
        self.record(format!("create:{}", draft.title))?;
        Ok("abc".to_string())
    }

    async fn upload_pdf(
        &self,
        test_id: &str,
        purpose: UploadPurpose,
        _file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        self.record(format!("upload:{}:{:?}", test_id, purpose))?;
        Ok(UploadResponse {
            message: "ok".into(),
            questions: match purpose {
                UploadPurpose::Questions => {
                    Some(self.parsed_questions.lock().unwrap().clone())
                }
                UploadPurpose::AnswerKey => None,
            },
        })
    }

    async fn publish_test(&self, test_id: &str) -> Result<(), ApiError> {
        self.record(format!("publish:{}", test_id))
    }

    async fn save_questions(
        &self,
        test_id: &str,
        questions: &[Question],
    ) -> Result<(), ApiError> {
        self.record(format!("save:{}:{}", test_id, questions.len()))
    }

    async fn delete_test(&self, test_id: &str) -> Result<(), ApiError> {
        self.record(format!("delete:{}", test_id))
    }
}

fn draft(title: &str, description: &str) -> TestDraft {
    TestDraft {
        title: title.into(),
        description: description.into(),
        ..TestDraft::default()
    }
}

fn sample_question() -> Question {
    Question {
        text: "A particle moves with constant speed. Is it accelerating?".into(),
        options: vec![
            "Never".into(),
            "Only in a straight line".into(),
            "Yes, if the direction changes".into(),
            "Always".into(),
        ],
        ..Question::default()
    }
}

fn pdf() -> Vec<u8> {
    b"%PDF-1.4 stub".to_vec()
}

#[tokio::test]
async fn full_workflow_publishes_and_fires_refresh_once() {
    let api = Arc::new(MockApi::with_parsed(vec![sample_question()]));
    let refreshes = Arc::new(AtomicUsize::new(0));
    let refreshes_clone = refreshes.clone();

    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1")).on_complete(move |id| {
        assert_eq!(id, "abc");
        refreshes_clone.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(flow.stage(), Stage::BasicInfo);

    let id = flow.create_test().await.unwrap();
    assert_eq!(id, "abc");
    assert_eq!(flow.stage(), Stage::UploadQuestions);

    let parsed = flow.upload_questions(pdf(), "q.pdf").await.unwrap();
    assert_eq!(parsed, 1);
    assert_eq!(flow.stage(), Stage::UploadAnswerKey);

    flow.upload_answer_key(pdf(), "a.pdf").await.unwrap();
    assert_eq!(flow.stage(), Stage::ReviewPublish);

    flow.publish().await.unwrap();
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);

    // Terminal action resets the whole session.
    assert_eq!(flow.stage(), Stage::BasicInfo);
    assert!(flow.state().created_test_id.is_none());
    assert!(flow.state().questions.is_empty());

    assert_eq!(
        api.calls(),
        vec![
            "create:T1",
            "upload:abc:Questions",
            "upload:abc:AnswerKey",
            "publish:abc",
        ]
    );
}

#[tokio::test]
async fn failed_create_does_not_advance() {
    let api = Arc::new(MockApi::default());
    api.fail_next(ApiError::server("/admin/tests", 500, Some("boom".into())));

    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));
    let err = flow.create_test().await.unwrap_err();

    assert!(matches!(err, AppError::Api(_)));
    assert_eq!(flow.stage(), Stage::BasicInfo);
    assert!(flow.state().created_test_id.is_none());
    assert!(!flow.state().in_flight);
}

#[tokio::test]
async fn blank_title_is_refused_before_any_network_call() {
    let api = Arc::new(MockApi::default());
    let mut flow = PublishFlow::new(api.clone(), draft("", "D1"));

    let err = flow.create_test().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn empty_parse_result_still_advances() {
    let api = Arc::new(MockApi::with_parsed(Vec::new()));
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));

    flow.create_test().await.unwrap();
    let parsed = flow.upload_questions(pdf(), "q.pdf").await.unwrap();

    assert_eq!(parsed, 0);
    assert_eq!(flow.stage(), Stage::UploadAnswerKey);

    // But the answer key stage then refuses to advance with zero questions.
    let err = flow.upload_answer_key(pdf(), "a.pdf").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::NoQuestions)
    ));
    assert_eq!(flow.stage(), Stage::UploadAnswerKey);
    // And the refusal happened before any upload call.
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn failed_upload_keeps_stage_and_surfaces_server_message() {
    let api = Arc::new(MockApi::with_parsed(vec![sample_question()]));
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));
    flow.create_test().await.unwrap();

    api.fail_next(ApiError::server(
        "/admin/tests/abc/upload-questions",
        422,
        Some("Could not parse PDF".into()),
    ));
    let err = flow.upload_questions(pdf(), "q.pdf").await.unwrap_err();

    assert_eq!(err.user_message(), "Could not parse PDF");
    assert_eq!(flow.stage(), Stage::UploadQuestions);

    // The operation is retryable in place.
    flow.upload_questions(pdf(), "q.pdf").await.unwrap();
    assert_eq!(flow.stage(), Stage::UploadAnswerKey);
}

#[tokio::test]
async fn wrong_stage_operations_are_refused() {
    let api = Arc::new(MockApi::default());
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));

    let err = flow.upload_questions(pdf(), "q.pdf").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::WrongStage {
            expected: 2,
            actual: 1
        })
    ));

    let err = flow.publish().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::WrongStage { .. })
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn previous_steps_back_but_not_past_stage_one() {
    let api = Arc::new(MockApi::with_parsed(vec![sample_question()]));
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));

    let err = flow.previous().unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::AtFirstStage)
    ));

    flow.create_test().await.unwrap();
    flow.upload_questions(pdf(), "q.pdf").await.unwrap();
    assert_eq!(flow.stage(), Stage::UploadAnswerKey);

    flow.previous().unwrap();
    assert_eq!(flow.stage(), Stage::UploadQuestions);

    // Going forward again re-uploads, it does not re-create the test.
    flow.upload_questions(pdf(), "q2.pdf").await.unwrap();
    assert_eq!(flow.stage(), Stage::UploadAnswerKey);
    assert_eq!(
        api.calls()
            .iter()
            .filter(|c| c.starts_with("create"))
            .count(),
        1
    );
}

#[tokio::test]
async fn cancel_after_create_deletes_the_orphan_draft() {
    let api = Arc::new(MockApi::with_parsed(vec![sample_question()]));
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));

    flow.create_test().await.unwrap();
    flow.cancel().await.unwrap();

    assert_eq!(flow.stage(), Stage::BasicInfo);
    assert!(flow.state().created_test_id.is_none());
    assert_eq!(
        api.calls()
            .iter()
            .filter(|c| c.as_str() == "delete:abc")
            .count(),
        1
    );
}

#[tokio::test]
async fn cancel_before_create_touches_nothing_server_side() {
    let api = Arc::new(MockApi::default());
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));

    flow.cancel().await.unwrap();
    assert!(api.calls().is_empty());
    assert_eq!(flow.stage(), Stage::BasicInfo);
}

#[tokio::test]
async fn cancel_survives_a_failing_cleanup_call() {
    let api = Arc::new(MockApi::default());
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));
    flow.create_test().await.unwrap();

    api.fail_next(ApiError::server("/admin/tests/abc", 500, None));
    flow.cancel().await.unwrap();
    assert_eq!(flow.stage(), Stage::BasicInfo);
}

#[tokio::test]
async fn publish_failure_keeps_review_stage_and_does_not_refresh() {
    let api = Arc::new(MockApi::with_parsed(vec![sample_question()]));
    let refreshes = Arc::new(AtomicUsize::new(0));
    let refreshes_clone = refreshes.clone();

    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"))
        .on_complete(move |_| {
            refreshes_clone.fetch_add(1, Ordering::SeqCst);
        });

    flow.create_test().await.unwrap();
    flow.upload_questions(pdf(), "q.pdf").await.unwrap();
    flow.upload_answer_key(pdf(), "a.pdf").await.unwrap();

    api.fail_next(ApiError::server("/admin/tests/abc/publish", 500, None));
    assert!(flow.publish().await.is_err());

    assert_eq!(flow.stage(), Stage::ReviewPublish);
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);

    // Retry succeeds and fires the hook exactly once overall.
    flow.publish().await.unwrap();
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn save_questions_replaces_the_cached_set() {
    let api = Arc::new(MockApi::with_parsed(vec![sample_question()]));
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));

    flow.create_test().await.unwrap();
    flow.upload_questions(pdf(), "q.pdf").await.unwrap();

    let mut edited = sample_question();
    edited.marks = 5;
    flow.save_questions(vec![edited.clone(), sample_question()])
        .await
        .unwrap();

    assert_eq!(flow.state().questions.len(), 2);
    assert_eq!(flow.state().questions[0].marks, 5);
    assert!(api.calls().contains(&"save:abc:2".to_string()));
}

#[tokio::test]
async fn save_questions_needs_a_created_test() {
    let api = Arc::new(MockApi::default());
    let mut flow = PublishFlow::new(api.clone(), draft("T1", "D1"));

    let err = flow.save_questions(vec![sample_question()]).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::MissingTestId)
    ));
    assert!(api.calls().is_empty());
}
