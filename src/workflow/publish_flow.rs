//! Test creation & publishing workflow.
//!
//! Drives the four stages (basic info, questions PDF, answer key PDF,
//! review/publish) over any [`AdminApi`] backend. One network call per
//! forward transition, strictly serialized: a failed call never advances
//! the stage, and a second call while one is in flight is refused.

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::{AdminApi, UploadPurpose};
use crate::error::{AppResult, WorkflowError};
use crate::models::{Question, TestDraft};
use crate::services::upload::UploadAdapter;
use crate::workflow::stage::Stage;

/// Everything the workflow owns for one test-creation session. Once
/// `created_test_id` is set the backend copy is authoritative; this is a
/// working cache.
#[derive(Debug)]
pub struct WorkflowState {
    pub stage: Stage,
    pub draft: TestDraft,
    pub created_test_id: Option<String>,
    pub questions: Vec<Question>,
    pub in_flight: bool,
}

impl WorkflowState {
    fn new(draft: TestDraft) -> Self {
        Self {
            stage: Stage::BasicInfo,
            draft,
            created_test_id: None,
            questions: Vec::new(),
            in_flight: false,
        }
    }
}

type CompletionHook = Box<dyn FnMut(&str) + Send>;

/// The workflow controller.
pub struct PublishFlow<A> {
    api: Arc<A>,
    uploader: UploadAdapter<A>,
    state: WorkflowState,
    on_complete: Option<CompletionHook>,
}

impl<A: AdminApi> PublishFlow<A> {
    pub fn new(api: Arc<A>, draft: TestDraft) -> Self {
        Self {
            uploader: UploadAdapter::new(api.clone()),
            api,
            state: WorkflowState::new(draft),
            on_complete: None,
        }
    }

    /// Register the caller's refresh hook, fired exactly once per successful
    /// publish with the published test's id.
    pub fn on_complete(mut self, hook: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn draft_mut(&mut self) -> &mut TestDraft {
        &mut self.state.draft
    }

    fn require_stage(&self, expected: Stage) -> Result<(), WorkflowError> {
        if self.state.in_flight {
            return Err(WorkflowError::Busy);
        }
        if self.state.stage != expected {
            return Err(WorkflowError::WrongStage {
                expected: expected.number(),
                actual: self.state.stage.number(),
            });
        }
        Ok(())
    }

    fn test_id(&self) -> Result<String, WorkflowError> {
        self.state
            .created_test_id
            .clone()
            .ok_or(WorkflowError::MissingTestId)
    }

    /// Stage 1 → 2: validate the draft and create it server-side. On success
    /// the returned id is stored and the stage advances; on failure nothing
    /// moves.
    pub async fn create_test(&mut self) -> AppResult<String> {
        self.require_stage(Stage::BasicInfo)?;
        self.state.draft.validate()?;

        self.state.in_flight = true;
        let result = self.api.create_test(&self.state.draft).await;
        self.state.in_flight = false;

        let id = result?;
        info!("✓ created draft test {} (\"{}\")", id, self.state.draft.title);
        self.state.created_test_id = Some(id.clone());
        self.state.stage = Stage::UploadQuestions;
        Ok(id)
    }

    /// Stage 2 → 3: upload the questions PDF. The server parses it and
    /// returns the question list, which may be empty; an empty parse is
    /// not a failure and still advances.
    pub async fn upload_questions(&mut self, bytes: Vec<u8>, file_name: &str) -> AppResult<usize> {
        self.require_stage(Stage::UploadQuestions)?;
        let test_id = self.test_id()?;

        self.state.in_flight = true;
        let result = self
            .uploader
            .upload(bytes, UploadPurpose::Questions, file_name, &test_id)
            .await;
        self.state.in_flight = false;

        let outcome = result?;
        self.state.questions = outcome.questions.unwrap_or_default();
        self.state.stage = Stage::UploadAnswerKey;
        info!(
            "✓ questions uploaded for test {} ({} parsed)",
            test_id,
            self.state.questions.len()
        );
        Ok(self.state.questions.len())
    }

    /// Stage 3 → 4: upload the answer key PDF. Requires at least one parsed
    /// question; re-parsing is not needed.
    pub async fn upload_answer_key(&mut self, bytes: Vec<u8>, file_name: &str) -> AppResult<()> {
        self.require_stage(Stage::UploadAnswerKey)?;
        let test_id = self.test_id()?;
        if self.state.questions.is_empty() {
            return Err(WorkflowError::NoQuestions.into());
        }

        self.state.in_flight = true;
        let result = self
            .uploader
            .upload(bytes, UploadPurpose::AnswerKey, file_name, &test_id)
            .await;
        self.state.in_flight = false;

        result?;
        self.state.stage = Stage::ReviewPublish;
        info!("✓ answer key uploaded for test {}", test_id);
        Ok(())
    }

    /// Replace the question set server-side after review edits. Valid once
    /// the test exists; does not change the stage.
    pub async fn save_questions(&mut self, questions: Vec<Question>) -> AppResult<()> {
        if self.state.in_flight {
            return Err(WorkflowError::Busy.into());
        }
        let test_id = self.test_id()?;

        self.state.in_flight = true;
        let result = self.api.save_questions(&test_id, &questions).await;
        self.state.in_flight = false;

        result?;
        self.state.questions = questions;
        info!(
            "✓ saved {} questions for test {}",
            self.state.questions.len(),
            test_id
        );
        Ok(())
    }

    /// Stage 4, terminal: publish. On success the completion hook fires
    /// exactly once and the workflow resets to a fresh stage 1.
    pub async fn publish(&mut self) -> AppResult<()> {
        self.require_stage(Stage::ReviewPublish)?;
        let test_id = self.test_id()?;

        self.state.in_flight = true;
        let result = self.api.publish_test(&test_id).await;
        self.state.in_flight = false;

        result?;
        info!("✓ published test {}", test_id);
        if let Some(hook) = &mut self.on_complete {
            hook(&test_id);
        }
        self.reset();
        Ok(())
    }

    /// Step back one stage. Refused at stage 1 and while a call is in
    /// flight. Stepping back never talks to the network; already-created
    /// resources stay as they are.
    pub fn previous(&mut self) -> AppResult<()> {
        if self.state.in_flight {
            return Err(WorkflowError::Busy.into());
        }
        match self.state.stage.previous() {
            Some(prev) => {
                self.state.stage = prev;
                Ok(())
            }
            None => Err(WorkflowError::AtFirstStage.into()),
        }
    }

    /// Abandon the workflow. If a draft test was already created it is
    /// deleted server-side so no orphan is left behind; a failed cleanup is
    /// logged and otherwise ignored (the draft stays invisible to students
    /// either way). Always resets local state.
    pub async fn cancel(&mut self) -> AppResult<()> {
        if self.state.in_flight {
            return Err(WorkflowError::Busy.into());
        }

        if let Some(test_id) = self.state.created_test_id.clone() {
            self.state.in_flight = true;
            let result = self.api.delete_test(&test_id).await;
            self.state.in_flight = false;

            match result {
                Ok(()) => info!("✓ deleted abandoned draft {}", test_id),
                Err(e) => warn!("could not delete abandoned draft {}: {}", test_id, e),
            }
        }

        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.state = WorkflowState::new(TestDraft::default());
    }
}
