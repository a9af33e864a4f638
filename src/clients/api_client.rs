//! Experts15 API client.
//!
//! Thin wrapper over the REST contract: bearer-token injection on every
//! request, uniform 401 handling through the injected [`Session`], and the
//! error surfacing policy (server message verbatim when present, generic
//! transient text otherwise).

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Question, TestDraft};
use crate::session::Session;

/// What an uploaded PDF is for. Decides both the endpoint and the multipart
/// field name the server expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPurpose {
    Questions,
    AnswerKey,
}

impl UploadPurpose {
    pub fn endpoint_suffix(self) -> &'static str {
        match self {
            UploadPurpose::Questions => "upload-questions",
            UploadPurpose::AnswerKey => "upload-answerkey",
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            UploadPurpose::Questions => "questionPdf",
            UploadPurpose::AnswerKey => "answerKeyPdf",
        }
    }
}

/// Response of both upload endpoints. `questions` is only populated by the
/// questions upload, and an empty list is a valid outcome there.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationRecipients {
    All,
    Enrolled,
    Custom,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub test_id: String,
    pub recipients: NotificationRecipients,
    pub custom_emails: Vec<String>,
    pub subject: String,
    pub message: String,
}

/// Order handed to the external payment gateway for checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetails {
    pub key: String,
    pub amount: u64,
    pub currency: String,
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    pub plan: String,
}

/// The five calls the publish workflow is built on. The workflow is generic
/// over this so it can run against an in-memory fake in tests.
pub trait AdminApi: Send + Sync {
    /// Create a draft test; returns the new test id.
    fn create_test(
        &self,
        draft: &TestDraft,
    ) -> impl std::future::Future<Output = Result<String, ApiError>> + Send;

    /// Upload a PDF for the given test.
    fn upload_pdf(
        &self,
        test_id: &str,
        purpose: UploadPurpose,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<UploadResponse, ApiError>> + Send;

    /// Make a draft test visible and enrollable.
    fn publish_test(
        &self,
        test_id: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;

    /// Replace the question set of a draft test.
    fn save_questions(
        &self,
        test_id: &str,
        questions: &[Question],
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;

    /// Remove an abandoned draft.
    fn delete_test(
        &self,
        test_id: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}

/// Concrete client over the Experts15 REST API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

// create-test response: `{ "test": { "_id": "..." } }`
#[derive(Deserialize)]
struct CreateTestResponse {
    test: TestRef,
}

#[derive(Deserialize)]
struct TestRef {
    #[serde(rename = "_id")]
    id: String,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<Session>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Shared response handling: 401 expires the session, other non-2xx
    /// become `ApiError::Server` with the server's own message when its body
    /// carries one.
    async fn check_status(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.expire();
            return Err(ApiError::Unauthorized {
                endpoint: path.to_string(),
            });
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| extract_server_message(&body));
            return Err(ApiError::server(path, status, message));
        }
        Ok(response)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .bearer(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::transport(path, e))?;

        let response = self.check_status(path, response).await?;
        let raw = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(path, e))?;
        serde_json::from_slice(&raw).map_err(|e| ApiError::UnexpectedResponse {
            endpoint: path.to_string(),
            source: e,
        })
    }

    /// POST where only success/failure matters; the body is discarded.
    async fn post_ok(&self, path: &str, body: &impl Serialize) -> Result<(), ApiError> {
        let response = self
            .bearer(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::transport(path, e))?;
        self.check_status(path, response).await?;
        Ok(())
    }

    // --- notification / auth / payment endpoints ---

    pub async fn send_notification(&self, request: &NotificationRequest) -> Result<(), ApiError> {
        self.post_ok("/admin/notifications/send", request).await
    }

    pub async fn create_payment_order(
        &self,
        plan: &str,
        amount: u64,
    ) -> Result<OrderDetails, ApiError> {
        self.post_json(
            "/payments/create-order",
            &serde_json::json!({ "plan": plan, "amount": amount }),
        )
        .await
    }

    pub async fn verify_payment(&self, verification: &PaymentVerification) -> Result<(), ApiError> {
        self.post_ok("/payments/verify", verification).await
    }

    pub async fn resend_otp(&self, email: &str) -> Result<(), ApiError> {
        self.post_ok("/auth/resend-otp", &serde_json::json!({ "email": email }))
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.post_ok(
            "/auth/forgot-password",
            &serde_json::json!({ "email": email }),
        )
        .await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        self.post_ok(
            "/auth/reset-password",
            &serde_json::json!({
                "email": email,
                "otp": otp,
                "newPassword": new_password,
            }),
        )
        .await
    }
}

impl AdminApi for ApiClient {
    async fn create_test(&self, draft: &TestDraft) -> Result<String, ApiError> {
        debug!("creating test \"{}\"", draft.title);
        let response: CreateTestResponse = self.post_json("/admin/tests", draft).await?;
        Ok(response.test.id)
    }

    async fn upload_pdf(
        &self,
        test_id: &str,
        purpose: UploadPurpose,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let path = format!("/admin/tests/{}/{}", test_id, purpose.endpoint_suffix());
        debug!("uploading {} ({} bytes) to {}", file_name, bytes.len(), path);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ApiError::transport(path.clone(), e))?;
        let form = Form::new().part(purpose.field_name(), part);

        let response = self
            .bearer(self.http.post(self.url(&path)))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::transport(path.clone(), e))?;

        let response = self.check_status(&path, response).await?;
        let raw = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(path.clone(), e))?;
        serde_json::from_slice(&raw).map_err(|e| ApiError::UnexpectedResponse {
            endpoint: path,
            source: e,
        })
    }

    async fn publish_test(&self, test_id: &str) -> Result<(), ApiError> {
        self.post_ok(
            &format!("/admin/tests/{}/publish", test_id),
            &serde_json::json!({}),
        )
        .await
    }

    async fn save_questions(&self, test_id: &str, questions: &[Question]) -> Result<(), ApiError> {
        self.post_ok(
            &format!("/admin/tests/{}/questions", test_id),
            &serde_json::json!({ "questions": questions }),
        )
        .await
    }

    async fn delete_test(&self, test_id: &str) -> Result<(), ApiError> {
        let path = format!("/admin/tests/{}", test_id);
        let response = self
            .bearer(self.http.delete(self.url(&path)))
            .send()
            .await
            .map_err(|e| ApiError::transport(path.clone(), e))?;
        self.check_status(&path, response).await?;
        Ok(())
    }
}

/// Pull the server's own error message out of an error body, whichever of
/// the two field names it used.
fn extract_server_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_purpose_maps_to_wire_names() {
        assert_eq!(UploadPurpose::Questions.field_name(), "questionPdf");
        assert_eq!(UploadPurpose::AnswerKey.field_name(), "answerKeyPdf");
        assert_eq!(
            UploadPurpose::Questions.endpoint_suffix(),
            "upload-questions"
        );
        assert_eq!(
            UploadPurpose::AnswerKey.endpoint_suffix(),
            "upload-answerkey"
        );
    }

    #[test]
    fn server_message_is_extracted_from_either_field() {
        let with_message = serde_json::json!({ "message": "Razorpay not configured" });
        let with_error = serde_json::json!({ "error": "parse failure" });
        let with_neither = serde_json::json!({ "status": 500 });

        assert_eq!(
            extract_server_message(&with_message).as_deref(),
            Some("Razorpay not configured")
        );
        assert_eq!(
            extract_server_message(&with_error).as_deref(),
            Some("parse failure")
        );
        assert_eq!(extract_server_message(&with_neither), None);
    }

    #[test]
    fn empty_questions_list_deserializes_as_present() {
        let response: UploadResponse =
            serde_json::from_str(r#"{"message":"parsed","questions":[]}"#).unwrap();
        assert_eq!(response.questions.as_deref(), Some(&[][..]));

        let no_questions: UploadResponse = serde_json::from_str(r#"{"message":"saved"}"#).unwrap();
        assert!(no_questions.questions.is_none());
    }
}
