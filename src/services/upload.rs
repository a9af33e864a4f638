//! Resource upload adapter.
//!
//! Packages a PDF plus a purpose tag and sends it to the API, rejecting
//! obviously bad inputs before any network traffic. Does not own the file
//! bytes' meaning: parsing happens server-side and the parsed questions come
//! back in the response.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clients::{AdminApi, UploadPurpose};
use crate::error::UploadError;
use crate::models::Question;

/// Outcome of a successful upload.
///
/// For `UploadPurpose::Questions` the question list is always present, even
/// when the parser found nothing (an empty list is a valid result, not an
/// error). For the answer key it is `None`.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub message: String,
    pub questions: Option<Vec<Question>>,
}

/// Upload adapter over any [`AdminApi`] backend.
pub struct UploadAdapter<A> {
    api: Arc<A>,
}

impl<A: AdminApi> UploadAdapter<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Upload `bytes` as the PDF for `purpose` on test `test_id`.
    ///
    /// Pre-flight checks (no network): the payload must be non-empty and the
    /// test id must be set. The caller may retry on any error.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        purpose: UploadPurpose,
        file_name: &str,
        test_id: &str,
    ) -> Result<UploadOutcome, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        if test_id.trim().is_empty() {
            return Err(UploadError::MissingTestId);
        }

        debug!(
            "uploading {:?} pdf \"{}\" ({} bytes) for test {}",
            purpose,
            file_name,
            bytes.len(),
            test_id
        );

        let response = self.api.upload_pdf(test_id, purpose, file_name, bytes).await?;

        let questions = match purpose {
            // The contract guarantees a list here; tolerate a server that
            // omits the field by treating it as empty.
            UploadPurpose::Questions => Some(response.questions.unwrap_or_default()),
            UploadPurpose::AnswerKey => None,
        };

        if let Some(qs) = &questions {
            info!("✓ parsed {} questions from \"{}\"", qs.len(), file_name);
        }

        Ok(UploadOutcome {
            message: response.message,
            questions,
        })
    }
}
