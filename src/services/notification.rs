//! Test-announcement notifications.
//!
//! Validates the recipient list client-side, then hands the request to the
//! notification endpoint. Dispatch itself (email fan-out) is the backend's
//! job.

use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::clients::{ApiClient, NotificationRecipients, NotificationRequest};
use crate::error::{AppError, AppResult, ValidationError};

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email regex is valid")
    })
}

pub struct NotificationService<'a> {
    api: &'a ApiClient,
}

impl<'a> NotificationService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Validate and send one notification. Refused without any network call
    /// when the subject/message is blank or a custom email is malformed.
    pub async fn send(&self, request: NotificationRequest) -> AppResult<()> {
        validate(&request)?;
        self.api.send_notification(&request).await?;
        info!("✓ notification \"{}\" queued", request.subject);
        Ok(())
    }
}

fn validate(request: &NotificationRequest) -> Result<(), AppError> {
    if request.test_id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "testId" }.into());
    }
    if request.subject.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "subject" }.into());
    }
    if request.message.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "message" }.into());
    }
    if request.recipients == NotificationRecipients::Custom {
        if request.custom_emails.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "customEmails",
            }
            .into());
        }
        for email in &request.custom_emails {
            if !email_regex().is_match(email) {
                return Err(ValidationError::Invalid {
                    field: "customEmails",
                    message: format!("\"{}\" is not a valid email address", email),
                }
                .into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(recipients: NotificationRecipients, emails: Vec<&str>) -> NotificationRequest {
        NotificationRequest {
            test_id: "abc".into(),
            recipients,
            custom_emails: emails.into_iter().map(String::from).collect(),
            subject: "New mock test live".into(),
            message: "JEE Main Mock 12 is now open for enrollment.".into(),
        }
    }

    #[test]
    fn valid_custom_request_passes() {
        let r = request(
            NotificationRecipients::Custom,
            vec!["aspirant@example.in", "topper.2026@gmail.com"],
        );
        assert!(validate(&r).is_ok());
    }

    #[test]
    fn malformed_email_is_refused() {
        let r = request(NotificationRecipients::Custom, vec!["not-an-email"]);
        assert!(validate(&r).is_err());
    }

    #[test]
    fn custom_recipients_need_at_least_one_email() {
        let r = request(NotificationRecipients::Custom, vec![]);
        assert!(validate(&r).is_err());
    }

    #[test]
    fn broadcast_needs_no_emails() {
        let r = request(NotificationRecipients::All, vec![]);
        assert!(validate(&r).is_ok());
    }

    #[test]
    fn blank_subject_is_refused() {
        let mut r = request(NotificationRecipients::All, vec![]);
        r.subject = " ".into();
        assert!(validate(&r).is_err());
    }
}
