//! OTP-based password reset flow.
//!
//! request → code entry (with resend cooldown) → reset. The OTP cells and
//! the countdown live here so the widget layer only forwards keystrokes.

use tracing::info;

use crate::clients::ApiClient;
use crate::error::{AppResult, ValidationError, WorkflowError};
use crate::otp::{OtpInput, ResendCountdown};

pub struct PasswordResetFlow<'a> {
    api: &'a ApiClient,
    email: Option<String>,
    pub otp: OtpInput,
    pub countdown: ResendCountdown,
    in_flight: bool,
}

impl<'a> PasswordResetFlow<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            email: None,
            otp: OtpInput::new(),
            countdown: ResendCountdown::new(),
            in_flight: false,
        }
    }

    /// Ask the backend to email an OTP. Starts the resend cooldown.
    pub async fn request_otp(&mut self, email: &str) -> AppResult<()> {
        if self.in_flight {
            return Err(WorkflowError::Busy.into());
        }
        if email.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "email" }.into());
        }

        self.in_flight = true;
        let result = self.api.forgot_password(email).await;
        self.in_flight = false;

        result?;
        self.email = Some(email.to_string());
        self.countdown.reset();
        info!("✓ reset OTP sent to {}", email);
        Ok(())
    }

    /// Resend the OTP. Refused while the cooldown is running; on success
    /// the cooldown restarts and the entered cells are cleared.
    pub async fn resend(&mut self) -> AppResult<()> {
        if self.in_flight {
            return Err(WorkflowError::Busy.into());
        }
        if !self.countdown.can_resend() {
            return Err(WorkflowError::CooldownActive.into());
        }
        let email = self.email.clone().ok_or(ValidationError::EmptyField {
            field: "email",
        })?;

        self.in_flight = true;
        let result = self.api.resend_otp(&email).await;
        self.in_flight = false;

        result?;
        self.countdown.reset();
        self.otp.clear();
        info!("✓ OTP re-sent to {}", email);
        Ok(())
    }

    /// Complete the reset with the entered code and a new password.
    pub async fn reset_password(&mut self, new_password: &str) -> AppResult<()> {
        if self.in_flight {
            return Err(WorkflowError::Busy.into());
        }
        let email = self.email.clone().ok_or(ValidationError::EmptyField {
            field: "email",
        })?;
        let code = self.otp.code().ok_or(ValidationError::EmptyField {
            field: "otp",
        })?;
        if new_password.len() < 8 {
            return Err(ValidationError::Invalid {
                field: "newPassword",
                message: "password must be at least 8 characters".to_string(),
            }
            .into());
        }

        self.in_flight = true;
        let result = self.api.reset_password(&email, &code, new_password).await;
        self.in_flight = false;

        result?;
        info!("✓ password reset for {}", email);
        Ok(())
    }
}
