// src/auth/forgot_password.rs
//! Three-step password reset: email, then OTP, then the new password.

use thiserror::Error;
use tracing::debug;

use super::forms::{validate_email, validate_new_password, validate_otp, FormError};
use super::{AuthError, AuthService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    Email,
    Otp,
    Password,
    /// Terminal; the caller sends the user to the login page
    Completed,
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{0}")]
    Form(#[from] FormError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Action not available in step {actual:?}")]
    WrongStep { expected: ResetStep, actual: ResetStep },
}

impl FlowError {
    pub fn ui_message(&self) -> String {
        match self {
            FlowError::Form(e) => e.to_string(),
            FlowError::Auth(e) => e.ui_message(),
            FlowError::WrongStep { .. } => self.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForgotPasswordFlow {
    step: ResetStep,
    email: String,
    otp_code: String,
    error: Option<String>,
    success_message: Option<String>,
}

impl Default for ForgotPasswordFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ForgotPasswordFlow {
    pub fn new() -> Self {
        Self {
            step: ResetStep::Email,
            email: String::new(),
            otp_code: String::new(),
            error: None,
            success_message: None,
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.step == ResetStep::Completed
    }

    /// Prompt text for the current step
    pub fn prompt(&self) -> &'static str {
        match self.step {
            ResetStep::Email => "Enter your email to receive an OTP",
            ResetStep::Otp => "Enter the OTP sent to your email",
            ResetStep::Password => "Create a new password",
            ResetStep::Completed => "Password reset successfully! Redirecting to login...",
        }
    }

    /// Email step: validate locally, then request the OTP
    pub async fn submit_email(&mut self, auth: &AuthService, email: &str) -> Result<(), FlowError> {
        self.begin(ResetStep::Email)?;
        self.guard(validate_email(email))?;

        let result = auth.request_password_reset(email).await;
        self.guard(result)?;

        self.email = email.to_string();
        self.advance(ResetStep::Otp, "OTP has been sent to your email");
        Ok(())
    }

    /// OTP step: six digits locally, then verify with the server
    pub async fn submit_otp(&mut self, auth: &AuthService, otp_code: &str) -> Result<(), FlowError> {
        self.begin(ResetStep::Otp)?;
        self.guard(validate_otp(otp_code))?;

        let result = auth.verify_otp(&self.email, otp_code).await;
        self.guard(result)?;

        self.otp_code = otp_code.to_string();
        self.advance(ResetStep::Password, "OTP verified successfully");
        Ok(())
    }

    /// Password step: local rules, then the reset call. Ends the flow on success.
    pub async fn submit_new_password(
        &mut self,
        auth: &AuthService,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), FlowError> {
        self.begin(ResetStep::Password)?;
        self.guard(validate_new_password(new_password, confirmation))?;

        let result = auth
            .reset_password(&self.email, &self.otp_code, new_password)
            .await;
        self.guard(result)?;

        self.advance(
            ResetStep::Completed,
            "Password reset successfully! Redirecting to login...",
        );
        Ok(())
    }

    /// The only backward move: OTP back to email
    pub fn back_to_email(&mut self) -> Result<(), FlowError> {
        if self.step != ResetStep::Otp {
            return Err(FlowError::WrongStep {
                expected: ResetStep::Otp,
                actual: self.step,
            });
        }

        self.step = ResetStep::Email;
        self.otp_code.clear();
        self.success_message = None;
        Ok(())
    }

    fn begin(&mut self, expected: ResetStep) -> Result<(), FlowError> {
        if self.step != expected {
            return Err(FlowError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        self.error = None;
        Ok(())
    }

    /// Record a failure without moving; the step stays where it was
    fn guard<T, E>(&mut self, result: Result<T, E>) -> Result<T, FlowError>
    where
        E: Into<FlowError>,
    {
        result.map_err(|e| {
            let err = e.into();
            self.error = Some(err.ui_message());
            err
        })
    }

    fn advance(&mut self, next: ResetStep, message: &str) {
        debug!("Password reset: {:?} -> {:?}", self.step, next);
        self.step = next;
        self.error = None;
        self.success_message = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::core::HttpClient;
    use crate::session::TokenStore;
    use std::sync::Arc;

    // Nothing listens here; any request that escapes the local checks fails as a network error
    fn offline_auth() -> AuthService {
        let config = ApiConfig::with_base_url("http://127.0.0.1:9");
        let http = HttpClient::new(&config, Arc::new(TokenStore::in_memory())).unwrap();
        AuthService::new(Arc::new(http))
    }

    #[tokio::test]
    async fn test_malformed_email_stays_on_email_step() {
        let auth = offline_auth();
        let mut flow = ForgotPasswordFlow::new();

        let err = flow.submit_email(&auth, "not-an-email").await.unwrap_err();

        assert!(matches!(err, FlowError::Form(FormError::EmailInvalid)));
        assert_eq!(flow.step(), ResetStep::Email);
        assert_eq!(flow.error(), Some("Please enter a valid email"));
    }

    #[tokio::test]
    async fn test_wrong_step_is_rejected() {
        let auth = offline_auth();
        let mut flow = ForgotPasswordFlow::new();

        let err = flow.submit_otp(&auth, "123456").await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::WrongStep {
                expected: ResetStep::Otp,
                actual: ResetStep::Email
            }
        ));
        assert!(flow.back_to_email().is_err());
    }

    #[tokio::test]
    async fn test_network_failure_keeps_step_and_sets_message() {
        let auth = offline_auth();
        let mut flow = ForgotPasswordFlow::new();

        let err = flow
            .submit_email(&auth, "jane@example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::Auth(_)));
        assert_eq!(flow.step(), ResetStep::Email);
        assert_eq!(
            flow.error(),
            Some("Network error. Please check your connection.")
        );
    }
}
