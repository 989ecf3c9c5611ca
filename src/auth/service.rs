// src/auth/service.rs
use std::sync::Arc;
use tracing::info;

use super::AuthError;
use crate::core::HttpClient;
use crate::errors::{log_error, ApiError};
use crate::session::StoredUser;
use crate::types::auth::{
    ApiMessage, AuthResponse, AuthSession, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, VerifyOtpRequest,
};

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const REGISTER_ENDPOINT: &str = "/api/auth/register";
pub const FORGOT_PASSWORD_ENDPOINT: &str = "/api/auth/forgot-password";
pub const VERIFY_OTP_ENDPOINT: &str = "/api/auth/verify-otp";
pub const RESET_PASSWORD_ENDPOINT: &str = "/api/auth/reset-password";

/// Authentication calls against the remote API
#[derive(Clone)]
pub struct AuthService {
    http: Arc<HttpClient>,
}

impl AuthService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Login with email and password; the session is saved on success
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: AuthResponse = self
            .call("authService.login", LOGIN_ENDPOINT, &request)
            .await?;

        let session = self.http.tokens().save(&response)?;
        info!("Login successful for {}", session.email);
        Ok(session)
    }

    /// Register a new account; the session is saved on success
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, AuthError> {
        let response: AuthResponse = self
            .call("authService.register", REGISTER_ENDPOINT, request)
            .await?;

        let session = self.http.tokens().save(&response)?;
        info!("Registration successful for {}", session.email);
        Ok(session)
    }

    /// Step 1 of the reset flow: ask the server to email an OTP
    pub async fn request_password_reset(&self, email: &str) -> Result<ApiMessage, AuthError> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        let message: Option<ApiMessage> = self
            .call(
                "authService.requestPasswordReset",
                FORGOT_PASSWORD_ENDPOINT,
                &request,
            )
            .await?;
        Ok(message.unwrap_or_default())
    }

    /// Step 2: check the emailed code
    pub async fn verify_otp(&self, email: &str, otp_code: &str) -> Result<ApiMessage, AuthError> {
        let request = VerifyOtpRequest {
            email: email.to_string(),
            otp_code: otp_code.to_string(),
        };
        let message: Option<ApiMessage> = self
            .call("authService.verifyOtp", VERIFY_OTP_ENDPOINT, &request)
            .await?;
        Ok(message.unwrap_or_default())
    }

    /// Step 3: set the new password with the verified code
    pub async fn reset_password(
        &self,
        email: &str,
        otp_code: &str,
        new_password: &str,
    ) -> Result<ApiMessage, AuthError> {
        let request = ResetPasswordRequest {
            email: email.to_string(),
            otp_code: otp_code.to_string(),
            new_password: new_password.to_string(),
        };
        let message: Option<ApiMessage> = self
            .call("authService.resetPassword", RESET_PASSWORD_ENDPOINT, &request)
            .await?;
        Ok(message.unwrap_or_default())
    }

    pub fn logout(&self) {
        self.http.tokens().clear();
        info!("Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.tokens().is_authenticated()
    }

    pub fn current_user(&self) -> Option<StoredUser> {
        self.http.tokens().get_user()
    }

    async fn call<T, R>(&self, context: &str, endpoint: &str, payload: &T) -> Result<R, ApiError>
    where
        T: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        self.http
            .post_json(endpoint, payload)
            .await
            .inspect_err(|e| log_error(context, e))
    }
}
