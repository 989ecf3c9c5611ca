// src/auth/mod.rs
pub mod forgot_password;
pub mod forms;
pub mod service;

pub use forgot_password::{FlowError, ForgotPasswordFlow, ResetStep};
pub use forms::{FormError, LoginForm, RegisterForm};
pub use service::AuthService;

use thiserror::Error;

use crate::errors::{messages, ApiError};
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    pub fn ui_message(&self) -> String {
        match self {
            AuthError::Api(e) => e.ui_message(),
            AuthError::Session(SessionError::NotAuthenticated) => {
                messages::TOKEN_EXPIRED.to_string()
            }
            AuthError::Session(_) => messages::UNKNOWN_ERROR.to_string(),
        }
    }
}
