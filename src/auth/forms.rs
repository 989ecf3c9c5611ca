// src/auth/forms.rs
//! Client-side checks run before any auth request is sent

use thiserror::Error;

use crate::types::auth::{LoginRequest, RegisterRequest, Role};
use crate::utils::{is_plain_name, is_valid_email, is_valid_otp};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_FULL_NAME_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Full name is required")]
    FullNameRequired,
    #[error("Full name must be at least 2 characters")]
    FullNameTooShort,
    #[error("Full name can only contain letters and spaces")]
    FullNameInvalid,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email")]
    EmailInvalid,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("You must accept Terms & Privacy")]
    TermsNotAccepted,
    #[error("OTP code is required")]
    OtpRequired,
    #[error("OTP must be exactly 6 digits")]
    OtpInvalid,
    #[error("New password is required")]
    NewPasswordRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

pub fn validate_email(email: &str) -> Result<(), FormError> {
    if email.trim().is_empty() {
        return Err(FormError::EmailRequired);
    }
    if !is_valid_email(email) {
        return Err(FormError::EmailInvalid);
    }
    Ok(())
}

pub fn validate_otp(code: &str) -> Result<(), FormError> {
    if code.trim().is_empty() {
        return Err(FormError::OtpRequired);
    }
    if !is_valid_otp(code) {
        return Err(FormError::OtpInvalid);
    }
    Ok(())
}

pub fn validate_new_password(new_password: &str, confirmation: &str) -> Result<(), FormError> {
    if new_password.is_empty() {
        return Err(FormError::NewPasswordRequired);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort);
    }
    if new_password != confirmation {
        return Err(FormError::PasswordMismatch);
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(FormError::PasswordRequired);
        }

        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub terms_accepted: bool,
}

impl RegisterForm {
    /// First failing rule wins, in the order the form shows its fields
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        let name = self.full_name.trim();
        if name.is_empty() {
            return Err(FormError::FullNameRequired);
        }
        if name.chars().count() < MIN_FULL_NAME_LEN {
            return Err(FormError::FullNameTooShort);
        }
        if !is_plain_name(&self.full_name) {
            return Err(FormError::FullNameInvalid);
        }

        validate_email(&self.email)?;

        if self.password.is_empty() {
            return Err(FormError::PasswordRequired);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        if !self.terms_accepted {
            return Err(FormError::TermsNotAccepted);
        }

        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            full_name: self.full_name.clone(),
            role: self.role.unwrap_or(Role::Student),
        })
    }
}
