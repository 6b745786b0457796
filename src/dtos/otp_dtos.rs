use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::{AppError, Result};

// Request DTOs. Fields are optional so a missing field surfaces as an
// invalid-argument error rather than a JSON rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reset_token: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_password_length"))]
    pub new_password: Option<String>,
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

// Length in UTF-16 code units, the way browser and mobile clients count it.
fn validate_password_length(password: &str) -> std::result::Result<(), ValidationError> {
    if password.encode_utf16().count() >= MIN_PASSWORD_LENGTH {
        return Ok(());
    }

    let mut error = ValidationError::new("password_length");
    error.message = Some(Cow::Borrowed("Password must be at least 6 characters long."));
    Err(error)
}

// Response DTO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reset_token: Option<String>,
}

impl OtpResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            reset_token: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            reset_token: None,
        }
    }

    pub fn with_reset_token(mut self, token: String) -> Self {
        self.reset_token = Some(token);
        self
    }
}

/// Returns the field when present and non-blank.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

impl SendOtpRequest {
    pub fn email(&self) -> Result<&str> {
        present(&self.email).ok_or_else(|| {
            AppError::invalid_argument("The function must be called with an email.")
        })
    }
}

impl VerifyOtpRequest {
    pub fn fields(&self) -> Result<(&str, &str)> {
        match (present(&self.email), present(&self.otp)) {
            (Some(email), Some(otp)) => Ok((email, otp)),
            _ => Err(AppError::invalid_argument(
                "The function must be called with email and otp.",
            )),
        }
    }
}

impl ResetPasswordRequest {
    pub fn fields(&self) -> Result<(&str, &str, &str)> {
        // The password is checked for presence only; whitespace is a legal password.
        let new_password = self.new_password.as_deref().filter(|p| !p.is_empty());
        match (present(&self.email), present(&self.reset_token), new_password) {
            (Some(email), Some(token), Some(password)) => Ok((email, token, password)),
            _ => Err(AppError::invalid_argument(
                "The function must be called with email, resetToken, and newPassword.",
            )),
        }
    }

    /// First validation message, if the request breaks a field rule.
    pub fn rule_violation(&self) -> Option<String> {
        let errors = self.validate().err()?;
        let message = errors
            .field_errors()
            .values()
            .flat_map(|field_errors| field_errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request.".to_string());
        Some(message)
    }
}
