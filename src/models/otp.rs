use chrono::{Duration, Utc};
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

pub const VERIFICATION_OTPS: &str = "otps";
pub const PASSWORD_RESET_OTPS: &str = "password_reset_otps";
pub const PASSWORD_RESET_TOKENS: &str = "password_reset_tokens";

/// Email verification code, keyed by email in `otps`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOtp {
    pub code: String,         // 6-digit OTP
    pub expires_at: DateTime,
    pub created_at: DateTime,
}

/// Password reset code, keyed by email in `password_reset_otps`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetOtp {
    pub code: String,
    pub expires_at: DateTime,
    pub created_at: DateTime,
    pub verified: bool,
}

/// Short-lived credential minted once a reset code checks out.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetToken {
    pub token: String,
    pub expires_at: DateTime,
    pub created_at: DateTime,
}

impl VerificationOtp {
    pub fn issue(code: String, ttl: Duration) -> Self {
        let (created_at, expires_at) = window(ttl);
        Self {
            code,
            expires_at,
            created_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        is_past(self.expires_at)
    }
}

impl ResetOtp {
    pub fn issue(code: String, ttl: Duration) -> Self {
        let (created_at, expires_at) = window(ttl);
        Self {
            code,
            expires_at,
            created_at,
            verified: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        is_past(self.expires_at)
    }
}

impl ResetToken {
    pub fn issue(token: String, ttl: Duration) -> Self {
        let (created_at, expires_at) = window(ttl);
        Self {
            token,
            expires_at,
            created_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        is_past(self.expires_at)
    }
}

fn window(ttl: Duration) -> (DateTime, DateTime) {
    let now = Utc::now();
    let expires_at = now + ttl;
    (
        DateTime::from_millis(now.timestamp_millis()),
        DateTime::from_millis(expires_at.timestamp_millis()),
    )
}

// A credential is still valid at the exact instant of its expiry.
fn is_past(expires_at: DateTime) -> bool {
    Utc::now().timestamp_millis() > expires_at.timestamp_millis()
}
