use std::sync::Arc;

use mongodb::bson::doc;
use uuid::Uuid;

use crate::config::OtpSettings;
use crate::database::store::{load, save, DocumentStore};
use crate::dtos::otp_dtos::{OtpResponse, ResetPasswordRequest, SendOtpRequest, VerifyOtpRequest};
use crate::errors::{AppError, Result};
use crate::models::otp::{ResetOtp, ResetToken, PASSWORD_RESET_OTPS, PASSWORD_RESET_TOKENS};
use crate::services::account_directory::AccountDirectory;
use crate::services::mail_service::{password_reset_otp_email, MailSender};
use crate::services::otp_service::{
    generate_otp, INVALID_OTP, NO_OTP_FOUND, OTP_EXPIRED, OTP_VERIFIED,
};

pub const RESET_OTP_MAYBE_SENT: &str = "If the email exists, an OTP has been sent.";
pub const TOKEN_MISSING: &str = "Invalid or expired reset token.";
pub const TOKEN_EXPIRED: &str = "Reset token has expired.";
pub const TOKEN_INVALID: &str = "Invalid reset token.";
pub const PASSWORD_RESET: &str = "Password reset successfully.";

// Opaque, unpredictable reset token
pub fn generate_reset_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Password reset flow: reset code by mail, code exchanged for a token,
/// token exchanged for a new password.
#[derive(Clone)]
pub struct PasswordResetService {
    store: Arc<dyn DocumentStore>,
    mailer: Arc<dyn MailSender>,
    directory: Arc<dyn AccountDirectory>,
    settings: OtpSettings,
    app_name: String,
}

impl PasswordResetService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn MailSender>,
        directory: Arc<dyn AccountDirectory>,
        settings: OtpSettings,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            directory,
            settings,
            app_name: app_name.into(),
        }
    }

    pub async fn send_password_reset_otp(&self, req: &SendOtpRequest) -> Result<OtpResponse> {
        let email = req.email()?;

        // Same answer whether or not the account exists.
        if let Err(e) = self.directory.find_by_email(email).await {
            tracing::warn!("Password reset requested for unresolved account: {}", e);
            return Ok(OtpResponse::ok(RESET_OTP_MAYBE_SENT));
        }

        match self.issue(email).await {
            Ok(()) => {
                tracing::info!("Password reset OTP issued");
                Ok(OtpResponse::ok(RESET_OTP_MAYBE_SENT))
            }
            Err(e) => {
                tracing::error!("Error sending password reset OTP: {}", e);
                Err(AppError::internal("Failed to send password reset OTP."))
            }
        }
    }

    pub async fn verify_password_reset_otp(&self, req: &VerifyOtpRequest) -> Result<OtpResponse> {
        let (email, otp) = req.fields()?;

        self.exchange_code(email, otp).await.map_err(|e| {
            tracing::error!("Error verifying password reset OTP: {}", e);
            AppError::internal("Failed to verify password reset OTP.")
        })
    }

    pub async fn reset_password_with_otp(&self, req: &ResetPasswordRequest) -> Result<OtpResponse> {
        let (email, token, new_password) = req.fields()?;

        if let Some(message) = req.rule_violation() {
            return Ok(OtpResponse::failure(message));
        }

        self.consume_token(email, token, new_password).await.map_err(|e| {
            tracing::error!("Error resetting password with OTP: {}", e);
            AppError::internal("Failed to reset password.")
        })
    }

    async fn issue(&self, email: &str) -> Result<()> {
        let code = generate_otp();
        let otp = ResetOtp::issue(code.clone(), self.settings.otp_ttl());
        save(self.store.as_ref(), PASSWORD_RESET_OTPS, email, &otp).await?;

        let message = password_reset_otp_email(
            &self.app_name,
            email,
            &code,
            self.settings.otp_ttl_minutes,
        );
        self.mailer.send(&message).await
    }

    async fn exchange_code(&self, email: &str, otp: &str) -> Result<OtpResponse> {
        let stored: Option<ResetOtp> =
            load(self.store.as_ref(), PASSWORD_RESET_OTPS, email).await?;

        let Some(stored) = stored else {
            return Ok(OtpResponse::failure(NO_OTP_FOUND));
        };

        if stored.is_expired() {
            return Ok(OtpResponse::failure(OTP_EXPIRED));
        }

        if stored.code != otp {
            return Ok(OtpResponse::failure(INVALID_OTP));
        }

        let token = ResetToken::issue(generate_reset_token(), self.settings.reset_token_ttl());
        save(self.store.as_ref(), PASSWORD_RESET_TOKENS, email, &token).await?;

        // Flag the code rather than delete it; it goes away with the reset.
        self.store
            .update(PASSWORD_RESET_OTPS, email, doc! { "verified": true })
            .await?;

        tracing::info!("Password reset OTP verified, reset token issued");
        Ok(OtpResponse::ok(OTP_VERIFIED).with_reset_token(token.token))
    }

    async fn consume_token(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<OtpResponse> {
        let stored: Option<ResetToken> =
            load(self.store.as_ref(), PASSWORD_RESET_TOKENS, email).await?;

        let Some(stored) = stored else {
            return Ok(OtpResponse::failure(TOKEN_MISSING));
        };

        if stored.is_expired() {
            self.store.delete(PASSWORD_RESET_TOKENS, email).await?;
            return Ok(OtpResponse::failure(TOKEN_EXPIRED));
        }

        if stored.token != token {
            return Ok(OtpResponse::failure(TOKEN_INVALID));
        }

        let account = self.directory.find_by_email(email).await?;
        self.directory.update_password(&account, new_password).await?;

        self.store.delete(PASSWORD_RESET_TOKENS, email).await?;
        self.store.delete(PASSWORD_RESET_OTPS, email).await?;

        tracing::info!("Password reset for account {}", account.id);
        Ok(OtpResponse::ok(PASSWORD_RESET))
    }
}
