use std::sync::Arc;

use rand::Rng;

use crate::config::OtpSettings;
use crate::database::store::{load, save, DocumentStore};
use crate::dtos::otp_dtos::{OtpResponse, SendOtpRequest, VerifyOtpRequest};
use crate::errors::{AppError, Result};
use crate::models::otp::{VerificationOtp, VERIFICATION_OTPS};
use crate::services::mail_service::{verification_otp_email, MailSender};

pub const OTP_SENT: &str = "OTP sent successfully";
pub const OTP_VERIFIED: &str = "OTP verified successfully.";
pub const NO_OTP_FOUND: &str = "No OTP found for this email.";
pub const OTP_EXPIRED: &str = "OTP has expired.";
pub const INVALID_OTP: &str = "Invalid OTP.";

// Generate 6-digit OTP, never starting with zero
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    rng.gen_range(100_000..1_000_000).to_string()
}

/// Issues and checks email verification codes.
#[derive(Clone)]
pub struct OtpService {
    store: Arc<dyn DocumentStore>,
    mailer: Arc<dyn MailSender>,
    settings: OtpSettings,
    app_name: String,
}

impl OtpService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn MailSender>,
        settings: OtpSettings,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            settings,
            app_name: app_name.into(),
        }
    }

    pub async fn send_otp(&self, req: &SendOtpRequest) -> Result<OtpResponse> {
        let email = req.email()?;

        match self.issue(email).await {
            Ok(()) => {
                tracing::info!("Verification OTP issued");
                Ok(OtpResponse::ok(OTP_SENT))
            }
            Err(e) => {
                tracing::error!("Error sending OTP: {}", e);
                Err(AppError::internal("Failed to send OTP."))
            }
        }
    }

    pub async fn verify_otp(&self, req: &VerifyOtpRequest) -> Result<OtpResponse> {
        let (email, otp) = req.fields()?;

        self.check(email, otp).await.map_err(|e| {
            tracing::error!("Error verifying OTP: {}", e);
            AppError::internal("Failed to verify OTP.")
        })
    }

    // Overwrites whatever code this email had before.
    async fn issue(&self, email: &str) -> Result<()> {
        let code = generate_otp();
        let otp = VerificationOtp::issue(code.clone(), self.settings.otp_ttl());
        save(self.store.as_ref(), VERIFICATION_OTPS, email, &otp).await?;

        let message = verification_otp_email(
            &self.app_name,
            email,
            &code,
            self.settings.otp_ttl_minutes,
        );
        self.mailer.send(&message).await
    }

    async fn check(&self, email: &str, otp: &str) -> Result<OtpResponse> {
        let stored: Option<VerificationOtp> =
            load(self.store.as_ref(), VERIFICATION_OTPS, email).await?;

        let Some(stored) = stored else {
            return Ok(OtpResponse::failure(NO_OTP_FOUND));
        };

        if stored.is_expired() {
            return Ok(OtpResponse::failure(OTP_EXPIRED));
        }

        if stored.code != otp {
            return Ok(OtpResponse::failure(INVALID_OTP));
        }

        // Single use
        self.store.delete(VERIFICATION_OTPS, email).await?;
        tracing::info!("Verification OTP consumed");
        Ok(OtpResponse::ok(OTP_VERIFIED))
    }
}
