use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::MailConfig;
use crate::errors::{AppError, Result};

/// A plaintext email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<()>;
}

#[derive(Serialize)]
struct SendEmailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Delivers mail through a transactional email HTTP API.
#[derive(Clone)]
pub struct HttpMailSender {
    api_url: String,
    api_key: String,
    sender: String,
    client: Client,
}

impl HttpMailSender {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::configuration(format!("Mail client: {}", e)))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender: config.sender(),
            client,
        })
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        let payload = SendEmailPayload {
            from: &self.sender,
            to: [message.to.as_str()],
            subject: &message.subject,
            text: &message.text,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::mail(format!(
                "Mail API rejected message with status: {}",
                response.status()
            )))
        }
    }
}

pub fn verification_otp_email(
    app_name: &str,
    to: &str,
    code: &str,
    ttl_minutes: i64,
) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Your OTP Code".to_string(),
        text: format!(
            "Hello,\n\nYour one-time password (OTP) for {app} is: {code}\n\n\
             This code will expire in {ttl} minutes. Please do not share this code with anyone.\n\n\
             Best regards,\n{app} Team",
            app = app_name,
            code = code,
            ttl = ttl_minutes,
        ),
    }
}

pub fn password_reset_otp_email(
    app_name: &str,
    to: &str,
    code: &str,
    ttl_minutes: i64,
) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: format!("Password Reset OTP - {}", app_name),
        text: format!(
            "Hello,\n\nYou requested to reset your password for {app}.\n\n\
             Your one-time password (OTP) is: {code}\n\n\
             This code will expire in {ttl} minutes. Please do not share this code with anyone.\n\n\
             If you did not request this password reset, please ignore this email.\n\n\
             Best regards,\n{app} Team",
            app = app_name,
            code = code,
            ttl = ttl_minutes,
        ),
    }
}
