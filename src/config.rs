// config.rs
use std::env;
use std::str::FromStr;

use chrono::Duration;

use crate::errors::{AppError, Result};

/// Lifetimes of the issued credentials.
#[derive(Debug, Clone, Copy)]
pub struct OtpSettings {
    pub otp_ttl_minutes: i64,
    pub reset_token_ttl_minutes: i64,
}

impl OtpSettings {
    pub fn otp_ttl(&self) -> Duration {
        Duration::minutes(self.otp_ttl_minutes)
    }

    pub fn reset_token_ttl(&self) -> Duration {
        Duration::minutes(self.reset_token_ttl_minutes)
    }
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            otp_ttl_minutes: 10,
            reset_token_ttl_minutes: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from_name: String,
    pub from_address: String,
    pub app_name: String,
}

impl MailConfig {
    /// Sender identity in `"Name" <address>` form.
    pub fn sender(&self) -> String {
        format!("\"{}\" <{}>", self.from_name, self.from_address)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub host: String,
    pub port: u16,
    pub mail: MailConfig,
    pub otp: OtpSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = OtpSettings::default();

        Ok(AppConfig {
            database_url: required("DATABASE_URL")?,
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "dermai".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed("PORT", 10000)?,
            mail: MailConfig {
                api_url: env::var("MAIL_API_URL")
                    .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
                api_key: required("MAIL_API_KEY")?,
                from_name: env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "DermAI".to_string()),
                from_address: required("MAIL_FROM_ADDRESS")?,
                app_name: env::var("APP_NAME").unwrap_or_else(|_| "DermAI".to_string()),
            },
            otp: OtpSettings {
                otp_ttl_minutes: parsed("OTP_TTL_MINUTES", defaults.otp_ttl_minutes)?,
                reset_token_ttl_minutes: parsed(
                    "RESET_TOKEN_TTL_MINUTES",
                    defaults.reset_token_ttl_minutes,
                )?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::configuration(format!("{} must be set", key))),
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::configuration(format!("{} must be a number, got {:?}", key, raw))
        }),
        Err(_) => Ok(default),
    }
}
