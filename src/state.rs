use std::sync::Arc;

use crate::config::OtpSettings;
use crate::database::store::DocumentStore;
use crate::services::account_directory::AccountDirectory;
use crate::services::mail_service::MailSender;
use crate::services::otp_service::OtpService;
use crate::services::password_reset_service::PasswordResetService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub otp_service: OtpService,
    pub password_reset_service: PasswordResetService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn MailSender>,
        directory: Arc<dyn AccountDirectory>,
        settings: OtpSettings,
        app_name: &str,
    ) -> Self {
        AppState {
            otp_service: OtpService::new(store.clone(), mailer.clone(), settings, app_name),
            password_reset_service: PasswordResetService::new(
                store.clone(),
                mailer,
                directory,
                settings,
                app_name,
            ),
            store,
        }
    }
}
