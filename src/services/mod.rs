pub mod account_directory;
pub mod mail_service;
pub mod otp_service;
pub mod password_reset_service;
