use axum::{routing::post, Router};

use crate::{handlers::otp, state::AppState};

pub fn otp_routes() -> Router<AppState> {
    Router::new()
        // Email verification
        .route("/sendOtp", post(otp::send_otp))
        .route("/verifyOtp", post(otp::verify_otp))
        // Password reset: code by mail, code for token, token for new password
        .route("/sendPasswordResetOtp", post(otp::send_password_reset_otp))
        .route("/verifyPasswordResetOtp", post(otp::verify_password_reset_otp))
        .route("/resetPasswordWithOtp", post(otp::reset_password_with_otp))
}
