use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::dtos::otp_dtos::{OtpResponse, ResetPasswordRequest, SendOtpRequest, VerifyOtpRequest};
use crate::errors::{AppError, Result};
use crate::state::AppState;

// Body extractor whose rejections come back as invalid-argument errors.
type JsonBody<T> = WithRejection<Json<T>, AppError>;

pub async fn send_otp(
    State(state): State<AppState>,
    WithRejection(Json(req), _): JsonBody<SendOtpRequest>,
) -> Result<Json<OtpResponse>> {
    state.otp_service.send_otp(&req).await.map(Json)
}

pub async fn verify_otp(
    State(state): State<AppState>,
    WithRejection(Json(req), _): JsonBody<VerifyOtpRequest>,
) -> Result<Json<OtpResponse>> {
    state.otp_service.verify_otp(&req).await.map(Json)
}

pub async fn send_password_reset_otp(
    State(state): State<AppState>,
    WithRejection(Json(req), _): JsonBody<SendOtpRequest>,
) -> Result<Json<OtpResponse>> {
    state
        .password_reset_service
        .send_password_reset_otp(&req)
        .await
        .map(Json)
}

pub async fn verify_password_reset_otp(
    State(state): State<AppState>,
    WithRejection(Json(req), _): JsonBody<VerifyOtpRequest>,
) -> Result<Json<OtpResponse>> {
    state
        .password_reset_service
        .verify_password_reset_otp(&req)
        .await
        .map(Json)
}

pub async fn reset_password_with_otp(
    State(state): State<AppState>,
    WithRejection(Json(req), _): JsonBody<ResetPasswordRequest>,
) -> Result<Json<OtpResponse>> {
    state
        .password_reset_service
        .reset_password_with_otp(&req)
        .await
        .map(Json)
}
