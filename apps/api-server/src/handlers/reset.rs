//! Password reset handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::DomainError;
use quill_core::services::ResetDispatch;
use quill_shared::ApiResponse;
use quill_shared::dto::{CompleteResetRequest, ResetRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

const RESET_SENT: &str = "An email has been sent with instructions to reset your password.";

#[derive(Serialize)]
pub struct TokenStatus {
    pub valid: bool,
}

/// POST /api/auth/reset-password
///
/// Answers 202 whether or not the address belongs to an account.
pub async fn request_reset(
    state: web::Data<AppState>,
    body: web::Json<ResetRequest>,
) -> AppResult<HttpResponse> {
    match state.resets.request_reset(&body.email).await {
        Ok(ResetDispatch::Sent { .. } | ResetDispatch::NoAccount) => {}
        Err(DomainError::EmailDeliveryFailed(reason)) => {
            tracing::error!(%reason, "password reset email could not be delivered");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(HttpResponse::Accepted().json(ApiResponse::ok_with_message((), RESET_SENT)))
}

/// GET /api/auth/reset-password/{token}
pub async fn check_reset_token(
    state: web::Data<AppState>,
    token: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.resets.check_token(&token).await?;
    Ok(HttpResponse::Ok().json(TokenStatus { valid: true }))
}

/// POST /api/auth/reset-password/{token}
pub async fn complete_reset(
    state: web::Data<AppState>,
    token: web::Path<String>,
    body: web::Json<CompleteResetRequest>,
) -> AppResult<HttpResponse> {
    state
        .resets
        .complete_reset(&token, &body.password, &body.confirm_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        (),
        "Your password has been updated! You are now able to log in.",
    )))
}
