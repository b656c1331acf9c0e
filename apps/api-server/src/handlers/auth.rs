//! Registration and session handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use crate::handlers::views::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .accounts
        .register(&req.username, &req.email, &req.password, &req.confirm_password)
        .await?;

    Ok(HttpResponse::Created().json(user_response(&user)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let outcome = state
        .accounts
        .login(&req.email, &req.password, req.remember)
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: outcome.token,
        token_type: "Bearer".to_string(),
        expires_in: outcome.expires_in.max(0) as u64,
        user: user_response(&outcome.user),
    }))
}

/// POST /api/auth/logout
///
/// Sessions are bearer tokens with no server-side record; the client drops it.
pub async fn logout(identity: Identity) -> HttpResponse {
    tracing::info!(user_id = %identity.user_id, "user logged out");
    HttpResponse::NoContent().finish()
}
