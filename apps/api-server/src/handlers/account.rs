//! Account and profile picture handlers.

use actix_web::{HttpResponse, http::header::ContentType, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use quill_core::services::{AccountUpdate, PictureUpload};
use quill_shared::dto::UpdateAccountRequest;

use crate::handlers::views::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/account
pub async fn get_account(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = state.accounts.profile(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(user_response(&user)))
}

/// PUT /api/account
pub async fn update_account(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateAccountRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let picture = match req.picture {
        Some(encoded) => {
            // Accept bare base64 as well as data URLs.
            let payload = encoded.split_once(',').map_or(encoded.as_str(), |(_, b)| b);
            let bytes = STANDARD
                .decode(payload.trim())
                .map_err(|_| AppError::BadRequest("Picture is not valid base64".to_string()))?;
            Some(PictureUpload {
                file_name: req.picture_filename.unwrap_or_default(),
                bytes,
            })
        }
        None => None,
    };

    let update = AccountUpdate {
        username: req.username,
        email: req.email,
        picture,
    };
    let user = state
        .accounts
        .update_account(identity.user_id, identity.user_id, update)
        .await?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

/// GET /api/profile-pics/{file}
pub async fn profile_picture(
    state: web::Data<AppState>,
    file: web::Path<String>,
) -> AppResult<HttpResponse> {
    let bytes = state.accounts.picture(&file).await?;
    let content_type = if file.to_ascii_lowercase().ends_with(".png") {
        ContentType::png()
    } else {
        ContentType::jpeg()
    };

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
