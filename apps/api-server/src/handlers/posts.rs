//! Post handlers. Mutations are limited to the post's author.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::{PageQuery, PostRequest};

use crate::handlers::views::{page_request, page_response, post_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.list_recent(page_request(&query)).await?;
    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// GET /api/users/{username}/posts?page=
pub async fn list_user_posts(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list_by_author(&username, page_request(&query))
        .await?;
    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .create(identity.user_id, &body.title, &body.content)
        .await?;
    Ok(HttpResponse::Created().json(post_response(view)))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, id: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let view = state.posts.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .update(identity.user_id, id.into_inner(), &body.title, &body.content)
        .await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(identity.user_id, id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
