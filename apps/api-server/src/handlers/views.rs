//! Domain to wire conversions.

use quill_core::domain::{Page, PageRequest, User};
use quill_core::services::PostView;
use quill_shared::dto::{AuthorResponse, PageQuery, PageResponse, PostResponse, UserResponse};

pub fn picture_url(file_name: &str) -> String {
    format!("/api/profile-pics/{file_name}")
}

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        image_url: picture_url(&user.image_file),
        created_at: user.created_at.to_rfc3339(),
    }
}

pub fn post_response(view: PostView) -> PostResponse {
    PostResponse {
        id: view.post.id.to_string(),
        title: view.post.title,
        content: view.post.content,
        author: AuthorResponse {
            image_url: picture_url(&view.author_image),
            username: view.author_username,
        },
        created_at: view.post.created_at.to_rfc3339(),
        updated_at: view.post.updated_at.to_rfc3339(),
    }
}

pub fn page_response(page: Page<PostView>) -> PageResponse<PostResponse> {
    let page = page.map(post_response);
    PageResponse {
        items: page.items,
        page: page.page,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }
}

/// Missing, zero and negative page numbers all mean the first page.
pub fn page_request(query: &PageQuery) -> PageRequest {
    PageRequest::page(query.page.unwrap_or(1).max(1) as u64)
}
