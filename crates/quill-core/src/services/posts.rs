//! Post use cases: create, read, newest-first listings, author-only edits.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, Post};
use crate::error::DomainError;
use crate::ports::{Clock, PostRepository, UserRepository};
use crate::services::guard::ensure_can_modify;
use crate::services::validation::validate_post;

/// A post together with the public details of its author.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub post: Post,
    pub author_username: String,
    pub author_image: String,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            users,
            clock,
        }
    }

    pub async fn create(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<PostView, DomainError> {
        validate_post(title, content)?;
        let post = Post::new(
            author_id,
            title.trim().to_string(),
            content.to_string(),
            self.clock.now(),
        );
        let post = self.posts.insert(post).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");
        self.view(post).await
    }

    pub async fn get(&self, id: Uuid) -> Result<PostView, DomainError> {
        let post = self.find(id).await?;
        self.view(post).await
    }

    pub async fn list_recent(&self, page: PageRequest) -> Result<Page<PostView>, DomainError> {
        let page = self.posts.list_recent(page).await?;
        self.views(page).await
    }

    /// Posts by one author; `NotFound` when the username is unknown.
    pub async fn list_by_author(
        &self,
        username: &str,
        page: PageRequest,
    ) -> Result<Page<PostView>, DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::NotFoundByKey(format!("User '{username}'")))?;
        let page = self.posts.list_by_author(author.id, page).await?;
        Ok(page.map(|post| PostView {
            post,
            author_username: author.username.clone(),
            author_image: author.image_file.clone(),
        }))
    }

    pub async fn update(
        &self,
        actor: Uuid,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<PostView, DomainError> {
        let mut post = self.find(id).await?;
        ensure_can_modify(actor, &post)?;
        validate_post(title, content)?;

        post.edit(title.trim().to_string(), content.to_string(), self.clock.now());
        let post = self.posts.update(post).await?;
        tracing::info!(post_id = %post.id, "post updated");
        self.view(post).await
    }

    pub async fn delete(&self, actor: Uuid, id: Uuid) -> Result<(), DomainError> {
        let post = self.find(id).await?;
        ensure_can_modify(actor, &post)?;
        self.posts.delete(post.id).await?;
        tracing::info!(post_id = %id, "post deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Post",
                id,
            })
    }

    async fn view(&self, post: Post) -> Result<PostView, DomainError> {
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("post {} has no author", post.id)))?;
        Ok(PostView {
            post,
            author_username: author.username,
            author_image: author.image_file,
        })
    }

    async fn views(&self, page: Page<Post>) -> Result<Page<PostView>, DomainError> {
        let mut authors = HashMap::new();
        for post in &page.items {
            if authors.contains_key(&post.author_id) {
                continue;
            }
            if let Some(user) = self.users.find_by_id(post.author_id).await? {
                authors.insert(post.author_id, (user.username, user.image_file));
            }
        }
        Ok(page.map(|post| {
            let (author_username, author_image) =
                authors.get(&post.author_id).cloned().unwrap_or_default();
            PostView {
                post,
                author_username,
                author_image,
            }
        }))
    }
}
