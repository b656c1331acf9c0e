//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use quill_core::domain::{Page, PageRequest, Post, User, mask_email};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

impl PostgresPostRepository {
    async fn fetch_page(
        &self,
        query: Select<PostEntity>,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let paginator = query
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(page.page.saturating_sub(1))
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            page,
            total,
        ))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_recent(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        self.fetch_page(PostEntity::find(), page).await
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let query = PostEntity::find().filter(post::Column::AuthorId.eq(author_id));
        self.fetch_page(query, page).await
    }
}
