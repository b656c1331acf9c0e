use chrono::Utc;
use std::collections::BTreeMap;

use quill_core::domain::{PageRequest, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn user_model(id: Uuid, email: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        username: "alice".to_owned(),
        email: email.to_owned(),
        password_hash: "$argon2id$hash".to_owned(),
        image_file: "default.jpg".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post::Model {
            id: post_id,
            author_id,
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_find_user_by_email() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(id, "a@x.com")]])
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.image_file, "default.jpg");

    assert!(repo.find_by_email("ghost@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_returns_stored_row() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(id, "a@x.com")]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let mut user = User::new("alice".into(), "a@x.com".into(), "h".into(), Utc::now());
    user.id = id;

    let stored: User = repo.insert(user).await.unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.username, "alice");
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = Post::new(Uuid::new_v4(), "t".into(), "c".into(), Utc::now());

    let result: Result<Post, RepoError> = repo.update(post).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_reports_missing_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await.is_ok());
    assert!(matches!(
        BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_far_page_is_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(3)),
        )])]])
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo.list_recent(PageRequest::page(u64::MAX)).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 1);
}
