//! In-memory repositories - used when no database is configured.
//!
//! Uniqueness of usernames and emails is enforced the same way the
//! Postgres unique indexes do it. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Page, PageRequest, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(users: &HashMap<Uuid, User>, candidate: &User) -> Result<(), RepoError> {
        for other in users.values().filter(|u| u.id != candidate.id) {
            if other.email == candidate.email {
                return Err(RepoError::Constraint("users_email_key".to_string()));
            }
            if other.username == candidate.username {
                return Err(RepoError::Constraint("users_username_key".to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepoError::Constraint("users_pkey".to_string()));
        }
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn page_where(
        &self,
        page: PageRequest,
        keep: impl Fn(&Post) -> bool,
    ) -> Page<Post> {
        let posts = self.posts.read().await;
        let mut matching: Vec<&Post> = posts.values().filter(|p| keep(*p)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.per_page as usize)
            .cloned()
            .collect();
        Page::new(items, page, total)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post.id) {
            Some(slot) => {
                *slot = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_recent(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        Ok(self.page_where(page, |_| true).await)
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        Ok(self.page_where(page, |p| p.author_id == author_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(name: &str) -> User {
        User::new(name.into(), format!("{name}@x.com"), "h".into(), Utc::now())
    }

    #[tokio::test]
    async fn test_unique_email_and_username() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("alice")).await.unwrap();

        let mut same_email = user("alicia");
        same_email.email = "alice@x.com".into();
        assert!(matches!(
            repo.insert(same_email).await,
            Err(RepoError::Constraint(_))
        ));

        let mut same_name = user("alice");
        same_name.email = "other@x.com".into();
        assert!(matches!(
            repo.insert(same_name).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.update(user("ghost")).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_posts_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let start = Utc::now();
        for i in 0..3 {
            let post = Post::new(
                author,
                format!("p{i}"),
                "c".into(),
                start + Duration::seconds(i),
            );
            repo.insert(post).await.unwrap();
        }
        repo.insert(Post::new(Uuid::new_v4(), "other".into(), "c".into(), start))
            .await
            .unwrap();

        let page = repo
            .list_by_author(author, PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["p2", "p1"]);

        assert_eq!(repo.list_recent(PageRequest::default()).await.unwrap().total_items, 4);
    }
}
