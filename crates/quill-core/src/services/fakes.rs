//! In-process doubles for service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, Post, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, Clock, FixedClock, ImageProcessor, MailError, Mailer, MediaError,
    OutgoingEmail, PasswordService, PictureStore, PostRepository, ResetTokenService,
    SessionLifetime, TokenClaims, TokenService, UserRepository,
};

#[derive(Default)]
pub struct Users(pub Mutex<HashMap<Uuid, User>>);

#[async_trait]
impl BaseRepository<User, Uuid> for Users {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        self.0.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut map = self.0.lock().unwrap();
        if !map.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        map.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.0.lock().unwrap().remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for Users {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let map = self.0.lock().unwrap();
        Ok(map.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let map = self.0.lock().unwrap();
        Ok(map.values().find(|u| u.username == username).cloned())
    }
}

#[derive(Default)]
pub struct Posts(pub Mutex<HashMap<Uuid, Post>>);

impl Posts {
    fn page_of(mut posts: Vec<Post>, page: PageRequest) -> Page<Post> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = posts.len() as u64;
        let items = posts
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.per_page as usize)
            .collect();
        Page::new(items, page, total)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for Posts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.0.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut map = self.0.lock().unwrap();
        if !map.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        map.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.0.lock().unwrap().remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for Posts {
    async fn list_recent(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let posts = self.0.lock().unwrap().values().cloned().collect();
        Ok(Self::page_of(posts, page))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let posts = self
            .0
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(Self::page_of(posts, page))
    }
}

/// Reversible "hash" so tests stay fast.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain${password}"))
    }
}

/// Unsigned `user_id:issued_at` tokens, aged against a shared clock.
pub struct ClockTokens {
    pub clock: Arc<FixedClock>,
    pub issued: Mutex<usize>,
}

impl ClockTokens {
    pub fn new(clock: Arc<FixedClock>) -> Self {
        Self {
            clock,
            issued: Mutex::new(0),
        }
    }

    pub fn issued_count(&self) -> usize {
        *self.issued.lock().unwrap()
    }
}

impl ResetTokenService for ClockTokens {
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        *self.issued.lock().unwrap() += 1;
        Ok(format!("{user_id}:{}", self.clock.now().timestamp()))
    }

    fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let (id, ts) = token
            .split_once(':')
            .ok_or_else(|| AuthError::InvalidToken("malformed".into()))?;
        let id = Uuid::parse_str(id).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let ts: i64 = ts.parse().map_err(|_| AuthError::InvalidToken("ts".into()))?;
        if self.clock.now().timestamp() - ts > Duration::minutes(30).num_seconds() {
            return Err(AuthError::TokenExpired);
        }
        Ok(id)
    }
}

pub struct StaticSessions;

impl TokenService for StaticSessions {
    fn generate_token(
        &self,
        user_id: Uuid,
        _email: &str,
        lifetime: SessionLifetime,
    ) -> Result<String, AuthError> {
        Ok(format!("session:{user_id}:{lifetime:?}"))
    }

    fn validate_token(&self, _token: &str) -> Result<TokenClaims, AuthError> {
        Err(AuthError::InvalidToken("not used".into()))
    }

    fn expiration_seconds(&self, _lifetime: SessionLifetime) -> i64 {
        3600
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("connection refused".into()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Pretends to shrink pictures by truncating them.
pub struct TruncatingImages;

impl ImageProcessor for TruncatingImages {
    fn thumbnail(
        &self,
        bytes: &[u8],
        _extension: &str,
        _w: u32,
        _h: u32,
    ) -> Result<Vec<u8>, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Decode("empty".into()));
        }
        Ok(bytes.iter().take(4).copied().collect())
    }
}

#[derive(Default)]
pub struct Pictures(pub Mutex<HashMap<String, Vec<u8>>>);

#[async_trait]
impl PictureStore for Pictures {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), MediaError> {
        self.0.lock().unwrap().insert(file_name.to_string(), bytes);
        Ok(())
    }

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, MediaError> {
        Ok(self.0.lock().unwrap().get(file_name).cloned())
    }
}
