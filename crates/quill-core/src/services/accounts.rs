//! Account use cases: registration, login and profile edits.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, mask_email, normalize_email};
use crate::error::DomainError;
use crate::ports::{
    ALLOWED_PICTURE_EXTENSIONS, Clock, ImageProcessor, MediaError,
    PasswordService, PictureStore, SessionLifetime, TokenService, UserRepository,
};
use crate::services::guard::ensure_can_modify_account;
use crate::services::validation::{validate_email, validate_new_password, validate_username};

/// Bounding box for stored profile pictures.
pub const PICTURE_MAX_SIZE: (u32, u32) = (200, 200);

/// An uploaded picture before processing. `file_name` only supplies the extension.
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PictureUpload {
    /// Lowercased extension, if it is one we accept.
    fn extension(&self) -> Result<String, MediaError> {
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if ALLOWED_PICTURE_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(MediaError::UnsupportedFormat(ext))
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub username: String,
    pub email: String,
    pub picture: Option<PictureUpload>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    sessions: Arc<dyn TokenService>,
    images: Arc<dyn ImageProcessor>,
    pictures: Arc<dyn PictureStore>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        sessions: Arc<dyn TokenService>,
        images: Arc<dyn ImageProcessor>,
        pictures: Arc<dyn PictureStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            passwords,
            sessions,
            images,
            pictures,
            clock,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, DomainError> {
        let username = username.trim();
        let email = normalize_email(email);
        validate_username(username)?;
        validate_email(&email)?;
        validate_new_password(password, confirm_password)?;

        self.ensure_username_free(username, None).await?;
        self.ensure_email_free(&email, None).await?;

        let hash = self.passwords.hash(password)?;
        let user = User::new(username.to_string(), email, hash, self.clock.now());
        let user = self.users.insert(user).await?;

        tracing::info!(user_id = %user.id, user_email = %mask_email(&user.email), "account registered");
        Ok(user)
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome, DomainError> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "login rejected");
            return Err(DomainError::InvalidCredentials);
        }

        let lifetime = if remember {
            SessionLifetime::Extended
        } else {
            SessionLifetime::Standard
        };
        let token = self.sessions.generate_token(user.id, &user.email, lifetime)?;
        let expires_in = self.sessions.expiration_seconds(lifetime);

        tracing::info!(user_id = %user.id, remember, "user logged in");
        Ok(LoginOutcome {
            user,
            token,
            expires_in,
        })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "User",
                id: user_id,
            })
    }

    pub async fn update_account(
        &self,
        actor: Uuid,
        target: Uuid,
        update: AccountUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.profile(target).await?;
        ensure_can_modify_account(actor, &user)?;

        let username = update.username.trim().to_string();
        let email = normalize_email(&update.email);
        validate_username(&username)?;
        validate_email(&email)?;
        self.ensure_username_free(&username, Some(user.id)).await?;
        self.ensure_email_free(&email, Some(user.id)).await?;

        if let Some(upload) = update.picture {
            user.image_file = self.store_picture(&upload).await?;
        }

        user.username = username;
        user.email = email;
        user.updated_at = self.clock.now();
        let user = self.users.update(user).await?;

        tracing::info!(user_id = %user.id, "account updated");
        Ok(user)
    }

    /// Bytes of a stored profile picture.
    pub async fn picture(&self, file_name: &str) -> Result<Vec<u8>, DomainError> {
        self.pictures
            .load(file_name)
            .await?
            .ok_or_else(|| DomainError::NotFoundByKey(format!("Picture '{file_name}'")))
    }

    async fn store_picture(&self, upload: &PictureUpload) -> Result<String, DomainError> {
        let ext = upload.extension()?;
        let (max_w, max_h) = PICTURE_MAX_SIZE;
        let resized = self.images.thumbnail(&upload.bytes, &ext, max_w, max_h)?;

        let mut name = Uuid::new_v4().simple().to_string();
        name.truncate(16);
        let file_name = format!("{name}.{ext}");
        self.pictures.save(&file_name, resized).await?;

        tracing::debug!(file_name = %file_name, "profile picture stored");
        Ok(file_name)
    }

    async fn ensure_username_free(
        &self,
        username: &str,
        owner: Option<Uuid>,
    ) -> Result<(), DomainError> {
        match self.users.find_by_username(username).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(
                "That username is taken. Please choose a different one.".to_string(),
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> Result<(), DomainError> {
        match self.users.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(
                "That email is taken. Please choose a different one.".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use crate::services::fakes::{Pictures, PlainPasswords, StaticSessions, TruncatingImages, Users};
    use chrono::Utc;

    struct Harness {
        pictures: Arc<Pictures>,
        service: AccountService,
    }

    fn harness() -> Harness {
        let pictures = Arc::new(Pictures::default());
        let service = AccountService::new(
            Arc::new(Users::default()),
            Arc::new(PlainPasswords),
            Arc::new(StaticSessions),
            Arc::new(TruncatingImages),
            pictures.clone(),
            Arc::new(FixedClock::new(Utc::now())),
        );
        Harness { pictures, service }
    }

    fn update(username: &str, email: &str, picture: Option<PictureUpload>) -> AccountUpdate {
        AccountUpdate {
            username: username.into(),
            email: email.into(),
            picture,
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let h = harness();
        let user = h
            .service
            .register("alice", "Alice@X.com", "secret1", "secret1")
            .await
            .unwrap();
        assert_eq!(user.email, "alice@x.com");
        assert_ne!(user.password_hash, "secret1");

        let outcome = h.service.login("alice@x.com", "secret1", true).await.unwrap();
        assert_eq!(outcome.user.id, user.id);
        assert!(outcome.token.ends_with("Extended"));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let h = harness();
        h.service
            .register("alice", "a@x.com", "secret1", "secret1")
            .await
            .unwrap();

        let wrong_pw = h.service.login("a@x.com", "nope!!", false).await.unwrap_err();
        let no_user = h.service.login("b@x.com", "secret1", false).await.unwrap_err();
        assert!(matches!(wrong_pw, DomainError::InvalidCredentials));
        assert!(matches!(no_user, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicates_are_rejected() {
        let h = harness();
        h.service
            .register("alice", "a@x.com", "secret1", "secret1")
            .await
            .unwrap();

        let same_name = h
            .service
            .register("alice", "other@x.com", "secret1", "secret1")
            .await
            .unwrap_err();
        let same_email = h
            .service
            .register("alicia", "A@x.com", "secret1", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(same_name, DomainError::Duplicate(_)));
        assert!(matches!(same_email, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_keeps_own_values_and_stores_picture() {
        let h = harness();
        let user = h
            .service
            .register("alice", "a@x.com", "secret1", "secret1")
            .await
            .unwrap();

        let picture = PictureUpload {
            file_name: "me.PNG".into(),
            bytes: vec![1, 2, 3, 4, 5, 6],
        };
        let updated = h
            .service
            .update_account(user.id, user.id, update("alice", "a@x.com", Some(picture)))
            .await
            .unwrap();

        let (stem, ext) = updated.image_file.split_once('.').unwrap();
        assert_eq!(stem.len(), 16);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");
        assert_eq!(h.pictures.0.lock().unwrap()[&updated.image_file], vec![1, 2, 3, 4]);
        assert_eq!(
            h.service.picture(&updated.image_file).await.unwrap(),
            vec![1, 2, 3, 4]
        );
    }

    #[tokio::test]
    async fn other_accounts_are_off_limits() {
        let h = harness();
        let alice = h
            .service
            .register("alice", "a@x.com", "secret1", "secret1")
            .await
            .unwrap();
        let bob = h
            .service
            .register("bob", "b@x.com", "secret1", "secret1")
            .await
            .unwrap();

        let err = h
            .service
            .update_account(bob.id, alice.id, update("mallory", "m@x.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let err = h
            .service
            .update_account(bob.id, bob.id, update("alice", "b@x.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn unsupported_picture_type() {
        let h = harness();
        let user = h
            .service
            .register("alice", "a@x.com", "secret1", "secret1")
            .await
            .unwrap();
        let picture = PictureUpload {
            file_name: "me.gif".into(),
            bytes: vec![1, 2, 3],
        };
        let err = h
            .service
            .update_account(user.id, user.id, update("alice", "a@x.com", Some(picture)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(h.service.profile(user.id).await.unwrap().image_file, "default.jpg");
    }
}
