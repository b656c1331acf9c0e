//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::DEFAULT_IMAGE_FILE;
use quill_core::ports::{
    Clock, Mailer, PictureStore, PostRepository, SystemClock, TokenService, UserRepository,
};
use quill_core::services::{AccountService, PasswordResetService, PostService};
use quill_infra::auth::{
    Argon2PasswordService, JwtConfig, JwtTokenService, SignedResetTokenService,
};
use quill_infra::media::{FsPictureStore, InMemoryPictureStore, ThumbnailProcessor, placeholder_jpeg};
use quill_infra::{InMemoryPostRepository, InMemoryUserRepository, OutboxMailer};

#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};
#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, PostgresUserRepository, connect};
#[cfg(feature = "mail")]
use quill_infra::mail::SmtpMailer;

use crate::config::AppConfig;

/// Storage, mail and time backends the services are built on.
pub struct Backends {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub pictures: Arc<dyn PictureStore>,
    pub clock: Arc<dyn Clock>,
}

impl Backends {
    /// Everything in process memory; mail goes to `outbox`.
    pub fn in_memory(outbox: Arc<OutboxMailer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            mailer: outbox,
            pictures: Arc::new(InMemoryPictureStore::new()),
            clock,
        }
    }

    /// Connect to whatever the configuration names, falling back to memory.
    pub async fn connect(config: &AppConfig) -> Self {
        let mut backends = Self::in_memory(Arc::new(OutboxMailer::new()), Arc::new(SystemClock));

        #[cfg(feature = "postgres")]
        match &config.database {
            Some(db_config) => match connect(db_config).await {
                Ok(conn) => {
                    if let Err(e) = Migrator::up(&conn, None).await {
                        tracing::error!("Failed to apply migrations: {}", e);
                    }
                    backends.users = Arc::new(PostgresUserRepository::new(conn.clone()));
                    backends.posts = Arc::new(PostgresPostRepository::new(conn));
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory repositories");

        #[cfg(feature = "mail")]
        match &config.mail {
            Some(smtp) => match SmtpMailer::new(smtp) {
                Ok(mailer) => backends.mailer = Arc::new(mailer),
                Err(e) => tracing::error!("Invalid mail configuration: {}. Using outbox.", e),
            },
            None => tracing::warn!("MAIL_SERVER not set. Emails are written to the log only."),
        }

        match FsPictureStore::open(&config.media.pictures_dir).await {
            Ok(store) => backends.pictures = Arc::new(store),
            Err(e) => tracing::error!("{}. Keeping profile pictures in memory.", e),
        }
        ensure_default_picture(backends.pictures.as_ref()).await;

        backends
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub posts: Arc<PostService>,
    pub resets: Arc<PasswordResetService>,
    pub sessions: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let backends = Backends::connect(config).await;
        let state = Self::assemble(&config.auth, &config.public_base_url, backends);
        tracing::info!("Application state initialized");
        state
    }

    /// Wire services onto already chosen backends.
    pub fn assemble(auth: &JwtConfig, public_base_url: &str, backends: Backends) -> Self {
        let Backends {
            users,
            posts,
            mailer,
            pictures,
            clock,
        } = backends;

        let passwords = Arc::new(Argon2PasswordService::new());
        let sessions: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(auth.clone()));
        let reset_tokens = Arc::new(SignedResetTokenService::new(
            &auth.secret,
            auth.issuer.clone(),
            clock.clone(),
        ));

        let accounts = AccountService::new(
            users.clone(),
            passwords.clone(),
            sessions.clone(),
            Arc::new(ThumbnailProcessor),
            pictures,
            clock.clone(),
        );
        let post_service = PostService::new(posts, users.clone(), clock.clone());
        let resets = PasswordResetService::new(
            users,
            reset_tokens,
            passwords,
            mailer,
            clock,
            public_base_url,
        );

        Self {
            accounts: Arc::new(accounts),
            posts: Arc::new(post_service),
            resets: Arc::new(resets),
            sessions,
        }
    }
}

/// Store the placeholder picture unless one is already present.
pub async fn ensure_default_picture(pictures: &dyn PictureStore) {
    match pictures.load(DEFAULT_IMAGE_FILE).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let saved = match placeholder_jpeg(200) {
                Ok(bytes) => pictures.save(DEFAULT_IMAGE_FILE, bytes).await,
                Err(e) => Err(e),
            };
            if let Err(e) = saved {
                tracing::warn!("Could not store default profile picture: {}", e);
            }
        }
        Err(e) => tracing::warn!("Could not check default profile picture: {}", e),
    }
}
