//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory stores and the outbox mailer only
//! - `postgres` - PostgreSQL stores via SeaORM
//! - `auth` - JWT sessions, signed reset tokens and Argon2 hashing
//! - `mail` - SMTP delivery via lettre
//! - `media` - Picture resizing via `image`

pub mod database;
pub mod mail;
pub mod media;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::{InMemoryPostRepository, InMemoryUserRepository};
pub use mail::OutboxMailer;
pub use media::{FsPictureStore, InMemoryPictureStore};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService, SignedResetTokenService};
#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresPostRepository, PostgresUserRepository};
#[cfg(feature = "mail")]
pub use mail::{SmtpConfig, SmtpMailer};
#[cfg(feature = "media")]
pub use media::ThumbnailProcessor;
