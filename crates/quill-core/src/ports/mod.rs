//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod mail;
mod media;
mod repository;

pub use auth::{
    AuthError, PasswordService, ResetTokenService, SessionLifetime, TokenClaims, TokenService,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use mail::{MailError, Mailer, OutgoingEmail};
pub use media::{ALLOWED_PICTURE_EXTENSIONS, ImageProcessor, MediaError, PictureStore};
pub use repository::{BaseRepository, PostRepository, UserRepository};
