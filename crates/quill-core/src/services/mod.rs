//! Use cases. Each service is built from port handles and owns no I/O itself.

mod accounts;
pub mod guard;
mod password_reset;
mod posts;
pub mod validation;

#[cfg(test)]
mod fakes;

pub use accounts::{AccountService, AccountUpdate, LoginOutcome, PICTURE_MAX_SIZE, PictureUpload};
pub use password_reset::{PasswordResetService, RESET_EMAIL_SUBJECT, ResetDispatch, ResetStage};
pub use posts::{PostService, PostView};
