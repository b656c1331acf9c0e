//! Ownership checks for post and account mutations.
//!
//! The model is flat: a post belongs to exactly one author and an account to
//! itself. There are no roles and no administrator override.

use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::DomainError;

/// True iff `actor` authored `post`.
pub fn can_modify(actor: Uuid, post: &Post) -> bool {
    post.author_id == actor
}

/// True iff `actor` is the account itself.
pub fn can_modify_account(actor: Uuid, user: &User) -> bool {
    user.id == actor
}

pub fn ensure_can_modify(actor: Uuid, post: &Post) -> Result<(), DomainError> {
    if can_modify(actor, post) {
        Ok(())
    } else {
        tracing::warn!(actor = %actor, post_id = %post.id, "post mutation denied");
        Err(DomainError::Forbidden)
    }
}

pub fn ensure_can_modify_account(actor: Uuid, user: &User) -> Result<(), DomainError> {
    if can_modify_account(actor, user) {
        Ok(())
    } else {
        tracing::warn!(actor = %actor, user_id = %user.id, "account mutation denied");
        Err(DomainError::Forbidden)
    }
}
