//! Authentication and credential ports.

use uuid::Uuid;

/// How long a login session stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifetime {
    Standard,
    /// "Remember me" sessions.
    Extended,
}

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: i64,
}

/// Session token service used to authenticate API requests.
pub trait TokenService: Send + Sync {
    /// Generate a session token for a user.
    fn generate_token(
        &self,
        user_id: Uuid,
        email: &str,
        lifetime: SessionLifetime,
    ) -> Result<String, AuthError>;

    /// Validate and decode a session token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of a token in seconds.
    fn expiration_seconds(&self, lifetime: SessionLifetime) -> i64;
}

/// Issues and verifies password-reset tokens.
///
/// Tokens are self-contained: they embed the user id and the issue time and
/// are signed, so nothing is persisted and verification needs no store.
pub trait ResetTokenService: Send + Sync {
    /// Produce a signed token for `user_id` stamped with the current time.
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Check signature, payload and age; return the embedded user id.
    fn verify(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
