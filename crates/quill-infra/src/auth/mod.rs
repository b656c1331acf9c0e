//! Authentication implementations.

mod jwt;
mod password;
mod reset_token;

pub use jwt::{JwtConfig, JwtTokenService, SESSION_AUDIENCE};
pub use password::Argon2PasswordService;
pub use reset_token::{RESET_AUDIENCE, RESET_TOKEN_TTL, SignedResetTokenService};
