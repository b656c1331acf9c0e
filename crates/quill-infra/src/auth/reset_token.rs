//! Signed, stateless password-reset tokens.
//!
//! A token is an HS256 JWT carrying the user id and issue time. Age is
//! measured against the injected clock rather than the `exp` claim, so the
//! 30 minute window can be exercised in tests.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, Clock, ResetTokenService};

pub const RESET_AUDIENCE: &str = "password-reset";

/// How long a reset token stays valid after issue.
pub const RESET_TOKEN_TTL: TimeDelta = TimeDelta::minutes(30);

/// Tolerated drift for tokens that claim to come from the future.
const CLOCK_SKEW: TimeDelta = TimeDelta::seconds(60);

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: String,
    iat: i64,
    exp: i64,
    iss: String,
    aud: String,
}

pub struct SignedResetTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl SignedResetTokenService {
    pub fn new(secret: &str, issuer: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            clock,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "iss", "aud"]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[RESET_AUDIENCE]);
        validation
    }
}

impl ResetTokenService for SignedResetTokenService {
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = self.clock.now();
        let claims = ResetClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + RESET_TOKEN_TTL).timestamp(),
            iss: self.issuer.clone(),
            aud: RESET_AUDIENCE.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<ResetClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let issued_at = DateTime::<Utc>::from_timestamp(data.claims.iat, 0)
            .ok_or_else(|| AuthError::InvalidToken("iat out of range".to_string()))?;
        let age = self.clock.now() - issued_at;
        if age > RESET_TOKEN_TTL {
            return Err(AuthError::TokenExpired);
        }
        if age < -CLOCK_SKEW {
            return Err(AuthError::InvalidToken("issued in the future".to_string()));
        }

        Uuid::parse_str(&data.claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
