//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use quill_core::ports::{AuthError, TokenClaims, TokenService};

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub enum AuthenticationError {
    Missing,
    Rejected(AuthError),
    Misconfigured,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationError::Missing => write!(f, "Missing bearer token"),
            AuthenticationError::Rejected(e) => write!(f, "{}", e),
            AuthenticationError::Misconfigured => write!(f, "Token service not configured"),
        }
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AuthenticationError::Misconfigured => {
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use quill_shared::ErrorResponse;

        let error = match self {
            AuthenticationError::Missing => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AuthenticationError::Rejected(AuthError::TokenExpired) => {
                ErrorResponse::new(401, "Token Expired")
                    .with_detail("Your session has expired. Please login again.")
            }
            AuthenticationError::Rejected(_) => ErrorResponse::new(401, "Invalid Token"),
            AuthenticationError::Misconfigured => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthenticationError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthenticationError::Missing)?;
    let value = value.to_str().map_err(|_| {
        AuthenticationError::Rejected(AuthError::InvalidToken(
            "Invalid authorization header".to_string(),
        ))
    })?;
    value.strip_prefix("Bearer ").ok_or_else(|| {
        AuthenticationError::Rejected(AuthError::InvalidToken(
            "Expected Bearer token".to_string(),
        ))
    })
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(token_service) = req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>()
        else {
            tracing::error!("TokenService not found in app data");
            return ready(Err(AuthenticationError::Misconfigured));
        };

        let result = bearer_token(req).and_then(|token| {
            token_service
                .validate_token(token)
                .map(Identity::from)
                .map_err(|e| {
                    tracing::debug!(error = %e, "session token rejected");
                    AuthenticationError::Rejected(e)
                })
        });
        ready(result)
    }
}
