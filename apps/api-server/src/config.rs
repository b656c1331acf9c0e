//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

#[cfg(feature = "postgres")]
use quill_infra::database::DatabaseConfig;
#[cfg(feature = "mail")]
use quill_infra::mail::SmtpConfig;
use quill_infra::auth::JwtConfig;

use crate::telemetry::TelemetryConfig;

const DEFAULT_SECRET: &str = "change-me-in-production";

/// Where profile pictures live.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub pictures_dir: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Origin used when building links that leave the server (reset emails).
    pub public_base_url: String,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub auth: JwtConfig,
    #[cfg(feature = "mail")]
    pub mail: Option<SmtpConfig>,
    pub media: MediaConfig,
    pub telemetry: TelemetryConfig,
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = var_or("PORT", 8080);

        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: var_or("DB_MAX_CONNECTIONS", 20),
            min_connections: var_or("DB_MIN_CONNECTIONS", 2),
        });

        #[cfg(feature = "mail")]
        let mail = env::var("MAIL_SERVER").ok().map(|server| {
            let username = env::var("MAIL_USERNAME").ok();
            SmtpConfig {
                server,
                port: var_or("MAIL_PORT", 587),
                sender: env::var("MAIL_SENDER")
                    .ok()
                    .or_else(|| username.clone())
                    .unwrap_or_else(|| "noreply@localhost".to_string()),
                username,
                password: env::var("MAIL_PASSWORD").ok(),
            }
        });

        Self {
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://{host}:{port}")),
            host,
            port,
            #[cfg(feature = "postgres")]
            database,
            auth: Self::auth_from_env(),
            #[cfg(feature = "mail")]
            mail,
            media: MediaConfig {
                pictures_dir: env::var("PROFILE_PICS_DIR")
                    .unwrap_or_else(|_| "static/profile_pics".to_string()),
            },
            telemetry: TelemetryConfig::from_env(),
        }
    }

    fn auth_from_env() -> JwtConfig {
        let secret = env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        if secret == DEFAULT_SECRET {
            let is_production = env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default signing secret in production! Set SECRET_KEY environment variable."
                );
            } else {
                tracing::warn!("Using default signing secret. Set SECRET_KEY for production use.");
            }
        }

        let defaults = JwtConfig::default();
        JwtConfig {
            secret,
            issuer: env::var("TOKEN_ISSUER").unwrap_or(defaults.issuer),
            session_hours: var_or("SESSION_EXPIRATION_HOURS", defaults.session_hours),
            remember_hours: var_or("SESSION_REMEMBER_HOURS", defaults.remember_hours),
        }
    }
}
