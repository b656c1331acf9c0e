use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Picture reference assigned to accounts that never uploaded one.
pub const DEFAULT_IMAGE_FILE: &str = "default.jpg";

/// User entity - a registered blog account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image_file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            image_file: DEFAULT_IMAGE_FILE.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored credential.
    pub fn set_password_hash(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.updated_at = now;
    }
}

/// Lowercase and trim an email address so lookups are stable.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Mask an email for logging, keeping the first local character and the domain.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}
