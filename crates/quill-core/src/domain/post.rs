use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post owned by its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(author_id: Uuid, title: String, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit. `created_at` is never touched.
    pub fn edit(&mut self, title: String, content: String, now: DateTime<Utc>) {
        self.title = title;
        self.content = content;
        self.updated_at = now;
    }
}
