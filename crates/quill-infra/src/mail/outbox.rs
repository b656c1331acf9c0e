//! Mailer that keeps messages in memory and logs them.
//!
//! Used when no SMTP server is configured, so reset links can be copied out
//! of the logs during development.

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::mask_email;
use quill_core::ports::{MailError, Mailer, OutgoingEmail};

#[derive(Default)]
pub struct OutboxMailer {
    sent: RwLock<Vec<OutgoingEmail>>,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything "sent" so far, oldest first.
    pub async fn messages(&self) -> Vec<OutgoingEmail> {
        self.sent.read().await.clone()
    }

    pub async fn last_to(&self, to: &str) -> Option<OutgoingEmail> {
        let sent = self.sent.read().await;
        sent.iter().rev().find(|m| m.to == to).cloned()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if !email.to.contains('@') {
            return Err(MailError::Address(mask_email(&email.to)));
        }
        tracing::info!(
            to = %mask_email(&email.to),
            subject = %email.subject,
            body = %email.body,
            "outbox mail"
        );
        self.sent.write().await.push(email);
        Ok(())
    }
}
