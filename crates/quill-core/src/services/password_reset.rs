//! Password reset workflow.
//!
//! `request_reset` issues a signed token and mails a link; `complete_reset`
//! trades a still-valid token for a new credential. Tokens are not stored, so
//! a token keeps working until its 30 minute window closes, even after use.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, mask_email, normalize_email};
use crate::error::DomainError;
use crate::ports::{
    Clock, Mailer, OutgoingEmail, PasswordService, ResetTokenService, UserRepository,
};
use crate::services::validation::validate_new_password;

pub const RESET_EMAIL_SUBJECT: &str = "Password Reset Request";

/// Workflow stages, reported as the `stage` field of log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStage {
    Requested,
    TokenIssued,
    EmailSent,
    TokenConsumed,
    Expired,
}

impl fmt::Display for ResetStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResetStage::Requested => "requested",
            ResetStage::TokenIssued => "token_issued",
            ResetStage::EmailSent => "email_sent",
            ResetStage::TokenConsumed => "token_consumed",
            ResetStage::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// What `request_reset` did. Callers answer both cases identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetDispatch {
    /// A link was mailed to the account owner.
    Sent { user_id: Uuid },
    /// No account uses that address; nothing was issued or sent.
    NoAccount,
}

pub struct PasswordResetService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn ResetTokenService>,
    passwords: Arc<dyn PasswordService>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    reset_url_base: String,
}

impl PasswordResetService {
    /// `reset_url_base` is the public origin, e.g. `https://blog.example.com`.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn ResetTokenService>,
        passwords: Arc<dyn PasswordService>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        reset_url_base: impl Into<String>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
            mailer,
            clock,
            reset_url_base: reset_url_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password/{}", self.reset_url_base, token)
    }

    pub async fn request_reset(&self, email: &str) -> Result<ResetDispatch, DomainError> {
        let email = normalize_email(email);
        let masked = mask_email(&email);
        tracing::info!(stage = %ResetStage::Requested, user_email = %masked, "password reset requested");

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!(user_email = %masked, "no account for reset request");
            return Ok(ResetDispatch::NoAccount);
        };

        let token = self.tokens.issue(user.id)?;
        tracing::debug!(stage = %ResetStage::TokenIssued, user_id = %user.id, "reset token issued");

        let message = OutgoingEmail {
            to: user.email.clone(),
            subject: RESET_EMAIL_SUBJECT.to_string(),
            body: format!(
                "To reset your password, visit the following link:\n{}\n\n\
                 If you did not make this request then simply ignore this email and no changes will be made.\n",
                self.reset_link(&token)
            ),
        };
        self.mailer.send(message).await.map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "reset email delivery failed");
            DomainError::from(e)
        })?;

        tracing::info!(stage = %ResetStage::EmailSent, user_id = %user.id, "reset email sent");
        Ok(ResetDispatch::Sent { user_id: user.id })
    }

    /// Resolve a token to a live account without changing anything.
    pub async fn check_token(&self, token: &str) -> Result<Uuid, DomainError> {
        self.resolve(token).await.map(|user| user.id)
    }

    async fn resolve(&self, token: &str) -> Result<User, DomainError> {
        let user_id = self.tokens.verify(token).map_err(|e| {
            tracing::info!(stage = %ResetStage::Expired, reason = %e, "reset token rejected");
            DomainError::InvalidOrExpiredToken
        })?;

        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "reset token for unknown user");
            DomainError::InvalidOrExpiredToken
        })
    }

    pub async fn complete_reset(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<Uuid, DomainError> {
        let mut user = self.resolve(token).await?;
        validate_new_password(new_password, confirm_password)?;
        let user_id = user.id;

        let hash = self.passwords.hash(new_password)?;
        user.set_password_hash(hash, self.clock.now());
        self.users.update(user).await?;

        tracing::info!(stage = %ResetStage::TokenConsumed, user_id = %user_id, "password reset completed");
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{BaseRepository, FixedClock};
    use crate::services::fakes::{ClockTokens, PlainPasswords, RecordingMailer, Users};
    use chrono::{Duration, Utc};

    struct Harness {
        users: Arc<Users>,
        tokens: Arc<ClockTokens>,
        mailer: Arc<RecordingMailer>,
        clock: Arc<FixedClock>,
        service: PasswordResetService,
    }

    fn harness(mailer: RecordingMailer) -> Harness {
        let users = Arc::new(Users::default());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let tokens = Arc::new(ClockTokens::new(clock.clone()));
        let mailer = Arc::new(mailer);
        let service = PasswordResetService::new(
            users.clone(),
            tokens.clone(),
            Arc::new(PlainPasswords),
            mailer.clone(),
            clock.clone(),
            "https://blog.test/",
        );
        Harness {
            users,
            tokens,
            mailer,
            clock,
            service,
        }
    }

    async fn seed(h: &Harness, email: &str, password: &str) -> User {
        let user = User::new(
            "alice".into(),
            email.into(),
            PlainPasswords.hash(password).unwrap(),
            h.clock.now(),
        );
        h.users.insert(user.clone()).await.unwrap();
        user
    }

    fn token_from(email: &OutgoingEmail) -> String {
        let marker = "/reset-password/";
        let start = email.body.find(marker).unwrap() + marker.len();
        email.body[start..].split_whitespace().next().unwrap().to_string()
    }

    #[tokio::test]
    async fn registered_email_gets_a_link() {
        let h = harness(RecordingMailer::default());
        let user = seed(&h, "a@x.com", "oldpass").await;

        let outcome = h.service.request_reset("A@x.com ").await.unwrap();
        assert_eq!(outcome, ResetDispatch::Sent { user_id: user.id });

        let sent = h.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, RESET_EMAIL_SUBJECT);
        assert!(sent[0].body.contains("https://blog.test/reset-password/"));
    }

    #[tokio::test]
    async fn unknown_email_issues_nothing() {
        let h = harness(RecordingMailer::default());
        seed(&h, "a@x.com", "oldpass").await;

        let outcome = h.service.request_reset("ghost@x.com").await.unwrap();
        assert_eq!(outcome, ResetDispatch::NoAccount);
        assert_eq!(h.tokens.issued_count(), 0);
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_reported() {
        let h = harness(RecordingMailer::failing());
        seed(&h, "a@x.com", "oldpass").await;

        let err = h.service.request_reset("a@x.com").await.unwrap_err();
        assert!(matches!(err, DomainError::EmailDeliveryFailed(_)));
    }

    #[tokio::test]
    async fn complete_reset_replaces_password() {
        let h = harness(RecordingMailer::default());
        let user = seed(&h, "a@x.com", "oldpass").await;
        h.service.request_reset("a@x.com").await.unwrap();
        let token = token_from(&h.mailer.sent()[0]);

        h.clock.advance(Duration::minutes(29));
        let id = h
            .service
            .complete_reset(&token, "newpass", "newpass")
            .await
            .unwrap();
        assert_eq!(id, user.id);

        let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert!(PlainPasswords.verify("newpass", &stored.password_hash).unwrap());
        assert!(!PlainPasswords.verify("oldpass", &stored.password_hash).unwrap());
        assert_eq!(stored.updated_at, h.clock.now());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let h = harness(RecordingMailer::default());
        seed(&h, "a@x.com", "oldpass").await;
        h.service.request_reset("a@x.com").await.unwrap();
        let token = token_from(&h.mailer.sent()[0]);

        h.clock.advance(Duration::minutes(31));
        let err = h
            .service
            .complete_reset(&token, "newpass", "newpass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_rejected() {
        let h = harness(RecordingMailer::default());
        let user = seed(&h, "a@x.com", "oldpass").await;
        let token = h.tokens.issue(user.id).unwrap();
        h.users.delete(user.id).await.unwrap();

        let err = h.service.check_token(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn weak_password_keeps_old_credential() {
        let h = harness(RecordingMailer::default());
        let user = seed(&h, "a@x.com", "oldpass").await;
        let token = h.tokens.issue(user.id).unwrap();

        let err = h
            .service
            .complete_reset(&token, "abc", "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert!(PlainPasswords.verify("oldpass", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn token_stays_usable_within_window() {
        let h = harness(RecordingMailer::default());
        let user = seed(&h, "a@x.com", "oldpass").await;
        let token = h.tokens.issue(user.id).unwrap();

        h.service
            .complete_reset(&token, "newpass", "newpass")
            .await
            .unwrap();
        assert!(
            h.service
                .complete_reset(&token, "another", "another")
                .await
                .is_ok()
        );
    }
}
