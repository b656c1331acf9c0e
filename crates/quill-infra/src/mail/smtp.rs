//! SMTP delivery over STARTTLS using lettre's tokio transport.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use quill_core::domain::mask_email;
use quill_core::ports::{MailError, Mailer, OutgoingEmail};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `From` header, e.g. `Quill <noreply@example.com>`.
    pub sender: String,
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let sender: Mailbox = config
            .sender
            .parse()
            .map_err(|e| MailError::Address(format!("sender: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .timeout(Some(Duration::from_secs(10)));

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        tracing::info!(server = %config.server, port = config.port, "SMTP mailer configured");
        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }

    fn build(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| MailError::Address(format!("{}: {e}", mask_email(&email.to))))?;

        Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = self.build(&email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::debug!(to = %mask_email(&email.to), subject = %email.subject, "mail delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            server: "localhost".to_string(),
            port: 2525,
            username: None,
            password: None,
            sender: "Quill <noreply@quill.test>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_builds_plain_text_message() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let message = mailer
            .build(&OutgoingEmail {
                to: "a@x.com".to_string(),
                subject: "Password Reset Request".to_string(),
                body: "link".to_string(),
            })
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Password Reset Request"));
        assert!(raw.contains("To: a@x.com"));
    }

    #[tokio::test]
    async fn test_rejects_bad_recipient() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let result = mailer.build(&OutgoingEmail {
            to: "not an address".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        });
        assert!(matches!(result, Err(MailError::Address(_))));
    }

    #[test]
    fn test_rejects_bad_sender() {
        let result = SmtpMailer::new(&SmtpConfig {
            sender: "nope".to_string(),
            ..config()
        });
        assert!(matches!(result, Err(MailError::Address(_))));
    }
}
