//! Outbound mail: SMTP delivery and a logging outbox for development.

mod outbox;
#[cfg(feature = "mail")]
mod smtp;

pub use outbox::OutboxMailer;
#[cfg(feature = "mail")]
pub use smtp::{SmtpConfig, SmtpMailer};
