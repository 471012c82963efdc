//! Outbound delivery of one-time tokens
//!
//! Services hand plain tokens to a [`Mailer`]; only their hashes are stored.

use async_trait::async_trait;
use tracing::info;

use kanbon_core::Snowflake;

use super::error::ServiceResult;

/// What a delivery is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    EmailVerification,
    PasswordReset,
}

impl MailKind {
    pub fn subject(self) -> &'static str {
        match self {
            Self::EmailVerification => "Verify your email address",
            Self::PasswordReset => "Reset your password",
        }
    }
}

/// A single token delivery
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub kind: MailKind,
    pub account_id: Snowflake,
    pub to: String,
    pub token: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> ServiceResult<()>;
}

/// Records deliveries in the log instead of sending them
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> ServiceResult<()> {
        // The token itself never reaches the log
        info!(
            account_id = %mail.account_id,
            to = %mail.to,
            subject = mail.kind.subject(),
            "Mail delivery recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_accepts_mail() {
        let mail = OutgoingMail {
            kind: MailKind::PasswordReset,
            account_id: Snowflake::new(1),
            to: "a@ex.com".to_string(),
            token: "t".repeat(32),
        };
        assert!(LogMailer.send(mail).await.is_ok());
        assert_eq!(MailKind::EmailVerification.subject(), "Verify your email address");
    }
}
