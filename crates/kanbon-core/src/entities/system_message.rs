//! System message entity - a localized notice in an account's inbox

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::templates::{self, LocalizedText, MessageSource, CUSTOM_MESSAGE_CODE};
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemMessage {
    pub id: Snowflake,
    pub account_id: Snowflake,
    pub code: i32,
    pub message: LocalizedText,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SystemMessage {
    /// Render a message for `account_id` from a template code or explicit text
    pub fn compose(
        id: Snowflake,
        account_id: Snowflake,
        source: MessageSource,
        args: &[String],
    ) -> Result<Self, DomainError> {
        let (code, message) = templates::render(source, args)?;
        Ok(Self {
            id,
            account_id,
            code,
            message,
            read: false,
            read_at: None,
            created_at: Utc::now(),
        })
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        self.code == CUSTOM_MESSAGE_CODE
    }

    /// Mark as read; the first read time is kept
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        if !self.read {
            self.read = true;
            self.read_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::EMAIL_REMOVED;
    use chrono::Duration;

    #[test]
    fn test_compose_from_template() {
        let msg = SystemMessage::compose(
            Snowflake::new(10),
            Snowflake::new(1),
            MessageSource::template(EMAIL_REMOVED),
            &["x@ex.com".to_string()],
        )
        .unwrap();

        assert_eq!(msg.code, EMAIL_REMOVED);
        assert!(!msg.is_custom());
        assert!(!msg.read);
        assert!(msg.message["de"].contains("x@ex.com"));
    }

    #[test]
    fn test_mark_read_keeps_first_timestamp() {
        let mut msg = SystemMessage::compose(
            Snowflake::new(10),
            Snowflake::new(1),
            MessageSource::template(EMAIL_REMOVED),
            &[],
        )
        .unwrap();

        let first = Utc::now();
        msg.mark_read(first);
        msg.mark_read(first + Duration::hours(1));
        assert!(msg.read);
        assert_eq!(msg.read_at, Some(first));
    }
}
