//! Localized system message rendering
//!
//! A message is either one of the built-in templates (code > 0) or a
//! caller-supplied locale map (code 0). Positional arguments are substituted
//! into every locale independently; without arguments the text is kept as is.

mod catalog;
mod format;

use std::collections::BTreeMap;

pub use catalog::{
    codes, lookup, CUSTOM_MESSAGE_CODE, EMAIL_REMOVED, NEW_PRIMARY_EMAIL, PHONE_REMOVED,
};
pub use format::{format_positional, placeholder_count};

use crate::error::DomainError;

/// Locale code to text, e.g. `{"en": "...", "de": "..."}`
pub type LocalizedText = BTreeMap<String, String>;

/// Message content as supplied by a caller
#[derive(Debug, Clone, Default)]
pub struct MessageSource {
    pub code: Option<i32>,
    pub message: Option<LocalizedText>,
}

impl MessageSource {
    pub fn template(code: i32) -> Self {
        Self {
            code: Some(code),
            message: None,
        }
    }

    pub fn custom(message: LocalizedText) -> Self {
        Self {
            code: None,
            message: Some(message),
        }
    }
}

/// Resolve a message source into its stored code and localized text.
///
/// A non-zero code wins over an explicit message. Code 0 or no code requires a
/// non-empty explicit message.
pub fn render(
    source: MessageSource,
    args: &[String],
) -> Result<(i32, LocalizedText), DomainError> {
    let (code, texts) = match source.code.filter(|code| *code != CUSTOM_MESSAGE_CODE) {
        Some(code) => (code, lookup(code).ok_or(DomainError::UnknownTemplate(code))?),
        None => match source.message {
            Some(message) if !message.is_empty() => (CUSTOM_MESSAGE_CODE, message),
            _ => return Err(DomainError::MissingMessageContent),
        },
    };

    if args.is_empty() {
        return Ok((code, texts));
    }

    let rendered = texts
        .into_iter()
        .map(|(locale, text)| {
            let formatted = format_positional(&text, &locale, args)?;
            Ok((locale, formatted))
        })
        .collect::<Result<LocalizedText, DomainError>>()?;

    Ok((code, rendered))
}
