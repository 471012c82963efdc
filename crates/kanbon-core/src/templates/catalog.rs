//! Built-in system message templates

use super::LocalizedText;

/// Code reserved for caller-supplied messages
pub const CUSTOM_MESSAGE_CODE: i32 = 0;

/// Pending email address was verified on another account
pub const EMAIL_REMOVED: i32 = 1;

/// Pending phone number was verified on another account
pub const PHONE_REMOVED: i32 = 2;

/// A new primary email address was assigned
pub const NEW_PRIMARY_EMAIL: i32 = 3;

const CATALOG: &[(i32, &[(&str, &str)])] = &[
    (CUSTOM_MESSAGE_CODE, &[("en", "Reserved for custom messages.")]),
    (
        EMAIL_REMOVED,
        &[
            (
                "en",
                "The email address {} was removed from this account, as it was verified on another account.",
            ),
            (
                "de",
                "Deine E-Mail-Adresse {} wurde von diesem Account entfernt, da sie auf einem anderen Account verifiziert wurde.",
            ),
        ],
    ),
    (
        PHONE_REMOVED,
        &[
            (
                "en",
                "The phone number {} was removed from this account, as it was verified on another account.",
            ),
            (
                "de",
                "Deine Telefonnummer {} wurde von diesem Account entfernt, da sie auf einem anderen Account verifiziert wurde.",
            ),
        ],
    ),
    (
        NEW_PRIMARY_EMAIL,
        &[
            (
                "en",
                "Your new primary email address is {}. Please verify or change your email address to guarantee for your account's safety.",
            ),
            (
                "de",
                "Du hast jetzt eine neue primäre E-Mail-Adresse ({}). Bitte bestätige diese, um deine Account-Sicherheit zu gewährleisten.",
            ),
        ],
    ),
];

/// Look up a template's locale map by code
pub fn lookup(code: i32) -> Option<LocalizedText> {
    CATALOG
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, texts)| {
            texts
                .iter()
                .map(|(locale, text)| ((*locale).to_string(), (*text).to_string()))
                .collect()
        })
}

/// All known template codes
pub fn codes() -> impl Iterator<Item = i32> {
    CATALOG.iter().map(|(code, _)| *code)
}
