//! Contact address kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of contact address an account can claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressKind {
    Email,
    Phone,
}

impl AddressKind {
    /// System message template sent to accounts losing a pending address
    pub fn removal_template(self) -> i32 {
        match self {
            Self::Email => 1,
            Self::Phone => 2,
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email address"),
            Self::Phone => f.write_str("phone number"),
        }
    }
}
