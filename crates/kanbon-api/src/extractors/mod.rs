//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and path ids.

mod auth;
mod path;
mod validated;

pub use auth::AuthAccount;
pub use path::{AccountIdPath, ApiPath, FieldPath, FormPath, MessageIdPath, OrganizationPath};
pub use validated::{ApiJson, ValidatedJson};
