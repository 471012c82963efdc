//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod fields;
pub mod forms;
pub mod health;
pub mod system_messages;
