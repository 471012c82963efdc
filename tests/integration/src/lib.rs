//! Integration test utilities for the Kanbon API
//!
//! Spawns the real server against the database named by `DATABASE_URL`
//! and drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
