//! System message database model

use chrono::{DateTime, Utc};
use kanbon_core::LocalizedText;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SystemMessageModel {
    pub id: i64,
    pub account_id: i64,
    pub code: i32,
    pub message: Json<LocalizedText>,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
