//! Account database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for accounts table
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub id: i64,
    pub username: String,
    pub utype: i32,
    pub is_admin: bool,
    pub default_superuser: bool,

    pub email_address: Option<String>,
    pub tmp_email_address: Option<String>,
    pub email_verified: bool,
    pub email_token: Option<String>,
    pub email_token_created: Option<DateTime<Utc>>,

    pub phone_number: Option<String>,
    pub tmp_phone_number: Option<String>,
    pub last_phone_request: Option<DateTime<Utc>>,

    pub password_reset_token: Option<String>,
    pub password_reset_token_created: Option<DateTime<Utc>>,

    pub is_active: bool,
    pub ban_reason: i32,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<serde_json::Value>,
    pub street_1: Option<String>,
    pub street_2: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,

    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_logout_all: Option<DateTime<Utc>>,
}
