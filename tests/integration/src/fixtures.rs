//! Test fixtures and data generators
//!
//! Request bodies the tests send and the slices of responses they inspect.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Suffix unique within the run and across runs against the same database
pub fn unique_suffix() -> String {
    format!(
        "{}{}",
        chrono::Utc::now().timestamp_micros(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

pub fn unique_email() -> String {
    format!("test{}@example.com", unique_suffix())
}

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        Self {
            email: unique_email(),
            password: "TestPass123".to_string(),
            first_name: Some("Test".to_string()),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

/// Auth response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub account: AccountResponse,
}

/// Account response
#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
    pub email_address: Option<String>,
    pub email_verified: bool,
    pub pending_email_address: Option<String>,
    pub phone_number: Option<String>,
    pub pending_phone_number: Option<String>,
    pub is_active: bool,
    pub ban_reason: i32,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequestResponse {
    pub next_request_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct SystemMessageResponse {
    pub id: String,
    pub code: i32,
    pub message: serde_json::Value,
    pub read: bool,
    pub read_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FormResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub field_order: Vec<String>,
    pub fields: Option<Vec<FieldResponse>>,
}

#[derive(Debug, Deserialize)]
pub struct FormPayload {
    pub form: Option<FormResponse>,
}

#[derive(Debug, Deserialize)]
pub struct FieldResponse {
    pub id: String,
    pub form_id: String,
    pub title: Option<String>,
    pub is_required: bool,
    pub conditions: Vec<ConditionResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ConditionResponse {
    pub compare_to: Option<String>,
    pub operator: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FieldPayload {
    pub field: Option<FieldResponse>,
}
