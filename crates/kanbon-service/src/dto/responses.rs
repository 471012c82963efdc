//! Response DTOs for API endpoints
//!
//! Snowflake IDs are serialized as strings for JavaScript compatibility.
//! Organizations, forms and fields are exposed through opaque global ids.

use chrono::{DateTime, Utc};
use kanbon_core::LocalizedText;
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: AccountResponse,
}

/// Answer to a throttled token request
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequestResponse {
    /// Seconds until another token may be requested
    pub next_request_in: i64,
}

// ============================================================================
// Account Responses
// ============================================================================

/// The caller's own account
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub utype: i32,
    pub is_admin: bool,
    pub email_address: Option<String>,
    pub email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_email_address: Option<String>,
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_phone_number: Option<String>,
    pub is_active: bool,
    pub ban_reason: i32,
    pub profile: ProfileResponse,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<serde_json::Value>,
    pub street_1: Option<String>,
    pub street_2: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemMessageResponse {
    pub id: String,
    pub code: i32,
    pub message: LocalizedText,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Form Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FormResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub field_order: Vec<String>,
    pub activity_metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    /// Present when the form is fetched individually
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldResponse>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldResponse {
    pub id: String,
    pub form_id: String,
    pub title: Option<String>,
    pub help_text: Option<String>,
    pub is_required: bool,
    pub field_type: Option<String>,
    pub field_options: Option<serde_json::Value>,
    pub client_id: Option<String>,
    pub conditions: Vec<ConditionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionResponse {
    pub id: String,
    pub compare_to: Option<String>,
    pub operator: Option<String>,
    pub content: Option<serde_json::Value>,
}

/// Result of a form mutation; `null` after a delete
#[derive(Debug, Clone, Serialize)]
pub struct FormPayload {
    pub form: Option<FormResponse>,
}

/// Result of a field mutation; `null` after a delete
#[derive(Debug, Clone, Serialize)]
pub struct FieldPayload {
    pub field: Option<FieldResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
