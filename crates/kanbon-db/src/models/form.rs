//! Form, field and condition database models

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct FormModel {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub field_order: Json<Vec<String>>,
    pub activity_metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct FieldModel {
    pub id: i64,
    pub form_id: i64,
    pub title: Option<String>,
    pub help_text: Option<String>,
    pub is_required: bool,
    pub field_type: Option<String>,
    pub field_options: Option<serde_json::Value>,
    pub client_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ConditionModel {
    pub id: i64,
    pub field_id: i64,
    pub compare_to: Option<i64>,
    pub operator: Option<String>,
    pub content: Option<serde_json::Value>,
}
