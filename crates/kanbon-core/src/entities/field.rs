//! Field entity - one input on a form, with optional visibility conditions
//!
//! Conditions are stored exactly as submitted. Their operators and comparison
//! semantics are not interpreted server-side.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: Snowflake,
    pub form_id: Snowflake,
    pub title: Option<String>,
    pub help_text: Option<String>,
    pub is_required: bool,
    pub field_type: Option<String>,
    pub field_options: Option<serde_json::Value>,
    /// Correlation id chosen by the client before the server id is known
    pub client_id: Option<String>,
    pub conditions: Vec<Condition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Snowflake>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Snowflake>,
}

impl Field {
    pub fn new(id: Snowflake, form_id: Snowflake, created_by: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            form_id,
            title: None,
            help_text: None,
            is_required: false,
            field_type: None,
            field_options: None,
            client_id: None,
            conditions: Vec::new(),
            created_at: now,
            updated_at: now,
            created_by: Some(created_by),
            deleted_at: None,
            deleted_by: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn soft_delete(&mut self, by: Snowflake, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.deleted_by = Some(by);
        self.updated_at = now;
    }
}

/// Placeholder rule attached to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub id: Snowflake,
    pub field_id: Snowflake,
    pub compare_to: Option<Snowflake>,
    pub operator: Option<String>,
    pub content: Option<serde_json::Value>,
}
