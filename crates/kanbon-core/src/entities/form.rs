//! Form entity - a named, ordered container of fields owned by an organization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Inactive forms are hidden from the mobile app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormStatus {
    #[default]
    Active,
    Inactive,
}

impl FormStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidFormStatus(s.to_string())),
        }
    }
}

/// Form entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub id: Snowflake,
    /// Required at write time, see [`Form::ensure_persistable`]
    pub organization_id: Option<Snowflake>,
    pub name: String,
    pub description: Option<String>,
    pub status: FormStatus,
    /// Field ids in client display order
    pub field_order: Vec<String>,
    /// Monthly activity counters, opaque to the server
    pub activity_metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Snowflake>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Snowflake>,
}

impl Form {
    /// Create a new active form. Fails when `name` is blank.
    pub fn new(
        id: Snowflake,
        organization_id: Snowflake,
        name: &str,
        created_by: Snowflake,
    ) -> Result<Self, DomainError> {
        let name = normalize_name(Some(name)).ok_or(DomainError::FormNameRequired)?;
        let now = Utc::now();
        Ok(Self {
            id,
            organization_id: Some(organization_id),
            name,
            description: None,
            status: FormStatus::Active,
            field_order: Vec::new(),
            activity_metrics: serde_json::Value::Array(Vec::new()),
            created_at: now,
            updated_at: now,
            created_by: Some(created_by),
            deleted_at: None,
            deleted_by: None,
        })
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

    /// Forms cannot be written without an owning organization
    pub fn ensure_persistable(&self) -> Result<Snowflake, DomainError> {
        self.organization_id.ok_or(DomainError::OrganizationRequired)
    }
}

/// Trimmed name, or `None` when blank
pub fn normalize_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToString::to_string)
}
