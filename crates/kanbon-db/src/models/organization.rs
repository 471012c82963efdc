//! Organization database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct OrganizationModel {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
