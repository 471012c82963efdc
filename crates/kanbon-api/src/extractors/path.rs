//! Path parameter extractors
//!
//! Organizations, forms and fields are addressed by opaque global ids;
//! accounts and system messages by their plain Snowflake.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use kanbon_core::{GlobalId, NodeType, Snowflake};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::response::ApiError;

/// Path extractor whose rejection renders as an API error
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(ApiPath(inner))
    }
}

fn snowflake(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

fn global(raw: &str, node_type: NodeType) -> Result<Snowflake, ApiError> {
    Ok(GlobalId::decode_as(raw, node_type)?)
}

/// Path parameters with account_id
#[derive(Debug, Deserialize)]
pub struct AccountIdPath {
    pub account_id: String,
}

impl AccountIdPath {
    pub fn account_id(&self) -> Result<Snowflake, ApiError> {
        snowflake(&self.account_id, "account_id")
    }
}

/// Path parameters with message_id
#[derive(Debug, Deserialize)]
pub struct MessageIdPath {
    pub message_id: String,
}

impl MessageIdPath {
    pub fn message_id(&self) -> Result<Snowflake, ApiError> {
        snowflake(&self.message_id, "message_id")
    }
}

/// Path parameters with organization_id
#[derive(Debug, Deserialize)]
pub struct OrganizationPath {
    pub organization_id: String,
}

impl OrganizationPath {
    pub fn organization_id(&self) -> Result<Snowflake, ApiError> {
        global(&self.organization_id, NodeType::Organization)
    }
}

/// Path parameters with organization_id and form_id
#[derive(Debug, Deserialize)]
pub struct FormPath {
    pub organization_id: String,
    pub form_id: String,
}

impl FormPath {
    pub fn organization_id(&self) -> Result<Snowflake, ApiError> {
        global(&self.organization_id, NodeType::Organization)
    }

    pub fn form_id(&self) -> Result<Snowflake, ApiError> {
        global(&self.form_id, NodeType::KanbonForm)
    }
}

/// Path parameters with organization_id and field_id
#[derive(Debug, Deserialize)]
pub struct FieldPath {
    pub organization_id: String,
    pub field_id: String,
}

impl FieldPath {
    pub fn organization_id(&self) -> Result<Snowflake, ApiError> {
        global(&self.organization_id, NodeType::Organization)
    }

    pub fn field_id(&self) -> Result<Snowflake, ApiError> {
        global(&self.field_id, NodeType::KanbonField)
    }
}
