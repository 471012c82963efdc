//! Opaque external identifiers
//!
//! Clients address organizations, forms and fields through
//! `base64("<TypeName>:<snowflake>")` strings. Decoding checks the type name so
//! a form id can never be used where a field id is expected.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

use super::Snowflake;
use crate::error::DomainError;

/// Entity types that are addressed by global id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Organization,
    KanbonForm,
    KanbonField,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::KanbonForm => "KanbonFormType",
            Self::KanbonField => "KanbonFieldType",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Organization" => Some(Self::Organization),
            "KanbonFormType" => Some(Self::KanbonForm),
            "KanbonFieldType" => Some(Self::KanbonField),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed external identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalId {
    pub node_type: NodeType,
    pub id: Snowflake,
}

impl GlobalId {
    pub const fn new(node_type: NodeType, id: Snowflake) -> Self {
        Self { node_type, id }
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.node_type.as_str(), self.id))
    }

    pub fn decode(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidGlobalId(raw.to_string());

        let bytes = STANDARD.decode(raw.trim()).map_err(|_| invalid())?;
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (name, id) = text.split_once(':').ok_or_else(invalid)?;

        let node_type = NodeType::from_name(name).ok_or_else(invalid)?;
        let id = Snowflake::parse(id).map_err(|_| invalid())?;

        Ok(Self { node_type, id })
    }

    /// Decode and require a specific node type
    pub fn decode_as(raw: &str, expected: NodeType) -> Result<Snowflake, DomainError> {
        let gid = Self::decode(raw)?;
        if gid.node_type != expected {
            return Err(DomainError::InvalidGlobalId(raw.to_string()));
        }
        Ok(gid.id)
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
