//! Domain events - events emitted when domain state changes
//!
//! Events are returned by entity operations and dispatched by the service
//! layer once the originating write has been committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AddressKind, Snowflake};

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    AddressClaimed(AddressClaimedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AddressClaimed(_) => "ADDRESS_CLAIMED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::AddressClaimed(e) => e.timestamp,
        }
    }
}

/// An account finished verifying an email address or phone number.
///
/// Only one account may hold a given address, so every other account that
/// still has it pending loses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressClaimedEvent {
    pub kind: AddressKind,
    pub address: String,
    pub claimant_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl AddressClaimedEvent {
    pub fn new(
        kind: AddressKind,
        address: String,
        claimant_id: Snowflake,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            address,
            claimant_id,
            timestamp,
        }
    }
}

impl From<AddressClaimedEvent> for DomainEvent {
    fn from(event: AddressClaimedEvent) -> Self {
        Self::AddressClaimed(event)
    }
}
