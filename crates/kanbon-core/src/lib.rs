//! # kanbon-core
//!
//! Domain layer containing entities, value objects, repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod templates;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Account, AccountStatus, Condition, EmailState, Field, Form, FormStatus, MembershipRole,
    Organization, Profile, SystemMessage,
};
pub use error::{DomainError, DuplicateAccountKind};
pub use events::{AddressClaimedEvent, DomainEvent};
pub use templates::{LocalizedText, MessageSource};
pub use traits::{
    AccountRepository, FieldRepository, FormRepository, OrganizationRepository, RepoResult,
    SystemMessageRepository,
};
pub use value_objects::{
    AddressKind, GlobalId, NodeType, Snowflake, SnowflakeGenerator, SnowflakeParseError,
    TokenPolicy,
};
