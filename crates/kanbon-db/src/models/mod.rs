//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod form;
mod organization;
mod system_message;

pub use account::AccountModel;
pub use form::{ConditionModel, FieldModel, FormModel};
pub use organization::OrganizationModel;
pub use system_message::SystemMessageModel;
