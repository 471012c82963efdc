//! Entity to model mappers
//!
//! - `From<Model> for Entity`: database rows to domain objects
//! - `*Row` structs: entity data prepared for writes

mod account;
mod form;
mod organization;
mod system_message;

pub use account::AccountRow;
pub use form::{field_with_conditions, FormRow};
