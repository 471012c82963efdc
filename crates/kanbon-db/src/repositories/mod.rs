//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in kanbon-core.

mod account;
mod error;
mod field;
mod form;
mod organization;
mod system_message;

pub use account::PgAccountRepository;
pub use field::PgFieldRepository;
pub use form::PgFormRepository;
pub use organization::PgOrganizationRepository;
pub use system_message::PgSystemMessageRepository;
