//! Domain entities - core business objects

mod account;
mod field;
mod form;
mod organization;
mod system_message;

pub use account::{
    Account, AccountStatus, EmailState, Profile, ADMIN_UTYPE_THRESHOLD, DEFAULT_UTYPE,
    SUPERUSER_UTYPE, USERNAME_MAX_LEN,
};
pub use field::{Condition, Field};
pub use form::{normalize_name, Form, FormStatus};
pub use organization::{MembershipRole, Organization};
pub use system_message::SystemMessage;
