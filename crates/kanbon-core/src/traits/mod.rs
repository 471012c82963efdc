//! Repository traits

mod repositories;

pub use repositories::{
    AccountRepository, FieldRepository, FormRepository, OrganizationRepository, RepoResult,
    SystemMessageRepository,
};
