//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Account, Field, Form, MembershipRole, Organization, SystemMessage};
use crate::error::DomainError;
use crate::value_objects::{AddressKind, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>>;

    /// Find account by primary email address
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    /// Create a new account
    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()>;

    /// Persist the full account state
    async fn update(&self, account: &Account) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Clear `address` from the pending slot of every other account that
    /// holds a primary address of the same kind. Returns the affected ids.
    ///
    /// Must be a single atomic statement.
    async fn release_pending_address(
        &self,
        kind: AddressKind,
        address: &str,
        claimant_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// System Message Repository
// ============================================================================

#[async_trait]
pub trait SystemMessageRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<SystemMessage>>;

    /// List an account's messages, newest first
    async fn find_by_account(&self, account_id: Snowflake) -> RepoResult<Vec<SystemMessage>>;

    async fn create(&self, message: &SystemMessage) -> RepoResult<()>;

    /// Persist read state
    async fn update(&self, message: &SystemMessage) -> RepoResult<()>;
}

// ============================================================================
// Organization Repository
// ============================================================================

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Organization>>;

    async fn create(&self, organization: &Organization) -> RepoResult<()>;

    /// Add or change an account's membership
    async fn set_membership(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
        role: MembershipRole,
    ) -> RepoResult<()>;

    /// Membership role of an account, if any
    async fn membership_role(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
    ) -> RepoResult<Option<MembershipRole>>;
}

// ============================================================================
// Form Repository
// ============================================================================

#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Find a live form inside an organization
    async fn find_in_organization(
        &self,
        organization_id: Snowflake,
        form_id: Snowflake,
    ) -> RepoResult<Option<Form>>;

    /// List live forms of an organization, oldest first
    async fn find_by_organization(&self, organization_id: Snowflake) -> RepoResult<Vec<Form>>;

    /// Whether a live form other than `exclude` already uses `name`
    async fn name_exists(
        &self,
        organization_id: Snowflake,
        name: &str,
        exclude: Option<Snowflake>,
    ) -> RepoResult<bool>;

    /// Insert a form; a live name collision fails with `FormNameExists`
    async fn create(&self, form: &Form) -> RepoResult<()>;

    /// Persist the full form state; a live name collision fails with `FormNameExists`
    async fn update(&self, form: &Form) -> RepoResult<()>;
}

// ============================================================================
// Field Repository
// ============================================================================

#[async_trait]
pub trait FieldRepository: Send + Sync {
    /// Find a live field whose form belongs to the organization
    async fn find_in_organization(
        &self,
        organization_id: Snowflake,
        field_id: Snowflake,
    ) -> RepoResult<Option<Field>>;

    /// List live fields of a form, oldest first
    async fn find_by_form(&self, form_id: Snowflake) -> RepoResult<Vec<Field>>;

    /// Insert a field together with its conditions
    async fn create(&self, field: &Field) -> RepoResult<()>;

    /// Persist field attributes (conditions are left as stored)
    async fn update(&self, field: &Field) -> RepoResult<()>;
}
