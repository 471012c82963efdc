//! Service context - dependency container for services
//!
//! Holds all repositories and the shared auth, id and mail collaborators.

use std::sync::Arc;

use kanbon_common::auth::{JwtService, PasswordService};
use kanbon_core::traits::{
    AccountRepository, FieldRepository, FormRepository, OrganizationRepository,
    SystemMessageRepository,
};
use kanbon_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};
use super::mailer::Mailer;

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    system_message_repo: Arc<dyn SystemMessageRepository>,
    organization_repo: Arc<dyn OrganizationRepository>,
    form_repo: Arc<dyn FormRepository>,
    field_repo: Arc<dyn FieldRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: Arc<PasswordService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    mailer: Arc<dyn Mailer>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    pub fn system_message_repo(&self) -> &dyn SystemMessageRepository {
        self.system_message_repo.as_ref()
    }

    pub fn organization_repo(&self) -> &dyn OrganizationRepository {
        self.organization_repo.as_ref()
    }

    pub fn form_repo(&self) -> &dyn FormRepository {
        self.form_repo.as_ref()
    }

    pub fn field_repo(&self) -> &dyn FieldRepository {
        self.field_repo.as_ref()
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        self.password_service.as_ref()
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    system_message_repo: Option<Arc<dyn SystemMessageRepository>>,
    organization_repo: Option<Arc<dyn OrganizationRepository>>,
    form_repo: Option<Arc<dyn FormRepository>>,
    field_repo: Option<Arc<dyn FieldRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    password_service: Option<Arc<PasswordService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn system_message_repo(mut self, repo: Arc<dyn SystemMessageRepository>) -> Self {
        self.system_message_repo = Some(repo);
        self
    }

    pub fn organization_repo(mut self, repo: Arc<dyn OrganizationRepository>) -> Self {
        self.organization_repo = Some(repo);
        self
    }

    pub fn form_repo(mut self, repo: Arc<dyn FormRepository>) -> Self {
        self.form_repo = Some(repo);
        self
    }

    pub fn field_repo(mut self, repo: Arc<dyn FieldRepository>) -> Self {
        self.field_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn password_service(mut self, service: Arc<PasswordService>) -> Self {
        self.password_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing.
    /// The password service defaults to Argon2id.
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            account_repo: required(self.account_repo, "account_repo")?,
            system_message_repo: required(self.system_message_repo, "system_message_repo")?,
            organization_repo: required(self.organization_repo, "organization_repo")?,
            form_repo: required(self.form_repo, "form_repo")?,
            field_repo: required(self.field_repo, "field_repo")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: self.password_service.unwrap_or_default(),
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            mailer: required(self.mailer, "mailer")?,
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
}
