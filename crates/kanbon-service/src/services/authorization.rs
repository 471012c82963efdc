//! Authorization service
//!
//! Organization membership checks for form and field operations, and the
//! account-level administrator check.

use kanbon_core::entities::{Account, MembershipRole};
use kanbon_core::{DomainError, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct AuthorizationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthorizationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn membership(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<Option<MembershipRole>> {
        self.ctx
            .organization_repo()
            .find_by_id(organization_id)
            .await?
            .ok_or(DomainError::OrganizationNotFound(organization_id))?;

        Ok(self
            .ctx
            .organization_repo()
            .membership_role(organization_id, account_id)
            .await?)
    }

    /// Require an admin membership in the organization
    #[instrument(skip(self))]
    pub async fn require_org_admin(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<()> {
        match self.membership(organization_id, account_id).await? {
            Some(MembershipRole::Admin) => Ok(()),
            role => {
                debug!(?role, "Organization admin check failed");
                Err(DomainError::NotOrganizationAdmin.into())
            }
        }
    }

    /// Require any membership in the organization
    #[instrument(skip(self))]
    pub async fn require_org_member(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<()> {
        match self.membership(organization_id, account_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotOrganizationMember.into()),
        }
    }

    /// Load the caller and require an administrator role tier
    #[instrument(skip(self))]
    pub async fn require_admin(&self, account_id: Snowflake) -> ServiceResult<Account> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;

        if !account.is_admin() || !account.is_active() {
            return Err(DomainError::AdminRequired.into());
        }
        Ok(account)
    }
}
