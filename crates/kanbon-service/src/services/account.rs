//! Account service
//!
//! Profile reads and edits for the account holder, ban management for
//! administrators.

use kanbon_core::entities::Account;
use kanbon_core::{DomainError, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{AccountResponse, DeactivateAccountRequest, UpdateProfileRequest};

use super::authorization::AuthorizationService;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub(crate) async fn load(&self, account_id: Snowflake) -> ServiceResult<Account> {
        Ok(self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?)
    }

    #[instrument(skip(self))]
    pub async fn get_current(&self, account_id: Snowflake) -> ServiceResult<AccountResponse> {
        let account = self.load(account_id).await?;
        Ok(AccountResponse::from(&account))
    }

    /// Apply the supplied profile fields; absent ones stay as they are
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        account_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<AccountResponse> {
        request.validate()?;
        let mut account = self.load(account_id).await?;

        let profile = &mut account.profile;
        let UpdateProfileRequest {
            first_name,
            last_name,
            avatar,
            street_1,
            street_2,
            zip_code,
            city,
            country,
        } = request;

        for (slot, value) in [
            (&mut profile.first_name, first_name),
            (&mut profile.last_name, last_name),
            (&mut profile.street_1, street_1),
            (&mut profile.street_2, street_2),
            (&mut profile.zip_code, zip_code),
            (&mut profile.city, city),
            (&mut profile.country, country),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }
        if avatar.is_some() {
            profile.avatar = avatar;
        }

        self.ctx.account_repo().update(&account).await?;
        info!(account_id = %account_id, "Profile updated");

        Ok(AccountResponse::from(&account))
    }

    /// Ban an account with a reason code
    #[instrument(skip(self, request))]
    pub async fn deactivate(
        &self,
        admin_id: Snowflake,
        account_id: Snowflake,
        request: DeactivateAccountRequest,
    ) -> ServiceResult<AccountResponse> {
        request.validate()?;
        AuthorizationService::new(self.ctx).require_admin(admin_id).await?;

        let mut account = self.load(account_id).await?;
        account.deactivate(request.reason);
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account_id, reason = request.reason, "Account deactivated");
        Ok(AccountResponse::from(&account))
    }

    /// Lift a ban; the stored reason code returns to 0
    #[instrument(skip(self))]
    pub async fn reactivate(
        &self,
        admin_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<AccountResponse> {
        AuthorizationService::new(self.ctx).require_admin(admin_id).await?;

        let mut account = self.load(account_id).await?;
        account.reactivate();
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account_id, "Account reactivated");
        Ok(AccountResponse::from(&account))
    }
}
