//! Contact verification and password reset
//!
//! Tokens are generated here, hashed onto the account and handed to the
//! mailer. Successful email and phone verification broadcasts an
//! `AddressClaimed` event after the claimant has been written.

use chrono::{DateTime, Utc};
use kanbon_common::validate_password_strength;
use kanbon_core::entities::Account;
use kanbon_core::{AddressKind, DomainError, DuplicateAccountKind, Snowflake};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::dto::{
    AccountResponse, ChangeEmailRequest, ChangePhoneRequest, ConfirmEmailRequest,
    PasswordResetRequest, ResetPasswordRequest, TokenRequestResponse,
};

use super::account::AccountService;
use super::auth::normalize_email;
use super::authorization::AuthorizationService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::events::EventDispatcher;
use super::mailer::{MailKind, OutgoingMail};

pub struct VerificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VerificationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Point the account at a new email address and send it a token.
    ///
    /// Before the first verification the primary address is replaced;
    /// afterwards the address waits in the pending slot.
    #[instrument(skip(self, request))]
    pub async fn request_email_change(
        &self,
        account_id: Snowflake,
        request: ChangeEmailRequest,
    ) -> ServiceResult<TokenRequestResponse> {
        request.validate()?;
        let email = normalize_email(&request.email);
        let mut account = AccountService::new(self.ctx).load(account_id).await?;

        if account.email_verified() && account.email_address.as_deref() == Some(email.as_str()) {
            return Err(ServiceError::validation(
                "This email address is already verified on your account",
            ));
        }

        if let Some(holder) = self.ctx.account_repo().find_by_email(&email).await? {
            if holder.id != account.id {
                return Err(DomainError::DuplicateAccount(DuplicateAccountKind::AddressTaken).into());
            }
        }

        let now = Utc::now();
        let token = self.issue_email_token(&mut account, now)?;
        account.request_email_change(email.clone());
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account_id, "Email change requested");
        self.send(MailKind::EmailVerification, &account, email, token)
            .await?;

        Ok(TokenRequestResponse {
            next_request_in: account.seconds_until_next_email_request(now),
        })
    }

    /// Send a fresh token for the address currently awaiting verification
    #[instrument(skip(self))]
    pub async fn resend_email_verification(
        &self,
        account_id: Snowflake,
    ) -> ServiceResult<TokenRequestResponse> {
        let mut account = AccountService::new(self.ctx).load(account_id).await?;
        let address = account
            .email_awaiting_verification()
            .map(String::from)
            .ok_or(DomainError::MissingPendingAddress(AddressKind::Email))?;

        let now = Utc::now();
        let token = self.issue_email_token(&mut account, now)?;
        self.ctx.account_repo().update(&account).await?;

        self.send(MailKind::EmailVerification, &account, address, token)
            .await?;

        Ok(TokenRequestResponse {
            next_request_in: account.seconds_until_next_email_request(now),
        })
    }

    fn issue_email_token(&self, account: &mut Account, now: DateTime<Utc>) -> ServiceResult<String> {
        // Throttle before hashing
        let retry_after = account.seconds_until_next_email_request(now);
        if retry_after > 0 {
            return Err(DomainError::RequestThrottled { retry_after }.into());
        }
        let token = self.ctx.password_service().issue_token()?;
        account.issue_email_token(token.hash, now)?;
        Ok(token.plain)
    }

    /// Check the emailed token and complete verification
    #[instrument(skip(self, request))]
    pub async fn confirm_email(
        &self,
        account_id: Snowflake,
        request: ConfirmEmailRequest,
    ) -> ServiceResult<AccountResponse> {
        let mut account = AccountService::new(self.ctx).load(account_id).await?;
        let now = Utc::now();

        let token_hash = match (&account.email_token_hash, account.email_token_valid(now)) {
            (Some(hash), true) => hash.clone(),
            _ => return Err(DomainError::InvalidToken.into()),
        };
        if !self.ctx.password_service().verify(&request.token, &token_hash)? {
            debug!(account_id = %account_id, "Email token mismatch");
            return Err(DomainError::InvalidToken.into());
        }

        let claim = account.verify_email(now)?;
        self.ctx.account_repo().update(&account).await?;
        info!(account_id = %account_id, "Email verified");

        if let Some(claim) = claim {
            EventDispatcher::new(self.ctx).dispatch(claim.into()).await?;
        }
        Ok(AccountResponse::from(&account))
    }

    /// Store a phone number awaiting verification
    #[instrument(skip(self, request))]
    pub async fn request_phone_change(
        &self,
        account_id: Snowflake,
        request: ChangePhoneRequest,
    ) -> ServiceResult<AccountResponse> {
        request.validate()?;
        let mut account = AccountService::new(self.ctx).load(account_id).await?;

        account.request_phone_change(request.phone_number.trim().to_string(), Utc::now());
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account_id, "Phone change requested");
        Ok(AccountResponse::from(&account))
    }

    /// Promote the pending phone number; phone verification has no token, so
    /// an administrator confirms it
    #[instrument(skip(self))]
    pub async fn verify_phone(
        &self,
        admin_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<AccountResponse> {
        AuthorizationService::new(self.ctx).require_admin(admin_id).await?;
        let mut account = AccountService::new(self.ctx).load(account_id).await?;

        let claim = account.verify_phone(Utc::now())?;
        self.ctx.account_repo().update(&account).await?;
        info!(account_id = %account_id, "Phone verified");

        EventDispatcher::new(self.ctx).dispatch(claim.into()).await?;
        Ok(AccountResponse::from(&account))
    }

    /// Send a password reset token. Unknown addresses succeed silently.
    #[instrument(skip(self, request))]
    pub async fn request_password_reset(&self, request: PasswordResetRequest) -> ServiceResult<()> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let Some(mut account) = self.ctx.account_repo().find_by_email(&email).await? else {
            debug!("Password reset for unknown address ignored");
            return Ok(());
        };

        let now = Utc::now();
        let retry_after = account.seconds_until_next_password_reset(now);
        if retry_after > 0 {
            return Err(DomainError::RequestThrottled { retry_after }.into());
        }
        let token = self.ctx.password_service().issue_token()?;
        account.issue_password_reset_token(token.hash, now)?;
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account.id, "Password reset requested");
        self.send(MailKind::PasswordReset, &account, email, token.plain)
            .await
    }

    /// Set a new password with a valid reset token; the token is consumed
    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> ServiceResult<()> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let mut account = self
            .ctx
            .account_repo()
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        let now = Utc::now();
        let token_hash = match (&account.password_reset_token_hash, account.reset_token_valid(now)) {
            (Some(hash), true) => hash.clone(),
            _ => return Err(DomainError::InvalidToken.into()),
        };
        if !self.ctx.password_service().verify(&request.token, &token_hash)? {
            return Err(DomainError::InvalidToken.into());
        }

        validate_password_strength(&request.new_password)?;
        let password_hash = self.ctx.password_service().hash(&request.new_password)?;

        self.ctx
            .account_repo()
            .update_password(account.id, &password_hash)
            .await?;
        account.clear_password_reset_token();
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account.id, "Password reset completed");
        Ok(())
    }

    async fn send(
        &self,
        kind: MailKind,
        account: &Account,
        to: String,
        token: String,
    ) -> ServiceResult<()> {
        self.ctx
            .mailer()
            .send(OutgoingMail {
                kind,
                account_id: account.id,
                to,
                token,
            })
            .await
    }
}
