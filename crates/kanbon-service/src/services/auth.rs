//! Authentication service
//!
//! Handles registration, login, token refresh, "log out everywhere" and the
//! bootstrap superuser.

use chrono::Utc;
use kanbon_common::{validate_password_strength, AppError, TokenType};
use kanbon_core::entities::{Account, DEFAULT_UTYPE, SUPERUSER_UTYPE};
use kanbon_core::{DomainError, DuplicateAccountKind, Snowflake};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::events::EventDispatcher;
use super::mailer::{MailKind, OutgoingMail};

/// Lowercased, trimmed form used for every lookup and write
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and send its first verification token
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        validate_password_strength(&request.password)?;

        let email = normalize_email(&request.email);
        self.ensure_email_free(&email, &request.password).await?;

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let now = Utc::now();
        let mut account = Account::new(
            self.ctx.generate_id(),
            request.username,
            Some(email.clone()),
            DEFAULT_UTYPE,
        )?;
        account.profile.first_name = request.first_name;
        account.profile.last_name = request.last_name;

        let token = self.ctx.password_service().issue_token()?;
        account.issue_email_token(token.hash, now)?;

        self.ctx.account_repo().create(&account, &password_hash).await?;
        info!(account_id = %account.id, "Account registered");

        self.ctx
            .mailer()
            .send(OutgoingMail {
                kind: MailKind::EmailVerification,
                account_id: account.id,
                to: email,
                token: token.plain,
            })
            .await?;

        let tokens = self.ctx.jwt_service().issue_pair(account.id)?;
        Ok(AuthResponse::new(tokens, &account))
    }

    /// Fail when an account already owns `email`.
    ///
    /// A matching password means the caller already holds that account.
    async fn ensure_email_free(&self, email: &str, password: &str) -> ServiceResult<()> {
        let Some(existing) = self.ctx.account_repo().find_by_email(email).await? else {
            return Ok(());
        };

        let same_identity = match self.ctx.account_repo().get_password_hash(existing.id).await? {
            Some(hash) => matches!(self.ctx.password_service().verify(password, &hash), Ok(true)),
            None => false,
        };
        let kind = if same_identity {
            DuplicateAccountKind::AlreadyRegistered
        } else {
            DuplicateAccountKind::AddressTaken
        };

        debug!(existing_id = %existing.id, ?kind, "Registration rejected");
        Err(DomainError::DuplicateAccount(kind).into())
    }

    /// Login with email and password
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let mut account = self
            .ctx
            .account_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: account not found");
                AppError::InvalidCredentials
            })?;

        let password_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account.id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = %account.id, "Login failed: no password hash");
                AppError::InvalidCredentials
            })?;

        if let Err(e) = self
            .ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
        {
            warn!(account_id = %account.id, "Login failed: invalid password");
            return Err(e.into());
        }

        account.ensure_active()?;

        account.record_login(Utc::now());
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account.id, "Account logged in");

        let tokens = self.ctx.jwt_service().issue_pair(account.id)?;
        Ok(AuthResponse::new(tokens, &account))
    }

    /// Exchange a refresh token for a new pair
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .verify(&request.refresh_token, TokenType::Refresh)?;
        let account = self.session_account(claims.account_id()?, &claims.issued_at()).await?;

        debug!(account_id = %account.id, "Token pair refreshed");

        let tokens = self.ctx.jwt_service().issue_pair(account.id)?;
        Ok(AuthResponse::new(tokens, &account))
    }

    /// Resolve an access token to the account it was issued for
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<Snowflake> {
        let claims = self.ctx.jwt_service().verify(token, TokenType::Access)?;
        let account = self.session_account(claims.account_id()?, &claims.issued_at()).await?;
        Ok(account.id)
    }

    /// Active account whose sessions issued at `issued_at` are still valid
    async fn session_account(
        &self,
        account_id: Snowflake,
        issued_at: &chrono::DateTime<Utc>,
    ) -> ServiceResult<Account> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        account.ensure_active()?;

        if !account.session_valid(*issued_at) {
            debug!(account_id = %account.id, "Token predates logout everywhere");
            return Err(AppError::InvalidToken.into());
        }
        Ok(account)
    }

    /// Invalidate every token issued so far for the account
    #[instrument(skip(self))]
    pub async fn logout_all(&self, account_id: Snowflake) -> ServiceResult<()> {
        let mut account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;

        account.logout_everywhere(Utc::now());
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account_id, "Logged out everywhere");
        Ok(())
    }

    /// Create the bootstrap superuser unless its address is already in use.
    ///
    /// Returns the new account, or `None` when nothing was created.
    #[instrument(skip(self, password))]
    pub async fn ensure_superuser(
        &self,
        email: &str,
        password: &str,
    ) -> ServiceResult<Option<Account>> {
        let email = normalize_email(email);
        if self.ctx.account_repo().find_by_email(&email).await?.is_some() {
            debug!("Superuser already present");
            return Ok(None);
        }
        self.create_superuser(&email, password).await.map(Some)
    }

    /// Create a verified account at the highest role tier
    #[instrument(skip(self, password))]
    pub async fn create_superuser(&self, email: &str, password: &str) -> ServiceResult<Account> {
        validate_password_strength(password)?;
        let email = normalize_email(email);
        self.ensure_email_free(&email, password).await?;

        let password_hash = self.ctx.password_service().hash(password)?;

        let now = Utc::now();
        let mut account = Account::new(
            self.ctx.generate_id(),
            None,
            Some(email),
            SUPERUSER_UTYPE,
        )?;
        account.default_superuser = true;
        let claim = account.verify_email(now)?;

        self.ctx.account_repo().create(&account, &password_hash).await?;
        info!(account_id = %account.id, "Superuser created");

        if let Some(claim) = claim {
            EventDispatcher::new(self.ctx).dispatch(claim.into()).await?;
        }
        Ok(account)
    }
}
