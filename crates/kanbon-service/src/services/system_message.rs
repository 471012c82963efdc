//! System message service
//!
//! Per-account localized inbox. Administrators may write to any account;
//! account holders read and acknowledge their own messages.

use chrono::Utc;
use kanbon_core::entities::SystemMessage;
use kanbon_core::{DomainError, MessageSource, Snowflake};
use tracing::{info, instrument};

use crate::dto::{AddSystemMessageRequest, SystemMessageResponse};

use super::authorization::AuthorizationService;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct SystemMessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SystemMessageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Render and store a message for an account.
    ///
    /// Nothing is stored when the content cannot be rendered.
    #[instrument(skip(self, source, args))]
    pub async fn add(
        &self,
        account_id: Snowflake,
        source: MessageSource,
        args: &[String],
    ) -> ServiceResult<SystemMessage> {
        self.ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;

        let message = SystemMessage::compose(self.ctx.generate_id(), account_id, source, args)?;
        self.ctx.system_message_repo().create(&message).await?;

        info!(message_id = %message.id, code = message.code, "System message added");
        Ok(message)
    }

    /// Administrator writes a message to any account
    #[instrument(skip(self, request))]
    pub async fn add_as_admin(
        &self,
        admin_id: Snowflake,
        account_id: Snowflake,
        request: AddSystemMessageRequest,
    ) -> ServiceResult<SystemMessageResponse> {
        AuthorizationService::new(self.ctx).require_admin(admin_id).await?;

        let source = MessageSource {
            code: request.code,
            message: request.message,
        };
        let message = self.add(account_id, source, &request.args).await?;
        Ok(SystemMessageResponse::from(&message))
    }

    /// The caller's inbox, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, account_id: Snowflake) -> ServiceResult<Vec<SystemMessageResponse>> {
        let messages = self
            .ctx
            .system_message_repo()
            .find_by_account(account_id)
            .await?;
        Ok(messages.iter().map(SystemMessageResponse::from).collect())
    }

    /// Mark one of the caller's messages as read; repeated calls keep the first `read_at`
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        account_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<SystemMessageResponse> {
        let mut message = self
            .ctx
            .system_message_repo()
            .find_by_id(message_id)
            .await?
            .filter(|m| m.account_id == account_id)
            .ok_or(DomainError::SystemMessageNotFound(message_id))?;

        if !message.read {
            message.mark_read(Utc::now());
            self.ctx.system_message_repo().update(&message).await?;
        }
        Ok(SystemMessageResponse::from(&message))
    }
}
