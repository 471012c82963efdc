//! PostgreSQL implementation of SystemMessageRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use kanbon_core::entities::SystemMessage;
use kanbon_core::error::DomainError;
use kanbon_core::traits::{RepoResult, SystemMessageRepository};
use kanbon_core::value_objects::Snowflake;

use crate::models::SystemMessageModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgSystemMessageRepository {
    pool: PgPool,
}

impl PgSystemMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SystemMessageRepository for PgSystemMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<SystemMessage>> {
        let result = sqlx::query_as::<_, SystemMessageModel>(
            r"
            SELECT id, account_id, code, message, read, read_at, created_at
            FROM system_messages
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(SystemMessage::from))
    }

    #[instrument(skip(self))]
    async fn find_by_account(&self, account_id: Snowflake) -> RepoResult<Vec<SystemMessage>> {
        let rows = sqlx::query_as::<_, SystemMessageModel>(
            r"
            SELECT id, account_id, code, message, read, read_at, created_at
            FROM system_messages
            WHERE account_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(account_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(SystemMessage::from).collect())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id, account_id = %message.account_id))]
    async fn create(&self, message: &SystemMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO system_messages (id, account_id, code, message, read, read_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.account_id.into_inner())
        .bind(message.code)
        .bind(Json(&message.message))
        .bind(message.read)
        .bind(message.read_at)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_foreign_key_violation() => {
                DomainError::AccountNotFound(message.account_id)
            }
            _ => map_db_error(e),
        })?;

        Ok(())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn update(&self, message: &SystemMessage) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE system_messages SET read = $2, read_at = $3 WHERE id = $1
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.read)
        .bind(message.read_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SystemMessageNotFound(message.id));
        }

        Ok(())
    }
}
