//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use kanbon_core::entities::Account;
use kanbon_core::error::DomainError;
use kanbon_core::traits::{AccountRepository, RepoResult};
use kanbon_core::value_objects::{AddressKind, Snowflake};

use crate::mappers::AccountRow;
use crate::models::AccountModel;

use super::error::{account_not_found, map_db_error, map_unique_violation};

const ACCOUNT_COLUMNS: &str = r"
    id, username, utype, is_admin, default_superuser,
    email_address, tmp_email_address, email_verified, email_token, email_token_created,
    phone_number, tmp_phone_number, last_phone_request,
    password_reset_token, password_reset_token_created,
    is_active, ban_reason,
    first_name, last_name, avatar, street_1, street_2, zip_code, city, country,
    created_at, last_login, last_logout_all
";

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    /// Addresses are not unique in storage; the oldest holder wins
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email_address = $1 ORDER BY id LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self, account, password_hash), fields(account_id = %account.id))]
    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()> {
        let row = AccountRow::from_entity(account);
        sqlx::query(
            r"
            INSERT INTO accounts (
                id, username, password_hash, utype, is_admin, default_superuser,
                email_address, tmp_email_address, email_verified, email_token, email_token_created,
                phone_number, tmp_phone_number, last_phone_request,
                password_reset_token, password_reset_token_created,
                is_active, ban_reason,
                first_name, last_name, avatar, street_1, street_2, zip_code, city, country,
                created_at, last_login, last_logout_all
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29)
            ",
        )
        .bind(row.id)
        .bind(row.username)
        .bind(password_hash)
        .bind(row.utype)
        .bind(row.is_admin)
        .bind(row.default_superuser)
        .bind(row.email_address)
        .bind(row.tmp_email_address)
        .bind(row.email_verified)
        .bind(row.email_token)
        .bind(row.email_token_created)
        .bind(row.phone_number)
        .bind(row.tmp_phone_number)
        .bind(row.last_phone_request)
        .bind(row.password_reset_token)
        .bind(row.password_reset_token_created)
        .bind(row.is_active)
        .bind(row.ban_reason)
        .bind(&row.profile.first_name)
        .bind(&row.profile.last_name)
        .bind(&row.profile.avatar)
        .bind(&row.profile.street_1)
        .bind(&row.profile.street_2)
        .bind(&row.profile.zip_code)
        .bind(&row.profile.city)
        .bind(&row.profile.country)
        .bind(row.created_at)
        .bind(row.last_login)
        .bind(row.last_logout_all)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken))?;

        Ok(())
    }

    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn update(&self, account: &Account) -> RepoResult<()> {
        let row = AccountRow::from_entity(account);
        let result = sqlx::query(
            r"
            UPDATE accounts
            SET username = $2, utype = $3, is_admin = $4, default_superuser = $5,
                email_address = $6, tmp_email_address = $7, email_verified = $8,
                email_token = $9, email_token_created = $10,
                phone_number = $11, tmp_phone_number = $12, last_phone_request = $13,
                password_reset_token = $14, password_reset_token_created = $15,
                is_active = $16, ban_reason = $17,
                first_name = $18, last_name = $19, avatar = $20, street_1 = $21,
                street_2 = $22, zip_code = $23, city = $24, country = $25,
                last_login = $26, last_logout_all = $27
            WHERE id = $1
            ",
        )
        .bind(row.id)
        .bind(row.username)
        .bind(row.utype)
        .bind(row.is_admin)
        .bind(row.default_superuser)
        .bind(row.email_address)
        .bind(row.tmp_email_address)
        .bind(row.email_verified)
        .bind(row.email_token)
        .bind(row.email_token_created)
        .bind(row.phone_number)
        .bind(row.tmp_phone_number)
        .bind(row.last_phone_request)
        .bind(row.password_reset_token)
        .bind(row.password_reset_token_created)
        .bind(row.is_active)
        .bind(row.ban_reason)
        .bind(&row.profile.first_name)
        .bind(&row.profile.last_name)
        .bind(&row.profile.avatar)
        .bind(&row.profile.street_1)
        .bind(&row.profile.street_2)
        .bind(&row.profile.zip_code)
        .bind(&row.profile.city)
        .bind(&row.profile.country)
        .bind(row.last_login)
        .bind(row.last_logout_all)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(account.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM accounts WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE accounts SET password_hash = $2 WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, address))]
    async fn release_pending_address(
        &self,
        kind: AddressKind,
        address: &str,
        claimant_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>> {
        let sql = match kind {
            AddressKind::Email => {
                r"
                UPDATE accounts
                SET tmp_email_address = NULL
                WHERE tmp_email_address = $1 AND email_address IS NOT NULL AND id <> $2
                RETURNING id
                "
            }
            AddressKind::Phone => {
                r"
                UPDATE accounts
                SET tmp_phone_number = NULL
                WHERE tmp_phone_number = $1 AND phone_number IS NOT NULL AND id <> $2
                RETURNING id
                "
            }
        };

        let ids = sqlx::query_scalar::<_, i64>(sql)
            .bind(address)
            .bind(claimant_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }
}
