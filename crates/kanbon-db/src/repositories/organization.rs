//! PostgreSQL implementation of OrganizationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use kanbon_core::entities::{MembershipRole, Organization};
use kanbon_core::error::DomainError;
use kanbon_core::traits::{OrganizationRepository, RepoResult};
use kanbon_core::value_objects::Snowflake;

use crate::models::OrganizationModel;

use super::error::{map_db_error, organization_not_found};

#[derive(Clone)]
pub struct PgOrganizationRepository {
    pool: PgPool,
}

impl PgOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Organization>> {
        let result = sqlx::query_as::<_, OrganizationModel>(
            r"
            SELECT id, name, created_at FROM organizations WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Organization::from))
    }

    #[instrument(skip(self, organization), fields(organization_id = %organization.id))]
    async fn create(&self, organization: &Organization) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO organizations (id, name, created_at) VALUES ($1, $2, $3)
            ",
        )
        .bind(organization.id.into_inner())
        .bind(&organization.name)
        .bind(organization.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_membership(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
        role: MembershipRole,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO organization_memberships (organization_id, account_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (organization_id, account_id) DO UPDATE SET role = EXCLUDED.role
            ",
        )
        .bind(organization_id.into_inner())
        .bind(account_id.into_inner())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_foreign_key_violation() => {
                organization_not_found(organization_id)
            }
            _ => map_db_error(e),
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn membership_role(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
    ) -> RepoResult<Option<MembershipRole>> {
        let role = sqlx::query_scalar::<_, String>(
            r"
            SELECT role FROM organization_memberships
            WHERE organization_id = $1 AND account_id = $2
            ",
        )
        .bind(organization_id.into_inner())
        .bind(account_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        role.map(|r| {
            MembershipRole::parse(&r)
                .ok_or_else(|| DomainError::DatabaseError(format!("unknown membership role {r}")))
        })
        .transpose()
    }
}
