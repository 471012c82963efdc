//! PostgreSQL implementation of FormRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use kanbon_core::entities::Form;
use kanbon_core::error::DomainError;
use kanbon_core::traits::{FormRepository, RepoResult};
use kanbon_core::value_objects::Snowflake;

use crate::mappers::FormRow;
use crate::models::FormModel;

use super::error::{map_db_error, map_unique_violation, organization_not_found};

const FORM_COLUMNS: &str = r"
    id, organization_id, name, description, status, field_order, activity_metrics,
    created_at, updated_at, created_by, deleted_at, deleted_by
";

#[derive(Clone)]
pub struct PgFormRepository {
    pool: PgPool,
}

impl PgFormRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, organization_id: i64) -> DomainError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_foreign_key_violation() => {
            organization_not_found(Snowflake::new(organization_id))
        }
        _ => map_unique_violation(e, || DomainError::FormNameExists),
    }
}

#[async_trait]
impl FormRepository for PgFormRepository {
    #[instrument(skip(self))]
    async fn find_in_organization(
        &self,
        organization_id: Snowflake,
        form_id: Snowflake,
    ) -> RepoResult<Option<Form>> {
        let result = sqlx::query_as::<_, FormModel>(&format!(
            r"
            SELECT {FORM_COLUMNS} FROM kanbon_forms
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            "
        ))
        .bind(form_id.into_inner())
        .bind(organization_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Form::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_organization(&self, organization_id: Snowflake) -> RepoResult<Vec<Form>> {
        let rows = sqlx::query_as::<_, FormModel>(&format!(
            r"
            SELECT {FORM_COLUMNS} FROM kanbon_forms
            WHERE organization_id = $1 AND deleted_at IS NULL
            ORDER BY created_at, id
            "
        ))
        .bind(organization_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Form::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn name_exists(
        &self,
        organization_id: Snowflake,
        name: &str,
        exclude: Option<Snowflake>,
    ) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM kanbon_forms
                WHERE organization_id = $1 AND name = $2 AND deleted_at IS NULL
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )
            ",
        )
        .bind(organization_id.into_inner())
        .bind(name)
        .bind(exclude.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, form), fields(form_id = %form.id))]
    async fn create(&self, form: &Form) -> RepoResult<()> {
        let row = FormRow::from_entity(form)?;
        sqlx::query(
            r"
            INSERT INTO kanbon_forms (
                id, organization_id, name, description, status, field_order, activity_metrics,
                created_at, updated_at, created_by, deleted_at, deleted_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(row.id)
        .bind(row.organization_id)
        .bind(row.name)
        .bind(row.description)
        .bind(row.status)
        .bind(&row.field_order)
        .bind(row.activity_metrics)
        .bind(form.created_at)
        .bind(form.updated_at)
        .bind(row.created_by)
        .bind(form.deleted_at)
        .bind(row.deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, row.organization_id))?;

        Ok(())
    }

    #[instrument(skip(self, form), fields(form_id = %form.id))]
    async fn update(&self, form: &Form) -> RepoResult<()> {
        let row = FormRow::from_entity(form)?;
        let result = sqlx::query(
            r"
            UPDATE kanbon_forms
            SET name = $3, description = $4, status = $5, field_order = $6,
                activity_metrics = $7, updated_at = $8, deleted_at = $9, deleted_by = $10
            WHERE id = $1 AND organization_id = $2
            ",
        )
        .bind(row.id)
        .bind(row.organization_id)
        .bind(row.name)
        .bind(row.description)
        .bind(row.status)
        .bind(&row.field_order)
        .bind(row.activity_metrics)
        .bind(form.updated_at)
        .bind(form.deleted_at)
        .bind(row.deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, row.organization_id))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FormNotFound);
        }

        Ok(())
    }
}
