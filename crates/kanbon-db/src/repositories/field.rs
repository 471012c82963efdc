//! PostgreSQL implementation of FieldRepository

use async_trait::async_trait;
use std::collections::HashMap;
use sqlx::PgPool;
use tracing::instrument;

use kanbon_core::entities::Field;
use kanbon_core::error::DomainError;
use kanbon_core::traits::{FieldRepository, RepoResult};
use kanbon_core::value_objects::Snowflake;

use crate::mappers::field_with_conditions;
use crate::models::{ConditionModel, FieldModel};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgFieldRepository {
    pool: PgPool,
}

impl PgFieldRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_conditions(&self, field_ids: &[i64]) -> RepoResult<Vec<ConditionModel>> {
        sqlx::query_as::<_, ConditionModel>(
            r"
            SELECT id, field_id, compare_to, operator, content
            FROM kanbon_conditions
            WHERE field_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(field_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl FieldRepository for PgFieldRepository {
    #[instrument(skip(self))]
    async fn find_in_organization(
        &self,
        organization_id: Snowflake,
        field_id: Snowflake,
    ) -> RepoResult<Option<Field>> {
        let model = sqlx::query_as::<_, FieldModel>(
            r"
            SELECT f.id, f.form_id, f.title, f.help_text, f.is_required, f.field_type,
                   f.field_options, f.client_id, f.created_at, f.updated_at, f.created_by,
                   f.deleted_at, f.deleted_by
            FROM kanbon_fields f
            INNER JOIN kanbon_forms k ON k.id = f.form_id
            WHERE f.id = $1 AND k.organization_id = $2
              AND f.deleted_at IS NULL AND k.deleted_at IS NULL
            ",
        )
        .bind(field_id.into_inner())
        .bind(organization_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(model) = model else {
            return Ok(None);
        };
        let conditions = self.load_conditions(&[model.id]).await?;
        Ok(Some(field_with_conditions(model, conditions)))
    }

    #[instrument(skip(self))]
    async fn find_by_form(&self, form_id: Snowflake) -> RepoResult<Vec<Field>> {
        let models = sqlx::query_as::<_, FieldModel>(
            r"
            SELECT id, form_id, title, help_text, is_required, field_type, field_options,
                   client_id, created_at, updated_at, created_by, deleted_at, deleted_by
            FROM kanbon_fields
            WHERE form_id = $1 AND deleted_at IS NULL
            ORDER BY created_at, id
            ",
        )
        .bind(form_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut by_field: HashMap<i64, Vec<ConditionModel>> = HashMap::new();
        for condition in self.load_conditions(&ids).await? {
            by_field.entry(condition.field_id).or_default().push(condition);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let conditions = by_field.remove(&model.id).unwrap_or_default();
                field_with_conditions(model, conditions)
            })
            .collect())
    }

    #[instrument(skip(self, field), fields(field_id = %field.id, form_id = %field.form_id))]
    async fn create(&self, field: &Field) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO kanbon_fields (
                id, form_id, title, help_text, is_required, field_type, field_options,
                client_id, created_at, updated_at, created_by, deleted_at, deleted_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(field.id.into_inner())
        .bind(field.form_id.into_inner())
        .bind(&field.title)
        .bind(&field.help_text)
        .bind(field.is_required)
        .bind(&field.field_type)
        .bind(&field.field_options)
        .bind(&field.client_id)
        .bind(field.created_at)
        .bind(field.updated_at)
        .bind(field.created_by.map(Snowflake::into_inner))
        .bind(field.deleted_at)
        .bind(field.deleted_by.map(Snowflake::into_inner))
        .execute(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_foreign_key_violation() => DomainError::FormNotFound,
            _ => map_db_error(e),
        })?;

        for condition in &field.conditions {
            sqlx::query(
                r"
                INSERT INTO kanbon_conditions (id, field_id, compare_to, operator, content)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(condition.id.into_inner())
            .bind(field.id.into_inner())
            .bind(condition.compare_to.map(Snowflake::into_inner))
            .bind(&condition.operator)
            .bind(&condition.content)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, field), fields(field_id = %field.id))]
    async fn update(&self, field: &Field) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE kanbon_fields
            SET title = $2, help_text = $3, is_required = $4, field_type = $5,
                field_options = $6, client_id = $7, updated_at = $8,
                deleted_at = $9, deleted_by = $10
            WHERE id = $1
            ",
        )
        .bind(field.id.into_inner())
        .bind(&field.title)
        .bind(&field.help_text)
        .bind(field.is_required)
        .bind(&field.field_type)
        .bind(&field.field_options)
        .bind(&field.client_id)
        .bind(field.updated_at)
        .bind(field.deleted_at)
        .bind(field.deleted_by.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FieldNotFound);
        }

        Ok(())
    }
}
