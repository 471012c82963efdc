//! Form and field entity <-> model mappers

use kanbon_core::entities::{Condition, Field, Form};
use kanbon_core::error::DomainError;
use kanbon_core::value_objects::Snowflake;

use crate::models::{ConditionModel, FieldModel, FormModel};

/// Rows carry a constrained status column, so parsing only fails on drift
impl TryFrom<FormModel> for Form {
    type Error = DomainError;

    fn try_from(model: FormModel) -> Result<Self, Self::Error> {
        Ok(Form {
            id: Snowflake::new(model.id),
            organization_id: Some(Snowflake::new(model.organization_id)),
            name: model.name,
            description: model.description,
            status: model.status.parse()?,
            field_order: model.field_order.0,
            activity_metrics: model.activity_metrics,
            created_at: model.created_at,
            updated_at: model.updated_at,
            created_by: model.created_by.map(Snowflake::new),
            deleted_at: model.deleted_at,
            deleted_by: model.deleted_by.map(Snowflake::new),
        })
    }
}

/// Column values for writing a form
pub struct FormRow<'a> {
    pub id: i64,
    pub organization_id: i64,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub status: &'static str,
    pub field_order: serde_json::Value,
    pub activity_metrics: &'a serde_json::Value,
    pub created_by: Option<i64>,
    pub deleted_by: Option<i64>,
}

impl<'a> FormRow<'a> {
    /// Fails when the form has no organization
    pub fn from_entity(form: &'a Form) -> Result<Self, DomainError> {
        let organization_id = form.ensure_persistable()?;
        Ok(Self {
            id: form.id.into_inner(),
            organization_id: organization_id.into_inner(),
            name: &form.name,
            description: form.description.as_deref(),
            status: form.status.as_str(),
            field_order: serde_json::Value::from(form.field_order.clone()),
            activity_metrics: &form.activity_metrics,
            created_by: form.created_by.map(Snowflake::into_inner),
            deleted_by: form.deleted_by.map(Snowflake::into_inner),
        })
    }
}

impl From<ConditionModel> for Condition {
    fn from(model: ConditionModel) -> Self {
        Condition {
            id: Snowflake::new(model.id),
            field_id: Snowflake::new(model.field_id),
            compare_to: model.compare_to.map(Snowflake::new),
            operator: model.operator,
            content: model.content,
        }
    }
}

/// Build a field entity from its row and its condition rows
pub fn field_with_conditions(model: FieldModel, conditions: Vec<ConditionModel>) -> Field {
    Field {
        id: Snowflake::new(model.id),
        form_id: Snowflake::new(model.form_id),
        title: model.title,
        help_text: model.help_text,
        is_required: model.is_required,
        field_type: model.field_type,
        field_options: model.field_options,
        client_id: model.client_id,
        conditions: conditions.into_iter().map(Condition::from).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
        created_by: model.created_by.map(Snowflake::new),
        deleted_at: model.deleted_at,
        deleted_by: model.deleted_by.map(Snowflake::new),
    }
}
