//! Field service
//!
//! Fields live under a form of the caller's organization. Conditions are
//! stored as given and never evaluated.

use chrono::Utc;
use kanbon_core::entities::{normalize_name, Condition, Field};
use kanbon_core::{DomainError, GlobalId, NodeType, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    ConditionInput, CreateFieldRequest, FieldInput, FieldPayload, FieldResponse,
    UpdateFieldRequest,
};

use super::authorization::AuthorizationService;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct FieldService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FieldService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a field, with its conditions, under one of the organization's forms
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        caller_id: Snowflake,
        organization_id: Snowflake,
        form_id: Snowflake,
        request: CreateFieldRequest,
    ) -> ServiceResult<FieldPayload> {
        request.validate()?;
        AuthorizationService::new(self.ctx)
            .require_org_admin(organization_id, caller_id)
            .await?;

        let form = self
            .ctx
            .form_repo()
            .find_in_organization(organization_id, form_id)
            .await?
            .ok_or(DomainError::FormNotFound)?;

        let mut field = Field::new(self.ctx.generate_id(), form.id, caller_id);
        field.client_id = request.client_id;
        apply(&mut field, request.field_input);

        let id = field.id;
        field.conditions = request
            .conditions
            .into_iter()
            .map(|input| self.condition(id, input))
            .collect::<Result<_, _>>()?;

        self.ctx.field_repo().create(&field).await?;
        info!(
            field_id = %field.id,
            form_id = %form.id,
            conditions = field.conditions.len(),
            "Field created"
        );

        Ok(FieldPayload {
            field: Some(FieldResponse::from(&field)),
        })
    }

    fn condition(&self, field_id: Snowflake, input: ConditionInput) -> Result<Condition, DomainError> {
        let compare_to = input
            .compare_to
            .as_deref()
            .map(|raw| GlobalId::decode_as(raw, NodeType::KanbonField))
            .transpose()?;
        Ok(Condition {
            id: self.ctx.generate_id(),
            field_id,
            compare_to,
            operator: input.operator,
            content: input.content,
        })
    }

    /// Update a field, or soft-delete it when `delete` is set
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        caller_id: Snowflake,
        organization_id: Snowflake,
        field_id: Snowflake,
        request: UpdateFieldRequest,
    ) -> ServiceResult<FieldPayload> {
        request.validate()?;
        AuthorizationService::new(self.ctx)
            .require_org_admin(organization_id, caller_id)
            .await?;

        let mut field = self
            .ctx
            .field_repo()
            .find_in_organization(organization_id, field_id)
            .await?
            .ok_or(DomainError::FieldNotFound)?;
        let now = Utc::now();

        if request.delete {
            field.soft_delete(caller_id, now);
            self.ctx.field_repo().update(&field).await?;
            info!(field_id = %field_id, "Field deleted");
            return Ok(FieldPayload { field: None });
        }

        let input = request
            .field_input
            .filter(|input| !input.is_empty())
            .ok_or(DomainError::NoInput)?;
        apply(&mut field, input);
        field.updated_at = now;

        self.ctx.field_repo().update(&field).await?;
        info!(field_id = %field_id, "Field updated");

        Ok(FieldPayload {
            field: Some(FieldResponse::from(&field)),
        })
    }
}

/// Copy supplied attributes onto the field; blank text leaves it unchanged
fn apply(field: &mut Field, input: FieldInput) {
    if let Some(title) = normalize_name(input.title.as_deref()) {
        field.title = Some(title);
    }
    if let Some(help_text) = normalize_name(input.help_text.as_deref()) {
        field.help_text = Some(help_text);
    }
    if let Some(field_type) = normalize_name(input.field_type.as_deref()) {
        field.field_type = Some(field_type);
    }
    if let Some(is_required) = input.is_required {
        field.is_required = is_required;
    }
    if input.field_options.is_some() {
        field.field_options = input.field_options;
    }
}
