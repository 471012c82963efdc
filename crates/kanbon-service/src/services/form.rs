//! Form service
//!
//! Organization admins create, edit and soft-delete forms; any member may
//! read them. Names are unique among an organization's live forms.

use chrono::Utc;
use kanbon_core::entities::{normalize_name, Form, FormStatus};
use kanbon_core::{DomainError, Snowflake};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::dto::{CreateFormRequest, FormInput, FormPayload, FormResponse, UpdateFormRequest};

use super::authorization::AuthorizationService;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct FormService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FormService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a form in the caller's organization
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        caller_id: Snowflake,
        organization_id: Snowflake,
        request: CreateFormRequest,
    ) -> ServiceResult<FormPayload> {
        request.validate()?;
        AuthorizationService::new(self.ctx)
            .require_org_admin(organization_id, caller_id)
            .await?;

        let input = request.form_input;
        let name = normalize_name(input.name.as_deref()).ok_or(DomainError::FormNameRequired)?;
        self.ensure_name_free(organization_id, &name, None).await?;

        let mut form = Form::new(self.ctx.generate_id(), organization_id, &name, caller_id)?;
        form.description = input.description;
        if let Some(status) = input.status {
            form.status = status.parse::<FormStatus>()?;
        }
        if let Some(field_order) = input.field_order {
            form.field_order = field_order;
        }

        self.ctx.form_repo().create(&form).await?;
        info!(form_id = %form.id, organization_id = %organization_id, "Form created");

        Ok(FormPayload {
            form: Some(FormResponse::with_fields(&form, &[])),
        })
    }

    /// Live forms of the organization, oldest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        caller_id: Snowflake,
        organization_id: Snowflake,
    ) -> ServiceResult<Vec<FormResponse>> {
        AuthorizationService::new(self.ctx)
            .require_org_member(organization_id, caller_id)
            .await?;

        let forms = self
            .ctx
            .form_repo()
            .find_by_organization(organization_id)
            .await?;
        Ok(forms.iter().map(FormResponse::from).collect())
    }

    /// A single form with its live fields
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        caller_id: Snowflake,
        organization_id: Snowflake,
        form_id: Snowflake,
    ) -> ServiceResult<FormResponse> {
        AuthorizationService::new(self.ctx)
            .require_org_member(organization_id, caller_id)
            .await?;

        let form = self.load(organization_id, form_id).await?;
        let fields = self.ctx.field_repo().find_by_form(form.id).await?;
        Ok(FormResponse::with_fields(&form, &fields))
    }

    /// Update a form, or soft-delete it when `delete` is set
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        caller_id: Snowflake,
        organization_id: Snowflake,
        form_id: Snowflake,
        request: UpdateFormRequest,
    ) -> ServiceResult<FormPayload> {
        request.validate()?;
        AuthorizationService::new(self.ctx)
            .require_org_admin(organization_id, caller_id)
            .await?;

        let mut form = self.load(organization_id, form_id).await?;
        let now = Utc::now();

        if request.delete {
            form.soft_delete(caller_id, now);
            self.ctx.form_repo().update(&form).await?;
            info!(form_id = %form_id, "Form deleted");
            return Ok(FormPayload { form: None });
        }

        let input = request
            .form_input
            .filter(|input| !input.is_empty())
            .ok_or(DomainError::NoInput)?;
        self.apply(&mut form, input).await?;
        form.updated_at = now;

        self.ctx.form_repo().update(&form).await?;
        info!(form_id = %form_id, "Form updated");

        let fields = self.ctx.field_repo().find_by_form(form.id).await?;
        Ok(FormPayload {
            form: Some(FormResponse::with_fields(&form, &fields)),
        })
    }

    async fn apply(&self, form: &mut Form, input: FormInput) -> ServiceResult<()> {
        // Blank names and descriptions leave the stored value alone
        if let Some(name) = normalize_name(input.name.as_deref()) {
            if name != form.name {
                let organization_id = form.ensure_persistable()?;
                self.ensure_name_free(organization_id, &name, Some(form.id))
                    .await?;
                form.name = name;
            }
        }
        if let Some(description) = normalize_name(input.description.as_deref()) {
            form.description = Some(description);
        }
        if let Some(status) = input.status {
            form.status = status.parse()?;
        }
        if let Some(field_order) = input.field_order {
            form.field_order = field_order;
        }
        Ok(())
    }

    async fn load(&self, organization_id: Snowflake, form_id: Snowflake) -> ServiceResult<Form> {
        Ok(self
            .ctx
            .form_repo()
            .find_in_organization(organization_id, form_id)
            .await?
            .ok_or(DomainError::FormNotFound)?)
    }

    async fn ensure_name_free(
        &self,
        organization_id: Snowflake,
        name: &str,
        exclude: Option<Snowflake>,
    ) -> ServiceResult<()> {
        if self
            .ctx
            .form_repo()
            .name_exists(organization_id, name, exclude)
            .await?
        {
            debug!(name, "Form name already in use");
            return Err(DomainError::FormNameExists.into());
        }
        Ok(())
    }
}
