//! Form handlers
//!
//! Forms of an organization, addressed by global ids.

use axum::{extract::State, Json};
use kanbon_service::dto::{CreateFormRequest, FormPayload, FormResponse, UpdateFormRequest};
use kanbon_service::FormService;

use crate::extractors::{ApiPath, AuthAccount, FormPath, OrganizationPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// GET /organizations/:organization_id/forms
pub async fn list_forms(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<OrganizationPath>,
) -> ApiResult<Json<Vec<FormResponse>>> {
    let organization_id = path.organization_id()?;
    let service = FormService::new(state.service_context());
    let response = service.list(auth.account_id, organization_id).await?;
    Ok(Json(response))
}

/// POST /organizations/:organization_id/forms
pub async fn create_form(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<OrganizationPath>,
    ValidatedJson(request): ValidatedJson<CreateFormRequest>,
) -> ApiResult<Created<Json<FormPayload>>> {
    let organization_id = path.organization_id()?;
    let service = FormService::new(state.service_context());
    let response = service
        .create(auth.account_id, organization_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// GET /organizations/:organization_id/forms/:form_id
pub async fn get_form(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<FormPath>,
) -> ApiResult<Json<FormResponse>> {
    let organization_id = path.organization_id()?;
    let form_id = path.form_id()?;
    let service = FormService::new(state.service_context());
    let response = service.get(auth.account_id, organization_id, form_id).await?;
    Ok(Json(response))
}

/// Update a form; `"delete": true` soft-deletes it and answers `{"form": null}`
///
/// PATCH /organizations/:organization_id/forms/:form_id
pub async fn update_form(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<FormPath>,
    ValidatedJson(request): ValidatedJson<UpdateFormRequest>,
) -> ApiResult<Json<FormPayload>> {
    let organization_id = path.organization_id()?;
    let form_id = path.form_id()?;
    let service = FormService::new(state.service_context());
    let response = service
        .update(auth.account_id, organization_id, form_id, request)
        .await?;
    Ok(Json(response))
}
