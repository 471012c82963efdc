//! Field handlers

use axum::{extract::State, Json};
use kanbon_service::dto::{CreateFieldRequest, FieldPayload, UpdateFieldRequest};
use kanbon_service::FieldService;

use crate::extractors::{ApiPath, AuthAccount, FieldPath, FormPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create a field with its conditions under a form
///
/// POST /organizations/:organization_id/forms/:form_id/fields
pub async fn create_field(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<FormPath>,
    ValidatedJson(request): ValidatedJson<CreateFieldRequest>,
) -> ApiResult<Created<Json<FieldPayload>>> {
    let organization_id = path.organization_id()?;
    let form_id = path.form_id()?;
    let service = FieldService::new(state.service_context());
    let response = service
        .create(auth.account_id, organization_id, form_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// PATCH /organizations/:organization_id/fields/:field_id
pub async fn update_field(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<FieldPath>,
    ValidatedJson(request): ValidatedJson<UpdateFieldRequest>,
) -> ApiResult<Json<FieldPayload>> {
    let organization_id = path.organization_id()?;
    let field_id = path.field_id()?;
    let service = FieldService::new(state.service_context());
    let response = service
        .update(auth.account_id, organization_id, field_id, request)
        .await?;
    Ok(Json(response))
}
