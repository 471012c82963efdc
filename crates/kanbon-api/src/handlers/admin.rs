//! Administrator handlers
//!
//! Operations on other accounts. The services reject callers that are not
//! active administrators.

use axum::{extract::State, Json};
use kanbon_service::dto::{
    AccountResponse, AddSystemMessageRequest, DeactivateAccountRequest, SystemMessageResponse,
};
use kanbon_service::{AccountService, SystemMessageService, VerificationService};

use crate::extractors::{AccountIdPath, ApiJson, ApiPath, AuthAccount, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Ban an account with a reason code
///
/// POST /admin/accounts/:account_id/deactivate
pub async fn deactivate_account(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<AccountIdPath>,
    ValidatedJson(request): ValidatedJson<DeactivateAccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account_id = path.account_id()?;
    let service = AccountService::new(state.service_context());
    let response = service.deactivate(auth.account_id, account_id, request).await?;
    Ok(Json(response))
}

/// POST /admin/accounts/:account_id/reactivate
pub async fn reactivate_account(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<AccountIdPath>,
) -> ApiResult<Json<AccountResponse>> {
    let account_id = path.account_id()?;
    let service = AccountService::new(state.service_context());
    let response = service.reactivate(auth.account_id, account_id).await?;
    Ok(Json(response))
}

/// Promote the account's pending phone number to its primary one
///
/// POST /admin/accounts/:account_id/phone/verify
pub async fn verify_phone(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<AccountIdPath>,
) -> ApiResult<Json<AccountResponse>> {
    let account_id = path.account_id()?;
    let service = VerificationService::new(state.service_context());
    let response = service.verify_phone(auth.account_id, account_id).await?;
    Ok(Json(response))
}

/// POST /admin/accounts/:account_id/messages
pub async fn add_system_message(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<AccountIdPath>,
    ApiJson(request): ApiJson<AddSystemMessageRequest>,
) -> ApiResult<Created<Json<SystemMessageResponse>>> {
    let account_id = path.account_id()?;
    let service = SystemMessageService::new(state.service_context());
    let response = service
        .add_as_admin(auth.account_id, account_id, request)
        .await?;
    Ok(Created(Json(response)))
}
