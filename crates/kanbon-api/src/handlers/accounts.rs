//! Account handlers
//!
//! The caller's own account: profile, email and phone changes.

use axum::{extract::State, Json};
use kanbon_service::dto::{
    AccountResponse, ChangeEmailRequest, ChangePhoneRequest, ConfirmEmailRequest,
    TokenRequestResponse, UpdateProfileRequest,
};
use kanbon_service::{AccountService, VerificationService};

use crate::extractors::{ApiJson, AuthAccount, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /accounts/@me
pub async fn get_current_account(
    State(state): State<AppState>,
    auth: AuthAccount,
) -> ApiResult<Json<AccountResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.get_current(auth.account_id).await?;
    Ok(Json(response))
}

/// Update profile attributes; omitted ones are left alone
///
/// PATCH /accounts/@me
pub async fn update_current_account(
    State(state): State<AppState>,
    auth: AuthAccount,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.update_profile(auth.account_id, request).await?;
    Ok(Json(response))
}

/// Start an email change; the new address waits for confirmation
///
/// POST /accounts/@me/email
pub async fn request_email_change(
    State(state): State<AppState>,
    auth: AuthAccount,
    ValidatedJson(request): ValidatedJson<ChangeEmailRequest>,
) -> ApiResult<Json<TokenRequestResponse>> {
    let service = VerificationService::new(state.service_context());
    let response = service.request_email_change(auth.account_id, request).await?;
    Ok(Json(response))
}

/// POST /accounts/@me/email/resend
pub async fn resend_email_verification(
    State(state): State<AppState>,
    auth: AuthAccount,
) -> ApiResult<Json<TokenRequestResponse>> {
    let service = VerificationService::new(state.service_context());
    let response = service.resend_email_verification(auth.account_id).await?;
    Ok(Json(response))
}

/// POST /accounts/@me/email/confirm
pub async fn confirm_email(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiJson(request): ApiJson<ConfirmEmailRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let service = VerificationService::new(state.service_context());
    let response = service.confirm_email(auth.account_id, request).await?;
    Ok(Json(response))
}

/// Record a phone number awaiting verification
///
/// POST /accounts/@me/phone
pub async fn request_phone_change(
    State(state): State<AppState>,
    auth: AuthAccount,
    ValidatedJson(request): ValidatedJson<ChangePhoneRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let service = VerificationService::new(state.service_context());
    let response = service.request_phone_change(auth.account_id, request).await?;
    Ok(Json(response))
}
