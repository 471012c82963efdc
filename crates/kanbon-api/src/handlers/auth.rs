//! Authentication handlers
//!
//! Registration, login, token refresh, logout everywhere and password reset.

use axum::{extract::State, Json};
use kanbon_service::dto::{
    AuthResponse, LoginRequest, PasswordResetRequest, RefreshTokenRequest, RegisterRequest,
    ResetPasswordRequest,
};
use kanbon_service::{AuthService, VerificationService};

use crate::extractors::{ApiJson, AuthAccount, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new pair
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(response))
}

/// Invalidate every token issued so far
///
/// POST /auth/logout-all
pub async fn logout_all(State(state): State<AppState>, auth: AuthAccount) -> ApiResult<NoContent> {
    AuthService::new(state.service_context())
        .logout_all(auth.account_id)
        .await?;
    Ok(NoContent)
}

/// Mail a password reset token; unknown addresses get the same answer
///
/// POST /auth/password-reset
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PasswordResetRequest>,
) -> ApiResult<NoContent> {
    VerificationService::new(state.service_context())
        .request_password_reset(request)
        .await?;
    Ok(NoContent)
}

/// POST /auth/password-reset/confirm
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<NoContent> {
    VerificationService::new(state.service_context())
        .reset_password(request)
        .await?;
    Ok(NoContent)
}
