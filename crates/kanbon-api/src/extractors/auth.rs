//! Authentication extractor
//!
//! Resolves the bearer token to a live session. Tokens of banned accounts,
//! or issued before a logout-everywhere, are rejected like invalid ones.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use kanbon_core::Snowflake;
use kanbon_service::AuthService;
use tracing::debug;

use crate::response::ApiError;
use crate::state::AppState;

/// Account behind the request's access token
#[derive(Debug, Clone, Copy)]
pub struct AuthAccount {
    pub account_id: Snowflake,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let account_id = AuthService::new(app_state.service_context())
            .authenticate(bearer.token())
            .await
            .map_err(|e| {
                debug!(error = %e, "Rejected access token");
                e
            })?;

        Ok(Self { account_id })
    }
}
