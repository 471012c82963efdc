//! System message handlers
//!
//! The caller's inbox of server-generated notices.

use axum::{extract::State, Json};
use kanbon_service::dto::SystemMessageResponse;
use kanbon_service::SystemMessageService;

use crate::extractors::{ApiPath, AuthAccount, MessageIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /accounts/@me/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthAccount,
) -> ApiResult<Json<Vec<SystemMessageResponse>>> {
    let service = SystemMessageService::new(state.service_context());
    let response = service.list(auth.account_id).await?;
    Ok(Json(response))
}

/// POST /accounts/@me/messages/:message_id/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthAccount,
    ApiPath(path): ApiPath<MessageIdPath>,
) -> ApiResult<Json<SystemMessageResponse>> {
    let message_id = path.message_id()?;
    let service = SystemMessageService::new(state.service_context());
    let response = service.mark_read(auth.account_id, message_id).await?;
    Ok(Json(response))
}
