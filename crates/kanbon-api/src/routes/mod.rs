//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{accounts, admin, auth, fields, forms, health, system_messages};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes, kept out of the rate limiter
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(account_routes())
        .merge(admin_routes())
        .merge(form_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout-all", post(auth::logout_all))
        .route("/auth/password-reset", post(auth::request_password_reset))
        .route("/auth/password-reset/confirm", post(auth::reset_password))
}

/// The caller's own account
fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/@me",
            get(accounts::get_current_account).patch(accounts::update_current_account),
        )
        .route("/accounts/@me/email", post(accounts::request_email_change))
        .route(
            "/accounts/@me/email/resend",
            post(accounts::resend_email_verification),
        )
        .route("/accounts/@me/email/confirm", post(accounts::confirm_email))
        .route("/accounts/@me/phone", post(accounts::request_phone_change))
        .route("/accounts/@me/messages", get(system_messages::list_messages))
        .route(
            "/accounts/@me/messages/:message_id/read",
            post(system_messages::mark_read),
        )
}

/// Administrator operations on other accounts
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/accounts/:account_id/deactivate",
            post(admin::deactivate_account),
        )
        .route(
            "/admin/accounts/:account_id/reactivate",
            post(admin::reactivate_account),
        )
        .route(
            "/admin/accounts/:account_id/phone/verify",
            post(admin::verify_phone),
        )
        .route(
            "/admin/accounts/:account_id/messages",
            post(admin::add_system_message),
        )
}

/// Forms and fields of an organization
fn form_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/:organization_id/forms",
            get(forms::list_forms).post(forms::create_form),
        )
        .route(
            "/organizations/:organization_id/forms/:form_id",
            get(forms::get_form).patch(forms::update_form),
        )
        .route(
            "/organizations/:organization_id/forms/:form_id/fields",
            post(fields::create_field),
        )
        .route(
            "/organizations/:organization_id/fields/:field_id",
            patch(fields::update_field),
        )
}
