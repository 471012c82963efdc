//! API Integration Tests
//!
//! These tests require a running PostgreSQL instance named by `DATABASE_URL`;
//! they are skipped when it is unset.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use integration_tests::*;
use kanbon_core::NodeType;
use reqwest::StatusCode;
use serde_json::json;

async fn register(server: &TestServer) -> (RegisterRequest, AuthResponse) {
    let request = RegisterRequest::unique();
    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let auth = assert_json(response, StatusCode::CREATED).await.unwrap();
    (request, auth)
}

async fn create_form(server: &TestServer, token: &str, org: &str, name: &str) -> FormResponse {
    let response = server
        .post_auth(
            &format!("/api/v1/organizations/{org}/forms"),
            token,
            &json!({ "form_input": { "name": name } }),
        )
        .await
        .unwrap();
    let payload: FormPayload = assert_json(response, StatusCode::CREATED).await.unwrap();
    payload.form.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["database"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_login() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register(&server).await;
    assert!(!auth.access_token.is_empty());
    assert_eq!(auth.token_type, "Bearer");
    assert!(auth.account.is_active);
    assert!(!auth.account.email_verified);

    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let login: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(login.account.id, auth.account.id);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (mut request, _) = register(&server).await;

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ACCOUNT_ALREADY_REGISTERED");

    // Same address, different password
    request.password = "OtherPass456".to_string();
    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "EMAIL_ADDRESS_TAKEN");
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.password = "alllowercase1".to_string();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "WEAK_PASSWORD");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login_req = LoginRequest {
        email: unique_email(),
        password: "WrongPass123".to_string(),
    };

    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_refresh_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let response = server
        .post(
            "/api/v1/auth/refresh",
            &json!({ "refresh_token": auth.refresh_token }),
        )
        .await
        .unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(refreshed.account.id, auth.account.id);

    // An access token is not a refresh token
    let response = server
        .post(
            "/api/v1/auth/refresh",
            &json!({ "refresh_token": auth.access_token }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_all_revokes_existing_tokens() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register(&server).await;

    // Revocation compares whole seconds
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let response = server
        .post_auth("/api/v1/auth/logout-all", &auth.access_token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth("/api/v1/accounts/@me", &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let login: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let response = server
        .get_auth("/api/v1/accounts/@me", &login.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_password_reset_for_unknown_email_succeeds() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/api/v1/auth/password-reset", &json!({ "email": unique_email() }))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_current_account_requires_auth() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/accounts/@me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");

    let response = server
        .get_auth("/api/v1/accounts/@me", "not-a-jwt")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_update_profile() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let response = server
        .patch_auth(
            "/api/v1/accounts/@me",
            &auth.access_token,
            &json!({ "city": "Berlin", "country": "DE" }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["profile"]["city"], "Berlin");
    assert_eq!(body["profile"]["first_name"], "Test");
}

#[tokio::test]
async fn test_email_change_is_throttled() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    // Registration already issued a token, so the change request waits
    let new_email = unique_email();
    let response = server
        .post_auth(
            "/api/v1/accounts/@me/email",
            &auth.access_token,
            &json!({ "email": new_email }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "REQUEST_THROTTLED");
    assert!(body["error"]["details"]["retry_after"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_phone_change_is_pending() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let response = server
        .post_auth(
            "/api/v1/accounts/@me/phone",
            &auth.access_token,
            &json!({ "phone_number": "+491701234567" }),
        )
        .await
        .unwrap();
    let account: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(account.pending_phone_number.as_deref(), Some("+491701234567"));
    assert_eq!(account.phone_number, None);
}

#[tokio::test]
async fn test_inbox_starts_empty() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let response = server
        .get_auth("/api/v1/accounts/@me/messages", &auth.access_token)
        .await
        .unwrap();
    let messages: Vec<SystemMessageResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert!(messages.is_empty());
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_operations() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start_with_superuser()
        .await
        .expect("Failed to start server");
    let response = server
        .post(
            "/api/v1/auth/login",
            &json!({ "email": SUPERUSER_EMAIL, "password": SUPERUSER_PASSWORD }),
        )
        .await
        .unwrap();
    let admin: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(admin.account.is_admin);

    let (user_request, user) = register(&server).await;
    let user_id = &user.account.id;

    // Regular accounts are not administrators
    let response = server
        .post_auth(
            &format!("/api/v1/admin/accounts/{}/reactivate", admin.account.id),
            &user.access_token,
            &json!({}),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ADMIN_REQUIRED");

    // Custom message into the user's inbox
    let response = server
        .post_auth(
            &format!("/api/v1/admin/accounts/{user_id}/messages"),
            &admin.access_token,
            &json!({ "message": { "en": "Welcome aboard" } }),
        )
        .await
        .unwrap();
    let message: SystemMessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(!message.read);

    let response = server
        .post_auth(
            &format!("/api/v1/accounts/@me/messages/{}/read", message.id),
            &user.access_token,
            &json!({}),
        )
        .await
        .unwrap();
    let read: SystemMessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(read.read);
    assert!(read.read_at.is_some());

    // Ban, then the password still checks out but login is refused
    let response = server
        .post_auth(
            &format!("/api/v1/admin/accounts/{user_id}/deactivate"),
            &admin.access_token,
            &json!({ "reason": 2 }),
        )
        .await
        .unwrap();
    let banned: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!banned.is_active);
    assert_eq!(banned.ban_reason, 2);

    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_register(&user_request))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ACCOUNT_BANNED");

    let response = server
        .post_auth(
            &format!("/api/v1/admin/accounts/{user_id}/reactivate"),
            &admin.access_token,
            &json!({}),
        )
        .await
        .unwrap();
    let active: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(active.is_active);
}

// ============================================================================
// Form Tests
// ============================================================================

#[tokio::test]
async fn test_form_lifecycle() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, admin) = register(&server).await;
    let (_, member) = register(&server).await;
    let org = server
        .seed_organization(&admin.account.id, &[member.account.id.as_str()])
        .await
        .unwrap();

    let form = create_form(&server, &admin.access_token, &org, "Intake").await;
    assert_eq!(form.status, "ACTIVE");
    assert_eq!(form.organization_id, org);

    // Names are unique among live forms
    let response = server
        .post_auth(
            &format!("/api/v1/organizations/{org}/forms"),
            &admin.access_token,
            &json!({ "form_input": { "name": "Intake" } }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "FORM_NAME_EXISTS");

    // Members read, only admins write
    let response = server
        .get_auth(
            &format!("/api/v1/organizations/{org}/forms"),
            &member.access_token,
        )
        .await
        .unwrap();
    let forms: Vec<FormResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(forms.len(), 1);

    let response = server
        .post_auth(
            &format!("/api/v1/organizations/{org}/forms"),
            &member.access_token,
            &json!({ "form_input": { "name": "Other" } }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_ORGANIZATION_ADMIN");

    let form_url = format!("/api/v1/organizations/{org}/forms/{}", form.id);
    let response = server
        .patch_auth(&form_url, &admin.access_token, &json!({}))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "NO_INPUT");

    let response = server
        .patch_auth(
            &form_url,
            &admin.access_token,
            &json!({ "form_input": { "status": "INACTIVE", "description": "Walk-ins" } }),
        )
        .await
        .unwrap();
    let payload: FormPayload = assert_json(response, StatusCode::OK).await.unwrap();
    let updated = payload.form.unwrap();
    assert_eq!(updated.status, "INACTIVE");
    assert_eq!(updated.description.as_deref(), Some("Walk-ins"));

    let response = server
        .patch_auth(&form_url, &admin.access_token, &json!({ "delete": true }))
        .await
        .unwrap();
    let payload: FormPayload = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(payload.form.is_none());

    let response = server.get_auth(&form_url, &member.access_token).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "FORM_DOES_NOT_EXIST");

    // The name is free again
    create_form(&server, &admin.access_token, &org, "Intake").await;
}

#[tokio::test]
async fn test_forms_reject_foreign_and_malformed_ids() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, admin) = register(&server).await;
    let (_, outsider) = register(&server).await;
    let org = server.seed_organization(&admin.account.id, &[]).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/organizations/{org}/forms"),
            &outsider.access_token,
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_ORGANIZATION_MEMBER");

    // A form id where an organization id belongs
    let wrong = global_id(NodeType::KanbonForm, 1);
    let response = server
        .get_auth(
            &format!("/api/v1/organizations/{wrong}/forms"),
            &admin.access_token,
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_GLOBAL_ID");
}

// ============================================================================
// Field Tests
// ============================================================================

#[tokio::test]
async fn test_field_lifecycle() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, admin) = register(&server).await;
    let org = server.seed_organization(&admin.account.id, &[]).await.unwrap();
    let form = create_form(&server, &admin.access_token, &org, "Survey").await;
    let fields_url = format!("/api/v1/organizations/{org}/forms/{}/fields", form.id);

    let response = server
        .post_auth(
            &fields_url,
            &admin.access_token,
            &json!({ "field_input": { "title": "Name", "field_type": "TEXT", "is_required": true } }),
        )
        .await
        .unwrap();
    let payload: FieldPayload = assert_json(response, StatusCode::CREATED).await.unwrap();
    let name = payload.field.unwrap();
    assert!(name.is_required);
    assert_eq!(name.form_id, form.id);

    let response = server
        .post_auth(
            &fields_url,
            &admin.access_token,
            &json!({
                "field_input": { "title": "Nickname" },
                "conditions": [{ "compare_to": name.id, "operator": "NOT_EMPTY" }]
            }),
        )
        .await
        .unwrap();
    let payload: FieldPayload = assert_json(response, StatusCode::CREATED).await.unwrap();
    let nickname = payload.field.unwrap();
    assert_eq!(nickname.conditions.len(), 1);
    assert_eq!(nickname.conditions[0].compare_to.as_deref(), Some(name.id.as_str()));
    assert_eq!(nickname.conditions[0].operator.as_deref(), Some("NOT_EMPTY"));

    let field_url = format!("/api/v1/organizations/{org}/fields/{}", nickname.id);
    let response = server
        .patch_auth(
            &field_url,
            &admin.access_token,
            &json!({ "field_input": { "title": "Alias", "is_required": true } }),
        )
        .await
        .unwrap();
    let payload: FieldPayload = assert_json(response, StatusCode::OK).await.unwrap();
    let updated = payload.field.unwrap();
    assert_eq!(updated.title.as_deref(), Some("Alias"));
    assert!(updated.is_required);

    let response = server
        .patch_auth(&field_url, &admin.access_token, &json!({ "delete": true }))
        .await
        .unwrap();
    let payload: FieldPayload = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(payload.field.is_none());

    let response = server
        .get_auth(
            &format!("/api/v1/organizations/{org}/forms/{}", form.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let form: FormResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let fields = form.fields.unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].id, name.id);
}
