//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; the ones with free-form input
//! also implement `Validate`.

use kanbon_core::LocalizedText;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Account registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Generated when absent
    #[validate(length(min = 1, max = 40, message = "Username must be 1-40 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[validate(length(max = 255))]
    pub last_name: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Start a password reset
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Finish a password reset with the delivered token
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,
}

// ============================================================================
// Account Requests
// ============================================================================

/// Profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255))]
    pub first_name: Option<String>,
    #[validate(length(max = 255))]
    pub last_name: Option<String>,
    pub avatar: Option<serde_json::Value>,
    #[validate(length(max = 255))]
    pub street_1: Option<String>,
    #[validate(length(max = 255))]
    pub street_2: Option<String>,
    #[validate(length(max = 255))]
    pub zip_code: Option<String>,
    #[validate(length(max = 255))]
    pub city: Option<String>,
    #[validate(length(max = 255))]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmEmailRequest {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePhoneRequest {
    #[validate(length(min = 3, max = 32, message = "Phone number must be 3-32 characters"))]
    pub phone_number: String,
}

/// Ban an account with a reason code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeactivateAccountRequest {
    #[validate(range(min = 1, message = "Ban reason must be a positive code"))]
    pub reason: i32,
}

/// Either a template `code` or an explicit `message`, plus positional `args`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddSystemMessageRequest {
    pub code: Option<i32>,
    pub message: Option<LocalizedText>,
    #[serde(default)]
    pub args: Vec<String>,
}

// ============================================================================
// Form Requests
// ============================================================================

/// Form attributes; every member is optional so the same shape serves
/// creation and partial updates
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FormInput {
    #[validate(length(max = 255, message = "Form name must be at most 255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub field_order: Option<Vec<String>>,
}

impl FormInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.field_order.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFormRequest {
    #[validate(nested)]
    pub form_input: FormInput,
}

/// Update or soft-delete a form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFormRequest {
    #[validate(nested)]
    pub form_input: Option<FormInput>,
    #[serde(default)]
    pub delete: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FieldInput {
    #[validate(length(max = 255, message = "Field title must be at most 255 characters"))]
    pub title: Option<String>,
    pub help_text: Option<String>,
    pub is_required: Option<bool>,
    #[validate(length(max = 64))]
    pub field_type: Option<String>,
    pub field_options: Option<serde_json::Value>,
}

impl FieldInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.help_text.is_none()
            && self.is_required.is_none()
            && self.field_type.is_none()
            && self.field_options.is_none()
    }
}

/// Stored as given; conditions are not evaluated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionInput {
    /// Global id of the field compared against
    pub compare_to: Option<String>,
    pub operator: Option<String>,
    pub content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFieldRequest {
    #[validate(nested)]
    pub field_input: FieldInput,
    #[validate(length(max = 255))]
    pub client_id: Option<String>,
    #[serde(default)]
    pub conditions: Vec<ConditionInput>,
}

/// Update or soft-delete a field
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFieldRequest {
    #[validate(nested)]
    pub field_input: Option<FieldInput>,
    #[serde(default)]
    pub delete: bool,
}
