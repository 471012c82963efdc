//! Data transfer objects for API requests and responses
//!
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AddSystemMessageRequest, ChangeEmailRequest, ChangePhoneRequest, ConditionInput,
    ConfirmEmailRequest, CreateFieldRequest, CreateFormRequest, DeactivateAccountRequest,
    FieldInput, FormInput, LoginRequest, PasswordResetRequest, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest, UpdateFieldRequest, UpdateFormRequest,
    UpdateProfileRequest,
};

pub use responses::{
    AccountResponse, AuthResponse, ConditionResponse, FieldPayload, FieldResponse, FormPayload,
    FormResponse, HealthResponse, ProfileResponse, ReadinessResponse, SystemMessageResponse,
    TokenRequestResponse,
};
