//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{AddressKind, Snowflake};

/// Which of the two duplicate-registration outcomes applies
///
/// Both are terminal for the caller; the distinction only selects the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateAccountKind {
    /// The supplied password matches the existing account
    AlreadyRegistered,
    /// The address belongs to a different identity
    AddressTaken,
}

/// Domain layer errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(Snowflake),

    #[error("Organization not found: {0}")]
    OrganizationNotFound(Snowflake),

    #[error("Form with given ID does not exist in given organization.")]
    FormNotFound,

    #[error("Field with given ID does not exist in given organization.")]
    FieldNotFound,

    #[error("System message not found: {0}")]
    SystemMessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Form name is required to create a form.")]
    FormNameRequired,

    #[error("Organization is required.")]
    OrganizationRequired,

    #[error("Invalid form status: {0}")]
    InvalidFormStatus(String),

    #[error("No input provided.")]
    NoInput,

    #[error("Invalid global id: {0}")]
    InvalidGlobalId(String),

    #[error("No temporary {0} to verify.")]
    MissingPendingAddress(AddressKind),

    #[error("A system message needs either a template code or a message.")]
    MissingMessageContent,

    #[error("Unknown system message template: {0}")]
    UnknownTemplate(i32),

    #[error("Template for locale '{locale}' takes {expected} argument(s), got {given}")]
    TemplateArgumentMismatch {
        locale: String,
        expected: usize,
        given: usize,
    },

    #[error("Token is invalid or has expired")]
    InvalidToken,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Organization admin membership required")]
    NotOrganizationAdmin,

    #[error("Not a member of this organization")]
    NotOrganizationMember,

    #[error("Administrator privileges required")]
    AdminRequired,

    #[error("Account is deactivated (reason {reason})")]
    AccountBanned { reason: i32 },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("{}", duplicate_account_message(.0))]
    DuplicateAccount(DuplicateAccountKind),

    #[error("Username is already taken.")]
    UsernameTaken,

    #[error("Form with the same name already exists.")]
    FormNameExists,

    // =========================================================================
    // Throttling
    // =========================================================================
    #[error("Too many requests, retry in {retry_after} seconds")]
    RequestThrottled { retry_after: i64 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

fn duplicate_account_message(kind: &DuplicateAccountKind) -> &'static str {
    match kind {
        DuplicateAccountKind::AlreadyRegistered => "User already registered. Please log in.",
        DuplicateAccountKind::AddressTaken => {
            "This email address already exists on another account."
        }
    }
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) => "ACCOUNT_DOES_NOT_EXIST",
            Self::OrganizationNotFound(_) => "ORGANIZATION_DOES_NOT_EXIST",
            Self::FormNotFound => "FORM_DOES_NOT_EXIST",
            Self::FieldNotFound => "FIELD_DOES_NOT_EXIST",
            Self::SystemMessageNotFound(_) => "SYSTEM_MESSAGE_DOES_NOT_EXIST",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::FormNameRequired => "FORM_NAME_REQUIRED",
            Self::OrganizationRequired => "ORGANIZATION_REQUIRED",
            Self::InvalidFormStatus(_) => "INVALID_FORM_STATUS",
            Self::NoInput => "NO_INPUT",
            Self::InvalidGlobalId(_) => "INVALID_GLOBAL_ID",
            Self::MissingPendingAddress(_) => "MISSING_PENDING_ADDRESS",
            Self::MissingMessageContent => "MISSING_MESSAGE_CONTENT",
            Self::UnknownTemplate(_) => "UNKNOWN_TEMPLATE",
            Self::TemplateArgumentMismatch { .. } => "TEMPLATE_ARGUMENT_MISMATCH",
            Self::InvalidToken => "INVALID_TOKEN",

            // Authorization
            Self::NotOrganizationAdmin => "NOT_ORGANIZATION_ADMIN",
            Self::NotOrganizationMember => "NOT_ORGANIZATION_MEMBER",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::AccountBanned { .. } => "ACCOUNT_BANNED",

            // Conflict
            Self::DuplicateAccount(DuplicateAccountKind::AlreadyRegistered) => {
                "ACCOUNT_ALREADY_REGISTERED"
            }
            Self::DuplicateAccount(DuplicateAccountKind::AddressTaken) => "EMAIL_ADDRESS_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::FormNameExists => "FORM_NAME_EXISTS",

            // Throttling
            Self::RequestThrottled { .. } => "REQUEST_THROTTLED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::OrganizationNotFound(_)
                | Self::FormNotFound
                | Self::FieldNotFound
                | Self::SystemMessageNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::FormNameRequired
                | Self::OrganizationRequired
                | Self::InvalidFormStatus(_)
                | Self::NoInput
                | Self::InvalidGlobalId(_)
                | Self::MissingPendingAddress(_)
                | Self::MissingMessageContent
                | Self::UnknownTemplate(_)
                | Self::TemplateArgumentMismatch { .. }
                | Self::InvalidToken
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotOrganizationAdmin
                | Self::NotOrganizationMember
                | Self::AdminRequired
                | Self::AccountBanned { .. }
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateAccount(_) | Self::UsernameTaken | Self::FormNameExists
        )
    }

    /// Seconds the caller must wait, for throttled requests
    pub fn retry_after(&self) -> Option<i64> {
        match self {
            Self::RequestThrottled { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}
