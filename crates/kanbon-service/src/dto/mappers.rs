//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use kanbon_common::TokenPair;
use kanbon_core::entities::{Account, Condition, Field, Form, Profile, SystemMessage};
use kanbon_core::{GlobalId, NodeType};

use super::responses::{
    AccountResponse, AuthResponse, ConditionResponse, FieldResponse, FormResponse,
    ProfileResponse, SystemMessageResponse,
};

// ============================================================================
// Account Mappers
// ============================================================================

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            avatar: profile.avatar.clone(),
            street_1: profile.street_1.clone(),
            street_2: profile.street_2.clone(),
            zip_code: profile.zip_code.clone(),
            city: profile.city.clone(),
            country: profile.country.clone(),
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.clone(),
            utype: account.utype,
            is_admin: account.is_admin(),
            email_address: account.email_address.clone(),
            email_verified: account.email_verified(),
            pending_email_address: account.pending_email().map(String::from),
            phone_number: account.phone_number.clone(),
            pending_phone_number: account.pending_phone_number.clone(),
            is_active: account.is_active(),
            ban_reason: account.ban_reason(),
            profile: ProfileResponse::from(&account.profile),
            created_at: account.created_at,
            last_login: account.last_login,
        }
    }
}

impl AuthResponse {
    pub fn new(tokens: TokenPair, account: &Account) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            account: AccountResponse::from(account),
        }
    }
}

impl From<&SystemMessage> for SystemMessageResponse {
    fn from(message: &SystemMessage) -> Self {
        Self {
            id: message.id.to_string(),
            code: message.code,
            message: message.message.clone(),
            read: message.read,
            read_at: message.read_at,
            created_at: message.created_at,
        }
    }
}

// ============================================================================
// Form Mappers
// ============================================================================

impl From<&Form> for FormResponse {
    fn from(form: &Form) -> Self {
        Self {
            id: GlobalId::new(NodeType::KanbonForm, form.id).encode(),
            organization_id: form
                .organization_id
                .map(|id| GlobalId::new(NodeType::Organization, id).encode())
                .unwrap_or_default(),
            name: form.name.clone(),
            description: form.description.clone(),
            status: form.status.to_string(),
            field_order: form.field_order.clone(),
            activity_metrics: form.activity_metrics.clone(),
            created_at: form.created_at,
            updated_at: form.updated_at,
            created_by: form.created_by.map(|id| id.to_string()),
            fields: None,
        }
    }
}

impl FormResponse {
    pub fn with_fields(form: &Form, fields: &[Field]) -> Self {
        Self {
            fields: Some(fields.iter().map(FieldResponse::from).collect()),
            ..Self::from(form)
        }
    }
}

impl From<&Condition> for ConditionResponse {
    fn from(condition: &Condition) -> Self {
        Self {
            id: condition.id.to_string(),
            compare_to: condition
                .compare_to
                .map(|id| GlobalId::new(NodeType::KanbonField, id).encode()),
            operator: condition.operator.clone(),
            content: condition.content.clone(),
        }
    }
}

impl From<&Field> for FieldResponse {
    fn from(field: &Field) -> Self {
        Self {
            id: GlobalId::new(NodeType::KanbonField, field.id).encode(),
            form_id: GlobalId::new(NodeType::KanbonForm, field.form_id).encode(),
            title: field.title.clone(),
            help_text: field.help_text.clone(),
            is_required: field.is_required,
            field_type: field.field_type.clone(),
            field_options: field.field_options.clone(),
            client_id: field.client_id.clone(),
            conditions: field.conditions.iter().map(ConditionResponse::from).collect(),
            created_at: field.created_at,
            updated_at: field.updated_at,
        }
    }
}
