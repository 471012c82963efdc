//! Account entity <-> model mapper

use kanbon_core::entities::{Account, AccountStatus, EmailState, Profile};
use kanbon_core::value_objects::Snowflake;

use crate::models::AccountModel;

/// Convert AccountModel to Account entity
impl From<AccountModel> for Account {
    fn from(model: AccountModel) -> Self {
        let email_state = match (model.email_verified, model.tmp_email_address) {
            (false, _) => EmailState::Unverified,
            (true, Some(address)) => EmailState::PendingChange { address },
            (true, None) => EmailState::Verified,
        };
        let status = if model.is_active {
            AccountStatus::Active
        } else {
            AccountStatus::Banned {
                reason: model.ban_reason,
            }
        };

        Account {
            id: Snowflake::new(model.id),
            username: model.username,
            utype: model.utype,
            default_superuser: model.default_superuser,
            email_address: model.email_address,
            email_state,
            email_token_hash: model.email_token,
            email_token_created: model.email_token_created,
            phone_number: model.phone_number,
            pending_phone_number: model.tmp_phone_number,
            last_phone_request: model.last_phone_request,
            password_reset_token_hash: model.password_reset_token,
            password_reset_token_created: model.password_reset_token_created,
            status,
            profile: Profile {
                first_name: model.first_name,
                last_name: model.last_name,
                avatar: model.avatar,
                street_1: model.street_1,
                street_2: model.street_2,
                zip_code: model.zip_code,
                city: model.city,
                country: model.country,
            },
            created_at: model.created_at,
            last_login: model.last_login,
            last_logout_all: model.last_logout_all,
        }
    }
}

/// Column values for writing an account.
///
/// Inserts and updates both go through this struct so the derived columns
/// (`is_admin`, `ban_reason`, `email_verified`) are always computed the same way.
pub struct AccountRow<'a> {
    pub id: i64,
    pub username: &'a str,
    pub utype: i32,
    pub is_admin: bool,
    pub default_superuser: bool,
    pub email_address: Option<&'a str>,
    pub tmp_email_address: Option<&'a str>,
    pub email_verified: bool,
    pub email_token: Option<&'a str>,
    pub email_token_created: Option<chrono::DateTime<chrono::Utc>>,
    pub phone_number: Option<&'a str>,
    pub tmp_phone_number: Option<&'a str>,
    pub last_phone_request: Option<chrono::DateTime<chrono::Utc>>,
    pub password_reset_token: Option<&'a str>,
    pub password_reset_token_created: Option<chrono::DateTime<chrono::Utc>>,
    pub is_active: bool,
    pub ban_reason: i32,
    pub profile: &'a Profile,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub last_logout_all: Option<chrono::DateTime<chrono::Utc>>,
}

impl<'a> AccountRow<'a> {
    pub fn from_entity(account: &'a Account) -> Self {
        Self {
            id: account.id.into_inner(),
            username: &account.username,
            utype: account.utype,
            is_admin: account.is_admin(),
            default_superuser: account.default_superuser,
            email_address: account.email_address.as_deref(),
            tmp_email_address: account.pending_email(),
            email_verified: account.email_verified(),
            email_token: account.email_token_hash.as_deref(),
            email_token_created: account.email_token_created,
            phone_number: account.phone_number.as_deref(),
            tmp_phone_number: account.pending_phone_number.as_deref(),
            last_phone_request: account.last_phone_request,
            password_reset_token: account.password_reset_token_hash.as_deref(),
            password_reset_token_created: account.password_reset_token_created,
            is_active: account.is_active(),
            ban_reason: account.ban_reason(),
            profile: &account.profile,
            created_at: account.created_at,
            last_login: account.last_login,
            last_logout_all: account.last_logout_all,
        }
    }
}
