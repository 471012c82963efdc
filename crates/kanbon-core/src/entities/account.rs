//! Account entity - the user identity with credentials, verification and ban state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::events::AddressClaimedEvent;
use crate::value_objects::{AddressKind, Snowflake, TokenPolicy};

/// Highest role tier; assigned to superusers
pub const SUPERUSER_UTYPE: i32 = 9;

/// Role tier given to self-registered accounts
pub const DEFAULT_UTYPE: i32 = 1;

/// Role tiers at or above this value are administrators
pub const ADMIN_UTYPE_THRESHOLD: i32 = 7;

/// Maximum length of the account handle
pub const USERNAME_MAX_LEN: usize = 40;

/// Email verification progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailState {
    /// The primary address has never been verified
    Unverified,
    /// Verified at least once, nothing pending
    Verified,
    /// Verified at least once, `address` awaits verification
    PendingChange { address: String },
}

/// Whether the account may sign in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Banned { reason: i32 },
}

/// Contact and postal details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<serde_json::Value>,
    pub street_1: Option<String>,
    pub street_2: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Account entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Snowflake,
    pub username: String,
    pub utype: i32,
    pub default_superuser: bool,

    pub email_address: Option<String>,
    pub email_state: EmailState,
    pub email_token_hash: Option<String>,
    pub email_token_created: Option<DateTime<Utc>>,

    pub phone_number: Option<String>,
    pub pending_phone_number: Option<String>,
    pub last_phone_request: Option<DateTime<Utc>>,

    pub password_reset_token_hash: Option<String>,
    pub password_reset_token_created: Option<DateTime<Utc>>,

    pub status: AccountStatus,
    pub profile: Profile,

    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_logout_all: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new, active, unverified account.
    ///
    /// A random UUID handle is generated when `username` is absent.
    pub fn new(
        id: Snowflake,
        username: Option<String>,
        email_address: Option<String>,
        utype: i32,
    ) -> Result<Self, DomainError> {
        let username = match username.map(|u| u.trim().to_string()) {
            Some(u) if !u.is_empty() => u,
            _ => uuid::Uuid::new_v4().to_string(),
        };
        if username.chars().count() > USERNAME_MAX_LEN {
            return Err(DomainError::InvalidUsername(format!(
                "must be at most {USERNAME_MAX_LEN} characters"
            )));
        }

        Ok(Self {
            id,
            username,
            utype,
            default_superuser: false,
            email_address,
            email_state: EmailState::Unverified,
            email_token_hash: None,
            email_token_created: None,
            phone_number: None,
            pending_phone_number: None,
            last_phone_request: None,
            password_reset_token_hash: None,
            password_reset_token_created: None,
            status: AccountStatus::Active,
            profile: Profile::default(),
            created_at: Utc::now(),
            last_login: None,
            last_logout_all: None,
        })
    }

    /// Derived from the role tier, never stored independently
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.utype >= ADMIN_UTYPE_THRESHOLD
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.status, AccountStatus::Active)
    }

    /// Ban reason code; always 0 for active accounts
    pub fn ban_reason(&self) -> i32 {
        match self.status {
            AccountStatus::Active => 0,
            AccountStatus::Banned { reason } => reason,
        }
    }

    /// True once the first verification has completed
    pub fn email_verified(&self) -> bool {
        !matches!(self.email_state, EmailState::Unverified)
    }

    pub fn pending_email(&self) -> Option<&str> {
        match &self.email_state {
            EmailState::PendingChange { address } => Some(address),
            _ => None,
        }
    }

    /// Address a verification token would currently confirm
    pub fn email_awaiting_verification(&self) -> Option<&str> {
        match &self.email_state {
            EmailState::Unverified => self.email_address.as_deref(),
            EmailState::Verified => None,
            EmailState::PendingChange { address } => Some(address),
        }
    }

    // =========================================================================
    // Email verification
    // =========================================================================

    pub fn seconds_until_next_email_request(&self, now: DateTime<Utc>) -> i64 {
        TokenPolicy::EMAIL_VERIFICATION.seconds_until_next_request(self.email_token_created, now)
    }

    pub fn email_token_valid(&self, now: DateTime<Utc>) -> bool {
        self.email_token_hash.is_some()
            && TokenPolicy::EMAIL_VERIFICATION.token_valid(self.email_token_created, now)
    }

    /// Store a freshly issued verification token hash, subject to the throttle
    pub fn issue_email_token(
        &mut self,
        token_hash: String,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let retry_after = self.seconds_until_next_email_request(now);
        if retry_after > 0 {
            return Err(DomainError::RequestThrottled { retry_after });
        }
        self.email_token_hash = Some(token_hash);
        self.email_token_created = Some(now);
        Ok(())
    }

    /// Point the account at a new email address awaiting verification.
    ///
    /// Before the first verification the primary address is replaced in place;
    /// afterwards the address becomes pending and the primary stays untouched.
    pub fn request_email_change(&mut self, address: String) {
        match self.email_state {
            EmailState::Unverified => self.email_address = Some(address),
            EmailState::Verified | EmailState::PendingChange { .. } => {
                self.email_state = EmailState::PendingChange { address };
            }
        }
    }

    /// Complete email verification.
    ///
    /// The first verification confirms the primary address in place. Later
    /// verifications promote the pending address and fail without one.
    /// Returns the claim to broadcast when the account now holds a primary
    /// address.
    pub fn verify_email(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Option<AddressClaimedEvent>, DomainError> {
        match std::mem::replace(&mut self.email_state, EmailState::Verified) {
            EmailState::Unverified => {}
            EmailState::Verified => {
                return Err(DomainError::MissingPendingAddress(AddressKind::Email));
            }
            EmailState::PendingChange { address } => self.email_address = Some(address),
        }
        self.email_token_hash = None;

        Ok(self
            .email_address
            .clone()
            .map(|address| AddressClaimedEvent::new(AddressKind::Email, address, self.id, now)))
    }

    // =========================================================================
    // Phone verification
    // =========================================================================

    pub fn request_phone_change(&mut self, number: String, now: DateTime<Utc>) {
        self.pending_phone_number = Some(number);
        self.last_phone_request = Some(now);
    }

    pub fn verify_phone(&mut self, now: DateTime<Utc>) -> Result<AddressClaimedEvent, DomainError> {
        let number = self
            .pending_phone_number
            .take()
            .ok_or(DomainError::MissingPendingAddress(AddressKind::Phone))?;
        self.phone_number = Some(number.clone());
        Ok(AddressClaimedEvent::new(AddressKind::Phone, number, self.id, now))
    }

    // =========================================================================
    // Password reset
    // =========================================================================

    /// Only an outstanding token throttles; a consumed one frees the slot
    pub fn seconds_until_next_password_reset(&self, now: DateTime<Utc>) -> i64 {
        if self.password_reset_token_hash.is_none() {
            return 0;
        }
        TokenPolicy::PASSWORD_RESET.seconds_until_next_request(self.password_reset_token_created, now)
    }

    pub fn reset_token_valid(&self, now: DateTime<Utc>) -> bool {
        self.password_reset_token_hash.is_some()
            && TokenPolicy::PASSWORD_RESET.token_valid(self.password_reset_token_created, now)
    }

    pub fn issue_password_reset_token(
        &mut self,
        token_hash: String,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let retry_after = self.seconds_until_next_password_reset(now);
        if retry_after > 0 {
            return Err(DomainError::RequestThrottled { retry_after });
        }
        self.password_reset_token_hash = Some(token_hash);
        self.password_reset_token_created = Some(now);
        Ok(())
    }

    pub fn clear_password_reset_token(&mut self) {
        self.password_reset_token_hash = None;
    }

    // =========================================================================
    // Status and sessions
    // =========================================================================

    pub fn deactivate(&mut self, reason: i32) {
        self.status = AccountStatus::Banned { reason };
    }

    pub fn reactivate(&mut self) {
        self.status = AccountStatus::Active;
    }

    /// Reject sign-in for banned accounts
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        match self.status {
            AccountStatus::Active => Ok(()),
            AccountStatus::Banned { reason } => Err(DomainError::AccountBanned { reason }),
        }
    }

    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login = Some(now);
    }

    pub fn logout_everywhere(&mut self, now: DateTime<Utc>) {
        self.last_logout_all = Some(now);
    }

    /// Whether a session token issued at `issued_at` survived "log out everywhere".
    ///
    /// Compared at whole-second resolution, matching JWT `iat`.
    pub fn session_valid(&self, issued_at: DateTime<Utc>) -> bool {
        self.last_logout_all
            .map_or(true, |cutoff| issued_at.timestamp() >= cutoff.timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn account(email: &str) -> Account {
        Account::new(Snowflake::new(1), None, Some(email.to_string()), DEFAULT_UTYPE).unwrap()
    }

    #[test]
    fn test_generates_username_when_absent() {
        let a = account("a@ex.com");
        assert_eq!(a.username.len(), 36);
        assert!(Account::new(Snowflake::new(2), Some("x".repeat(41)), None, 1).is_err());
        let named = Account::new(Snowflake::new(3), Some("alice".into()), None, 1).unwrap();
        assert_eq!(named.username, "alice");
    }

    #[test]
    fn test_is_admin_follows_utype() {
        let mut a = account("a@ex.com");
        assert!(!a.is_admin());
        a.utype = ADMIN_UTYPE_THRESHOLD;
        assert!(a.is_admin());
        a.utype = SUPERUSER_UTYPE;
        assert!(a.is_admin());
        a.utype = 6;
        assert!(!a.is_admin());
    }

    #[test]
    fn test_first_verification_needs_no_pending_address() {
        let mut a = account("a@ex.com");
        a.email_token_hash = Some("hash".into());

        let event = a.verify_email(now()).unwrap().unwrap();
        assert!(a.email_verified());
        assert_eq!(a.email_address.as_deref(), Some("a@ex.com"));
        assert!(a.email_token_hash.is_none());
        assert_eq!(event.address, "a@ex.com");
        assert_eq!(event.claimant_id, a.id);
    }

    #[test]
    fn test_second_verification_without_pending_fails_unchanged() {
        let mut a = account("a@ex.com");
        a.verify_email(now()).unwrap();
        a.email_token_hash = Some("hash".into());
        let before = a.clone();

        let err = a.verify_email(now()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingPendingAddress(AddressKind::Email)
        ));
        assert_eq!(a, before);
    }

    #[test]
    fn test_pending_address_is_promoted() {
        let mut a = account("y@ex.com");
        a.verify_email(now()).unwrap();
        a.request_email_change("x@ex.com".into());
        assert_eq!(a.pending_email(), Some("x@ex.com"));
        assert_eq!(a.email_address.as_deref(), Some("y@ex.com"));

        let event = a.verify_email(now()).unwrap().unwrap();
        assert_eq!(a.email_address.as_deref(), Some("x@ex.com"));
        assert_eq!(a.email_state, EmailState::Verified);
        assert_eq!(event.kind, AddressKind::Email);
        assert_eq!(event.address, "x@ex.com");
    }

    #[test]
    fn test_email_change_before_first_verification_replaces_primary() {
        let mut a = account("old@ex.com");
        a.request_email_change("new@ex.com".into());
        assert_eq!(a.email_address.as_deref(), Some("new@ex.com"));
        assert_eq!(a.email_state, EmailState::Unverified);
        assert_eq!(a.email_awaiting_verification(), Some("new@ex.com"));
    }

    #[test]
    fn test_email_token_throttle() {
        let mut a = account("a@ex.com");
        a.issue_email_token("h1".into(), now()).unwrap();

        let err = a
            .issue_email_token("h2".into(), now() + Duration::minutes(4))
            .unwrap_err();
        assert_eq!(err.retry_after(), Some(360));

        a.issue_email_token("h3".into(), now() + Duration::minutes(10))
            .unwrap();
        assert_eq!(a.email_token_hash.as_deref(), Some("h3"));
        assert!(a.email_token_valid(now() + Duration::minutes(25)));
        assert!(!a.email_token_valid(now() + Duration::minutes(26)));
    }

    #[test]
    fn test_verify_phone() {
        let mut a = account("a@ex.com");
        assert!(matches!(
            a.verify_phone(now()),
            Err(DomainError::MissingPendingAddress(AddressKind::Phone))
        ));

        a.request_phone_change("+4912345".into(), now());
        let event = a.verify_phone(now()).unwrap();
        assert_eq!(a.phone_number.as_deref(), Some("+4912345"));
        assert!(a.pending_phone_number.is_none());
        assert_eq!(event.kind, AddressKind::Phone);
        assert_eq!(a.last_phone_request, Some(now()));
    }

    #[test]
    fn test_password_reset_window() {
        let mut a = account("a@ex.com");
        assert!(!a.reset_token_valid(now()));
        a.issue_password_reset_token("h".into(), now()).unwrap();
        assert!(a.reset_token_valid(now() + Duration::minutes(15)));
        assert_eq!(
            a.seconds_until_next_password_reset(now() + Duration::minutes(11)),
            60
        );

        assert!(a
            .issue_password_reset_token("h2".into(), now() + Duration::minutes(1))
            .is_err());

        a.clear_password_reset_token();
        assert!(!a.reset_token_valid(now()));
        assert_eq!(
            a.seconds_until_next_password_reset(now() + Duration::minutes(1)),
            0
        );
        a.issue_password_reset_token("h3".into(), now() + Duration::minutes(1))
            .unwrap();
        assert!(a.reset_token_valid(now() + Duration::minutes(2)));
    }

    #[test]
    fn test_ban_reason_is_zero_when_active() {
        let mut a = account("a@ex.com");
        a.deactivate(3);
        assert!(!a.is_active());
        assert_eq!(a.ban_reason(), 3);
        assert!(matches!(
            a.ensure_active(),
            Err(DomainError::AccountBanned { reason: 3 })
        ));

        a.reactivate();
        assert_eq!(a.ban_reason(), 0);
        assert!(a.ensure_active().is_ok());
    }

    #[test]
    fn test_session_valid_after_logout_everywhere() {
        let mut a = account("a@ex.com");
        assert!(a.session_valid(now() - Duration::days(30)));
        a.logout_everywhere(now());
        assert!(!a.session_valid(now() - Duration::seconds(1)));
        assert!(a.session_valid(now()));
    }
}
