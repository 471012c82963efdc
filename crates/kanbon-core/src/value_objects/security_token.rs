//! Time-windowed security tokens
//!
//! Password-reset and email-verification tokens share two rules: a token is
//! only honoured for a fixed period after issuance, and a fresh token may only
//! be requested once a minimum interval has passed since the previous one.
//! Both checks take `now` explicitly so callers control the clock.

use chrono::{DateTime, Duration, Utc};

/// Expiration and anti-spam interval for one token flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    expiration_secs: i64,
    min_interval_secs: i64,
}

impl TokenPolicy {
    /// Password reset: valid 15 minutes, one request per 12 minutes
    pub const PASSWORD_RESET: Self = Self::from_minutes(15, 12);

    /// Email verification: valid 15 minutes, one request per 10 minutes
    pub const EMAIL_VERIFICATION: Self = Self::from_minutes(15, 10);

    const fn from_minutes(expiration: i64, min_interval: i64) -> Self {
        Self {
            expiration_secs: expiration * 60,
            min_interval_secs: min_interval * 60,
        }
    }

    pub fn expiration(&self) -> Duration {
        Duration::seconds(self.expiration_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::seconds(self.min_interval_secs)
    }

    /// Seconds until another token may be issued under this policy
    pub fn seconds_until_next_request(
        &self,
        last_issued_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> i64 {
        seconds_until_next_request(last_issued_at, self.min_interval(), now)
    }

    /// Whether a token issued at `issued_at` is still honoured
    pub fn token_valid(&self, issued_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        token_valid(issued_at, self.expiration(), now)
    }
}

/// Whole seconds left before another request is permitted.
///
/// Returns 0 when nothing was issued yet or the interval has elapsed; a
/// return of 0 means "permitted now". Fractional seconds are dropped.
pub fn seconds_until_next_request(
    last_issued_at: Option<DateTime<Utc>>,
    min_interval: Duration,
    now: DateTime<Utc>,
) -> i64 {
    let Some(issued) = last_issued_at else {
        return 0;
    };

    let remaining = issued + min_interval - now;
    if remaining <= Duration::zero() {
        0
    } else {
        remaining.num_seconds()
    }
}

/// A token is valid up to and including `issued_at + max_age`.
pub fn token_valid(
    issued_at: Option<DateTime<Utc>>,
    max_age: Duration,
    now: DateTime<Utc>,
) -> bool {
    issued_at.is_some_and(|issued| issued + max_age >= now)
}

/// Generate a random one-time token (32 alphanumeric characters)
pub fn generate_token() -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 32;

    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
