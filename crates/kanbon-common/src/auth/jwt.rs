//! JWT bearer tokens
//!
//! Access and refresh tokens share one claims shape and are told apart by
//! `token_type`. `iat` is kept so refresh can be refused for tokens issued
//! before an account logged out everywhere.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use kanbon_core::Snowflake;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
}

impl Claims {
    /// # Errors
    /// Returns `AppError::InvalidToken` if the subject is not a Snowflake
    pub fn account_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Access and refresh token returned on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Signs and verifies tokens with a shared HMAC secret
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64, refresh_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    #[must_use]
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            &config.secret,
            config.access_token_expiry,
            config.refresh_token_expiry,
        )
    }

    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_pair(&self, account_id: Snowflake) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.sign(account_id, TokenType::Access, now)?,
            refresh_token: self.sign(account_id, TokenType::Refresh, now)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn sign(
        &self,
        account_id: Snowflake,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let lifetime = match token_type {
            TokenType::Access => self.access_token_expiry,
            TokenType::Refresh => self.refresh_token_expiry,
        };
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(lifetime)).timestamp(),
            token_type,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("failed to sign JWT: {e}")))
    }

    /// Decode a token and require the given type
    ///
    /// # Errors
    /// `TokenExpired` for expired tokens, `InvalidToken` for anything else
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?
            .claims;

        if claims.token_type != expected {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 900, 604_800)
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let jwt = service();
        let pair = jwt.issue_pair(Snowflake::new(12345)).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);

        let access = jwt.verify(&pair.access_token, TokenType::Access).unwrap();
        assert_eq!(access.account_id().unwrap(), Snowflake::new(12345));
        let refresh = jwt.verify(&pair.refresh_token, TokenType::Refresh).unwrap();
        assert_eq!(refresh.exp - refresh.iat, 604_800);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let jwt = service();
        let pair = jwt.issue_pair(Snowflake::new(1)).unwrap();
        assert!(matches!(
            jwt.verify(&pair.refresh_token, TokenType::Access),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            jwt.verify(&pair.access_token, TokenType::Refresh),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_and_foreign_tokens() {
        let expired = JwtService::new("test-secret-key-that-is-long-enough", -3600, -3600);
        let pair = expired.issue_pair(Snowflake::new(1)).unwrap();
        assert!(matches!(
            service().verify(&pair.access_token, TokenType::Access),
            Err(AppError::TokenExpired)
        ));

        let other = JwtService::new("a-completely-different-secret-value", 900, 900);
        let pair = other.issue_pair(Snowflake::new(1)).unwrap();
        assert!(matches!(
            service().verify(&pair.access_token, TokenType::Access),
            Err(AppError::InvalidToken)
        ));
        assert!(service().verify("invalid.token.here", TokenType::Access).is_err());
    }

    #[test]
    fn test_issued_at() {
        let claims = Claims {
            sub: "7".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_000_900,
            token_type: TokenType::Access,
        };
        assert_eq!(claims.issued_at().timestamp(), 1_700_000_000);
    }
}
