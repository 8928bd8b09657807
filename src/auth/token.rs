use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Account ID
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,
}

/// Signs session tokens for authenticated accounts.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::ConfigError("Token signing secret is empty".into()));
        }
        if ttl <= Duration::zero() {
            return Err(AppError::ConfigError("Token TTL must be positive".into()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let ttl = Duration::try_minutes(config.token_ttl_minutes).ok_or_else(|| {
            AppError::ConfigError(format!(
                "Token TTL of {} minutes is out of range",
                config.token_ttl_minutes
            ))
        })?;

        Self::new(config.jwt_secret.as_bytes(), ttl)
    }

    pub fn issue(&self, account_id: i64) -> Result<String, AppError> {
        self.issue_at(account_id, Utc::now())
    }

    pub fn issue_at(&self, account_id: i64, now: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::InternalError("Token expiry overflows the supported time range".into())
        })?;

        let claims = Claims {
            sub: account_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Token signing failed: {}", e)))
    }
}

/// Validates session tokens. Holds no mutable state, so one instance is
/// shared across all workers.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes())
    }

    pub fn verify(&self, token: &str) -> Result<i64, VerificationError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, VerificationError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
                _ => VerificationError::MalformedToken,
            })?
            .claims;

        if claims.exp <= claims.iat {
            return Err(VerificationError::MalformedToken);
        }
        if claims.exp <= now.timestamp() {
            return Err(VerificationError::Expired);
        }

        claims
            .sub
            .parse::<i64>()
            .map_err(|_| VerificationError::MalformedToken)
    }
}
