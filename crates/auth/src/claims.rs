use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use edudesk_core::{SchoolId, UserId};

use crate::Role;

/// Claim set extracted from a verified long token.
///
/// `role` is kept as the raw claim string: the token is trusted once verified,
/// but whether the role means anything is the evaluator's call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedToken {
    pub user_id: UserId,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<SchoolId>,
}

impl DecodedToken {
    pub fn new(user_id: UserId, role: Role, school_id: Option<SchoolId>) -> Self {
        Self {
            user_id,
            role: role.as_str().to_string(),
            school_id,
        }
    }

    /// The caller's role, if the claim names one.
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn is(&self, role: Role) -> bool {
        self.role() == Some(role)
    }
}

/// On-the-wire JWT payload for long tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTokenClaims {
    pub user_id: UserId,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<SchoolId>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Verifies a raw long token.
///
/// `Ok(None)` means the token decoded but carries no usable identity; callers
/// must treat it exactly like an error.
pub trait TokenVerifier: Send + Sync {
    fn verify_long_token(&self, token: &str) -> Result<Option<DecodedToken>, TokenError>;
}

/// Issues long tokens for authenticated users.
pub trait TokenIssuer: Send + Sync {
    fn issue_long_token(&self, subject: &DecodedToken) -> Result<String, TokenError>;
}

/// HS256 long tokens sharing one secret for signing and verification.
pub struct Hs256LongTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl Hs256LongTokens {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
}

impl core::fmt::Debug for Hs256LongTokens {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256LongTokens")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256LongTokens {
    fn issue_long_token(&self, subject: &DecodedToken) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = LongTokenClaims {
            user_id: subject.user_id,
            role: subject.role.clone(),
            school_id: subject.school_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenVerifier for Hs256LongTokens {
    fn verify_long_token(&self, token: &str) -> Result<Option<DecodedToken>, TokenError> {
        let data = jsonwebtoken::decode::<LongTokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        let claims = data.claims;
        if claims.role.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(DecodedToken {
            user_id: claims.user_id,
            role: claims.role,
            school_id: claims.school_id,
        }))
    }
}
