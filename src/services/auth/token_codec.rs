use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::error::AppError;
use crate::services::auth::identity::Identity;

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            // bad segments, wrong alg, missing/mistyped claims
            _ => Self::Malformed,
        }
    }
}

/// Signed claims. `iat`/`exp` are seconds since the Unix epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
///
/// - One symmetric key signs and verifies; it is set at startup and never rotated.
/// - Every token is valid for exactly `ttl_seconds` after issuance, no leeway.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    ttl_seconds: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token valid from now for `ttl_seconds`.
    ///
    /// `role` must already be normalized; it is signed verbatim.
    pub fn issue(&self, subject: &str, role: &str) -> Result<String, AppError> {
        self.issue_at(subject, role, chrono::Utc::now().timestamp())
    }

    pub fn issue_at(&self, subject: &str, role: &str, now: i64) -> Result<String, AppError> {
        let Some(exp) = now.checked_add(self.ttl_seconds) else {
            error!(now, ttl_seconds = self.ttl_seconds, "token expiry overflows");
            return Err(AppError::Internal);
        };

        let claims = TokenClaims {
            sub: subject.to_string(),
            role: role.to_string(),
            iat: now,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }

    /// Verify against the wall clock.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify signature and claim shape, then expiry against `now`.
    ///
    /// Valid while `now <= exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }
        if now > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(Identity::new(claims.sub, claims.role))
    }
}
