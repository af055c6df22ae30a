use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppError;
use crate::repos::{CredentialRecord, CredentialStore};
use crate::services::auth::password::PasswordHasher;
use crate::services::auth::role;
use crate::services::auth::token_codec::TokenCodec;

/// Input for `register`. `role` is the raw requested role, normalized here.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Service-level return type to keep handlers thin.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub username: String,
    pub role: String,
}

/// Orchestrates the two identity-changing operations: login and register.
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenCodec>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("credentials", &self.credentials.backend_name())
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenCodec>,
    ) -> Self {
        Self {
            credentials,
            hasher,
            tokens,
        }
    }

    /// Authenticate and issue a token.
    ///
    /// Unknown username and wrong password both fail with `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let Some(record) = self.credentials.find_by_username(username).await? else {
            warn!(username = %username, reason = "unknown_user", "login failed");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &record.password_hash).await? {
            warn!(username = %username, reason = "bad_password", "login failed");
            return Err(AppError::InvalidCredentials);
        }

        // Records written before normalization existed may hold a bare role.
        let role = role::normalize(Some(&record.role));
        let token = self.tokens.issue(&record.username, &role)?;

        info!(username = %record.username, role = %role, "login succeeded");

        Ok(AuthOutcome {
            token,
            username: record.username,
            role,
        })
    }

    /// Create a credential record and issue a token for it.
    ///
    /// Both uniqueness checks run before anything is written.
    pub async fn register(&self, reg: Registration) -> Result<AuthOutcome, AppError> {
        if self.credentials.exists_by_username(&reg.username).await? {
            warn!(username = %reg.username, "registration rejected: username taken");
            return Err(AppError::DuplicateUsername);
        }
        if self.credentials.exists_by_email(&reg.email).await? {
            warn!(username = %reg.username, "registration rejected: email in use");
            return Err(AppError::DuplicateEmail);
        }

        let role = role::normalize(reg.role.as_deref());
        let password_hash = self.hasher.hash(&reg.password).await?;

        let saved = self
            .credentials
            .save(CredentialRecord {
                username: reg.username,
                email: reg.email,
                password_hash,
                role,
            })
            .await
            .inspect_err(|e| warn!(error = %e, "registration rejected at save"))?;

        let token = self.tokens.issue(&saved.username, &saved.role)?;

        info!(username = %saved.username, role = %saved.role, "user registered");

        Ok(AuthOutcome {
            token,
            username: saved.username,
            role: saved.role,
        })
    }
}
