/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::repos::{CredentialStore, InMemoryCredentialStore, PgCredentialStore};
use crate::services::auth::{AuthService, PasswordHasher, TokenCodec};

pub fn build_token_codec(config: &Config) -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(
        config.jwt_secret.as_bytes(),
        config.jwt_ttl_seconds,
    ))
}

pub async fn build_credential_store(
    config: &Config,
) -> Result<Arc<dyn CredentialStore>, AppError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PgCredentialStore::connect(url).await.map_err(|e| {
                tracing::error!(error = %e, "failed to connect to credential database");
                AppError::Internal
            })?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory credential store");
            Ok(Arc::new(InMemoryCredentialStore::new()))
        }
    }
}

pub fn build_auth_service(
    config: &Config,
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<TokenCodec>,
) -> Arc<AuthService> {
    Arc::new(AuthService::new(
        credentials,
        PasswordHasher::new(config.bcrypt_cost),
        tokens,
    ))
}
