//! Credential store interface used by the login/register flows.
use async_trait::async_trait;

use crate::repos::error::RepoResult;

/// A persisted user identity.
///
/// `password_hash` is a bcrypt hash; the plaintext never reaches this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Lookup and persistence of credential records.
///
/// `username` and `email` are each unique. `save` must reject a record that
/// would violate either with `RepoError::UniqueViolation`, even if the caller
/// already checked `exists_by_*` (two registrations can race).
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    // Backend name for logging.
    fn backend_name(&self) -> &'static str;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<CredentialRecord>>;

    async fn exists_by_username(&self, username: &str) -> RepoResult<bool>;

    async fn exists_by_email(&self, email: &str) -> RepoResult<bool>;

    async fn save(&self, record: CredentialRecord) -> RepoResult<CredentialRecord>;
}
