//! In-memory `CredentialStore`, used when no database is configured and in tests.
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::credential_store::{CredentialRecord, CredentialStore};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    // keyed by username
    users: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<CredentialRecord>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> RepoResult<bool> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        Ok(self.users.read().await.values().any(|u| u.email == email))
    }

    async fn save(&self, record: CredentialRecord) -> RepoResult<CredentialRecord> {
        // Both uniqueness checks and the insert happen under one write lock.
        let mut users = self.users.write().await;

        if users.contains_key(&record.username) {
            return Err(RepoError::UniqueViolation {
                field: "username".to_string(),
            });
        }
        if users.values().any(|u| u.email == record.email) {
            return Err(RepoError::UniqueViolation {
                field: "email".to_string(),
            });
        }

        users.insert(record.username.clone(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str, email: &str) -> CredentialRecord {
        CredentialRecord {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$not-a-real-hash".to_string(),
            role: "ROLE_USER".to_string(),
        }
    }

    #[tokio::test]
    async fn save_then_lookup() {
        let store = InMemoryCredentialStore::new();
        store.save(record("alice", "alice@x.com")).await.unwrap();

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.email, "alice@x.com");
        assert!(store.exists_by_username("alice").await.unwrap());
        assert!(store.exists_by_email("alice@x.com").await.unwrap());
        assert!(!store.exists_by_username("bob").await.unwrap());
        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_rejects_duplicates_without_overwriting() {
        let store = InMemoryCredentialStore::new();
        store.save(record("alice", "alice@x.com")).await.unwrap();

        let err = store.save(record("alice", "other@x.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::UniqueViolation { ref field } if field == "username"));

        let err = store.save(record("bob", "alice@x.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::UniqueViolation { ref field } if field == "email"));

        assert!(!store.exists_by_username("bob").await.unwrap());
        let alice = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(alice.email, "alice@x.com");
    }
}
