pub mod credential_store;
pub mod error;
pub mod memory_user_repo;
pub mod user_repo;

pub use credential_store::{CredentialRecord, CredentialStore};
pub use memory_user_repo::InMemoryCredentialStore;
pub use user_repo::PgCredentialStore;
