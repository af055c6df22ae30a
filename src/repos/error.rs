/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    // `field` is the column whose unique constraint was hit ("username" or "email").
    #[error("unique violation on {field}")]
    UniqueViolation { field: String },
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::UniqueViolation {
                field: unique_field(dbe.constraint()).to_string(),
            };
        }
        RepoError::Db(e)
    }
}

// users_email_key -> email, anything else (users_username_key) -> username
fn unique_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("email") => "email",
        _ => "username",
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
