/*
 * Responsibility
 * - users テーブル向け SQLx 操作 (CredentialStore の Postgres 実装)
 * - PgPool を受け取り lookup / 存在確認 / 保存を提供
 * - connect 時に migrations/ を適用 (users テーブルを用意)
 * - unique 制約違反は RepoError::UniqueViolation に変換
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::credential_store::{CredentialRecord, CredentialStore};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl From<UserRow> for CredentialRecord {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> RepoResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<CredentialRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT username, email, password_hash, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CredentialRecord::from))
    }

    async fn exists_by_username(&self, username: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn save(&self, record: CredentialRecord) -> RepoResult<CredentialRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING username, email, password_hash, role
            "#,
        )
        .bind(&record.username)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.role)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.into())
    }
}
