use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::db::timed;
use crate::error::ApiError;
use crate::users::models::{User, UserCredentials, UserProfile};

/// Storage contract for users; no caching, every call hits the store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user whose password is already hashed
    async fn create(&self, profile: &UserProfile, password_hash: &str) -> Result<User, ApiError>;

    async fn get_by_id(&self, id: Uuid) -> Result<User, ApiError>;

    /// Id and password hash for a login attempt
    async fn search_by_email(&self, email: &str) -> Result<UserCredentials, ApiError>;

    async fn search_password(&self, id: Uuid) -> Result<String, ApiError>;

    /// Overwrite name, nick and email; the password is untouched
    async fn update(&self, id: Uuid, profile: &UserProfile) -> Result<(), ApiError>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError>;

    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// PostgreSQL implementation of [`UserRepository`]
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    fn require_row(affected: u64, id: Uuid) -> Result<(), ApiError> {
        if affected == 0 {
            return Err(ApiError::not_found("User", id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, profile: &UserProfile, password_hash: &str) -> Result<User, ApiError> {
        let query = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, nick, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, nick, email, created_at
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.nick)
        .bind(&profile.email)
        .bind(password_hash)
        .fetch_one(&self.pool);

        timed(self.timeout, "insert user", query).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, ApiError> {
        let query = sqlx::query_as::<_, User>(
            "SELECT id, name, nick, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool);

        timed(self.timeout, "find user", query)
            .await?
            .ok_or_else(|| ApiError::not_found("User", id))
    }

    async fn search_by_email(&self, email: &str) -> Result<UserCredentials, ApiError> {
        let query = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool);

        timed(self.timeout, "find user by email", query)
            .await?
            .ok_or_else(|| ApiError::not_found("User", email))
    }

    async fn search_password(&self, id: Uuid) -> Result<String, ApiError> {
        let query = sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool);

        timed(self.timeout, "find user password", query)
            .await?
            .ok_or_else(|| ApiError::not_found("User", id))
    }

    async fn update(&self, id: Uuid, profile: &UserProfile) -> Result<(), ApiError> {
        let query = sqlx::query("UPDATE users SET name = $1, nick = $2, email = $3 WHERE id = $4")
            .bind(&profile.name)
            .bind(&profile.nick)
            .bind(&profile.email)
            .bind(id)
            .execute(&self.pool);

        let result = timed(self.timeout, "update user", query).await?;
        Self::require_row(result.rows_affected(), id)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError> {
        let query = sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool);

        let result = timed(self.timeout, "update user password", query).await?;
        Self::require_row(result.rows_affected(), id)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let query = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool);

        let result = timed(self.timeout, "delete user", query).await?;
        Self::require_row(result.rows_affected(), id)
    }
}
