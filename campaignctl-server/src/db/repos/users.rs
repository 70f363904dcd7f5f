//! User repository
//!
//! Email uniqueness is enforced by `users_email_key`; a clash surfaces as
//! `DbError::Duplicate` ("Email already registered").

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::DbError;
use crate::models::{NewUser, ProfileFields};

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> ProfileFields {
        ProfileFields {
            name: self.name.clone(),
            company: self.company.clone(),
            phone: self.phone.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, company, phone, \
     avatar, is_active, created_at, updated_at";

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user with an already-hashed password.
    pub async fn create(&self, user: &NewUser, password_hash: &str) -> Result<User, DbError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, company, phone) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(password_hash)
            .bind(&user.company)
            .bind(&user.phone)
            .fetch_one(self.pool)
            .await?;
        Ok(created)
    }

    /// Look up by normalised email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", id))
    }

    pub async fn update_profile(&self, id: Uuid, profile: &ProfileFields) -> Result<User, DbError> {
        let sql = format!(
            "UPDATE users SET name = $2, company = $3, phone = $4, avatar = $5, \
             updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&profile.name)
            .bind(&profile.company)
            .bind(&profile.phone)
            .bind(&profile.avatar)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", id))
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", id));
        }
        Ok(())
    }
}
