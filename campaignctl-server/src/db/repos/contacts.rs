//! Contact repository
//!
//! Contacts are shared by all users. Phone uniqueness comes from
//! `contacts_phone_key`, so create/update never check before writing.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use campaignctl_core::ContactStatus;

use super::{like_pattern, DbError};
use crate::models::ContactFields;

/// Contact record from database
#[derive(Debug, Clone, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Stored values as validated fields, the starting point of an update.
    pub fn fields(&self) -> Result<ContactFields, DbError> {
        Ok(ContactFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            tags: self.tags.clone(),
            status: self.status.parse()?,
            last_activity: Some(self.last_activity),
        })
    }
}

/// Contact totals for the analytics overview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct ContactCounts {
    pub total: i64,
    pub active: i64,
    pub blocked: i64,
    pub unsubscribed: i64,
}

const CONTACT_COLUMNS: &str =
    "id, name, phone, email, tags, status, last_activity, created_at, updated_at";

/// Contact repository
pub struct ContactRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List contacts, newest first.
    ///
    /// `search` matches name, phone or email case-insensitively as a substring.
    pub async fn list(
        &self,
        search: Option<&str>,
        status: Option<ContactStatus>,
    ) -> Result<Vec<Contact>, DbError> {
        let sql = format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE ($1::text IS NULL
                   OR name ILIKE $1
                   OR phone ILIKE $1
                   OR COALESCE(email, '') ILIKE $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC, id
            "#
        );
        let contacts = sqlx::query_as::<_, Contact>(&sql)
            .bind(search.map(like_pattern))
            .bind(status.map(|s| s.as_str()))
            .fetch_all(self.pool)
            .await?;
        Ok(contacts)
    }

    pub async fn get(&self, id: Uuid) -> Result<Contact, DbError> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("contact", id))
    }

    /// Insert a contact. A taken phone returns `DbError::Duplicate`.
    pub async fn create(&self, contact: &ContactFields) -> Result<Contact, DbError> {
        let sql = format!(
            r#"
            INSERT INTO contacts (name, phone, email, tags, status, last_activity)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
            RETURNING {CONTACT_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Contact>(&sql)
            .bind(&contact.name)
            .bind(&contact.phone)
            .bind(&contact.email)
            .bind(&contact.tags)
            .bind(contact.status.as_str())
            .bind(contact.last_activity)
            .fetch_one(self.pool)
            .await?;
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, contact: &ContactFields) -> Result<Contact, DbError> {
        let sql = format!(
            r#"
            UPDATE contacts
            SET name = $2, phone = $3, email = $4, tags = $5, status = $6,
                last_activity = COALESCE($7, last_activity), updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(&contact.name)
            .bind(&contact.phone)
            .bind(&contact.email)
            .bind(&contact.tags)
            .bind(contact.status.as_str())
            .bind(contact.last_activity)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("contact", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("contact", id));
        }
        Ok(())
    }

    /// Totals per status in a single scan.
    pub async fn count_by_status(&self) -> Result<ContactCounts, DbError> {
        let counts = sqlx::query_as::<_, ContactCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'active') AS active,
                   COUNT(*) FILTER (WHERE status = 'blocked') AS blocked,
                   COUNT(*) FILTER (WHERE status = 'unsubscribed') AS unsubscribed
            FROM contacts
            "#,
        )
        .fetch_one(self.pool)
        .await?;
        Ok(counts)
    }
}
