//! Template repository
//!
//! Owner-scoped like campaigns. `variables` is written from the validated
//! fields, which always derive it from `content`.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use campaignctl_core::TemplateCategory;

use super::{like_pattern, DbError};
use crate::models::TemplateFields;

/// Template record joined with its owner
#[derive(Debug, Clone, FromRow)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub media_url: String,
    pub media_type: String,
    pub variables: Vec<String>,
    pub category: String,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    pub fn fields(&self) -> Result<TemplateFields, DbError> {
        Ok(TemplateFields {
            name: self.name.clone(),
            content: self.content.clone(),
            media_url: self.media_url.clone(),
            media_type: self.media_type.parse()?,
            variables: self.variables.clone(),
            category: self.category.parse()?,
        })
    }
}

const TEMPLATE_SELECT: &str = r#"
    SELECT t.id, t.name, t.content, t.media_url, t.media_type, t.variables,
           t.category, t.created_by, u.name AS created_by_name,
           t.created_at, t.updated_at
"#;

/// Template repository
pub struct TemplateRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TemplateRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Owner's templates, newest first. `search` matches name or content.
    pub async fn list(
        &self,
        owner: Uuid,
        search: Option<&str>,
        category: Option<TemplateCategory>,
    ) -> Result<Vec<Template>, DbError> {
        let sql = format!(
            r#"
            {TEMPLATE_SELECT}
            FROM templates t
            JOIN users u ON u.id = t.created_by
            WHERE t.created_by = $1
              AND ($2::text IS NULL OR t.name ILIKE $2 OR t.content ILIKE $2)
              AND ($3::text IS NULL OR t.category = $3)
            ORDER BY t.created_at DESC, t.id
            "#
        );
        let templates = sqlx::query_as::<_, Template>(&sql)
            .bind(owner)
            .bind(search.map(like_pattern))
            .bind(category.map(|c| c.as_str()))
            .fetch_all(self.pool)
            .await?;
        Ok(templates)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Template, DbError> {
        let sql = format!(
            "{TEMPLATE_SELECT} FROM templates t JOIN users u ON u.id = t.created_by \
             WHERE t.id = $1 AND t.created_by = $2"
        );
        sqlx::query_as::<_, Template>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("template", id))
    }

    pub async fn create(&self, owner: Uuid, fields: &TemplateFields) -> Result<Template, DbError> {
        let sql = format!(
            r#"
            WITH t AS (
                INSERT INTO templates (name, content, media_url, media_type,
                                       variables, category, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            {TEMPLATE_SELECT} FROM t JOIN users u ON u.id = t.created_by
            "#
        );
        let created = sqlx::query_as::<_, Template>(&sql)
            .bind(&fields.name)
            .bind(&fields.content)
            .bind(&fields.media_url)
            .bind(fields.media_type.as_str())
            .bind(&fields.variables)
            .bind(fields.category.as_str())
            .bind(owner)
            .fetch_one(self.pool)
            .await?;
        Ok(created)
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &TemplateFields,
    ) -> Result<Template, DbError> {
        let sql = format!(
            r#"
            WITH t AS (
                UPDATE templates
                SET name = $3, content = $4, media_url = $5, media_type = $6,
                    variables = $7, category = $8, updated_at = NOW()
                WHERE id = $1 AND created_by = $2
                RETURNING *
            )
            {TEMPLATE_SELECT} FROM t JOIN users u ON u.id = t.created_by
            "#
        );
        sqlx::query_as::<_, Template>(&sql)
            .bind(id)
            .bind(owner)
            .bind(&fields.name)
            .bind(&fields.content)
            .bind(&fields.media_url)
            .bind(fields.media_type.as_str())
            .bind(&fields.variables)
            .bind(fields.category.as_str())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("template", id))
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("template", id));
        }
        Ok(())
    }
}
