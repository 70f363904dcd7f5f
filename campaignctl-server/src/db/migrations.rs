//! Schema migrations
//!
//! Idempotent `CREATE ... IF NOT EXISTS` statements, run at server start and
//! by `campaignctl migrate`. Constraint names are relied on by
//! `DbError::from` to turn unique violations into readable messages.

use sqlx::PgPool;

/// Ordered schema statements: (object name, SQL)
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            company TEXT,
            phone TEXT,
            avatar TEXT,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT users_email_key UNIQUE (email),
            CONSTRAINT users_role_check CHECK (role IN ('user', 'admin'))
        )
        "#,
    ),
    (
        "sessions",
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token_hash TEXT PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "contacts",
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT,
            tags TEXT[] NOT NULL DEFAULT '{}',
            status TEXT NOT NULL DEFAULT 'active',
            last_activity TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT contacts_phone_key UNIQUE (phone),
            CONSTRAINT contacts_status_check
                CHECK (status IN ('active', 'blocked', 'unsubscribed'))
        )
        "#,
    ),
    (
        "campaigns",
        r#"
        CREATE TABLE IF NOT EXISTS campaigns (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'draft',
            message_template TEXT NOT NULL,
            media_url TEXT NOT NULL DEFAULT '',
            media_type TEXT NOT NULL DEFAULT '',
            target_audience TEXT[] NOT NULL DEFAULT '{}',
            scheduled_date TIMESTAMPTZ,
            sent_count BIGINT NOT NULL DEFAULT 0,
            delivered_count BIGINT NOT NULL DEFAULT 0,
            read_count BIGINT NOT NULL DEFAULT 0,
            reply_count BIGINT NOT NULL DEFAULT 0,
            created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT campaigns_status_check
                CHECK (status IN ('draft', 'scheduled', 'active', 'completed', 'paused')),
            CONSTRAINT campaigns_media_type_check
                CHECK (media_type IN ('', 'image', 'video', 'document'))
        )
        "#,
    ),
    (
        "templates",
        r#"
        CREATE TABLE IF NOT EXISTS templates (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL,
            content TEXT NOT NULL,
            media_url TEXT NOT NULL DEFAULT '',
            media_type TEXT NOT NULL DEFAULT '',
            variables TEXT[] NOT NULL DEFAULT '{}',
            category TEXT NOT NULL DEFAULT 'marketing',
            created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT templates_category_check
                CHECK (category IN ('marketing', 'utility', 'authentication')),
            CONSTRAINT templates_media_type_check
                CHECK (media_type IN ('', 'image', 'video', 'document'))
        )
        "#,
    ),
    (
        "campaign_activity",
        r#"
        CREATE TABLE IF NOT EXISTS campaign_activity (
            campaign_id UUID NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
            day DATE NOT NULL,
            sent_count BIGINT NOT NULL DEFAULT 0,
            delivered_count BIGINT NOT NULL DEFAULT 0,
            read_count BIGINT NOT NULL DEFAULT 0,
            reply_count BIGINT NOT NULL DEFAULT 0,
            PRIMARY KEY (campaign_id, day)
        )
        "#,
    ),
    (
        "indexes",
        r#"
        CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);
        CREATE INDEX IF NOT EXISTS idx_contacts_created ON contacts(created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_contacts_status ON contacts(status);
        CREATE INDEX IF NOT EXISTS idx_campaigns_owner_created
            ON campaigns(created_by, created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_templates_owner_created
            ON templates(created_by, created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_campaign_activity_day ON campaign_activity(day)
        "#,
    ),
];

/// Apply every schema statement in order.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    for (name, sql) in SCHEMA {
        // raw_sql: the index block holds several statements
        sqlx::raw_sql(sql).execute(pool).await?;
        tracing::debug!(object = name, "migration applied");
    }

    tracing::info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_precede_their_references() {
        let position = |name: &str| SCHEMA.iter().position(|(n, _)| *n == name).unwrap();
        assert!(position("users") < position("sessions"));
        assert!(position("users") < position("campaigns"));
        assert!(position("campaigns") < position("campaign_activity"));
        assert_eq!(SCHEMA.last().map(|(n, _)| *n), Some("indexes"));
    }

    #[test]
    fn unique_constraints_are_named() {
        let sql: String = SCHEMA.iter().map(|(_, s)| *s).collect();
        assert!(sql.contains("CONSTRAINT contacts_phone_key UNIQUE (phone)"));
        assert!(sql.contains("CONSTRAINT users_email_key UNIQUE (email)"));
    }

    #[test]
    fn statements_are_idempotent() {
        for (name, sql) in SCHEMA {
            assert!(
                !sql.contains("CREATE TABLE ") || sql.contains("CREATE TABLE IF NOT EXISTS"),
                "{name} is not idempotent"
            );
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_run_twice() {
        let section = campaignctl_core::config::DatabaseSection {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL required"),
            ..Default::default()
        };
        let pool = crate::db::create_pool(&section).await.expect("pool");
        run_migrations(&pool).await.expect("first run");
        run_migrations(&pool).await.expect("second run");
    }
}
