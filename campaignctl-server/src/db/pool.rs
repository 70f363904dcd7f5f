//! Connection pool built from the `[database]` config section

use std::time::Duration;

use campaignctl_core::config::{redact_url_password, DatabaseSection};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// How long a request waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool settings for `section`. A zero `max_connections` still gets one connection.
pub fn pool_options(section: &DatabaseSection) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(section.max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Connect to `section.url` with the section's pool limits.
///
/// ```ignore
/// let pool = create_pool(&config.database).await?;
/// ```
pub async fn create_pool(section: &DatabaseSection) -> Result<PgPool, sqlx::Error> {
    let options = pool_options(section);
    let max_connections = options.get_max_connections();
    let pool = options.connect(&section.url).await?;
    tracing::debug!(
        url = %redact_url_password(&section.url),
        max_connections,
        "database pool ready"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_section() {
        let section = DatabaseSection {
            max_connections: 12,
            ..Default::default()
        };
        let options = pool_options(&section);
        assert_eq!(options.get_max_connections(), 12);
        assert_eq!(options.get_acquire_timeout(), ACQUIRE_TIMEOUT);
    }

    #[test]
    fn zero_limit_keeps_one_connection() {
        let section = DatabaseSection {
            max_connections: 0,
            ..Default::default()
        };
        assert_eq!(pool_options(&section).get_max_connections(), 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn small_pool_queues_callers() {
        let section = DatabaseSection {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL required"),
            max_connections: 2,
        };
        let pool = create_pool(&section).await.expect("pool creation failed");

        let counts = overlapping_selects(&pool, 6).await;
        assert_eq!(counts, (0..6).collect::<Vec<i32>>());
    }

    /// Run `n` overlapping queries through `pool` and collect their results in order.
    async fn overlapping_selects(pool: &PgPool, n: i32) -> Vec<i32> {
        let handles: Vec<_> = (0..n)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let (value,): (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("query failed");
                    value
                })
            })
            .collect();

        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            out.push(handle.await.expect("task panicked"));
        }
        out
    }
}
