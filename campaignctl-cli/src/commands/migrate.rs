//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use campaignctl_core::config::DatabaseSection;
use campaignctl_core::CampaignConfig;
use campaignctl_server::{create_pool, run_migrations};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Apply the schema to the configured database. Safe to repeat.
pub async fn run_migrate(args: MigrateArgs, config: CampaignConfig) -> Result<()> {
    let database = database_section(args, config);

    let pool = create_pool(&database)
        .await
        .context("Failed to create database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("✅ Schema is up to date");
    Ok(())
}

/// `--database-url` replaces only the URL; pool limits still come from config.
fn database_section(args: MigrateArgs, config: CampaignConfig) -> DatabaseSection {
    let mut database = config.database;
    if let Some(url) = args.database_url {
        database.url = url;
    }
    database
}
