//! HTTP server command
//!
//! Loads the layered config, applies flag overrides, runs migrations and
//! serves the API until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use campaignctl_core::CampaignConfig;
use campaignctl_server::{create_pool, run_migrations, run_server};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3001)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory uploaded files are stored in
    #[arg(long, value_name = "DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Reject campaign status changes outside the lifecycle graph
    #[arg(long)]
    pub enforce_status_transitions: bool,

    /// Start without running schema migrations
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    /// Apply flags on top of the loaded config. Unset flags leave it alone.
    pub fn apply(&self, config: &mut CampaignConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config.database.url = url.to_owned();
        }
        if let Some(dir) = &self.upload_dir {
            config.server.upload_dir = dir.clone();
        }
        if self.enforce_status_transitions {
            config.campaigns.enforce_status_transitions = true;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: CampaignConfig) -> Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!("Starting campaignctl server on {}", config.server.bind);

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    if args.skip_migrations {
        tracing::warn!("Skipping schema migrations");
    } else {
        run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_keep_config() {
        let mut config = CampaignConfig::default();
        ServeArgs::default().apply(&mut config);
        assert_eq!(config, CampaignConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let mut config = CampaignConfig::default();
        let args = ServeArgs {
            bind: Some("0.0.0.0:8080".parse().unwrap()),
            cors_permissive: true,
            database_url: Some("postgres://app@db/campaigns".into()),
            upload_dir: Some(PathBuf::from("/srv/uploads")),
            enforce_status_transitions: true,
            skip_migrations: false,
        };
        args.apply(&mut config);

        assert_eq!(config.server.bind.port(), 8080);
        assert!(config.server.cors_permissive);
        assert_eq!(config.database.url, "postgres://app@db/campaigns");
        assert_eq!(config.server.upload_dir, PathBuf::from("/srv/uploads"));
        assert!(config.campaigns.enforce_status_transitions);
    }

    #[test]
    fn blank_database_url_is_ignored() {
        let mut config = CampaignConfig::default();
        let args = ServeArgs {
            database_url: Some("  ".into()),
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(config.database.url, CampaignConfig::default().database.url);
    }
}
