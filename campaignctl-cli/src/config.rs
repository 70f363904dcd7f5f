use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use campaignctl_core::config::ENV_CONFIG_PATH;
use campaignctl_core::CampaignConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Init(InitArgs),
    /// Print the effective config as TOML (database password hidden)
    Show,
    /// Load and validate the effective config
    Validate,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, explicit),
        ConfigCommands::Show => run_show(explicit),
        ConfigCommands::Validate => run_validate(explicit),
        ConfigCommands::Path => run_path(explicit),
    }
}

/// `--config`, then `CAMPAIGNCTL_CONFIG`, then the default location
fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
        .unwrap_or_else(CampaignConfig::default_path)
}

fn run_init(args: InitArgs, explicit: Option<&Path>) -> Result<()> {
    let config_path = config_path(explicit);

    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = CampaignConfig::default()
        .to_redacted_toml()
        .context("Failed to serialize default config")?;
    std::fs::write(&config_path, content)
        .context(format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Set database.url or export DATABASE_URL");
    println!("  3. Run: campaignctl config validate");

    Ok(())
}

fn run_show(explicit: Option<&Path>) -> Result<()> {
    let config = CampaignConfig::load(explicit)?;
    let toml_str = config
        .to_redacted_toml()
        .context("Failed to serialize config to TOML")?;

    println!("{}", toml_str);

    Ok(())
}

fn run_validate(explicit: Option<&Path>) -> Result<()> {
    let config = CampaignConfig::load(explicit)?;

    println!("   ✓ Config loaded successfully");
    println!("   Bind: {}", config.server.bind);
    println!("   Uploads: {}", config.server.upload_dir.display());
    if config.campaigns.enforce_status_transitions {
        println!("   Status transitions: enforced");
    } else {
        println!("   Status transitions: unrestricted");
    }

    println!("\n✅ Configuration valid!");

    Ok(())
}

fn run_path(explicit: Option<&Path>) -> Result<()> {
    println!("{}", config_path(explicit).display());
    Ok(())
}
