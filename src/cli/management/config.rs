use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::{Config as AppConfig, CONFIG_KEYS};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,

    /// List all available configuration keys
    Keys,
}

pub async fn execute(args: ConfigArgs, config: &AppConfig, config_path: Option<&str>) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            println!("Current configuration:");
            for key in CONFIG_KEYS {
                println!("  {}: {}", key, config.get(key)?);
            }
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::config_path(config_path)?;
            // Start from the file, not the env-overridden values
            let mut stored = AppConfig::from_file(&path)?;
            stored.set(&key, &value)?;
            stored.save(&path)?;
            println!("Configuration updated: {} = {}", key, value);
        }

        ConfigCommands::Get { key } => {
            println!("{}", config.get(&key)?);
        }

        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path(config_path)?.display());
        }

        ConfigCommands::Reset => {
            let path = AppConfig::config_path(config_path)?;
            AppConfig::default().save(&path)?;
            println!("Configuration reset to defaults: {}", path.display());
        }

        ConfigCommands::Keys => {
            println!("Available configuration keys:");
            for key in CONFIG_KEYS {
                println!("  {}", key);
            }
        }
    }

    Ok(())
}
