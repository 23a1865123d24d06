//! Config command - inspect and initialize configuration.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use logiparse_core::LogiConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Where to write the config file
        #[arg(default_value = "logiparse.json")]
        path: PathBuf,
    },
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { path } => {
            if path.exists() {
                anyhow::bail!("Refusing to overwrite existing file: {}", path.display());
            }
            LogiConfig::default().save(&path)?;
            println!(
                "{} Default configuration written to {}",
                style("✓").green(),
                path.display()
            );
        }
    }

    Ok(())
}
