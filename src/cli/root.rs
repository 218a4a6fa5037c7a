use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use super::{inspect::InspectCommand, request::RequestCommand, simulate::SimulateCommand};
use storefront_ui::Config;

/// Drive storefront page behaviours from the command line
#[derive(Parser)]
#[command(
    name = "storefront-ui",
    version,
    about = "Drive storefront page behaviours from the command line",
    long_about = r#"Loads an HTML page into an in-memory document, wires the page behaviours
(dialogs, tooltips, validation, cart buttons, navigation, flash messages,
quantity steppers) and lets you inspect or script them.

Examples:
  storefront-ui inspect shop.html
  storefront-ui simulate shop.html login.yaml --dump
  storefront-ui request http://localhost:5000/cart --method POST --data '{"id": 3}'"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Configuration file (JSON); skips the default search locations
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Navigation collapse breakpoint in pixels
    #[arg(long, global = true)]
    pub breakpoint: Option<u32>,

    /// Initial viewport width in pixels
    #[arg(long, global = true)]
    pub width: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a page and report its dialogs
    Inspect(InspectCommand),
    /// Replay a YAML script of interactions against a page
    Simulate(SimulateCommand),
    /// Send a request through the request helper
    Request(RequestCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.resolve_config().await?;
        debug!("Configuration resolved: {:?}", config);

        match &self.command {
            Commands::Inspect(cmd) => cmd.execute(&config).await,
            Commands::Simulate(cmd) => cmd.execute(&config).await,
            Commands::Request(cmd) => cmd.execute(&config).await,
        }
    }

    async fn resolve_config(&self) -> Result<Config> {
        self.resolve_config_with(|key| std::env::var(key).ok()).await
    }

    /// Defaults, then the config file, then `STOREFRONT_*` overrides, then flags
    async fn resolve_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::load_from_file(path).await?;
                config.apply_overrides(&lookup);
                config
            }
            None => Config::init(&lookup).await?,
        };

        if let Some(breakpoint) = self.breakpoint {
            config.breakpoint_px = breakpoint;
        }
        if let Some(width) = self.width {
            config.viewport_width = width;
        }

        config.validate()?;
        Ok(config)
    }
}
