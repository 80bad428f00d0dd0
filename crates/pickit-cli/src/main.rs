mod admin;
mod location;
mod play;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::admin::AdminCommands;
use crate::location::LocationArgs;

#[derive(Debug, Parser)]
#[command(name = "pickit")]
#[command(about = "Seoul food World Cup: eight nearby restaurants, one winner")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Select eight restaurants for a location and show their scores
    Select {
        #[command(flatten)]
        location: LocationArgs,
        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Select eight restaurants and play the bracket to a champion
    Play {
        #[command(flatten)]
        location: LocationArgs,
        /// Decide every match by score instead of prompting
        #[arg(long)]
        auto: bool,
    },
    /// List the curated areas
    Areas,
    /// Curation tools: image overrides, curated edits and photo lookup
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pickit_core::load_app_config().context("invalid PICKIT_* configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let catalog = pickit_core::load_catalog(&config.catalog_path)
        .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;
    tracing::debug!(
        version = catalog.version,
        fallback = catalog.fallback.len(),
        areas = catalog.areas.len(),
        "catalog loaded"
    );

    match command {
        Commands::Select { location, json } => {
            play::run_select(&config, &catalog, &location.resolve()?, json).await?;
        }
        Commands::Play { location, auto } => {
            play::run_play(&config, &catalog, &location.resolve()?, auto).await?;
        }
        Commands::Areas => play::run_areas(&config, &catalog)?,
        Commands::Admin { command } => admin::run_admin(&config, &catalog, command).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
