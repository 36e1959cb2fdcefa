mod catalog;
mod compare;
mod fetch;
mod list;
mod normalize;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use kurv_core::RetailerDirectory;
use tracing_subscriber::EnvFilter;

use crate::list::ListCommands;

#[derive(Debug, Parser)]
#[command(name = "kurv")]
#[command(about = "Grocery price comparison across retailers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize a file of raw retailer records into canonical products
    Normalize {
        /// Retailer id from the retailers file; selects the record schema
        #[arg(long)]
        retailer: String,
        /// JSON file holding an array of raw records (or `{"products": [...]}`)
        file: PathBuf,
    },
    /// Fetch live listings from every configured retailer and compare prices
    Fetch {
        /// Search term forwarded to each retailer
        #[arg(long)]
        query: Option<String>,
        /// Write the normalized catalog to this file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Manage the shopping list
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Compare shopping-list totals per retailer against a saved catalog
    Compare {
        /// Catalog file written by `kurv fetch --catalog`
        #[arg(long)]
        catalog: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = kurv_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Commands::Normalize { retailer, file } => {
            let directory = load_directory(&config.retailers_path)?;
            normalize::run_normalize(&directory, &retailer, &file)?;
        }
        Commands::Fetch { query, catalog } => {
            let directory = load_directory(&config.retailers_path)?;
            fetch::run_fetch(&config, &directory, query.as_deref(), catalog.as_deref()).await?;
        }
        Commands::List { command } => list::run_list(&config, command)?,
        Commands::Compare { catalog } => {
            let directory = load_directory(&config.retailers_path)?;
            compare::run_compare(&config, &directory, &catalog)?;
        }
    }

    Ok(())
}

fn load_directory(path: &Path) -> anyhow::Result<RetailerDirectory> {
    let file = kurv_core::load_retailers(path)?;
    tracing::debug!(path = %path.display(), count = file.retailers.len(), "retailers loaded");
    Ok(RetailerDirectory::from(file))
}

#[cfg(test)]
mod tests;
