mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricelens")]
#[command(about = "Find retailer prices for a product image")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recognize a product image and resolve prices across retailers
    Lookup {
        /// Path to the product image
        #[arg(long)]
        image: PathBuf,
        /// Print a URL/price table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Resolve prices for a manually supplied recognition result
    Resolve {
        /// Best-guess product label, used for the retailer fallback search
        #[arg(long)]
        label: Option<String>,
        /// Candidate page URL (repeatable, in ranking order)
        #[arg(long = "url")]
        urls: Vec<String>,
        /// Print a URL/price table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Scrape the price from a single product page
    Price {
        #[arg(long)]
        url: String,
    },
    /// Show which supported retailer a URL belongs to
    Classify {
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pricelens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Lookup { image, table } => {
            commands::run_lookup(&config, &image, table).await?;
        }
        Commands::Resolve { label, urls, table } => {
            commands::run_resolve(&config, label, urls, table).await?;
        }
        Commands::Price { url } => commands::run_price(&config, &url).await?,
        Commands::Classify { url } => commands::run_classify(&config, &url)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
