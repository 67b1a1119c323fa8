//! Medicines catalog CLI
//!
//! Search, look up, autocomplete and browse facets of the medicines dataset.

use anyhow::Context;
use clap::Parser;
use medicat_catalog::{CatalogCache, CatalogSource};
use medicat_client::{FileCatalogSource, HttpCatalogSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod commands;
mod config;
mod logging;

use commands::Command;
use config::{Config, SourceKind};

#[derive(Parser, Debug)]
#[command(name = "medicat", version, about = "Search the medicines catalog")]
struct Cli {
    /// Configuration file (defaults to ./medicat.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fetch the catalog from this web root
    #[arg(long, global = true, conflicts_with = "data_dir")]
    base_url: Option<String>,

    /// Read the catalog from this local directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.source.kind = SourceKind::Http;
        config.source.base_url = base_url;
    }
    if let Some(data_dir) = cli.data_dir {
        config.source.kind = SourceKind::File;
        config.source.data_dir = data_dir;
    }
    config.validate()?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let source = build_source(&config).context("Failed to create data source")?;
    let cache = CatalogCache::new(source);

    let output = commands::run(&cache, cli.command, cli.json).await?;
    println!("{output}");

    if let Some(err) = cache.last_error() {
        tracing::warn!(error = %err, "Results may be incomplete");
    }
    Ok(())
}

fn build_source(config: &Config) -> anyhow::Result<Arc<dyn CatalogSource>> {
    let source: Arc<dyn CatalogSource> = match config.source.kind {
        SourceKind::Http => {
            tracing::debug!(base_url = %config.source.base_url, "Using HTTP data source");
            Arc::new(HttpCatalogSource::with_timeout(
                config.source.base_url.clone(),
                Duration::from_secs(config.source.timeout_seconds),
            )?)
        }
        SourceKind::File => {
            let source = FileCatalogSource::new(&config.source.data_dir);
            tracing::debug!(
                records_file = %source.records_file().display(),
                "Using file data source"
            );
            Arc::new(source)
        }
    };
    Ok(source)
}
