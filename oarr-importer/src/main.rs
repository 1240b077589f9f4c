//! OARR importer
//!
//! Reconciles a batch of crosswalked repository records into the registry:
//! each record is matched to its canonical counterpart by home-page URL,
//! merged if the source has changed since the last run, and saved.
//!
//! Usage:
//!   oarr-importer --config importer.toml --input records.json
//!   oarr-importer --input records.json --dry-run

use anyhow::{Context, Result};
use clap::Parser;
use oarr_client::OarrClient;
use oarr_importer::{read_input, run_batch, ConfigOverrides, DryRunStore, ImporterConfig};
use oarr_reconcile::Reconciler;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "oarr-importer")]
#[command(about = "Reconcile crosswalked repository records into the OARR registry")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registry API base URL
    #[arg(long)]
    store_url: Option<String>,

    /// Registry API key
    #[arg(long, env = "OARR_API_KEY")]
    api_key: Option<String>,

    /// Admin namespace owned by this importer
    #[arg(long)]
    namespace: Option<String>,

    /// JSON file with the crosswalked records
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Resolve and merge without writing to the registry
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ImporterConfig::resolve(
        args.config.as_deref(),
        ConfigOverrides {
            store_base_url: args.store_url,
            api_key: args.api_key,
            namespace: args.namespace,
            input: args.input,
            dry_run: args.dry_run,
        },
    )?;

    let input = config.input.as_deref().context("no input file given")?;
    let records = read_input(input)?;
    info!("Loaded {} record(s) from {}", records.len(), input.display());

    let reconciler = Reconciler::new(config.namespace.clone());
    let client = config
        .client_config()
        .map(OarrClient::new)
        .transpose()
        .context("Failed to create registry client")?;

    let summary = match (client, config.dry_run) {
        (Some(client), false) => {
            info!("Importing into {}", client.base_url());
            run_batch(&records, &client, &reconciler).await
        }
        (Some(client), true) => {
            info!("Dry run against {}", client.base_url());
            run_batch(&records, &DryRunStore::new(client), &reconciler).await
        }
        (None, _) => {
            info!("Offline dry run");
            run_batch(&records, &DryRunStore::<OarrClient>::offline(), &reconciler).await
        }
    };

    println!("{summary}");
    Ok(())
}

fn init_logging(verbose: bool) {
    if verbose {
        FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .compact()
            .init();
    } else {
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_target(false)
            .compact()
            .init();
    }
}
