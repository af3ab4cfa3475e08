//! catalog-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store and serves the catalog API over HTTP. `--check` and `--repair` run
//! the consistency sweep instead and print its report as JSON.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use catalog_core::Coordinator;
use catalog_server::ServerConfig;
use catalog_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Course catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the consistency report for the store and exit.
  #[arg(long, conflicts_with = "repair")]
  check: bool,

  /// Pull dangling child ids out of their parents, print the report and exit.
  #[arg(long)]
  repair: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CATALOG"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let catalog = Coordinator::new(store.clone(), store.clone(), store);

  if cli.check || cli.repair {
    let report = if cli.repair {
      catalog.repair_dangling().await.context("repair failed")?
    } else {
      catalog.check_consistency().await.context("consistency check failed")?
    };
    if !report.is_consistent() {
      tracing::warn!("store is not a consistent hierarchy");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  let app = catalog_server::app(Arc::new(catalog), &server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
