//! lineage-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, builds the initial family tree and serves the JSON API over
//! HTTP.
//!
//! # Fallback dataset
//!
//! To write the built-in sample family as a starting point for
//! `fallback_file`:
//!
//! ```sh
//! cargo run -p lineage-server -- --print-sample > fallback.json
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use lineage_api::TreeStore;
use lineage_core::RawData;
use lineage_server::{Fallback, ServerConfig};
use lineage_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Lineage family-tree server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the built-in sample dataset as JSON and exit.
  #[arg(long)]
  print_sample: bool,
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

  // Helper mode: dump the sample dataset and exit.
  if cli.print_sample {
    let json = serde_json::to_string_pretty(&RawData::sample())
      .context("failed to serialise sample dataset")?;
    println!("{json}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LINEAGE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let fallback = load_fallback(&server_cfg)?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(dir) = store_path.parent() {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {dir:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let trees = Arc::new(TreeStore::new(store, fallback));
  trees.refresh().await;

  let app = lineage_server::app(trees);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Resolve the configured fallback dataset.
fn load_fallback(cfg: &ServerConfig) -> anyhow::Result<RawData> {
  match cfg.fallback {
    Fallback::Empty => Ok(RawData::default()),
    Fallback::Sample => Ok(RawData::sample()),
    Fallback::File => {
      let path = cfg
        .fallback_file
        .as_deref()
        .context("fallback = \"file\" requires fallback_file")?;
      let path = expand_tilde(path);
      let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read fallback file {path:?}"))?;
      RawData::from_json(&raw)
        .with_context(|| format!("failed to parse fallback file {path:?}"))
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
