//! HTTP server wiring for Lineage.
//!
//! Mounts the JSON API from `lineage-api` under `/api` with request tracing.
//! Configuration is deserialised from `config.toml` and `LINEAGE_*`
//! environment variables by the binary.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use lineage_api::TreeStore;
use lineage_core::store::FamilyStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which dataset stands in when a raw collection fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
  /// Failed collections are treated as empty.
  #[default]
  Empty,
  /// The built-in Johnson family.
  Sample,
  /// A JSON dataset read from `fallback_file` at startup.
  File,
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  pub store_path:    PathBuf,
  #[serde(default)]
  pub fallback:      Fallback,
  #[serde(default)]
  pub fallback_file: Option<PathBuf>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5240 }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level [`Router`]: the API under `/api`, traced.
pub fn app<S>(trees: Arc<TreeStore<S>>) -> Router
where
  S: FamilyStore + 'static,
{
  Router::new()
    .nest("/api", lineage_api::api_router(trees))
    .layer(TraceLayer::new_for_http())
}
