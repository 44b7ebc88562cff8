//! Object Design System server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `ODS__*` environment variables, opens the configured entity store and
//! serves the JSON API under `/api`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use ods_ai::{ChatModel, OpenAiClient};
use ods_api::AppState;
use ods_core::{dataset::Dataset, store::EntityStore};
use ods_server::{ServerConfig, StoreConfig};
use ods_store_mem::MemStore;
use ods_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Object Design System server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("ODS")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let model: Option<Arc<dyn ChatModel>> =
    match server_cfg.openai(std::env::var("OPENAI_API_KEY").ok()) {
      Some(openai) => {
        tracing::info!(model = %openai.model, "AI features enabled");
        let client: Arc<dyn ChatModel> =
          Arc::new(OpenAiClient::new(openai).context("failed to build LLM client")?);
        Some(client)
      }
      None => {
        tracing::warn!("no OpenAI API key configured; search and chat are disabled");
        None
      }
    };

  match &server_cfg.store {
    StoreConfig::Memory => {
      let store = if server_cfg.seed_sample_data {
        MemStore::with_dataset(Dataset::sample())
      } else {
        MemStore::new()
      };
      tracing::info!("using in-memory store");
      serve(store, model, &server_cfg).await
    }
    StoreConfig::Sqlite { path } => {
      let path = expand_tilde(path);
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      if server_cfg.seed_sample_data {
        store
          .seed_if_empty(Dataset::sample())
          .await
          .context("failed to seed sample data")?;
      }
      tracing::info!("using SQLite store at {}", path.display());
      serve(store, model, &server_cfg).await
    }
  }
}

async fn serve<S>(
  store: S,
  model: Option<Arc<dyn ChatModel>>,
  server_cfg: &ServerConfig,
) -> anyhow::Result<()>
where
  S: EntityStore + 'static,
{
  let mut state = AppState::new(store);
  if let Some(model) = model {
    state = state.with_model(model);
  }

  let app = ods_server::app(state, &server_cfg.cors_origins);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
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
