//! Server assembly for the Object Design System.
//!
//! Holds the deserialised [`ServerConfig`] and builds the top-level router:
//! the JSON API nested under `/api`, request tracing, and optional CORS.

use std::path::PathBuf;

use axum::{
  Router,
  http::{HeaderValue, Method, header},
};
use ods_ai::OpenAiConfig;
use ods_api::{AppState, api_router};
use ods_core::store::EntityStore;
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 5000 }
fn default_true() -> bool { true }

/// Runtime server configuration, deserialised from `config.toml` and
/// `ODS__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default)]
  pub store:            StoreConfig,
  /// Load the built-in sample dataset at startup. The SQLite backend only
  /// seeds an empty database.
  #[serde(default = "default_true")]
  pub seed_sample_data: bool,
  #[serde(default)]
  pub openai:           Option<OpenAiConfig>,
  /// Allowed browser origins. Empty disables CORS; `"*"` allows any.
  #[serde(default)]
  pub cors_origins:     Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
  #[default]
  Memory,
  Sqlite { path: PathBuf },
}

impl ServerConfig {
  /// The LLM settings to use, if any.
  ///
  /// A key missing from the configuration is taken from `env_key`
  /// (normally `OPENAI_API_KEY`). Without a key the AI features stay off.
  pub fn openai(&self, env_key: Option<String>) -> Option<OpenAiConfig> {
    let mut openai = self.openai.clone().unwrap_or_else(|| OpenAiConfig::new(""));
    if openai.api_key.trim().is_empty() {
      openai.api_key = env_key.unwrap_or_default();
    }
    (!openai.api_key.trim().is_empty()).then_some(openai)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a CORS layer for `origins`, or `None` when the list is empty.
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
  if origins.is_empty() {
    return None;
  }

  let cors = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers([header::CONTENT_TYPE])
    .expose_headers([header::CONTENT_DISPOSITION]);

  if origins.iter().any(|o| o == "*") {
    return Some(cors.allow_origin(Any));
  }

  let mut parsed = Vec::with_capacity(origins.len());
  for origin in origins {
    match HeaderValue::from_str(origin) {
      Ok(value) => parsed.push(value),
      Err(err) => tracing::warn!("ignoring invalid CORS origin '{origin}': {err}"),
    }
  }
  Some(cors.allow_origin(parsed))
}

/// The complete HTTP application: the API under `/api` with tracing and CORS.
pub fn app<S>(state: AppState<S>, cors_origins: &[String]) -> Router
where
  S: EntityStore + 'static,
{
  let router = Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http());

  match cors_layer(cors_origins) {
    Some(cors) => router.layer(cors),
    None => router,
  }
}

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::Request, http::StatusCode};
  use ods_core::dataset::Dataset;
  use ods_store_mem::MemStore;
  use tower::ServiceExt;

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.store, StoreConfig::Memory);
    assert!(cfg.seed_sample_data);
    assert!(cfg.openai.is_none());
    assert!(cfg.cors_origins.is_empty());
  }

  #[test]
  fn sqlite_backend_and_openai_section() {
    let cfg = parse(
      r#"
        port = 8080
        seed_sample_data = false
        cors_origins = ["http://localhost:3000"]

        [store]
        backend = "sqlite"
        path = "~/ods.db"

        [openai]
        model = "gpt-4o-mini"
      "#,
    );
    assert_eq!(cfg.port, 8080);
    assert!(!cfg.seed_sample_data);
    assert_eq!(cfg.store, StoreConfig::Sqlite { path: "~/ods.db".into() });
    assert_eq!(cfg.cors_origins, vec!["http://localhost:3000"]);

    let openai = cfg.openai.as_ref().unwrap();
    assert_eq!(openai.model, "gpt-4o-mini");
    assert_eq!(openai.base_url, "https://api.openai.com/v1");
    assert!(openai.api_key.is_empty());
  }

  #[test]
  fn api_key_falls_back_to_environment() {
    let cfg = parse("[openai]\nmodel = \"m\"\n");
    let openai = cfg.openai(Some("sk-env".into())).unwrap();
    assert_eq!(openai.api_key, "sk-env");
    assert_eq!(openai.model, "m");

    let cfg = parse("[openai]\napi_key = \"sk-file\"\n");
    assert_eq!(cfg.openai(Some("sk-env".into())).unwrap().api_key, "sk-file");

    let cfg = parse("");
    assert_eq!(cfg.openai(Some("sk-env".into())).unwrap().model, "gpt-5");
    assert!(cfg.openai(None).is_none());
    assert!(cfg.openai(Some("  ".into())).is_none());
  }

  #[test]
  fn no_origins_means_no_cors() {
    assert!(cors_layer(&[]).is_none());
    assert!(cors_layer(&["*".into()]).is_some());
  }

  fn state() -> AppState<MemStore> {
    AppState::new(MemStore::with_dataset(Dataset::sample()))
  }

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let app = app(state(), &[]);

    let res = app
      .clone()
      .oneshot(Request::get("/api/objects").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let objects: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(objects.as_array().unwrap().len(), 4);

    let res = app
      .oneshot(Request::get("/objects").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn configured_origin_is_allowed() {
    let app = app(state(), &["http://localhost:3000".into()]);
    let res = app
      .oneshot(
        Request::get("/api/objects")
          .header(header::ORIGIN, "http://localhost:3000")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
      res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "http://localhost:3000"
    );
  }
}
