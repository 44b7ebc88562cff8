//! JSON REST API for the Object Design System.
//!
//! Exposes an axum [`Router`] backed by any [`EntityStore`], with optional
//! LLM-backed search and chat. CORS, tracing and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ods_api::api_router(AppState::new(store)))
//! ```

pub mod chat;
pub mod error;
pub mod extract;
pub mod hierarchies;
pub mod objects;
pub mod relations;
pub mod reports;
pub mod search;

use std::sync::Arc;

use axum::{Router, routing::get};
use ods_ai::ChatModel;
use ods_core::store::EntityStore;

pub use error::ApiError;
pub use extract::ValidJson;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  /// `None` when no LLM is configured; search and chat then answer 503.
  pub model: Option<Arc<dyn ChatModel>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), model: self.model.clone() }
  }
}

impl<S> AppState<S> {
  pub fn new(store: S) -> Self { Self { store: Arc::new(store), model: None } }

  pub fn with_model(mut self, model: Arc<dyn ChatModel>) -> Self {
    self.model = Some(model);
    self
  }

  pub(crate) fn model(&self) -> Result<&dyn ChatModel, ApiError> {
    self
      .model
      .as_deref()
      .ok_or(ApiError::ServiceUnavailable("AI features are not configured"))
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: EntityStore + 'static,
{
  Router::new()
    // Objects
    .route("/objects", get(objects::list::<S>).post(objects::create::<S>))
    .route(
      "/objects/{id}",
      get(objects::get_one::<S>)
        .put(objects::update::<S>)
        .delete(objects::delete::<S>),
    )
    .route("/objects/{id}/relations", get(objects::relations::<S>))
    .route("/objects/{id}/hierarchy", get(objects::hierarchies::<S>))
    // Relations
    .route("/relations", get(relations::list::<S>).post(relations::create::<S>))
    .route(
      "/relations/{id}",
      get(relations::get_one::<S>)
        .put(relations::update::<S>)
        .delete(relations::delete::<S>),
    )
    // Hierarchies
    .route(
      "/hierarchies",
      get(hierarchies::list::<S>).post(hierarchies::create::<S>),
    )
    .route(
      "/hierarchies/{id}",
      get(hierarchies::get_one::<S>)
        .put(hierarchies::update::<S>)
        .delete(hierarchies::delete::<S>),
    )
    // AI
    .route("/search", axum::routing::post(search::handler::<S>))
    .route("/chat", axum::routing::post(chat::send::<S>))
    .route("/chat/{id}", get(chat::get_session::<S>))
    // Reports
    .route("/reports/{kind}", get(reports::download::<S>))
    .with_state(state)
}
