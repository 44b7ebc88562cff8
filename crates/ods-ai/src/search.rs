//! Natural-language search over objects.
//!
//! Every object is rendered into the prompt; the model answers with scored
//! object ids which are resolved back to full records.

use ods_core::{
  object::ObjectRecord, store::EntityStore, validate::not_blank,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

use crate::{
  Error, Result,
  model::{ChatModel, CompletionRequest, PromptMessage},
};

const SYSTEM_PROMPT: &str = "You are an intelligent search assistant that helps \
                             find relevant objects based on user queries. \
                             Respond with JSON only.";

const NO_ANALYSIS: &str = "No analysis provided";

/// Body of `POST /search`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchRequest {
  #[validate(custom(function = "not_blank"))]
  pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
  pub object:    ObjectRecord,
  /// In `[0, 1]`.
  pub relevance: f64,
  pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
  /// Highest relevance first.
  pub results:   Vec<SearchHit>,
  pub query:     String,
  /// The model's reading of what the user is looking for.
  pub reasoning: String,
}

// ─── Prompt ──────────────────────────────────────────────────────────────────

pub fn build_search_prompt(query: &str, objects: &[ObjectRecord]) -> String {
  let catalogue: Vec<_> = objects
    .iter()
    .map(|o| {
      json!({
        "id": o.id,
        "name": o.name,
        "description": o.description,
        "type": o.kind,
        "attributes": o.attributes,
      })
    })
    .collect();
  let catalogue = Value::Array(catalogue);

  format!(
    "Analyze this search query: {query:?}\n\n\
     Available objects:\n{catalogue}\n\n\
     Find the most relevant objects based on the query. Consider object \
     names, descriptions, attributes, and content.\n\
     Return your response as JSON in this format:\n\
     {{\"results\": [{{\"object_id\": \"string\", \"relevance\": \
     number_between_0_and_1, \"reasoning\": \"string\"}}], \
     \"query_analysis\": \"what the user is looking for\"}}"
  )
}

// ─── Reply ───────────────────────────────────────────────────────────────────

/// The model's answer. Hits stay untyped so one malformed entry is dropped
/// instead of failing the whole reply.
#[derive(Debug, Deserialize)]
struct SearchReply {
  #[serde(default)]
  results:        Option<Vec<Value>>,
  #[serde(default)]
  query_analysis: Value,
}

/// Resolve one hit; `None` unless `object_id` is a string naming an object.
fn resolve_hit(hit: &Value, objects: &[ObjectRecord]) -> Option<SearchHit> {
  let id = hit.get("object_id")?.as_str()?;
  let object = objects.iter().find(|o| o.id.as_str() == id)?;
  let relevance = hit
    .get("relevance")
    .and_then(Value::as_f64)
    .filter(|r| !r.is_nan())
    .map_or(0.0, |r| r.clamp(0.0, 1.0));
  let reasoning = hit.get("reasoning").and_then(Value::as_str).unwrap_or_default();
  Some(SearchHit { object: object.clone(), relevance, reasoning: reasoning.to_owned() })
}

/// Resolve a JSON reply against `objects`.
///
/// Hits whose `object_id` is missing, not a string, or names no object are
/// dropped. Relevance is clamped to `[0, 1]` (absent counts as 0) and hits
/// are sorted by descending relevance, ties keeping the model's order.
pub fn parse_search_reply(
  query: &str,
  reply: &str,
  objects: &[ObjectRecord],
) -> Result<SearchResponse> {
  let parsed: SearchReply = serde_json::from_str(reply)
    .map_err(|e| Error::MalformedResponse(e.to_string()))?;

  let mut results: Vec<SearchHit> = parsed
    .results
    .unwrap_or_default()
    .iter()
    .filter_map(|hit| resolve_hit(hit, objects))
    .collect();
  results.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));

  Ok(SearchResponse {
    results,
    query: query.to_owned(),
    reasoning: parsed
      .query_analysis
      .as_str()
      .filter(|s| !s.trim().is_empty())
      .map_or_else(|| NO_ANALYSIS.to_owned(), str::to_owned),
  })
}

// ─── Orchestration ───────────────────────────────────────────────────────────

/// Rank the store's objects against `query`.
pub async fn search<S: EntityStore>(
  store: &S,
  model: &dyn ChatModel,
  query: &str,
) -> Result<SearchResponse> {
  let objects = store.list_objects().await.map_err(Error::store)?;

  let reply = model
    .complete(CompletionRequest {
      messages:      vec![
        PromptMessage::system(SYSTEM_PROMPT),
        PromptMessage::user(build_search_prompt(query, &objects)),
      ],
      json_response: true,
    })
    .await?;

  let response = parse_search_reply(query, &reply, &objects)?;
  tracing::info!(query, hits = response.results.len(), "search completed");
  Ok(response)
}
