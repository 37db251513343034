use anyhow::Result;
use axum::{extract::{Query, State}, http::HeaderMap, routing::{get, post}, Json, Router};
use jobsearch_core::tokenizer::tokenize;
use jobsearch_core::{load_records, EngineConfig, EngineState, EntityRecord, IndexingPipeline, MemorySource, RebuildPolicy, SearchEngine, SharedEngine};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod errors;
pub use errors::ApiError;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Corpus loaded and built at startup
    pub input: Option<PathBuf>,
    pub engine: EngineConfig,
    pub policy: RebuildPolicy,
    pub admin_token: Option<String>,
    /// Comma-separated allowed origins; any origin when unset
    pub cors_allow_origin: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub kind: String,
    pub entity_id: String,
    pub score: f64,
    pub title: String,
    pub snippet: Option<String>,
}

#[derive(Serialize)]
pub struct IndexStatus {
    pub state: EngineState,
    pub policy: String,
    pub stored_docs: usize,
    pub indexed_docs: usize,
    pub num_terms: usize,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub accepted: usize,
    pub rebuilt: bool,
    pub state: EngineState,
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IndexingPipeline<MemorySource>>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let records = match &config.input {
            Some(path) => load_records(path)?,
            None => Vec::new(),
        };
        let source = MemorySource::from_records(records);
        let engine = SharedEngine::new(SearchEngine::with_config(config.engine));
        let pipeline = IndexingPipeline::new(engine, source, config.policy);
        if config.input.is_some() {
            let stats = pipeline.load_all()?;
            tracing::info!(num_docs = stats.num_docs, num_terms = stats.num_terms, policy = %config.policy, "startup index built");
        }
        Ok(Self { pipeline: Arc::new(pipeline), admin_token: config.admin_token.clone() })
    }
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let state = AppState::new(&config)?;
    Ok(router(state, config.cors_allow_origin.as_deref()))
}

pub fn router(app_state: AppState, cors_allow_origin: Option<&str>) -> Router {
    let cors = match cors_allow_origin {
        Some(val) => {
            let origins: Vec<_> = val
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/index/status", get(status_handler))
        .route("/index/batch", post(index_batch))
        .route("/index/commit", post(index_commit))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Rebuild on a timer when the policy asks for it. None for other policies.
pub fn spawn_rebuild_timer(state: &AppState) -> Option<JoinHandle<()>> {
    let RebuildPolicy::Interval(period) = state.pipeline.policy() else { return None };
    let pipeline = state.pipeline.clone();
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            let p = pipeline.clone();
            match tokio::task::spawn_blocking(move || p.rebuild_if_needed()).await {
                Ok(true) => tracing::info!("scheduled rebuild complete"),
                Ok(false) => {}
                Err(e) => tracing::error!(error = %e, "scheduled rebuild panicked"),
            }
        }
    }))
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, 100);
    let hits = state.pipeline.search_entities(&params.q, k)?;

    let highlighter = term_pattern(&tokenize(&params.q));
    let results: Vec<SearchHit> = hits
        .into_iter()
        .map(|h| SearchHit {
            doc_id: h.key.to_string(),
            kind: h.key.kind.as_str().to_string(),
            entity_id: h.key.id,
            score: h.score,
            snippet: highlighter.as_ref().and_then(|re| snippet(&h.record.text, re)),
            title: h.record.title,
        })
        .collect();

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results }))
}

pub async fn status_handler(State(state): State<AppState>) -> Json<IndexStatus> {
    let engine = state.pipeline.engine();
    let stats = engine.stats();
    Json(IndexStatus {
        state: engine.state(),
        policy: state.pipeline.policy().to_string(),
        stored_docs: engine.len(),
        indexed_docs: stats.map_or(0, |s| s.num_docs),
        num_terms: stats.map_or(0, |s| s.num_terms),
    })
}

async fn index_batch(State(state): State<AppState>, headers: HeaderMap, Json(records): Json<Vec<EntityRecord>>) -> Result<Json<BatchResponse>, ApiError> {
    authorize(&state, &headers)?;
    if let Some(bad) = records.iter().find(|r| r.id.is_empty() || r.id.contains(char::is_whitespace)) {
        return Err(ApiError::BadRequest(format!("invalid entity id: {:?}", bad.id)));
    }
    let accepted = records.len();
    let pipeline = state.pipeline.clone();
    // a write-through batch rebuilds under the write lock
    let rebuilt = tokio::task::spawn_blocking(move || {
        for r in &records {
            pipeline.source().upsert(r.clone());
        }
        pipeline.index_batch(&records)
    })
    .await?;
    Ok(Json(BatchResponse { accepted, rebuilt, state: state.pipeline.state() }))
}

async fn index_commit(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<IndexStatus>, ApiError> {
    authorize(&state, &headers)?;
    let pipeline = state.pipeline.clone();
    tokio::task::spawn_blocking(move || pipeline.engine().build_index()).await?;
    Ok(status_handler(State(state)).await)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(ApiError::Unauthorized("ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("invalid admin token".into()))
    }
}

/// Case-insensitive alternation of the query terms, matched at word starts.
fn term_pattern(terms: &[String]) -> Option<Regex> {
    if terms.is_empty() { return None; }
    let alts: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
    RegexBuilder::new(&format!(r"\b(?:{})", alts.join("|"))).case_insensitive(true).build().ok()
}

/// Window of `text` around the first term match, matches wrapped in `<em>`.
fn snippet(text: &str, terms: &Regex) -> Option<String> {
    if text.is_empty() { return None; }
    let window = match terms.find(text) {
        Some(m) => {
            let start = floor_char_boundary(text, m.start().saturating_sub(100));
            let end = ceil_char_boundary(text, (m.start() + 200).min(text.len()));
            &text[start..end]
        }
        None => {
            let end = text.char_indices().nth(200).map_or(text.len(), |(i, _)| i);
            &text[..end]
        }
    };
    Some(terms.replace_all(window, "<em>$0</em>").into_owned())
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while !s.is_char_boundary(i) { i -= 1; }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while !s.is_char_boundary(i) { i += 1; }
    i
}
