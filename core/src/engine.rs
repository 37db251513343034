use crate::config::EngineConfig;
use crate::error::{Result, SearchError};
use crate::index::{IndexStats, InvertedIndex, WeightedVector};
use crate::query::rank;
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineState {
    /// No documents yet.
    Empty,
    /// Documents added, never built.
    Accumulating,
    /// Built and queryable.
    Ready,
    /// Built, then written to again.
    Stale,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineState::Empty => "EMPTY",
            EngineState::Accumulating => "ACCUMULATING",
            EngineState::Ready => "READY",
            EngineState::Stale => "STALE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f64,
}

/// TF-IDF search engine with an explicit build lifecycle.
///
/// Documents go in with [`add_document`](Self::add_document), become visible
/// after [`build_index`](Self::build_index), and [`search`](Self::search) only
/// answers while the engine is [`EngineState::Ready`]. Writes after a build mark
/// the index stale; nothing is refreshed implicitly.
///
/// Not internally synchronized. Share it across threads through
/// [`SharedEngine`](crate::SharedEngine).
#[derive(Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    store: DocumentStore,
    index: Option<InvertedIndex>,
    state: EngineState,
}

impl Default for SearchEngine {
    fn default() -> Self { Self::with_config(EngineConfig::default()) }
}

impl SearchEngine {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, store: DocumentStore::new(), index: None, state: EngineState::Empty }
    }

    pub fn config(&self) -> EngineConfig { self.config }

    pub fn state(&self) -> EngineState { self.state }

    /// Store (or overwrite) a document. Does not rebuild.
    pub fn add_document(&mut self, doc_id: &str, text: &str) {
        let replaced = self.store.add(doc_id, text);
        tracing::debug!(doc_id, replaced, "document added");
        self.state = match self.state {
            EngineState::Ready | EngineState::Stale => EngineState::Stale,
            EngineState::Empty | EngineState::Accumulating => EngineState::Accumulating,
        };
    }

    /// Recompute idf and every weighted vector from the stored documents.
    pub fn build_index(&mut self) {
        let index = InvertedIndex::build(&self.store, self.config.idf);
        let IndexStats { num_docs, num_terms } = index.stats();
        if num_docs == 0 {
            tracing::warn!("index built over an empty corpus; every search will return no hits");
        } else {
            tracing::info!(num_docs, num_terms, "index built");
        }
        self.index = Some(index);
        self.state = EngineState::Ready;
    }

    /// Top `top_k` documents by cosine similarity, best first.
    ///
    /// An empty list means no document shares a known term with the query.
    /// Fails with [`SearchError::NotReady`] unless the engine is READY.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let index = match (self.state, &self.index) {
            (EngineState::Ready, Some(index)) => index,
            (state, _) => {
                tracing::warn!(%state, "search refused: index not ready");
                return Err(SearchError::NotReady { state });
            }
        };
        let hits: Vec<SearchHit> = rank(index, query, top_k)
            .into_iter()
            .filter_map(|(ord, score)| self.store.doc(ord).map(|d| SearchHit { doc_id: d.id.clone(), score }))
            .collect();
        tracing::debug!(query, top_k, hits = hits.len(), "search");
        Ok(hits)
    }

    /// Number of stored documents, built or not.
    pub fn len(&self) -> usize { self.store.len() }

    pub fn is_empty(&self) -> bool { self.store.is_empty() }

    /// Stats of the last build.
    pub fn stats(&self) -> Option<IndexStats> { self.index.as_ref().map(InvertedIndex::stats) }

    /// Corpus idf of `term` as of the last build.
    pub fn idf(&self, term: &str) -> Option<f64> { self.index.as_ref()?.idf.get(term).copied() }

    /// Weighted vector of `doc_id` as of the last build.
    pub fn weights(&self, doc_id: &str) -> Option<&WeightedVector> {
        let index = self.index.as_ref()?;
        let ord = self.store.ord_of(doc_id)?;
        index.weights.get(ord)
    }
}
