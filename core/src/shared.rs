use crate::engine::{EngineState, SearchEngine, SearchHit};
use crate::error::Result;
use crate::index::IndexStats;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe handle to one engine. Writes take the write lock; searches
/// share the read lock and only see a fully built index.
#[derive(Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<SearchEngine>>,
}

impl SharedEngine {
    pub fn new(engine: SearchEngine) -> Self { Self { inner: Arc::new(RwLock::new(engine)) } }

    pub fn add_document(&self, doc_id: &str, text: &str) { self.inner.write().add_document(doc_id, text) }

    pub fn build_index(&self) -> Option<IndexStats> {
        let mut engine = self.inner.write();
        engine.build_index();
        engine.stats()
    }

    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> { self.inner.read().search(query, top_k) }

    pub fn state(&self) -> EngineState { self.inner.read().state() }

    pub fn stats(&self) -> Option<IndexStats> { self.inner.read().stats() }

    pub fn len(&self) -> usize { self.inner.read().len() }

    pub fn is_empty(&self) -> bool { self.inner.read().is_empty() }

    /// Build only when there are writes the index has not seen.
    /// Checked and built under one write lock.
    pub fn build_if_outdated(&self) -> bool {
        let mut engine = self.inner.write();
        match engine.state() {
            EngineState::Accumulating | EngineState::Stale => {
                engine.build_index();
                true
            }
            EngineState::Empty | EngineState::Ready => false,
        }
    }

    /// Run `f` with exclusive access, e.g. to add a batch and build atomically.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut SearchEngine) -> R) -> R { f(&mut self.inner.write()) }
}
