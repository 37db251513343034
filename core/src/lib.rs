//! In-process TF-IDF search over job catalog entities (tasks, positions,
//! descriptions): tokenize, weight by inverse document frequency, rank by
//! cosine similarity.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod query;
pub mod shared;
pub mod source;
pub mod store;
pub mod tokenizer;

pub use config::{EngineConfig, IdfMode, RebuildPolicy};
pub use engine::{EngineState, SearchEngine, SearchHit};
pub use error::SearchError;
pub use index::{IdfTable, IndexStats, InvertedIndex, Posting, TermFrequencyVector, WeightedVector};
pub use pipeline::{EntityKey, EntityKind, IndexingPipeline, ResolvedHit};
pub use shared::SharedEngine;
pub use source::{load_records, EntityRecord, EntitySource, MemorySource};
pub use store::{DocOrd, DocumentStore};
