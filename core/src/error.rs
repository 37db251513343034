use crate::engine::EngineState;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// `search` called while the engine is not READY.
    NotReady { state: EngineState },
    /// A document id that is not `<entity_type>:<entity_id>`.
    InvalidDocumentId(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NotReady { state } => write!(f, "index not ready (state: {state}); call build_index first"),
            SearchError::InvalidDocumentId(id) => write!(f, "invalid document id: {id:?}"),
        }
    }
}

impl std::error::Error for SearchError {}

pub type Result<T> = std::result::Result<T, SearchError>;
