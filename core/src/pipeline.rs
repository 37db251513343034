//! Feeds entities from an [`EntitySource`] into a [`SharedEngine`] under a
//! [`RebuildPolicy`], and resolves search hits back into entity records.

use crate::config::RebuildPolicy;
use crate::engine::EngineState;
use crate::error::{Result, SearchError};
use crate::index::IndexStats;
use crate::shared::SharedEngine;
use crate::source::{EntityRecord, EntitySource};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    JobTask,
    JobPosition,
    JobDescription,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::JobTask => "job_task",
            EntityKind::JobPosition => "job_position",
            EntityKind::JobDescription => "job_description",
        }
    }
}

impl FromStr for EntityKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "job_task" => Ok(EntityKind::JobTask),
            "job_position" => Ok(EntityKind::JobPosition),
            "job_description" => Ok(EntityKind::JobDescription),
            other => bail!("unknown entity kind: {other:?}"),
        }
    }
}

/// Composite document id, `<entity_type>:<entity_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self { Self { kind, id: id.into() } }

    pub fn parse(doc_id: &str) -> Result<Self> {
        let invalid = || SearchError::InvalidDocumentId(doc_id.to_string());
        let (kind, id) = doc_id.split_once(':').ok_or_else(invalid)?;
        if id.is_empty() {
            return Err(invalid());
        }
        let kind = kind.parse::<EntityKind>().map_err(|_| invalid())?;
        Ok(Self::new(kind, id))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}:{}", self.kind.as_str(), self.id) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedHit {
    pub key: EntityKey,
    pub score: f64,
    pub record: EntityRecord,
}

pub struct IndexingPipeline<S> {
    engine: SharedEngine,
    source: S,
    policy: RebuildPolicy,
}

impl<S: EntitySource> IndexingPipeline<S> {
    pub fn new(engine: SharedEngine, source: S, policy: RebuildPolicy) -> Self { Self { engine, source, policy } }

    pub fn engine(&self) -> &SharedEngine { &self.engine }

    pub fn source(&self) -> &S { &self.source }

    pub fn policy(&self) -> RebuildPolicy { self.policy }

    /// Index every entity the source holds and build, whatever the policy.
    pub fn load_all(&self) -> anyhow::Result<IndexStats> {
        let records = self.source.entities()?;
        let stats = self.engine.with_write(|engine| {
            for r in &records {
                engine.add_document(&r.key().to_string(), &r.indexed_text());
            }
            engine.build_index();
            engine.stats()
        });
        Ok(stats.unwrap_or(IndexStats { num_docs: 0, num_terms: 0 }))
    }

    /// Add one record. Returns whether the policy triggered a rebuild.
    pub fn index_record(&self, record: &EntityRecord) -> bool { self.index_batch(std::slice::from_ref(record)) }

    /// Add records, then rebuild once if the policy is write-through.
    pub fn index_batch(&self, records: &[EntityRecord]) -> bool {
        let write_through = self.policy == RebuildPolicy::WriteThrough;
        self.engine.with_write(|engine| {
            for r in records {
                engine.add_document(&r.key().to_string(), &r.indexed_text());
            }
            if write_through && !records.is_empty() {
                engine.build_index();
            }
        });
        write_through && !records.is_empty()
    }

    /// Rebuild when there are writes the index has not seen (timer tick).
    pub fn rebuild_if_needed(&self) -> bool {
        let rebuilt = self.engine.build_if_outdated();
        if rebuilt {
            tracing::debug!(policy = %self.policy, "rebuilt outdated index");
        }
        rebuilt
    }

    pub fn state(&self) -> EngineState { self.engine.state() }

    /// Search and resolve each hit through the source. Hits whose id does not
    /// parse or whose entity no longer exists are skipped.
    pub fn search_entities(&self, query: &str, top_k: usize) -> Result<Vec<ResolvedHit>> {
        let hits = self.engine.search(query, top_k)?;
        let mut resolved = Vec::with_capacity(hits.len());
        for hit in hits {
            let key = match EntityKey::parse(&hit.doc_id) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping hit");
                    continue;
                }
            };
            match self.source.get(&key) {
                Some(record) => resolved.push(ResolvedHit { key, score: hit.score, record }),
                None => tracing::debug!(doc_id = %hit.doc_id, "skipping hit for deleted entity"),
            }
        }
        Ok(resolved)
    }
}
