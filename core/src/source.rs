use crate::pipeline::{EntityKey, EntityKind};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One searchable entity as the backing store holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl EntityRecord {
    pub fn key(&self) -> EntityKey { EntityKey::new(self.kind, self.id.clone()) }

    /// Text fed to the engine: title, then body.
    pub fn indexed_text(&self) -> String {
        if self.text.is_empty() { self.title.clone() } else { format!("{} {}", self.title, self.text) }
    }
}

/// Where entity text comes from, and where hits are resolved back to records.
pub trait EntitySource {
    /// Every entity that should be indexed, in a stable order.
    fn entities(&self) -> Result<Vec<EntityRecord>>;
    /// Current record for `key`, or None if it has been deleted.
    fn get(&self, key: &EntityKey) -> Option<EntityRecord>;
}

#[derive(Default)]
struct Records {
    order: Vec<EntityKey>,
    by_key: HashMap<EntityKey, EntityRecord>,
}

/// In-memory entity store, insertion ordered.
#[derive(Default)]
pub struct MemorySource {
    records: RwLock<Records>,
}

impl MemorySource {
    pub fn new() -> Self { Self::default() }

    pub fn from_records(records: impl IntoIterator<Item = EntityRecord>) -> Self {
        let source = Self::new();
        for r in records {
            source.upsert(r);
        }
        source
    }

    /// Insert or replace; a replaced record keeps its position.
    pub fn upsert(&self, record: EntityRecord) {
        let mut records = self.records.write();
        let key = record.key();
        if records.by_key.insert(key.clone(), record).is_none() {
            records.order.push(key);
        }
    }

    pub fn remove(&self, key: &EntityKey) -> Option<EntityRecord> {
        let mut records = self.records.write();
        let removed = records.by_key.remove(key)?;
        records.order.retain(|k| k != key);
        Some(removed)
    }

    pub fn len(&self) -> usize { self.records.read().order.len() }

    pub fn is_empty(&self) -> bool { self.records.read().order.is_empty() }
}

impl EntitySource for MemorySource {
    fn entities(&self) -> Result<Vec<EntityRecord>> {
        let records = self.records.read();
        Ok(records.order.iter().filter_map(|k| records.by_key.get(k).cloned()).collect())
    }

    fn get(&self, key: &EntityKey) -> Option<EntityRecord> { self.records.read().by_key.get(key).cloned() }
}

/// Load entity records from a `.json` / `.jsonl` file, or every such file under a directory.
pub fn load_records(input: &Path) -> Result<Vec<EntityRecord>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input path not found: {}", input.display());
    }

    let mut records = Vec::new();
    for file in files {
        if extension(&file) == Some("jsonl") {
            read_jsonl(&file, &mut records)?;
        } else {
            read_json(&file, &mut records)?;
        }
    }
    tracing::info!(input = %input.display(), records = records.len(), "loaded entity records");
    Ok(records)
}

fn extension(p: &Path) -> Option<&str> { p.extension().and_then(|s| s.to_str()) }

fn read_jsonl(file: &Path, out: &mut Vec<EntityRecord>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let record: EntityRecord = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid entity record", file.display(), lineno + 1))?;
        out.push(record);
    }
    Ok(())
}

fn read_json(file: &Path, out: &mut Vec<EntityRecord>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                out.push(serde_json::from_value(v).with_context(|| format!("{}: invalid entity record", file.display()))?);
            }
        }
        serde_json::Value::Object(_) => {
            out.push(serde_json::from_value(json).with_context(|| format!("{}: invalid entity record", file.display()))?);
        }
        _ => tracing::warn!(file = %file.display(), "skipping json file that is neither an object nor an array"),
    }
    Ok(())
}
