use crate::config::IdfMode;
use crate::store::{DocOrd, DocumentStore};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// term -> occurrences / total tokens, for one document
pub type TermFrequencyVector = BTreeMap<String, f64>;
/// term -> tf * idf
pub type WeightedVector = BTreeMap<String, f64>;
/// term -> idf over the corpus as of the last build
pub type IdfTable = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc: DocOrd,
    pub weight: f64, // tf-idf weight, not length-normalized
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub num_docs: usize,
    pub num_terms: usize,
}

/// Snapshot of the corpus at build time. Never patched, only rebuilt.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    pub idf: IdfTable,
    pub postings: HashMap<String, Vec<Posting>>, // postings sorted by doc ordinal
    pub weights: Vec<WeightedVector>,
    pub norms: Vec<f64>,
    pub num_docs: usize,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Full recompute over every stored document.
    pub fn build(store: &DocumentStore, mode: IdfMode) -> Self {
        let num_docs = store.len();

        // Pass 1: document frequencies -> idf
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in store.iter() {
            for term in doc.tf.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let idf: IdfTable = df.into_iter().map(|(term, df_t)| (term.to_string(), idf(num_docs, df_t, mode))).collect();

        // Pass 2: weighted vectors, norms and postings in document order
        let mut weights = Vec::with_capacity(store.len());
        let mut norms = Vec::with_capacity(store.len());
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::with_capacity(idf.len());
        for (ord, doc) in store.iter().enumerate() {
            let mut wv = WeightedVector::new();
            for (term, tf) in doc.tf.iter() {
                let w = tf * idf.get(term).copied().unwrap_or(0.0);
                wv.insert(term.clone(), w);
                postings.entry(term.clone()).or_default().push(Posting { doc: ord, weight: w });
            }
            norms.push(magnitude(&wv));
            weights.push(wv);
        }

        Self { idf, postings, weights, norms, num_docs }
    }

    pub fn stats(&self) -> IndexStats { IndexStats { num_docs: self.num_docs, num_terms: self.idf.len() } }
}

/// ln(N / df), or ln(1 + N / df) when smoothed. A zero df never divides.
pub fn idf(num_docs: usize, df: usize, mode: IdfMode) -> f64 {
    if df == 0 || num_docs == 0 { return 0.0; }
    let ratio = num_docs as f64 / df as f64;
    match mode {
        IdfMode::Standard => ratio.ln(),
        IdfMode::Smoothed => (1.0 + ratio).ln(),
    }
}

pub fn magnitude(v: &BTreeMap<String, f64>) -> f64 {
    v.values().map(|w| w * w).sum::<f64>().sqrt()
}
