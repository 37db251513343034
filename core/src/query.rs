use crate::index::{magnitude, IdfTable, InvertedIndex, WeightedVector};
use crate::store::{term_frequencies, DocOrd};
use crate::tokenizer::tokenize;
use std::collections::HashMap;

/// Query tf weighted by corpus idf. Terms missing from the idf table are dropped.
pub fn query_vector(query: &str, idf: &IdfTable) -> WeightedVector {
    let tokens = tokenize(query);
    term_frequencies(&tokens)
        .into_iter()
        .filter_map(|(term, tf)| idf.get(&term).map(|w| (term, tf * w)))
        .collect()
}

/// Cosine similarity of the query against every document sharing at least one
/// query term, best first. Ties keep document order. Scores are in [0, 1].
pub fn rank(index: &InvertedIndex, query: &str, top_k: usize) -> Vec<(DocOrd, f64)> {
    let q = query_vector(query, &index.idf);
    if q.is_empty() || top_k == 0 {
        return Vec::new();
    }
    let q_norm = magnitude(&q);

    // Dot products over the term intersection, accumulated from postings
    let mut dots: HashMap<DocOrd, f64> = HashMap::new();
    for (term, q_w) in q.iter() {
        if let Some(postings) = index.postings.get(term) {
            for p in postings {
                *dots.entry(p.doc).or_insert(0.0) += p.weight * q_w;
            }
        }
    }

    let mut scored: Vec<(DocOrd, f64)> = dots
        .into_iter()
        .map(|(doc, dot)| {
            let d_norm = index.norms.get(doc).copied().unwrap_or(0.0);
            (doc, cosine(dot, q_norm, d_norm))
        })
        .collect();
    scored.sort_unstable_by_key(|(doc, _)| *doc);
    // stable: equal scores stay in document order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);
    scored
}

fn cosine(dot: f64, a_norm: f64, b_norm: f64) -> f64 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    (dot / (a_norm * b_norm)).clamp(0.0, 1.0)
}
