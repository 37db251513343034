use crate::index::TermFrequencyVector;
use crate::tokenizer::tokenize;
use std::collections::HashMap;

/// Position of a document in insertion order. Stable across overwrites.
pub type DocOrd = usize;

#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub tf: TermFrequencyVector,
}

/// Per-id normalized term frequencies, kept in first-insertion order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<StoredDocument>,
    slots: HashMap<String, DocOrd>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Tokenize and store `text` under `id`. Returns true when an existing
    /// document was overwritten; the overwritten document keeps its slot.
    pub fn add(&mut self, id: &str, text: &str) -> bool {
        let doc = StoredDocument { id: id.to_string(), tf: term_frequencies(&tokenize(text)) };
        match self.slots.get(id) {
            Some(&ord) => {
                self.docs[ord] = doc;
                true
            }
            None => {
                self.slots.insert(doc.id.clone(), self.docs.len());
                self.docs.push(doc);
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&StoredDocument> {
        self.slots.get(id).map(|&ord| &self.docs[ord])
    }

    pub fn doc(&self, ord: DocOrd) -> Option<&StoredDocument> { self.docs.get(ord) }

    pub fn ord_of(&self, id: &str) -> Option<DocOrd> { self.slots.get(id).copied() }

    pub fn iter(&self) -> impl Iterator<Item = &StoredDocument> + '_ { self.docs.iter() }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

/// occurrences / total tokens for each distinct term. Empty input gives an empty vector.
pub fn term_frequencies(tokens: &[String]) -> TermFrequencyVector {
    let mut tf = TermFrequencyVector::new();
    if tokens.is_empty() { return tf; }
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for t in tokens {
        *counts.entry(t.as_str()).or_insert(0) += 1;
    }
    let total = tokens.len() as f64;
    for (term, count) in counts {
        tf.insert(term.to_string(), count as f64 / total);
    }
    tf
}
