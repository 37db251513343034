use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Letter runs only: digits, underscores and punctuation never become terms.
    static ref RE: Regex = Regex::new(r"(?u)\p{L}{2,}").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "an","and","are","as","at",
            "be","but","by",
            "for","from",
            "has","have",
            "in","into","is","it","its",
            "of","on","or",
            "that","the","this","to",
            "was","were","will","with",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize text into an ordered list of terms: NFKC normalization, lowercase,
/// letter runs of two or more characters, stopword removal.
///
/// Total over any input; blank or punctuation-only text yields an empty list.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}
