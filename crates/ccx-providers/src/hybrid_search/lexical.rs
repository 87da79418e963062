//! BM25 text ranking for the sparse retrieval leg
//!
//! BM25 ranks documents by query term occurrence with term-frequency
//! saturation and document-length normalization.

use ccx_domain::constants::{BM25_B, BM25_K1, BM25_TOKEN_MIN_LENGTH};
use std::collections::{HashMap, HashSet};

/// BM25 parameters
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term frequency saturation
    pub k1: f32,
    /// Document length normalization
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: BM25_K1,
            b: BM25_B,
        }
    }
}

/// BM25 scorer over one collection of documents
#[derive(Debug)]
pub struct Bm25Scorer {
    document_freq: HashMap<String, usize>,
    total_docs: usize,
    avg_doc_len: f32,
    params: Bm25Params,
}

impl Bm25Scorer {
    /// Build a scorer from document contents
    pub fn new<'a, I>(documents: I, params: Bm25Params) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut document_freq = HashMap::new();
        let mut total_docs = 0usize;
        let mut total_length = 0.0f32;

        for content in documents {
            let tokens = tokenize(content);
            total_docs += 1;
            total_length += tokens.len() as f32;

            let unique: HashSet<String> = tokens.into_iter().collect();
            for term in unique {
                *document_freq.entry(term).or_insert(0) += 1;
            }
        }

        let avg_doc_len = if total_docs > 0 {
            total_length / total_docs as f32
        } else {
            0.0
        };

        Self {
            document_freq,
            total_docs,
            avg_doc_len,
            params,
        }
    }

    /// Score one document against a pre-tokenized query
    pub fn score_with_tokens(&self, content: &str, query_terms: &[String]) -> f32 {
        let doc_terms = tokenize(content);
        let doc_length = doc_terms.len() as f32;

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        for term in &doc_terms {
            *term_freq.entry(term.as_str()).or_insert(0) += 1;
        }

        let mut score = 0.0;
        for query_term in query_terms {
            let tf = *term_freq.get(query_term.as_str()).unwrap_or(&0) as f32;
            let df = *self.document_freq.get(query_term).unwrap_or(&0) as f32;
            if df == 0.0 || tf == 0.0 {
                continue;
            }

            let idf = if self.total_docs > 1 {
                ((self.total_docs as f32 - df + 0.5) / (df + 0.5)).ln().max(0.0)
            } else {
                1.0
            };

            let norm = self.params.k1
                * (1.0 - self.params.b + self.params.b * doc_length / self.avg_doc_len.max(1.0));
            score += idf * (tf * (self.params.k1 + 1.0)) / (tf + norm);
        }

        score
    }

    /// Score one document against a raw query
    pub fn score(&self, content: &str, query: &str) -> f32 {
        self.score_with_tokens(content, &tokenize(query))
    }

    /// Number of indexed documents
    pub fn total_docs(&self) -> usize {
        self.total_docs
    }
}

/// Lowercased alphanumeric-and-underscore tokens; very short tokens are
/// dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| token.len() > BM25_TOKEN_MIN_LENGTH)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS: &[&str] = &[
        "fn parse_config(path: &Path) -> Config",
        "fn render_widget(widget: &Widget)",
        "struct Config { path: PathBuf }",
    ];

    #[test]
    fn matching_terms_score_higher() {
        let scorer = Bm25Scorer::new(DOCS.iter().copied(), Bm25Params::default());
        let on_topic = scorer.score(DOCS[0], "parse config");
        let off_topic = scorer.score(DOCS[1], "parse config");
        assert!(on_topic > off_topic);
    }

    #[test]
    fn absent_terms_score_zero() {
        let scorer = Bm25Scorer::new(DOCS.iter().copied(), Bm25Params::default());
        assert_eq!(scorer.score(DOCS[0], "quaternion"), 0.0);
    }

    #[test]
    fn tokenizer_splits_on_punctuation() {
        let tokens = tokenize("fn parse_config(path: &Path) -> T");
        assert!(tokens.contains(&"parse_config".to_string()));
        assert!(tokens.contains(&"path".to_string()));
        // Single-character tokens are dropped.
        assert!(!tokens.contains(&"t".to_string()));
    }

    #[test]
    fn empty_collection_is_harmless() {
        let scorer = Bm25Scorer::new(std::iter::empty(), Bm25Params::default());
        assert_eq!(scorer.total_docs(), 0);
        assert_eq!(scorer.score("anything", "anything"), 0.0);
    }
}
