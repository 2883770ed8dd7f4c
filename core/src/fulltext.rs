//! Full-text matching and BM25 relevance over English definitions.
//!
//! Definitions are tokenized into lowercase alphanumeric runs. Two query
//! shapes are supported:
//! - `Phrase`: every query token, consecutive and in order
//! - `Prefix`: any token starting with the single query term (trailing wildcard)
//!
//! Matching documents are scored with Okapi BM25 over the matched terms.

use crate::entry::LexiconEntry;
use ahash::{AHashMap, AHashSet};
use std::cmp::Ordering;

const BM25_K1: f32 = 1.2;
const BM25_B: f32 = 0.75;

/// Split text into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// A parsed full-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullTextQuery {
    /// Multi-word input, matched as a phrase.
    Phrase(Vec<String>),
    /// Single-word input, matched with trailing-wildcard expansion.
    Prefix(String),
}

impl FullTextQuery {
    /// Parse raw query text. Returns `None` when the text has no tokens.
    pub fn from_text(text: &str) -> Option<Self> {
        let mut tokens = tokenize(text);
        match tokens.len() {
            0 => None,
            1 => tokens.pop().map(FullTextQuery::Prefix),
            _ => Some(FullTextQuery::Phrase(tokens)),
        }
    }

    /// Distinct terms of `doc` that satisfy this query; empty when the
    /// document does not match.
    pub fn matched_terms<'a>(&'a self, doc: &'a [String]) -> Vec<&'a str> {
        match self {
            FullTextQuery::Phrase(terms) => {
                if terms.is_empty() || !doc.windows(terms.len()).any(|w| w == terms.as_slice()) {
                    return Vec::new();
                }
                dedup_terms(terms.iter().map(String::as_str))
            }
            FullTextQuery::Prefix(prefix) => dedup_terms(
                doc.iter()
                    .filter(|t| t.starts_with(prefix.as_str()))
                    .map(String::as_str),
            ),
        }
    }
}

fn dedup_terms<'a, I: Iterator<Item = &'a str>>(terms: I) -> Vec<&'a str> {
    let mut seen = AHashSet::new();
    terms.filter(|t| seen.insert(*t)).collect()
}

/// Token statistics for a corpus of definitions.
///
/// Documents are addressed by their position in the iterator passed to
/// `build`.
#[derive(Debug, Clone, Default)]
pub struct FullTextIndex {
    docs: Vec<Vec<String>>,
    doc_freqs: AHashMap<String, usize>,
    avg_doc_len: f32,
}

impl FullTextIndex {
    pub fn build<'a, I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let docs: Vec<Vec<String>> = definitions.into_iter().map(tokenize).collect();
        let mut doc_freqs: AHashMap<String, usize> = AHashMap::new();
        let mut total_len = 0usize;
        for doc in &docs {
            total_len += doc.len();
            let distinct: AHashSet<&String> = doc.iter().collect();
            for token in distinct {
                *doc_freqs.entry(token.clone()).or_insert(0) += 1;
            }
        }
        let avg_doc_len = if docs.is_empty() {
            0.0
        } else {
            total_len as f32 / docs.len() as f32
        };
        Self {
            docs,
            doc_freqs,
            avg_doc_len,
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Return `(doc position, score)` for every matching document, in
    /// document order. Higher scores are more relevant.
    pub fn search(&self, query: &FullTextQuery) -> Vec<(usize, f32)> {
        self.docs
            .iter()
            .enumerate()
            .filter_map(|(pos, doc)| {
                let terms = query.matched_terms(doc);
                if terms.is_empty() {
                    None
                } else {
                    Some((pos, self.bm25(&terms, doc)))
                }
            })
            .collect()
    }

    fn bm25(&self, terms: &[&str], doc: &[String]) -> f32 {
        let n = self.docs.len() as f32;
        let doc_len = doc.len() as f32;
        let length_norm = BM25_B.mul_add(doc_len / self.avg_doc_len.max(1.0), 1.0 - BM25_B);

        let mut score = 0.0;
        for term in terms {
            let tf = doc.iter().filter(|t| t.as_str() == *term).count() as f32;
            if tf == 0.0 {
                continue;
            }
            let df = self.doc_freqs.get(*term).copied().unwrap_or(0) as f32;
            let idf = ((n - df + 0.5) / (df + 0.5)).ln_1p().max(0.0);
            let denom = BM25_K1.mul_add(length_norm, tf);
            score += idf * (tf * (BM25_K1 + 1.0) / denom);
        }
        score
    }
}

/// Order scored hits by relevance (descending), then by `rank_key`.
pub fn rank_hits(mut hits: Vec<(LexiconEntry, f32)>) -> Vec<LexiconEntry> {
    hits.sort_by(|(a, sa), (b, sb)| {
        sb.partial_cmp(sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.rank_key().cmp(&b.rank_key()))
    });
    hits.into_iter().map(|(entry, _)| entry).collect()
}
