//! TF-IDF vectorization of movie synopses.
//!
//! Tokens are runs of two or more word characters, lowercased, with English stop
//! words removed. Weights use raw term counts and smoothed IDF,
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalized so that a dot
//! product between two rows is their cosine similarity.

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use regex::Regex;

use super::stop_words::is_stop_word;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").expect("valid regex");
}

/// Lowercases `text` and splits it into vocabulary candidates
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Sparse row: `(column, weight)` pairs sorted by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product via a merge over the sorted columns
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, wi) = self.entries[i];
            let (cj, wj) = other.entries[j];
            match ci.cmp(&cj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wi * wj;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// TF-IDF weights for a corpus, one row per document
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    pub rows: Vec<SparseVector>,
    /// Vocabulary terms, indexed by column
    pub terms: Vec<String>,
    pub idf: Vec<f64>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer;

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self
    }

    /// Learns the vocabulary and IDF from `documents` and returns their weights
    ///
    /// An all-empty corpus produces an empty vocabulary and all-zero rows.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> FeatureMatrix {
        let tokenized: Vec<Vec<String>> =
            documents.iter().map(|d| tokenize(d.as_ref())).collect();

        // Document frequency, keyed in sorted order so columns are deterministic
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        let terms: Vec<String> = df.keys().map(|t| t.to_string()).collect();
        let idf: Vec<f64> = df
            .values()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
            .collect();
        let columns: HashMap<&str, usize> = df
            .keys()
            .enumerate()
            .map(|(col, term)| (*term, col))
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for token in tokens {
                    if let Some(&col) = columns.get(token.as_str()) {
                        *counts.entry(col).or_insert(0.0) += 1.0;
                    }
                }

                let mut row = SparseVector {
                    entries: counts
                        .into_iter()
                        .map(|(col, tf)| (col, tf * idf[col]))
                        .collect(),
                };
                let norm = row.norm();
                if norm > 0.0 {
                    for (_, w) in row.entries.iter_mut() {
                        *w /= norm;
                    }
                }
                row
            })
            .collect();

        FeatureMatrix { rows, terms, idf }
    }
}
