use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sparse::SparseVector;

/// Default cap on the fitted term space.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Placeholder some upstream exports stamp into rows with no usable symptom
/// text. Rows that clean down to exactly this are dropped before fitting.
const EMPTY_PLACEHOLDER: &str = "default_symptom";

/// Clean a raw symptom document before fitting or encoding: delimiters
/// become spaces, internal whitespace collapses to single spaces, the result
/// is trimmed. `None` when nothing usable is left.
pub fn clean_document(raw: &str) -> Option<String> {
    let cleaned = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() || cleaned == EMPTY_PLACEHOLDER {
        None
    } else {
        Some(cleaned)
    }
}

/// Weighted-scheme term model: smoothed inverse-document-frequency weights
/// over a capped term space, fitted once per index build.
///
/// The term table keeps at most `max_features` terms, preferring those that
/// appear in the most documents (ties broken alphabetically), and stores
/// them sorted so vector positions are deterministic across builds.
///
/// IDF uses the smoothed form `ln((1 + n) / (1 + df)) + 1`; encoded vectors
/// are l2-normalized `count * idf`. Terms outside the fitted table get zero
/// weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfModel {
    terms: Vec<Box<str>>,
    positions: HashMap<Box<str>, u32>,
    idf: Vec<f32>,
    doc_count: usize,
}

impl TfIdfModel {
    /// Fit over already-cleaned documents (see [`clean_document`]).
    ///
    /// An empty document slice fits to a degenerate model that encodes
    /// everything to the zero vector; callers surface that as "no
    /// recommendations" rather than an error.
    pub fn fit(documents: &[String], max_features: usize) -> Self {
        let doc_count = documents.len();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in documents {
            let mut seen: Vec<&str> = doc.split_whitespace().collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = doc_freq.into_iter().collect();
        // most-widespread terms first, alphabetical within the same df
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if ranked.len() > max_features {
            warn!(
                terms = ranked.len(),
                max_features, "term space exceeds cap, truncating"
            );
            ranked.truncate(max_features);
        }

        ranked.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut terms: Vec<Box<str>> = Vec::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        let n = doc_count as f64;
        for (term, df) in &ranked {
            terms.push(Box::from(*term));
            idf.push((((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0) as f32);
        }
        let positions = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i as u32))
            .collect();

        Self {
            terms,
            positions,
            idf,
            doc_count,
        }
    }

    /// True when no document survived cleaning or no term was kept.
    pub fn is_degenerate(&self) -> bool {
        self.doc_count == 0 || self.terms.is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Encode a cleaned document into the fitted term space.
    /// Unknown terms contribute nothing; a document with no known terms
    /// encodes to the zero vector.
    pub fn encode(&self, document: &str) -> SparseVector<f32> {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for term in document.split_whitespace() {
            if let Some(pos) = self.positions.get(term) {
                *counts.entry(*pos).or_insert(0) += 1;
            }
        }
        let mut weighted: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(pos, count)| (pos, count as f32 * self.idf[pos as usize]))
            .collect();
        weighted.sort_unstable_by_key(|(pos, _)| *pos);

        let norm = weighted
            .iter()
            .map(|(_, w)| (*w as f64) * (*w as f64))
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            let inv = (1.0 / norm) as f32;
            for (_, w) in weighted.iter_mut() {
                *w *= inv;
            }
        }
        SparseVector::from_pairs(weighted)
    }
}
