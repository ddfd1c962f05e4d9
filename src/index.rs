use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sparse::SparseVector;

/// Immutable nearest-neighbor index over the vectorized corpus.
///
/// Built once per corpus load and never mutated afterwards; any corpus
/// change means a full rebuild. The rows are `(record id, feature vector)`
/// in corpus order, and a built index is safe to query from many threads
/// at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityIndex {
    ids: Vec<usize>,
    vectors: Vec<SparseVector<f32>>,
}

impl SimilarityIndex {
    /// Snapshot the vectorized rows. Row order is corpus order, which is
    /// what makes the search tie-break deterministic.
    pub fn build(rows: Vec<(usize, SparseVector<f32>)>) -> Self {
        let (ids, vectors) = rows.into_iter().unzip();
        let index = Self { ids, vectors };
        debug!(rows = index.len(), "similarity index built");
        index
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The `k` nearest rows to `query` by cosine distance, ascending;
    /// equal distances fall back to record order. `k` larger than the
    /// corpus clamps to the corpus size.
    ///
    /// Scoring runs per row in parallel; the result is assembled and sorted
    /// on the calling thread, so the ordering is deterministic regardless
    /// of thread count.
    pub fn search(&self, query: &SparseVector<f32>, k: usize) -> Vec<(usize, f64)> {
        let k = k.min(self.len());
        if k == 0 {
            return Vec::new();
        }
        let mut scored: Vec<(usize, f64)> = self
            .vectors
            .par_iter()
            .zip(self.ids.par_iter())
            .map(|(vec, id)| (*id, query.cosine_distance(vec)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sv(pairs: &[(u32, f32)]) -> SparseVector<f32> {
        SparseVector::from_pairs(pairs.iter().copied())
    }

    fn index() -> SimilarityIndex {
        SimilarityIndex::build(vec![
            (0, sv(&[(0, 1.0), (1, 1.0)])), // fever cough
            (1, sv(&[(1, 1.0), (2, 1.0)])), // fever headache
            (2, sv(&[(0, 1.0), (3, 1.0)])), // cough sore-throat
        ])
    }

    #[test]
    fn search_orders_by_ascending_distance() {
        let idx = index();
        let query = sv(&[(1, 1.0)]); // fever only
        let hits = idx.search(&query, 3);
        assert_eq!(hits.len(), 3);
        // rows 0 and 1 share the fever dimension, row 2 does not
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[1].0, 1);
        assert_eq!(hits[2].0, 2);
        assert!(hits[0].1 < hits[2].1);
        assert!((hits[2].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn equal_distances_break_ties_by_record_order() {
        let idx = index();
        let query = sv(&[(1, 1.0)]);
        let hits = idx.search(&query, 2);
        // rows 0 and 1 are equidistant from the query; record order decides
        assert!((hits[0].1 - hits[1].1).abs() < 1e-12);
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[1].0, 1);
    }

    #[test]
    fn k_clamps_to_corpus_size() {
        let idx = index();
        let hits = idx.search(&sv(&[(0, 1.0)]), 50);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let idx = SimilarityIndex::build(Vec::new());
        assert!(idx.is_empty());
        assert!(idx.search(&sv(&[(0, 1.0)]), 5).is_empty());
    }

    #[test]
    fn zero_query_is_maximally_distant_from_everything() {
        let idx = index();
        let hits = idx.search(&SparseVector::new(), 3);
        assert!(hits.iter().all(|(_, d)| (*d - 1.0).abs() < 1e-12));
        // ties collapse to record order
        let ids: Vec<usize> = hits.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
