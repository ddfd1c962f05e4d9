use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::SymptomRecord;
use crate::sparse::SparseVector;

/// Binary-scheme vocabulary: the sorted set of every distinct token seen
/// across the corpus at fit time.
///
/// Sorting pins each token to a deterministic vector position, so two builds
/// over the same corpus produce identical vectors. Tokens never seen at fit
/// time have no position and contribute no signal when encoding a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<Box<str>>,
    positions: HashMap<Box<str>, u32>,
}

impl Vocabulary {
    /// Collect and sort the distinct tokens of the whole corpus.
    pub fn fit(records: &[SymptomRecord]) -> Self {
        let mut terms: Vec<Box<str>> = records
            .iter()
            .flat_map(|rec| rec.distinct_tokens())
            .map(Box::from)
            .collect();
        terms.sort_unstable();
        terms.dedup();
        let positions = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i as u32))
            .collect();
        Self { terms, positions }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Vector position of a token, if it was seen at fit time.
    pub fn position(&self, token: &str) -> Option<u32> {
        self.positions.get(token).copied()
    }

    /// Encode a token set as a presence vector: 1 at each known token's
    /// position, 0 elsewhere. Unknown tokens are ignored.
    pub fn encode<'a, I>(&self, tokens: I) -> SparseVector<f32>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut hit: Vec<u32> = tokens
            .into_iter()
            .filter_map(|tok| self.position(tok))
            .collect();
        hit.sort_unstable();
        hit.dedup();
        SparseVector::from_pairs(hit.into_iter().map(|idx| (idx, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::records_from_rows;

    fn corpus() -> Vec<SymptomRecord> {
        records_from_rows(["fever, cough", "fever, headache", "cough, sore throat"], ',')
    }

    #[test]
    fn fit_sorts_and_dedupes_terms() {
        let vocab = Vocabulary::fit(&corpus());
        assert_eq!(vocab.len(), 4);
        // sorted order pins positions
        assert_eq!(vocab.position("cough"), Some(0));
        assert_eq!(vocab.position("fever"), Some(1));
        assert_eq!(vocab.position("headache"), Some(2));
        assert_eq!(vocab.position("sore throat"), Some(3));
    }

    #[test]
    fn encode_marks_known_tokens_and_drops_unknown() {
        let vocab = Vocabulary::fit(&corpus());
        let v = vocab.encode(["fever", "zzz_unknown", "cough"]);
        assert_eq!(v.nnz(), 2);
        let pairs: Vec<(u32, f32)> = v.iter().collect();
        assert_eq!(pairs, vec![(0, 1.0), (1, 1.0)]);
    }

    #[test]
    fn encode_of_only_unknown_tokens_is_zero_vector() {
        let vocab = Vocabulary::fit(&corpus());
        assert!(vocab.encode(["zzz_unknown"]).is_zero());
    }

    #[test]
    fn refit_over_same_corpus_is_identical() {
        let a = Vocabulary::fit(&corpus());
        let b = Vocabulary::fit(&corpus());
        assert_eq!(a.terms, b.terms);
    }
}
