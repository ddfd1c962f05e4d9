pub mod tfidf;
pub mod vocabulary;

use serde::{Deserialize, Serialize};

use crate::record::SymptomRecord;
use crate::sparse::SparseVector;
use crate::vectorizer::tfidf::{clean_document, TfIdfModel, DEFAULT_MAX_FEATURES};
use crate::vectorizer::vocabulary::Vocabulary;

/// Vectorization scheme, selected per deployment at build time
/// (never per query).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheme {
    /// Presence vector over the sorted corpus vocabulary.
    Binary,
    /// Term-weighted vectors over a capped TF-IDF term space.
    TfIdf { max_features: usize },
}

impl Scheme {
    pub fn tf_idf() -> Self {
        Scheme::TfIdf {
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Scheme::Binary
    }
}

/// A fitted vectorizer: the vocabulary or term model frozen at index build
/// time. Every query against the resulting index MUST encode through the
/// same fitted instance; encoding with anything else breaks the vector-space
/// correspondence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Vectorizer {
    Binary(Vocabulary),
    TfIdf(TfIdfModel),
}

impl Vectorizer {
    /// Fit the selected scheme over the whole corpus.
    pub fn fit(records: &[SymptomRecord], scheme: &Scheme) -> Self {
        match scheme {
            Scheme::Binary => Vectorizer::Binary(Vocabulary::fit(records)),
            Scheme::TfIdf { max_features } => {
                let documents: Vec<String> = records
                    .iter()
                    .filter_map(|rec| clean_document(&rec.as_document()))
                    .collect();
                Vectorizer::TfIdf(TfIdfModel::fit(&documents, *max_features))
            }
        }
    }

    /// Encode one corpus record. `None` means the record is dropped by this
    /// scheme's preprocessing and must not enter the index.
    pub fn encode_record(&self, record: &SymptomRecord) -> Option<SparseVector<f32>> {
        match self {
            Vectorizer::Binary(vocab) => Some(vocab.encode(record.distinct_tokens())),
            Vectorizer::TfIdf(model) => {
                clean_document(&record.as_document()).map(|doc| model.encode(&doc))
            }
        }
    }

    /// Encode a normalized query token set with the fitted vocabulary/model.
    /// Unknown tokens contribute no signal; a query of only unknown tokens
    /// encodes to the zero vector.
    pub fn encode_query(&self, tokens: &[&str]) -> SparseVector<f32> {
        match self {
            Vectorizer::Binary(vocab) => vocab.encode(tokens.iter().copied()),
            Vectorizer::TfIdf(model) => clean_document(&tokens.join(" "))
                .map(|doc| model.encode(&doc))
                .unwrap_or_default(),
        }
    }

    /// True when the fitted space is empty and every encoding is zero.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Vectorizer::Binary(vocab) => vocab.is_empty(),
            Vectorizer::TfIdf(model) => model.is_degenerate(),
        }
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
    fn binary_scheme_keeps_every_record() {
        let records = records_from_rows(["fever", "", "cough"], ',');
        let vectorizer = Vectorizer::fit(&records, &Scheme::Binary);
        for rec in &records {
            assert!(vectorizer.encode_record(rec).is_some());
        }
        // the empty row encodes to the zero vector rather than being dropped
        assert!(vectorizer.encode_record(&records[1]).unwrap().is_zero());
    }

    #[test]
    fn tfidf_scheme_drops_records_that_clean_to_nothing() {
        let records = records_from_rows(["fever, cough", " , ", "default_symptom"], ',');
        let vectorizer = Vectorizer::fit(&records, &Scheme::tf_idf());
        assert!(vectorizer.encode_record(&records[0]).is_some());
        assert!(vectorizer.encode_record(&records[1]).is_none());
        assert!(vectorizer.encode_record(&records[2]).is_none());
    }

    #[test]
    fn query_and_record_share_the_fitted_space() {
        for scheme in [Scheme::Binary, Scheme::tf_idf()] {
            let records = corpus();
            let vectorizer = Vectorizer::fit(&records, &scheme);
            let query = vectorizer.encode_query(&["fever", "cough"]);
            let record = vectorizer.encode_record(&records[0]).unwrap();
            // identical token content lands on identical dimensions
            assert!(query.cosine_distance(&record) < 1e-6);
        }
    }

    #[test]
    fn unknown_query_tokens_encode_to_zero() {
        let vectorizer = Vectorizer::fit(&corpus(), &Scheme::Binary);
        assert!(vectorizer.encode_query(&["zzz_unknown"]).is_zero());
    }

    #[test]
    fn empty_corpus_fit_is_degenerate_for_both_schemes() {
        for scheme in [Scheme::Binary, Scheme::tf_idf()] {
            let vectorizer = Vectorizer::fit(&[], &scheme);
            assert!(vectorizer.is_degenerate());
        }
    }
}
