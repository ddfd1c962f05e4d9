use std::collections::HashMap;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RecommendError;
use crate::index::SimilarityIndex;
use crate::record::{load_corpus, normalize_token, SymptomRecord};
use crate::vectorizer::{Scheme, Vectorizer};

/// Ranked recommendation produced for one query: `(token, support count)`
/// pairs, where support is the number of retrieved neighbors containing the
/// token. Empty entries mean "no recommendations" — a valid answer, distinct
/// from the [`EmptyQuery`](RecommendError::EmptyQuery) error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub entries: Vec<(String, u32)>,
}

impl Recommendation {
    pub fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recommended tokens without their support counts.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(tok, _)| tok.as_str())
    }
}

/// The built recommendation engine: the corpus records, the vectorizer
/// fitted over them, and the similarity index over their vectors.
///
/// Everything here is immutable after [`build`](Self::build); a corpus
/// change means building a fresh `Recommender`. Queries only read, so one
/// instance can serve many threads concurrently.
#[derive(Debug, Clone)]
pub struct Recommender {
    records: Vec<SymptomRecord>,
    by_id: HashMap<usize, usize>,
    vectorizer: Vectorizer,
    index: SimilarityIndex,
}

impl Recommender {
    /// Fit the scheme over the corpus and snapshot the index.
    ///
    /// Records dropped by the scheme's preprocessing (weighted scheme only)
    /// never enter the index. A corpus that cleans down to nothing builds an
    /// empty index; that is not an error here — every query against it
    /// answers with an empty recommendation.
    pub fn build(records: Vec<SymptomRecord>, scheme: &Scheme) -> Self {
        let vectorizer = Vectorizer::fit(&records, scheme);
        let rows: Vec<(usize, _)> = records
            .iter()
            .filter_map(|rec| vectorizer.encode_record(rec).map(|vec| (rec.id, vec)))
            .collect();
        if rows.is_empty() && !records.is_empty() {
            warn!(
                records = records.len(),
                "every record was dropped during preprocessing; queries will return no recommendations"
            );
        }
        let by_id = records
            .iter()
            .enumerate()
            .map(|(pos, rec)| (rec.id, pos))
            .collect();
        Self {
            records,
            by_id,
            vectorizer,
            index: SimilarityIndex::build(rows),
        }
    }

    /// Load a corpus file and build in one step.
    pub fn from_corpus_file<P: AsRef<Path>>(
        path: P,
        scheme: &Scheme,
    ) -> Result<Self, RecommendError> {
        Ok(Self::build(load_corpus(path)?, scheme))
    }

    /// Number of records in the similarity index (post-preprocessing).
    pub fn indexed_records(&self) -> usize {
        self.index.len()
    }

    pub fn record(&self, id: usize) -> Option<&SymptomRecord> {
        self.by_id.get(&id).map(|pos| &self.records[*pos])
    }

    /// Recommend up to `top_n` symptoms likely to co-occur with `input`,
    /// aggregated over the `k` nearest historical records.
    ///
    /// `k` and `top_n` are independent: `k` controls how many neighbors are
    /// examined, `top_n` how many ranked tokens come back. Fewer than
    /// `top_n` qualifying tokens returns exactly what was counted, never
    /// padding.
    ///
    /// Errors with [`RecommendError::EmptyQuery`] when `input` normalizes to
    /// nothing. Every internal degeneracy (empty post-cleaning corpus, query
    /// encoding to the zero vector) degrades to an empty recommendation
    /// instead of failing.
    pub fn recommend(
        &self,
        input: &[String],
        k: usize,
        top_n: usize,
    ) -> Result<Recommendation, RecommendError> {
        let input_set: IndexSet<String> =
            input.iter().filter_map(|tok| normalize_token(tok)).collect();
        if input_set.is_empty() {
            return Err(RecommendError::EmptyQuery);
        }
        if self.index.is_empty() {
            debug!("empty index, answering with no recommendations");
            return Ok(Recommendation::none());
        }

        let query_tokens: Vec<&str> = input_set.iter().map(String::as_str).collect();
        let query_vec = self.vectorizer.encode_query(&query_tokens);
        if query_vec.is_zero() {
            // no known token carries any signal; nothing to rank neighbors by
            debug!("query encoded to the zero vector, answering with no recommendations");
            return Ok(Recommendation::none());
        }
        let neighbors = self.index.search(&query_vec, k);

        // Support counting. IndexMap keeps first-encounter order, which is
        // exactly the tie-break the stable sort below must preserve.
        let mut support: IndexMap<&str, u32> = IndexMap::new();
        for (id, _distance) in &neighbors {
            let Some(record) = self.record(*id) else {
                continue;
            };
            for token in record.distinct_tokens() {
                if !input_set.contains(token) {
                    *support.entry(token).or_insert(0) += 1;
                }
            }
        }

        let mut entries: Vec<(String, u32)> = support
            .into_iter()
            .map(|(tok, count)| (tok.to_string(), count))
            .collect();
        // stable: equal counts stay in first-encounter order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(top_n);

        debug!(
            neighbors = neighbors.len(),
            recommended = entries.len(),
            "query answered"
        );
        Ok(Recommendation { entries })
    }
}
