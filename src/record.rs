use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RecommendError;

/// One historical symptom record.
///
/// `id` is the row ordinal of the record within the corpus it was loaded
/// with; it stays stable for the lifetime of one index build and is what
/// [`SimilarityIndex::search`](crate::index::SimilarityIndex::search)
/// reports back.
///
/// `tokens` is the ordered parse of the delimited source field. Duplicates
/// are kept as parsed, but every set-like operation (membership, neighbor
/// aggregation) goes through [`distinct_tokens`](Self::distinct_tokens),
/// which deduplicates in first-occurrence order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomRecord {
    pub id: usize,
    pub tokens: Vec<String>,
}

impl SymptomRecord {
    /// Parse one delimited free-text field into a record.
    /// Tokens are trimmed; empty fragments are dropped.
    pub fn parse(id: usize, field: &str, delimiter: char) -> Self {
        let tokens = field
            .split(delimiter)
            .filter_map(normalize_token)
            .collect();
        Self { id, tokens }
    }

    /// Distinct tokens in first-occurrence order.
    pub fn distinct_tokens(&self) -> IndexSet<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }

    /// Tokens joined into one whitespace-separated document.
    /// This is the weighted scheme's view of the record.
    pub fn as_document(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Trim a raw token fragment; `None` if nothing is left.
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Build records from an ordered sequence of raw symptom fields.
/// Row ordinals become record ids. Rows that parse to zero tokens are kept
/// (they encode to a zero vector), so ids always match source row order.
pub fn records_from_rows<I, S>(rows: I, delimiter: char) -> Vec<SymptomRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rows.into_iter()
        .enumerate()
        .map(|(id, row)| SymptomRecord::parse(id, row.as_ref(), delimiter))
        .collect()
}

/// Load a corpus file: one record per non-blank line, comma-delimited
/// symptom tokens. IO failure is a hard [`RecommendError::CorpusUnavailable`]
/// so a failed build can never pass for an empty corpus.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<SymptomRecord>, RecommendError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| RecommendError::CorpusUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let records = records_from_rows(text.lines().filter(|l| !l.trim().is_empty()), ',');
    if records.is_empty() {
        warn!(path = %path.display(), "corpus file contained no records");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_drops_empty_fragments() {
        let rec = SymptomRecord::parse(0, " fever ,  cough,, ,sore throat ", ',');
        assert_eq!(rec.tokens, vec!["fever", "cough", "sore throat"]);
    }

    #[test]
    fn parse_keeps_duplicates_but_distinct_dedupes_in_order() {
        let rec = SymptomRecord::parse(3, "cough, fever, cough", ',');
        assert_eq!(rec.tokens, vec!["cough", "fever", "cough"]);
        let distinct: Vec<&str> = rec.distinct_tokens().into_iter().collect();
        assert_eq!(distinct, vec!["cough", "fever"]);
    }

    #[test]
    fn rows_get_ordinal_ids_including_empty_rows() {
        let records = records_from_rows(["fever", "", "cough"], ',');
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].id, 1);
        assert!(records[1].is_empty());
        assert_eq!(records[2].id, 2);
        assert_eq!(records[2].tokens, vec!["cough"]);
    }

    #[test]
    fn as_document_joins_with_spaces() {
        let rec = SymptomRecord::parse(0, "fever,shortness of breath", ',');
        assert_eq!(rec.as_document(), "fever shortness of breath");
    }

    #[test]
    fn load_corpus_missing_file_is_corpus_unavailable() {
        let err = load_corpus("/nonexistent/symptom_data.csv").unwrap_err();
        assert!(matches!(err, RecommendError::CorpusUnavailable { .. }));
    }
}
