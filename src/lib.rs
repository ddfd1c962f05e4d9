/// This crate is a symptom co-occurrence recommendation engine: it turns
/// historical symptom records into feature vectors, indexes them under
/// cosine distance, and answers "which other symptoms tend to appear with
/// these" by aggregating the nearest records.
pub mod engine;
pub mod error;
pub mod index;
pub mod record;
pub mod sparse;
pub mod vectorizer;

/// The top-level struct of this crate. Build one from a corpus of
/// [`SymptomRecord`]s and a [`Scheme`]; it fits the vectorizer, snapshots
/// the similarity index, and answers queries.
///
/// A built `Recommender` is immutable: corpus changes mean building a fresh
/// one. Queries are read-only, so a single instance can be shared across
/// threads.
pub use engine::Recommender;

/// Ranked query result: (symptom token, support count) pairs in descending
/// support order. Empty entries mean "no recommendations", which is a valid
/// answer and distinct from the `EmptyQuery` error.
pub use engine::Recommendation;

/// One historical symptom record: a row ordinal plus the ordered tokens
/// parsed from its delimited free-text field.
pub use record::SymptomRecord;

/// Vectorization scheme, chosen per deployment at build time:
/// - `Binary`: presence vector over the sorted corpus vocabulary.
///   Deterministic and exact-match only.
/// - `TfIdf`: term-weighted vectors over a capped TF-IDF space fitted on
///   the records as whitespace documents.
///
/// Queries always encode through the vocabulary/model fitted at the
/// corresponding index's build time.
pub use vectorizer::Scheme;

/// Errors from corpus loading and queries. Recoverable degeneracies (a
/// corpus that cleans down to nothing) are not errors; they surface as an
/// empty [`Recommendation`].
pub use error::RecommendError;
