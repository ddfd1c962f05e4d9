use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by corpus loading and recommendation queries.
///
/// Degenerate-but-recoverable situations (a corpus that cleans down to
/// nothing, a query vector with no known tokens) are NOT errors: they come
/// back as an empty [`Recommendation`](crate::engine::Recommendation) so the
/// caller can map them to "no recommendations".
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The input symptom set was empty after trimming.
    /// Caller-contract violation; never compared against a zero vector.
    #[error("query contained no usable symptoms")]
    EmptyQuery,

    /// The record source could not be read at build time.
    /// Fatal for that build attempt.
    #[error("symptom corpus unavailable at {}: {source}", path.display())]
    CorpusUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
