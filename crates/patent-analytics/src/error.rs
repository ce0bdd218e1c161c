//! Analytics error types.

use thiserror::Error;

/// Errors that can occur during corpus analysis.
///
/// Absence of data is usually a representable result rather than an
/// error: trend aggregation over an empty corpus returns a zero-filled
/// report, and an unresolvable classification code is simply `None`.
/// Only conditions the caller must handle differently are errors.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Clustering invoked with zero records
    #[error("Corpus is empty")]
    EmptyCorpus,

    /// Analysis period must cover at least one year
    #[error("Invalid analysis period: {0} years")]
    InvalidPeriod(u32),

    /// Similarity lookup target is not in the corpus
    #[error("Patent not found: {0}")]
    PatentNotFound(String),
}
