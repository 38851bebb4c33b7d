use thiserror::Error;

use crate::source::SourceError;

/// Errors surfaced by the merge engine and the union-top command built on it.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("invalid k: {0}")]
    InvalidK(String),

    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    #[error("expected {expected} weights, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    #[error("WRONGTYPE key '{key}' holds a {found}, not a sorted set")]
    WrongType { key: String, found: &'static str },

    #[error("source {source_index} failed: {source}")]
    Source {
        source_index: usize,
        #[source]
        source: SourceError,
    },
}
