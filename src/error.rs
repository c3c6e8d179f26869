use std::io;

use thiserror::Error;

/// An allocation trie whose totals do not add up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "accumulated allocation at {path} is {actual} bytes, \
         but its direct allocation and children add up to {expected}"
    )]
    Inconsistent {
        path: String,
        expected: u64,
        actual: u64,
    },

    #[error("allocation totals at {path} overflow 64 bits")]
    Overflow { path: String },
}

/// Failure to load a trie from a producer's dump.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read allocation dump: {0}")]
    Io(#[from] io::Error),

    #[error("malformed allocation dump: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to start or run the treemap viewer.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("viewer i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid page template: {0}")]
    Template(#[from] handlebars::TemplateError),
}
