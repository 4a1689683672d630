//! Error types for JSON-stat operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing or querying JSON-stat documents
#[derive(Debug, Error)]
pub enum JsonStatError {
    /// The document is missing required structure or is internally
    /// inconsistent. Raised during parsing, never during lookup.
    #[error("dataset '{dataset}': {detail}")]
    MalformedDocument { dataset: String, detail: String },

    /// A lookup or ordering request named a dimension the dataset does not have
    #[error("dataset '{dataset}': unknown dimension '{name}' known dimension ids are: {known}")]
    UnknownDimension {
        dataset: String,
        name: String,
        known: String,
    },

    /// A dimension name matched more than one dimension (display label collisions)
    #[error("dataset '{dataset}': dimension name '{name}' is ambiguous, it matches dimensions: {matches}")]
    AmbiguousDimension {
        dataset: String,
        name: String,
        matches: String,
    },

    /// A category spec did not resolve to any category of the dimension
    #[error("dimension '{dimension}': unknown category '{spec}'")]
    UnknownCategory { dimension: String, spec: String },

    /// A raw category index was outside the dimension's valid range
    #[error("dimension '{dimension}': index {index} out of range (size {size})")]
    IndexOutOfRange {
        dimension: String,
        index: usize,
        size: usize,
    },

    /// A traversal order was not a permutation of the dimension positions
    #[error("dataset '{dataset}': order {order:?} is not a permutation of the {ndims} dimension positions")]
    InvalidOrder {
        dataset: String,
        order: Vec<usize>,
        ndims: usize,
    },

    /// A linear offset or index vector does not address a cell of the dataset
    #[error("dataset '{dataset}': {detail}")]
    InvalidAddress { dataset: String, detail: String },

    /// A collection lookup named a dataset that is not present
    #[error("unknown dataset '{name}' known dataset names are: {known}")]
    UnknownDataset { name: String, known: String },

    /// Failed to read a document from disk
    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for JSON-stat operations
pub type Result<T> = std::result::Result<T, JsonStatError>;
