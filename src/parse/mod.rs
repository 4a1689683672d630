//! JSON-stat document ingestion
//!
//! Funnels the three accepted inputs (decoded [`serde_json::Value`], raw
//! JSON text, file path) into one validated construction per document kind.
//! The `dimension` block is keyed dynamically by dimension id, so parsing
//! walks the decoded value tree instead of deserializing into fixed structs.

pub(crate) mod collection;
pub(crate) mod dataset;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{JsonStatError, Result};

/// Decode raw JSON text
pub(crate) fn decode_str(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Read and decode a JSON file
pub(crate) fn decode_file(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| JsonStatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_str(&text)
}
