//! Collection document parsing
//!
//! A collection document is a top-level object whose object-valued entries
//! are dataset bodies keyed by dataset name. Members are parsed in document
//! order; the first invalid member fails the whole collection.

use serde_json::Value;
use tracing::debug;

use crate::error::{JsonStatError, Result};
use crate::models::{Collection, Dataset};

/// Parse and validate one collection document
pub(crate) fn parse_collection(doc: &Value) -> Result<Collection> {
    let obj = doc.as_object().ok_or_else(|| JsonStatError::MalformedDocument {
        dataset: "collection".to_string(),
        detail: "document is not an object".to_string(),
    })?;

    let mut datasets = Vec::new();
    for (name, body) in obj {
        if body.is_object() {
            datasets.push(Dataset::from_value(Some(name.as_str()), body)?);
        }
    }
    debug!("parsed collection: {} datasets", datasets.len());
    Ok(Collection::assemble(datasets))
}
