//! Dataset document parsing and validation
//!
//! Validates the structure of one JSON-stat dataset document and builds the
//! dimension model. Validation order: `value` present, `value` an array,
//! `value` non-empty, `dimension` present, dimensions well-formed, declared
//! value count equal to the product of dimension sizes. Every failure is a
//! `MalformedDocument` carrying the dataset name and a precise diagnostic.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{JsonStatError, Result};
use crate::models::dimension::{Category, Dimension};
use crate::models::Dataset;

fn malformed(dataset: Option<&str>, detail: impl Into<String>) -> JsonStatError {
    JsonStatError::MalformedDocument {
        dataset: dataset.unwrap_or("unnamed").to_string(),
        detail: detail.into(),
    }
}

/// Parse and validate one dataset document
pub(crate) fn parse_dataset(name: Option<&str>, doc: &Value) -> Result<Dataset> {
    let obj = doc
        .as_object()
        .ok_or_else(|| malformed(name, "document is not an object"))?;

    let label = obj.get("label").and_then(|v| v.as_str()).map(str::to_string);
    let source = obj.get("source").and_then(|v| v.as_str()).map(str::to_string);

    let value = obj
        .get("value")
        .ok_or_else(|| malformed(name, "missing 'value' key"))?;
    let values: Vec<Value> = value
        .as_array()
        .cloned()
        .ok_or_else(|| malformed(name, "field 'value' is not an array"))?;
    if values.is_empty() {
        return Err(malformed(name, "field 'value' is empty"));
    }

    let dimension = obj
        .get("dimension")
        .ok_or_else(|| malformed(name, "missing 'dimension' key"))?;
    let dimension = dimension
        .as_object()
        .ok_or_else(|| malformed(name, "field 'dimension' is not an object"))?;

    let ids = dimension
        .get("id")
        .and_then(|v| v.as_array())
        .ok_or_else(|| malformed(name, "missing 'dimension.id' list"))?;
    let sizes = dimension
        .get("size")
        .and_then(|v| v.as_array())
        .ok_or_else(|| malformed(name, "missing 'dimension.size' list"))?;
    if ids.len() != sizes.len() {
        return Err(malformed(
            name,
            format!(
                "'dimension.id' has {} entries, 'dimension.size' has {}",
                ids.len(),
                sizes.len()
            ),
        ));
    }

    let roles = parse_roles(dimension);

    let mut dims: Vec<Dimension> = Vec::with_capacity(ids.len());
    for (pos, (id, size)) in ids.iter().zip(sizes.iter()).enumerate() {
        let id = id
            .as_str()
            .ok_or_else(|| malformed(name, "entries of 'dimension.id' must be strings"))?;
        if dims.iter().any(|dim| dim.id() == id) {
            return Err(malformed(name, format!("duplicate dimension id '{}'", id)));
        }
        let size = size
            .as_u64()
            .ok_or_else(|| malformed(name, format!("declared size of dimension '{}' is not a number", id)))?
            as usize;
        let body = dimension
            .get(id)
            .and_then(|v| v.as_object())
            .ok_or_else(|| malformed(name, format!("missing dimension '{}'", id)))?;
        dims.push(parse_dimension(name, id, pos, size, roles.get(id).cloned(), body)?);
    }

    let calculated: usize = dims.iter().map(|dim| dim.size()).product();
    if calculated != values.len() {
        return Err(malformed(
            name,
            format!(
                "size {} is different from calculate size {} by dimension",
                values.len(),
                calculated
            ),
        ));
    }

    debug!(
        "parsed dataset '{}': {} dimensions, {} values",
        name.unwrap_or("unnamed"),
        dims.len(),
        values.len()
    );
    Ok(Dataset::assemble(name.map(str::to_string), label, source, dims, values))
}

/// Role name per dimension id, from the `dimension.role` block:
/// `"role": { "time": ["year"], "geo": ["area"] }`
fn parse_roles(dimension: &Map<String, Value>) -> HashMap<String, String> {
    let mut roles = HashMap::new();
    if let Some(role_map) = dimension.get("role").and_then(|v| v.as_object()) {
        for (role, ids) in role_map {
            if let Some(ids) = ids.as_array() {
                for id in ids.iter().filter_map(|v| v.as_str()) {
                    roles.insert(id.to_string(), role.clone());
                }
            }
        }
    }
    roles
}

/// Parse one dimension's `category` block.
///
/// `category.index` is either a code-to-position map or an ordered array of
/// codes; it may be omitted for a size-1 dimension whose `category.label`
/// supplies the single code. Captions default to codes.
fn parse_dimension(
    dataset: Option<&str>,
    id: &str,
    pos: usize,
    size: usize,
    role: Option<String>,
    body: &Map<String, Value>,
) -> Result<Dimension> {
    let label = body.get("label").and_then(|v| v.as_str()).map(str::to_string);

    let category = body
        .get("category")
        .and_then(|v| v.as_object())
        .ok_or_else(|| malformed(dataset, format!("dimension '{}': missing 'category'", id)))?;

    let captions: HashMap<&str, &str> = category
        .get("label")
        .and_then(|v| v.as_object())
        .map(|labels| {
            labels
                .iter()
                .filter_map(|(code, caption)| caption.as_str().map(|caption| (code.as_str(), caption)))
                .collect()
        })
        .unwrap_or_default();

    // code per position, declared order
    let mut slots: Vec<Option<String>> = vec![None; size];
    match category.get("index") {
        Some(Value::Object(index)) => {
            for (code, position) in index {
                let position = position.as_u64().ok_or_else(|| {
                    malformed(
                        dataset,
                        format!("dimension '{}': position of category '{}' is not a number", id, code),
                    )
                })? as usize;
                if position >= size {
                    return Err(malformed(
                        dataset,
                        format!(
                            "dimension '{}': category '{}' position {} exceeds declared size {}",
                            id, code, position, size
                        ),
                    ));
                }
                if slots[position].is_some() {
                    return Err(malformed(
                        dataset,
                        format!("dimension '{}': duplicate category position {}", id, position),
                    ));
                }
                slots[position] = Some(code.clone());
            }
        }
        Some(Value::Array(index)) => {
            if index.len() > size {
                return Err(malformed(
                    dataset,
                    format!(
                        "dimension '{}': {} categories exceed declared size {}",
                        id,
                        index.len(),
                        size
                    ),
                ));
            }
            for (position, code) in index.iter().enumerate() {
                let code = code.as_str().ok_or_else(|| {
                    malformed(dataset, format!("dimension '{}': category codes must be strings", id))
                })?;
                slots[position] = Some(code.to_string());
            }
        }
        Some(_) => {
            return Err(malformed(
                dataset,
                format!("dimension '{}': 'category.index' must be an object or an array", id),
            ));
        }
        None => match (size, captions.iter().next()) {
            (1, Some((code, _))) if captions.len() == 1 => slots[0] = Some((*code).to_string()),
            _ => {
                return Err(malformed(dataset, format!("dimension '{}': missing 'category.index'", id)));
            }
        },
    }

    let mut categories = Vec::with_capacity(size);
    for (position, slot) in slots.into_iter().enumerate() {
        let code = slot.ok_or_else(|| {
            malformed(
                dataset,
                format!("dimension '{}': no category declared at position {}", id, position),
            )
        })?;
        let caption = captions.get(code.as_str()).copied().unwrap_or(code.as_str()).to_string();
        categories.push(Category { code, caption });
    }

    for code in captions.keys() {
        if !categories.iter().any(|category| category.code == *code) {
            warn!("dimension '{}': label for unknown category '{}' ignored", id, code);
        }
    }

    Ok(Dimension::new(id.to_string(), label, role, pos, categories))
}
