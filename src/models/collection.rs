//! Collection model
//!
//! A collection is a named group of datasets parsed from one JSON-stat
//! collection document. Members are fully validated before the collection is
//! exposed; all indexing behavior is delegated to [`Dataset`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{JsonStatError, Result};
use crate::models::dataset::Dataset;
use crate::parse;

/// A named group of datasets parsed from one collection document
#[derive(Debug, Clone, Default)]
pub struct Collection {
    datasets: Vec<Dataset>,
    name2pos: HashMap<String, usize>,
}

impl Collection {
    /// Parse a collection from an already decoded JSON document
    pub fn from_value(doc: &Value) -> Result<Collection> {
        parse::collection::parse_collection(doc)
    }

    /// Parse a collection from raw JSON text
    pub fn from_string(text: &str) -> Result<Collection> {
        let doc = parse::decode_str(text)?;
        parse::collection::parse_collection(&doc)
    }

    /// Parse a collection from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Collection> {
        let doc = parse::decode_file(path.as_ref())?;
        parse::collection::parse_collection(&doc)
    }

    pub(crate) fn assemble(datasets: Vec<Dataset>) -> Collection {
        let name2pos = datasets
            .iter()
            .enumerate()
            .filter_map(|(pos, dataset)| dataset.name().map(|name| (name.to_string(), pos)))
            .collect();
        Collection { datasets, name2pos }
    }

    /// Number of member datasets
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Dataset names in document order
    pub fn names(&self) -> Vec<&str> {
        self.datasets.iter().filter_map(|dataset| dataset.name()).collect()
    }

    /// Member datasets in document order
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Look up a dataset by name
    pub fn dataset(&self, name: &str) -> Result<&Dataset> {
        self.name2pos
            .get(name)
            .map(|&pos| &self.datasets[pos])
            .ok_or_else(|| JsonStatError::UnknownDataset {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} datasets:", self.datasets.len())?;
        for (pos, dataset) in self.datasets.iter().enumerate() {
            writeln!(
                f,
                "  {}: dataset '{}' size {}",
                pos,
                dataset.name().unwrap_or("unnamed"),
                dataset.size()
            )?;
        }
        Ok(())
    }
}
