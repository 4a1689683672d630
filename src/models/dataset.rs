//! Dataset model
//!
//! A dataset owns the ordered dimensions of one statistical table, the flat
//! value vector and the per-dimension stride table. It resolves dimension
//! names (id or display label) and category specs into positions, converts
//! between linear offsets and full index vectors, and enumerates positions
//! across the table with optional blocking and traversal reordering.
//!
//! All state is immutable after construction; every query takes `&self` and
//! the enumeration iterator recomputes from immutable inputs, so repeated
//! calls with the same arguments yield identical sequences.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{JsonStatError, Result};
use crate::models::dimension::Dimension;
use crate::models::selection::Selection;
use crate::parse;

/// A parsed, validated JSON-stat dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    name: Option<String>,
    label: Option<String>,
    source: Option<String>,
    dimensions: Vec<Dimension>,
    id2pos: HashMap<String, usize>,
    label2pos: HashMap<String, Vec<usize>>,
    strides: Vec<usize>,
    values: Vec<Value>,
}

impl Dataset {
    /// Parse a dataset from an already decoded JSON document.
    ///
    /// `name` is used in diagnostics; datasets parsed from a collection get
    /// the name of their collection entry.
    pub fn from_value(name: Option<&str>, doc: &Value) -> Result<Dataset> {
        parse::dataset::parse_dataset(name, doc)
    }

    /// Parse a dataset from raw JSON text
    pub fn from_string(name: Option<&str>, text: &str) -> Result<Dataset> {
        let doc = parse::decode_str(text)?;
        parse::dataset::parse_dataset(name, &doc)
    }

    /// Parse a dataset from a JSON file
    pub fn from_file(name: Option<&str>, path: impl AsRef<Path>) -> Result<Dataset> {
        let doc = parse::decode_file(path.as_ref())?;
        parse::dataset::parse_dataset(name, &doc)
    }

    /// Assemble a validated dataset, deriving strides and name tables.
    ///
    /// Callers guarantee `values.len() == product(dimension sizes)`.
    pub(crate) fn assemble(
        name: Option<String>,
        label: Option<String>,
        source: Option<String>,
        dimensions: Vec<Dimension>,
        values: Vec<Value>,
    ) -> Dataset {
        let mut id2pos = HashMap::with_capacity(dimensions.len());
        let mut label2pos: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, dim) in dimensions.iter().enumerate() {
            id2pos.insert(dim.id().to_string(), pos);
            if let Some(label) = dim.label() {
                label2pos.entry(label.to_string()).or_default().push(pos);
            }
        }
        // last declared dimension varies fastest
        let mut strides = vec![1usize; dimensions.len()];
        for pos in (0..dimensions.len().saturating_sub(1)).rev() {
            strides[pos] = strides[pos + 1] * dimensions[pos + 1].size();
        }
        Dataset {
            name,
            label,
            source,
            dimensions,
            id2pos,
            label2pos,
            strides,
            values,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Total number of cells, equal to the product of all dimension sizes
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Dimensions in declared order
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Look up a dimension by id or display label
    pub fn dimension(&self, name: &str) -> Result<&Dimension> {
        let pos = self.dim_pos(name)?;
        Ok(&self.dimensions[pos])
    }

    /// Map an ordered list of dimension names to their declared positions.
    ///
    /// `result[i]` is the internal position of `names[i]`; the result is the
    /// traversal order that makes `names[0]` the slowest varying dimension
    /// in [`Dataset::all_pos`].
    pub fn dim_order(&self, names: &[&str]) -> Result<Vec<usize>> {
        names.iter().map(|name| self.dim_pos(name)).collect()
    }

    /// Linear offset of a full index vector (declared dimension order)
    pub fn linear_index(&self, indices: &[usize]) -> Result<usize> {
        self.check_vector(indices)?;
        Ok(indices.iter().zip(&self.strides).map(|(index, stride)| index * stride).sum())
    }

    /// Full index vector addressed by a linear offset, the inverse of
    /// [`Dataset::linear_index`]
    pub fn indices_of(&self, linear: usize) -> Result<Vec<usize>> {
        if linear >= self.size() {
            return Err(JsonStatError::InvalidAddress {
                dataset: self.display_name().to_string(),
                detail: format!("linear index {} out of range (size {})", linear, self.size()),
            });
        }
        Ok(self
            .dimensions
            .iter()
            .zip(&self.strides)
            .map(|(dim, stride)| (linear / stride) % dim.size())
            .collect())
    }

    /// Value of the cell addressed by a full index vector
    pub fn value_at(&self, indices: &[usize]) -> Result<&Value> {
        let offset = self.linear_index(indices)?;
        Ok(&self.values[offset])
    }

    /// Value of the cell addressed by a selection.
    ///
    /// Each entry names a dimension by id or display label and a category by
    /// code, caption or raw index; dimensions omitted from the selection
    /// default to index 0.
    pub fn value(&self, selection: &Selection) -> Result<&Value> {
        let indices = self.resolve_selection(selection)?;
        let offset: usize = indices.iter().zip(&self.strides).map(|(index, stride)| index * stride).sum();
        Ok(&self.values[offset])
    }

    /// Enumerate full index vectors over the table.
    ///
    /// Dimensions named by `block` are held at their resolved index in every
    /// produced vector; the remaining dimensions vary over their full range.
    /// `order` arranges the dimensions from slowest to fastest varying and
    /// must be a full permutation of the dimension positions (see
    /// [`Dataset::dim_order`]); it defaults to declared order. Produced
    /// vectors always list components in declared order.
    ///
    /// The returned iterator is self-contained: calling `all_pos` again with
    /// identical arguments yields an identical sequence.
    pub fn all_pos(&self, block: Option<&Selection>, order: Option<&[usize]>) -> Result<PositionIter> {
        let ndims = self.dimensions.len();

        let mut fixed: Vec<Option<usize>> = vec![None; ndims];
        if let Some(block) = block {
            for (name, spec) in block.entries() {
                let pos = self.dim_pos(name)?;
                fixed[pos] = Some(self.dimensions[pos].index_of(spec)?);
            }
        }

        let order: Vec<usize> = match order {
            Some(order) => {
                let mut seen = vec![false; ndims];
                let valid = order.len() == ndims
                    && order.iter().all(|&pos| pos < ndims && !std::mem::replace(&mut seen[pos], true));
                if !valid {
                    return Err(JsonStatError::InvalidOrder {
                        dataset: self.display_name().to_string(),
                        order: order.to_vec(),
                        ndims,
                    });
                }
                order.to_vec()
            }
            None => (0..ndims).collect(),
        };

        let mut template = vec![0usize; ndims];
        for (pos, index) in fixed.iter().enumerate() {
            if let Some(index) = index {
                template[pos] = *index;
            }
        }
        let free: Vec<(usize, usize)> = order
            .into_iter()
            .filter(|pos| fixed[*pos].is_none())
            .map(|pos| (pos, self.dimensions[pos].size()))
            .collect();
        Ok(PositionIter::new(template, free))
    }

    /// Values of every cell matched by `block`, in natural enumeration order.
    ///
    /// Equivalent to mapping [`Dataset::value_at`] over
    /// `all_pos(Some(block), None)`; a fresh, self-contained computation on
    /// every call.
    pub fn select_values(&self, block: &Selection) -> Result<Vec<&Value>> {
        let mut values = Vec::new();
        for indices in self.all_pos(Some(block), None)? {
            let offset: usize = indices.iter().zip(&self.strides).map(|(index, stride)| index * stride).sum();
            values.push(&self.values[offset]);
        }
        Ok(values)
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    fn known_ids(&self) -> String {
        self.dimensions.iter().map(|dim| dim.id()).collect::<Vec<_>>().join(", ")
    }

    /// Resolve a dimension id or display label to its declared position.
    ///
    /// A name matching several display labels, or an id plus a different
    /// dimension's label, is rejected as ambiguous.
    fn dim_pos(&self, name: &str) -> Result<usize> {
        let mut matches: Vec<usize> = self.label2pos.get(name).cloned().unwrap_or_default();
        if let Some(&pos) = self.id2pos.get(name) {
            if !matches.contains(&pos) {
                matches.push(pos);
            }
        }
        matches.sort_unstable();
        match matches.as_slice() {
            [] => Err(JsonStatError::UnknownDimension {
                dataset: self.display_name().to_string(),
                name: name.to_string(),
                known: self.known_ids(),
            }),
            [pos] => Ok(*pos),
            _ => Err(JsonStatError::AmbiguousDimension {
                dataset: self.display_name().to_string(),
                name: name.to_string(),
                matches: matches
                    .iter()
                    .map(|&pos| self.dimensions[pos].id())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Resolve a selection into a full index vector, defaulting omitted
    /// dimensions to index 0
    fn resolve_selection(&self, selection: &Selection) -> Result<Vec<usize>> {
        let mut indices = vec![0usize; self.dimensions.len()];
        for (name, spec) in selection.entries() {
            let pos = self.dim_pos(name)?;
            indices[pos] = self.dimensions[pos].index_of(spec)?;
        }
        Ok(indices)
    }

    fn check_vector(&self, indices: &[usize]) -> Result<()> {
        if indices.len() != self.dimensions.len() {
            return Err(JsonStatError::InvalidAddress {
                dataset: self.display_name().to_string(),
                detail: format!(
                    "index vector has {} components, expected {}",
                    indices.len(),
                    self.dimensions.len()
                ),
            });
        }
        for (dim, &index) in self.dimensions.iter().zip(indices) {
            if index >= dim.size() {
                return Err(JsonStatError::IndexOutOfRange {
                    dimension: dim.id().to_string(),
                    index,
                    size: dim.size(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            writeln!(f, "name:   '{}'", name)?;
        }
        if let Some(label) = &self.label {
            writeln!(f, "label:  '{}'", label)?;
        }
        if let Some(source) = &self.source {
            writeln!(f, "source: '{}'", source)?;
        }
        writeln!(f, "size: {}", self.size())?;
        writeln!(f, "{} dimensions:", self.dimensions.len())?;
        for (pos, dim) in self.dimensions.iter().enumerate() {
            writeln!(
                f,
                "  {}: dim id: '{}' label: '{}' size: '{}' role: '{}'",
                pos,
                dim.id(),
                dim.label().unwrap_or(""),
                dim.size(),
                dim.role().unwrap_or("")
            )?;
        }
        Ok(())
    }
}

/// Mixed-radix enumeration of full index vectors.
///
/// Obtained from [`Dataset::all_pos`]. Owns only immutable copies of the
/// blocked template and the free dimensions' radices plus a counter, so it
/// is cheap to clone and carries no shared cursor state.
#[derive(Debug, Clone)]
pub struct PositionIter {
    template: Vec<usize>,
    /// (declared position, size) of each varying dimension, slowest first
    free: Vec<(usize, usize)>,
    counter: Vec<usize>,
    remaining: usize,
}

impl PositionIter {
    fn new(template: Vec<usize>, free: Vec<(usize, usize)>) -> Self {
        // empty product = 1: a fully blocked table still has one position
        let remaining = free.iter().map(|(_, size)| *size).product();
        PositionIter {
            counter: vec![0; free.len()],
            template,
            free,
            remaining,
        }
    }
}

impl Iterator for PositionIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.remaining == 0 {
            return None;
        }
        let mut out = self.template.clone();
        for ((pos, _), &digit) in self.free.iter().zip(&self.counter) {
            out[*pos] = digit;
        }
        // increment the fastest digit, carrying toward the slowest
        let mut slot = self.free.len();
        while slot > 0 {
            slot -= 1;
            self.counter[slot] += 1;
            if self.counter[slot] < self.free[slot].1 {
                break;
            }
            self.counter[slot] = 0;
        }
        self.remaining -= 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PositionIter {}
