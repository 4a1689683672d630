//! Dimension model
//!
//! A dimension is one axis of a statistical table: an ordered, bijective
//! mapping between category codes/captions and zero-based positional
//! indices, plus a display caption and an optional role. Built once while
//! parsing a dataset's `dimension` block, never mutated afterwards.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{JsonStatError, Result};
use crate::models::selection::CategorySpec;

/// One labeled position along a dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Machine key from `category.index`
    pub code: String,
    /// Display label from `category.label`; defaults to the code
    pub caption: String,
}

/// One axis of a dataset
#[derive(Debug, Clone)]
pub struct Dimension {
    id: String,
    label: Option<String>,
    role: Option<String>,
    pos: usize,
    categories: Vec<Category>,
    code2index: HashMap<String, usize>,
    caption2index: HashMap<String, usize>,
}

impl Dimension {
    /// Build a dimension from its ordered categories.
    ///
    /// `pos` is the dimension's position in the dataset's declared order.
    /// Codes are unique by construction; caption collisions keep the first
    /// declared mapping.
    pub(crate) fn new(
        id: String,
        label: Option<String>,
        role: Option<String>,
        pos: usize,
        categories: Vec<Category>,
    ) -> Self {
        let mut code2index = HashMap::with_capacity(categories.len());
        let mut caption2index = HashMap::with_capacity(categories.len());
        for (index, category) in categories.iter().enumerate() {
            code2index.insert(category.code.clone(), index);
            caption2index.entry(category.caption.clone()).or_insert(index);
        }
        Dimension {
            id,
            label,
            role,
            pos,
            categories,
            code2index,
            caption2index,
        }
    }

    /// Stable machine name of this dimension
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display caption
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Role assigned by the document (`time`, `geo`, `metric`)
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Position of this dimension in the dataset's declared order
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of categories
    pub fn size(&self) -> usize {
        self.categories.len()
    }

    /// Categories in index order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Resolve a category spec to its positional index.
    ///
    /// String specs are tried as a code first, then as a caption; raw
    /// indices are bounds-checked against `[0, size)`.
    pub fn index_of(&self, spec: &CategorySpec) -> Result<usize> {
        match spec {
            CategorySpec::Code(code) => self
                .code2index
                .get(code.as_str())
                .or_else(|| self.caption2index.get(code.as_str()))
                .copied()
                .ok_or_else(|| self.unknown_category(spec)),
            CategorySpec::Caption(caption) => self
                .caption2index
                .get(caption.as_str())
                .copied()
                .ok_or_else(|| self.unknown_category(spec)),
            CategorySpec::Index(index) => {
                self.check_index(*index)?;
                Ok(*index)
            }
        }
    }

    /// Code of the category at `index`
    pub fn code_of(&self, index: usize) -> Result<&str> {
        self.check_index(index)?;
        Ok(&self.categories[index].code)
    }

    /// Caption of the category at `index`
    pub fn caption_of(&self, index: usize) -> Result<&str> {
        self.check_index(index)?;
        Ok(&self.categories[index].caption)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.categories.len() {
            return Err(JsonStatError::IndexOutOfRange {
                dimension: self.id.clone(),
                index,
                size: self.categories.len(),
            });
        }
        Ok(())
    }

    fn unknown_category(&self, spec: &CategorySpec) -> JsonStatError {
        JsonStatError::UnknownCategory {
            dimension: self.id.clone(),
            spec: spec.to_string(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dimension '{}' size {}:", self.id, self.size())?;
        for (index, category) in self.categories.iter().enumerate() {
            writeln!(f, "  {}: code: '{}' label: '{}'", index, category.code, category.caption)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Dimension {
        Dimension::new(
            "area".to_string(),
            Some("OECD countries".to_string()),
            Some("geo".to_string()),
            1,
            vec![
                Category { code: "AU".to_string(), caption: "Australia".to_string() },
                Category { code: "AT".to_string(), caption: "Austria".to_string() },
                Category { code: "BE".to_string(), caption: "Belgium".to_string() },
                Category { code: "IT".to_string(), caption: "Italy".to_string() },
            ],
        )
    }

    #[test]
    fn test_code_and_caption_round_trip() {
        let dim = area();
        for index in 0..dim.size() {
            let code = dim.code_of(index).unwrap().to_string();
            let caption = dim.caption_of(index).unwrap().to_string();
            assert_eq!(dim.index_of(&CategorySpec::Code(code)).unwrap(), index);
            assert_eq!(dim.index_of(&CategorySpec::Caption(caption)).unwrap(), index);
        }
    }

    #[test]
    fn test_code_spec_falls_back_to_caption() {
        let dim = area();
        assert_eq!(dim.index_of(&CategorySpec::from("Belgium")).unwrap(), 2);
    }

    #[test]
    fn test_unknown_category() {
        let dim = area();
        let err = dim.index_of(&CategorySpec::from("XX")).unwrap_err();
        assert_eq!(err.to_string(), "dimension 'area': unknown category 'XX'");
    }

    #[test]
    fn test_index_bounds() {
        let dim = area();
        assert_eq!(dim.index_of(&CategorySpec::Index(3)).unwrap(), 3);
        let err = dim.index_of(&CategorySpec::Index(4)).unwrap_err();
        assert!(matches!(err, JsonStatError::IndexOutOfRange { index: 4, size: 4, .. }));
        assert!(dim.code_of(4).is_err());
        assert!(dim.caption_of(4).is_err());
    }

    #[test]
    fn test_caption_collision_keeps_first() {
        let dim = Dimension::new(
            "sex".to_string(),
            None,
            None,
            0,
            vec![
                Category { code: "M".to_string(), caption: "total".to_string() },
                Category { code: "T".to_string(), caption: "total".to_string() },
            ],
        );
        assert_eq!(dim.index_of(&CategorySpec::Caption("total".to_string())).unwrap(), 0);
    }
}
