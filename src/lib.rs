//! JSON-stat dataset indexing library
//!
//! Exposes multidimensional statistical tables encoded in the JSON-stat
//! exchange format as addressable, labeled arrays:
//! - per-dimension resolution of category codes, captions and raw indices
//! - mixed-radix addressing between full index vectors and linear offsets
//!   into the flat value vector
//! - position enumeration with arbitrary traversal ordering and partial
//!   fixation ("block") filtering
//! - collection documents bundling several named datasets
//!
//! Documents enter as an already decoded [`serde_json::Value`], as raw JSON
//! text or as a file path; all three funnel into the same validated model,
//! which is immutable after construction.
//!
//! ```
//! use jsonstat::{Dataset, Selection};
//!
//! let doc = r#"{
//!     "label": "two dimensions",
//!     "value": [1, 2, 3, 4, 5, 6],
//!     "dimension": {
//!         "id": ["year", "area"],
//!         "size": [2, 3],
//!         "year": { "category": { "index": { "2013": 0, "2014": 1 } } },
//!         "area": { "category": { "index": { "AU": 0, "BE": 1, "IT": 2 } } }
//!     }
//! }"#;
//! let dataset = Dataset::from_string(Some("demo"), doc)?;
//! let value = dataset.value(&Selection::new().with("year", "2014").with("area", "IT"))?;
//! assert_eq!(value, &serde_json::json!(6));
//! # Ok::<(), jsonstat::JsonStatError>(())
//! ```

pub mod error;
pub mod models;

mod parse;

pub use error::{JsonStatError, Result};
pub use models::{Category, CategorySpec, Collection, Dataset, Dimension, PositionIter, Selection};
