//! Data model for JSON-stat tables
//!
//! Defines the core structures exposed by the crate: dimensions, datasets,
//! collections and the selection types used to address them. Everything here
//! is immutable after construction.

pub mod collection;
pub mod dataset;
pub mod dimension;
pub mod selection;

pub use collection::Collection;
pub use dataset::{Dataset, PositionIter};
pub use dimension::{Category, Dimension};
pub use selection::{CategorySpec, Selection};
