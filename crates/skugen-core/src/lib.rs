//! Core contracts for the SKU generator.
//!
//! This crate defines the attribute catalog, its normalization from the raw
//! JSON layout, the derived attribute sets consumed by the enumerator, and the
//! pricing options shared by the generator and the CLI.

pub mod catalog;
pub mod error;
pub mod options;

pub use catalog::{
    Attribute, AttributeSet, Catalog, CatalogDocument, DerivedSets, RawAttribute, RawValueEntry,
    ValueEntry,
};
pub use error::{CatalogError, Result};
pub use options::{AdjustmentKind, PricingOptions};

/// Contract version for catalog documents.
pub const CATALOG_VERSION: &str = "0.1";
