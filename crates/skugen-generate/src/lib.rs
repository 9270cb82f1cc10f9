//! Streaming SKU generation.
//!
//! Consumes a normalized [`skugen_core::Catalog`], enumerates attribute
//! combinations lazily, prices each one and hands records to an output sink
//! one at a time.

mod cursor;
pub mod engine;
pub mod enumerate;
pub mod errors;
pub mod memory;
pub mod model;
pub mod output;
pub mod pricing;
pub mod required_first;
pub mod sku;

pub use engine::GenerationEngine;
pub use enumerate::{
    Combination, Combinations, Enumeration, EnumerationStats, EnumerationStrategy,
    candidate_count, enumerate,
};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport};
pub use output::{OutputFormat, SkuRecord, SkuSink, open_sink};
pub use pricing::{PriceBook, PriceBreakdown, PriceOverflow, price};
pub use required_first::RequiredFirst;
pub use sku::format_sku;
