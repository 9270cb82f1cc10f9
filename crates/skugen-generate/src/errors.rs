use thiserror::Error;

use skugen_core::CatalogError;

use crate::pricing::PriceOverflow;

/// Errors emitted by the generation engine and its sinks.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("cannot price {sku}: {source}")]
    Pricing {
        sku: String,
        #[source]
        source: PriceOverflow,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
