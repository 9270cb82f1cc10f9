use thiserror::Error;

/// Errors raised while loading and normalizing an attribute catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog document is not valid JSON for the expected layout.
    #[error("catalog json error: {0}")]
    Json(#[from] serde_json::Error),
    /// An attribute has no `values` key at all.
    #[error("attribute '{attribute}' is missing its values")]
    MissingValues { attribute: String },
    /// A value entry carries something other than a string or a number.
    #[error("attribute '{attribute}' has a value that is not a string or number: {raw}")]
    InvalidValue { attribute: String, raw: String },
    /// A price cannot be coerced into a decimal.
    #[error("attribute '{attribute}' value '{value}' has an invalid price: {raw}")]
    InvalidPrice {
        attribute: String,
        value: String,
        raw: String,
    },
}

/// Convenience alias for results returned by catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
