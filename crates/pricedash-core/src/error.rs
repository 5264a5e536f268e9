use thiserror::Error;

/// Validation and contract errors exposed by `pricedash-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must be an ISO 8601 calendar date (YYYY-MM-DD): '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("invalid source '{value}', expected one of comtrade, worldbank, fao")]
    InvalidSource { value: String },
    #[error("invalid filter field '{value}', expected one of product, region, country, incoterm")]
    InvalidFilterField { value: String },

    #[error("config variable {name} has invalid value '{value}'")]
    InvalidConfig { name: &'static str, value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
