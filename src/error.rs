use thiserror::Error;

/// Top-level error type for the VER calculator.
#[derive(Debug, Error)]
pub enum VerCalcError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("invalid catalog payload: {0}")]
    InvalidCatalog(String),

    #[error("unknown manufacturer: {0}")]
    UnknownManufacturer(String),

    #[error("catalog worker failed: {0}")]
    Worker(String),
}

/// Convenience type alias for results using [`VerCalcError`].
pub type Result<T> = std::result::Result<T, VerCalcError>;
