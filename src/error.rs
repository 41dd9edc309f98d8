use thiserror::Error;

/// Errors returned by the outer surfaces of this crate (configuration, CLI parsing, output).
///
/// The clustering engines and dataset generators never fail on data shape: degenerate
/// input produces a terminal snapshot instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Dataset key that names none of the known shapes.
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// Algorithm key that names none of the known engines.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Reading a config file or writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Config or snapshot (de)serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
