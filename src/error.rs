use std::path::PathBuf;
use thiserror::Error;

/// An error which prevents a simulation from being set up.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "serde")]
    #[error("malformed input: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("vehicle {index}: unknown driver options preset '{name}'")]
    UnknownPreset { index: usize, name: String },

    #[error("vehicle {index}: {reason}")]
    InvalidVehicle { index: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
