use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by catalog storage and mutation
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when the temporary file could not replace the catalog file
    #[error("failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Returned when stored data parses but breaks a catalog invariant
    #[error("corrupt catalog; {0}")]
    Corrupt(String),

    /// Returned when the largest id in use has no successor
    #[error("no book ids left to assign")]
    IdSpaceExhausted,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
