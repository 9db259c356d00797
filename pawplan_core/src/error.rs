//! Error types for the pawplan_core library.
//!
//! The composition, tally and pricing engines are total and never fail;
//! these errors only arise at the I/O edges (documents, config, exports).

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pawplan_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// A catalog key that names no template
    #[error("Unknown catalog template: {0}")]
    UnknownTemplate(String),

    /// An id or index that names nothing in the program
    #[error("Not found in program: {0}")]
    NotFound(String),

    /// A required argument was neither given nor configured
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// Writing a document for the external renderer failed
    #[error("Failed to write {bytes} bytes to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        bytes: usize,
        #[source]
        source: io::Error,
    },
}
