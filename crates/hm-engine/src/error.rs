//! Engine error types.

use std::fmt::Display;
use std::path::PathBuf;

use hm_model::ModelError;
use thiserror::Error;

/// Errors raised by an engine or by the progress channel.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A document could not be opened or created.
    #[error("cannot open document {path}: {reason}")]
    OpenFailure { path: PathBuf, reason: String },

    /// The progress consumer asked to abort.
    #[error("operation cancelled")]
    Cancelled,

    /// A handle is not (or no longer) known to the engine.
    #[error("unknown {kind} handle {id}")]
    UnknownHandle { kind: &'static str, id: u64 },

    /// A document node does not have the expected structure.
    #[error("malformed {element}: {reason}")]
    Malformed { element: String, reason: String },

    /// XML could not be parsed or produced.
    #[error("XML error: {reason}")]
    Xml { reason: String },

    /// A decoded object failed validation.
    #[error("invalid object: {0}")]
    Model(#[from] ModelError),

    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target format cannot represent the given object.
    #[error("{target} export: {reason}")]
    Unsupported { target: &'static str, reason: String },

    /// Unrecognized auxiliary field id.
    #[error("unknown auxiliary field '{0}'")]
    UnknownAuxField(String),

    /// Unrecognized encoding id.
    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),
}

impl EngineError {
    /// Build a [`EngineError::Malformed`] error.
    pub fn malformed(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            element: element.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an XML reader/writer failure.
    pub fn xml(error: impl Display) -> Self {
        Self::Xml {
            reason: error.to_string(),
        }
    }

    /// Wrap an I/O failure on `path`.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
