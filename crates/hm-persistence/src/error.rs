//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;

use hm_engine::EngineError;
use hm_model::{Category, ModelError};
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The document could not be opened or parsed.
    #[error("Cannot open {path}: {reason}")]
    OpenFailure { path: PathBuf, reason: String },

    /// The document has no `FLOW` section.
    #[error("No project data in {path}")]
    NoProjectData { path: PathBuf },

    /// A requested object does not exist in the project.
    #[error("{category} '{name}' not found")]
    ObjectNotFound { category: Category, name: String },

    /// The format id is not known for this category.
    #[error("Unknown {category} export format '{format}'")]
    UnsupportedFormat { category: Category, format: String },

    /// Several objects were selected for a format holding a single one.
    #[error("Cannot combine {count} {category} objects into one '{format}' file")]
    UnsupportedAggregation {
        category: Category,
        format: &'static str,
        count: usize,
    },

    /// No objects were selected for a single-object format.
    #[error("No {category} selected for export")]
    EmptySelection { category: Category },

    /// The progress consumer cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// Two imported objects of one category share a name.
    #[error("{category} '{name}' appears more than once")]
    DuplicateName { category: Category, name: String },

    /// Project metadata (info, commands, boundary types) is malformed.
    #[error("Invalid project metadata in <{element}>: {reason}")]
    InvalidMetadata { element: &'static str, reason: String },

    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other engine failure.
    #[error(transparent)]
    Engine(EngineError),
}

impl From<EngineError> for PersistenceError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::OpenFailure { path, reason } => Self::OpenFailure { path, reason },
            EngineError::Cancelled => Self::Cancelled,
            EngineError::Io {
                operation,
                path,
                source,
            } => Self::Io {
                operation,
                path,
                source,
            },
            EngineError::Model(ModelError::DuplicateName { category, name }) => {
                Self::DuplicateName { category, name }
            }
            other => Self::Engine(other),
        }
    }
}

impl From<ModelError> for PersistenceError {
    fn from(error: ModelError) -> Self {
        EngineError::Model(error).into()
    }
}

impl PersistenceError {
    pub(crate) fn metadata(element: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            element,
            reason: reason.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::OpenFailure { path, .. } => {
                format!("The file at {} could not be opened.", path.display())
            }
            Self::NoProjectData { path } => {
                format!("The file at {} does not contain a HybMesh project.", path.display())
            }
            Self::ObjectNotFound { category, name } => {
                format!("There is no {category} named '{name}' in the project.")
            }
            Self::UnsupportedFormat { category, format } => {
                format!("'{format}' is not a known export format for a {category}.")
            }
            Self::UnsupportedAggregation {
                category,
                format,
                count,
            } => format!(
                "The '{format}' format holds a single {category}, but {count} were selected."
            ),
            Self::EmptySelection { category } => {
                format!("Select at least one {category} to export.")
            }
            Self::Cancelled => "The operation was cancelled.".to_string(),
            Self::DuplicateName { category, name } => {
                format!("The file contains more than one {category} named '{name}'.")
            }
            Self::InvalidMetadata { element, reason } => {
                format!("The project section <{element}> is invalid: {reason}")
            }
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::Engine(error) => {
                format!("An error occurred while processing the document: {error}")
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::OpenFailure { .. } => {
                Some("Check that the file exists and is a HybMesh document.".into())
            }
            Self::NoProjectData { .. } => Some(
                "The file may be a standalone grid or contour export; open it with import instead."
                    .into(),
            ),
            Self::ObjectNotFound { .. } => Some("Check the object names in the project.".into()),
            Self::UnsupportedFormat { .. } => {
                Some("Choose one of the listed export formats.".into())
            }
            Self::UnsupportedAggregation { .. } => {
                Some("Export the objects one at a time or use the native format.".into())
            }
            Self::EmptySelection { .. } | Self::Cancelled | Self::Engine(_) => None,
            Self::DuplicateName { .. } | Self::InvalidMetadata { .. } => {
                Some("The file may have been edited by hand; fix or remove the entry.".into())
            }
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
