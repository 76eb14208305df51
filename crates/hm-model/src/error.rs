//! Model error types.

use thiserror::Error;

use crate::category::Category;

/// Error raised when a model object or collection is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A name is already used within its category.
    #[error("{category} '{name}' already exists")]
    DuplicateName { category: Category, name: String },

    /// A connectivity entry points outside its target array.
    #[error("{kind} index {index} out of range (size {limit})")]
    InvalidIndex {
        kind: &'static str,
        index: usize,
        limit: usize,
    },

    /// A polygon or edge has too few vertices.
    #[error("{kind} {index} has only {vertices} vertices")]
    DegenerateElement {
        kind: &'static str,
        index: usize,
        vertices: usize,
    },

    /// A 3D face is attached to neither a left nor a right cell.
    #[error("face {index} has no adjacent cell")]
    UnattachedFace { index: usize },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Check that every index is below `limit`.
pub(crate) fn check_indices(
    kind: &'static str,
    indices: impl IntoIterator<Item = usize>,
    limit: usize,
) -> Result<()> {
    for index in indices {
        if index >= limit {
            return Err(ModelError::InvalidIndex { kind, index, limit });
        }
    }
    Ok(())
}
