use thiserror::Error;

use super::FrozenError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttributeError {
    #[error(transparent)]
    Frozen(#[from] FrozenError),

    #[error("'{owner}' has no attribute '{name}'")]
    NotFound { owner: String, name: String },

    #[error("{class}() takes {expected} argument(s) but {given} were given")]
    Arity {
        class: String,
        expected: usize,
        given: usize,
    },
}

impl AttributeError {
    /// Whether the write was rejected by a frozen guard.
    pub fn is_frozen(&self) -> bool {
        matches!(self, AttributeError::Frozen(_))
    }
}
