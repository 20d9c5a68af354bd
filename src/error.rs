use crate::bind::BindError;
use crate::class::AttributeError;
use crate::source::SourceError;
use thiserror::Error;

/// Top-level error type for the dragon-env library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("binding error: {0}")]
    Bind(#[from] BindError),

    #[error("attribute error: {0}")]
    Attribute(#[from] AttributeError),
}
