use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("failed to read dotfile '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("failed to parse dotfile '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: dotenvy::Error,
    },
}
