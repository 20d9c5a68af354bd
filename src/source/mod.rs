//! Read-only key/value sources the binder draws raw values from.

mod env;
mod error;
mod map;

pub use env::{EnvironmentSource, DEFAULT_DOT_ENV_PATH};
pub use error::SourceError;
pub use map::MapSource;

/// How a source names itself in missing-field diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Process environment, possibly layered over a dotfile.
    Environment,
    Named(String),
}

/// A case-sensitive, read-only lookup of string values.
///
/// Sources expose no write operations; they are built once and shared
/// by reference for every binding that reads from them.
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Returns the raw value for `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> Option<&str>;

    /// All keys, in order.
    fn keys(&self) -> Vec<&str>;

    fn origin(&self) -> Origin;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }

    fn keys(&self) -> Vec<&str> {
        (**self).keys()
    }

    fn origin(&self) -> Origin {
        (**self).origin()
    }
}
