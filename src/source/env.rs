use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::{Origin, Source, SourceError};

/// Dotfile consulted by [`Binder::from_env`](crate::Binder::from_env).
pub const DEFAULT_DOT_ENV_PATH: &str = ".env";

/// The process environment layered over an optional dotfile.
///
/// Both layers are captured when the source is built. A key set in the
/// environment always wins over the same key in the dotfile.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource {
    environment: BTreeMap<String, String>,
    dot_env: BTreeMap<String, String>,
}

impl EnvironmentSource {
    /// Captures the process environment, plus `dot_env_path` when given.
    ///
    /// A dotfile that does not exist is treated as empty.
    pub fn load(dot_env_path: Option<&Path>) -> Result<Self, SourceError> {
        let source = Self::from_process();
        match dot_env_path {
            Some(path) => source.with_dot_env(path),
            None => Ok(source),
        }
    }

    /// Captures the process environment only.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        let environment: BTreeMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();

        debug!(variables = environment.len(), "captured process environment");
        Self {
            environment,
            dot_env: BTreeMap::new(),
        }
    }

    /// Builds a source from explicit layers without touching the process.
    pub fn from_layers<K, V>(
        environment: impl IntoIterator<Item = (K, V)>,
        dot_env: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            environment: collect_layer(environment),
            dot_env: collect_layer(dot_env),
        }
    }

    /// Replaces the dotfile layer with the contents of `path`.
    pub fn with_dot_env(mut self, path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        self.dot_env = load_dot_env(path)?;
        debug!(
            path = %path.display(),
            variables = self.dot_env.len(),
            "loaded dotfile layer"
        );
        Ok(self)
    }
}

impl Source for EnvironmentSource {
    fn get(&self, key: &str) -> Option<&str> {
        self.environment
            .get(key)
            .or_else(|| self.dot_env.get(key))
            .map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .environment
            .keys()
            .chain(self.dot_env.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    fn origin(&self) -> Origin {
        Origin::Environment
    }
}

fn collect_layer<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> BTreeMap<String, String>
where
    K: Into<String>,
    V: Into<String>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parses a `KEY=VALUE` dotfile.
///
/// Returns an empty layer if the file doesn't exist.
fn load_dot_env(path: &Path) -> Result<BTreeMap<String, String>, SourceError> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "dotfile not found, using empty layer");
            return Ok(BTreeMap::new());
        }
        Err(e) => {
            return Err(SourceError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    entries
        .map(|entry| {
            entry.map_err(|e| match e {
                dotenvy::Error::Io(_) => SourceError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                },
                _ => SourceError::ParseError {
                    path: path.to_path_buf(),
                    source: e,
                },
            })
        })
        .collect()
}
