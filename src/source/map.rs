use std::collections::BTreeMap;

use super::{Origin, Source};

const DEFAULT_LABEL: &str = "configuration source";

/// An in-memory source, labelled in diagnostics as "configuration source"
/// unless renamed with [`MapSource::named`].
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    label: Option<String>,
    entries: BTreeMap<String, String>,
}

impl MapSource {
    /// Creates an unlabelled source from key/value pairs.
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            label: None,
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Sets the label reported in missing-field errors.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the source holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl Source for MapSource {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    fn origin(&self) -> Origin {
        Origin::Named(self.label.as_deref().unwrap_or(DEFAULT_LABEL).to_string())
    }
}
