use super::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw resource metadata attached to a reading
///
/// Keys follow whatever convention the producing subsystem uses: flat dotted keys
/// (`metadata.owner`, `properties.os_type`), HTTP header style keys
/// (`X-Container-Meta-Owner`), or a `metadata` key holding a serialized structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, FieldValue>,
}

impl Metadata {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.get(key)
    }

    /// Case-insensitive lookup.
    ///
    /// When several keys differ only by case the first in byte-wise key order wins, so
    /// uppercase spellings beat lowercase ones.
    #[must_use]
    pub fn get_ignore_case(&self, key: &str) -> Option<&FieldValue> {
        let wanted = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.entries.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let _ = self.insert(key, value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
