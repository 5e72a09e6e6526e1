use super::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A string-keyed bag of configuration values
///
/// Report definitions and per-row items are both mappings. They are owned by the caller
/// and never mutated by the resolvers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    values: BTreeMap<String, FieldValue>,
}

/// Configuration for one report definition (`cost_format`, `billing_entity`, ...).
pub type Definition = Mapping;

/// Per-row overrides (`item_rate`, `product_code`, `line_item_type`, ...).
pub type Item = Mapping;

impl Mapping {
    #[must_use]
    pub const fn new() -> Self {
        Self { values: BTreeMap::new() }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Returns the value for `key`, or `default` when the key is absent.
    #[must_use]
    pub fn get_or(&self, key: &str, default: impl Into<FieldValue>) -> FieldValue {
        self.values.get(key).cloned().unwrap_or_else(|| default.into())
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(FieldValue::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Builder-style variant of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let _ = self.insert(key, value);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
