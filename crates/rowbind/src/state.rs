//! Saved adapter state.
//!
//! A [`StateBundle`] is a small string-keyed store the host keeps across a
//! teardown/recreate cycle (for example a configuration change). The adapter
//! writes its selection into it; the recreated adapter reads it back through
//! the builder's `selected_items` option.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default bundle key for the ordered selection set.
pub const STATE_SELECTED_ITEMS: &str = "state-selected-items";

/// String-keyed saved state, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateBundle {
    entries: BTreeMap<String, serde_json::Value>,
}

impl StateBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn put<V: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &V) -> Result<()> {
        self.entries.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Reads the entry under `key`. Returns `Ok(None)` if absent.
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        self.entries
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(Into::into)
    }

    /// Reads a saved selection, or an empty list if none was saved.
    pub fn selected_items<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Whether an entry exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes the entry under `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the bundle to JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a bundle from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;

    #[test]
    fn test_missing_key_reads_as_none() {
        let bundle = StateBundle::new();
        assert_eq!(bundle.get::<Vec<u32>>("nothing").unwrap(), None);
        assert!(bundle.selected_items::<u32>(STATE_SELECTED_ITEMS).unwrap().is_empty());
    }

    #[test]
    fn test_selection_survives_json_text() {
        let mut bundle = StateBundle::new();
        bundle.put(STATE_SELECTED_ITEMS, &vec!["b", "a"]).unwrap();

        let text = bundle.to_json().unwrap();
        let restored = StateBundle::from_json(&text).unwrap();
        assert_eq!(
            restored.selected_items::<String>(STATE_SELECTED_ITEMS).unwrap(),
            vec!["b".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn test_type_mismatch_is_state_error() {
        let mut bundle = StateBundle::new();
        bundle.put("k", "text").unwrap();
        assert!(matches!(bundle.get::<u32>("k"), Err(AdapterError::State(_))));
    }

    #[test]
    fn test_remove() {
        let mut bundle = StateBundle::new();
        bundle.put("k", &1).unwrap();
        assert!(bundle.contains("k"));
        assert!(bundle.remove("k"));
        assert!(bundle.is_empty());
    }
}
