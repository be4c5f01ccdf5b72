//! String-keyed application settings
//!
//! Settings are grouped by class name, each class holding an ordered list
//! of (attribute, value) string pairs. Lookups inside a class are linear
//! and the first matching attribute wins. Mutations never touch disk;
//! persistence happens through an explicit [`ConfigManager::save`] call.
//!
//! [`ConfigManager::save`]: crate::domain::config::ConfigManager::save

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered (attribute, value) pairs belonging to one settings class
pub type SettingsClass = Vec<(String, String)>;

/// In-memory settings store, serialized as part of the main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsStore {
    classes: BTreeMap<String, SettingsClass>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute within a class
    ///
    /// Returns the stored value, or the empty string when either the class
    /// or the attribute is absent.
    pub fn value(&self, class: &str, attribute: &str) -> &str {
        self.classes
            .get(class)
            .and_then(|pairs| pairs.iter().find(|(attr, _)| attr == attribute))
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Insert or overwrite an attribute's value under the given class
    ///
    /// The first pair with a matching attribute is overwritten in place so
    /// insertion order is kept; a new attribute is appended at the end.
    pub fn set_value(
        &mut self,
        class: impl Into<String>,
        attribute: &str,
        value: impl Into<String>,
    ) {
        let pairs = self.classes.entry(class.into()).or_default();
        let value = value.into();
        if let Some(pair) = pairs.iter_mut().find(|(attr, _)| attr == attribute) {
            pair.1 = value;
        } else {
            pairs.push((attribute.to_string(), value));
        }
    }

    /// Remove an attribute from a class, returning its previous value
    ///
    /// An emptied class is dropped from the store.
    pub fn remove_value(&mut self, class: &str, attribute: &str) -> Option<String> {
        let pairs = self.classes.get_mut(class)?;
        let index = pairs.iter().position(|(attr, _)| attr == attribute)?;
        let (_, value) = pairs.remove(index);
        if pairs.is_empty() {
            self.classes.remove(class);
        }
        Some(value)
    }

    pub fn contains(&self, class: &str, attribute: &str) -> bool {
        self.classes
            .get(class)
            .map(|pairs| pairs.iter().any(|(attr, _)| attr == attribute))
            .unwrap_or(false)
    }

    /// All class names in the store
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Ordered (attribute, value) pairs of one class
    pub fn attributes(&self, class: &str) -> &[(String, String)] {
        self.classes
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
