//! Free-form profile attributes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user profile: arbitrary string attributes keyed case-insensitively.
///
/// Keys are lowercased on both write and read, so `"Idade"` and `"idade"`
/// address the same attribute. An attribute whose value is the empty string
/// is indistinguishable from an unset one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    attributes: HashMap<String, String>,
}

impl Profile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, lowercasing the key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.insert(key.to_lowercase(), value.into());
    }

    /// Look up an attribute by case-insensitive key.
    ///
    /// Returns `None` for a missing key and for a value set to `""`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(&key.to_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}
