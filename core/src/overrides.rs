//! Per-run model overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Values that replace what the schema declares for specific entities.
///
/// Only string fields consult the override. Keys are entity names as they
/// appear in the finished model (e.g. `PetStatus` for the `status`
/// property of `Pet`).
///
/// # Examples
///
/// ```
/// use service_model_core::ModelOverride;
///
/// let overrides = ModelOverride::default()
///     .with_default_value("PetStatus", "available")
///     .with_pattern("PetName", "^[A-Za-z ]+$");
///
/// assert_eq!(overrides.default_value_for("PetStatus"), Some("available"));
/// assert_eq!(overrides.pattern_for("PetName"), Some("^[A-Za-z ]+$"));
/// assert_eq!(overrides.pattern_for("PetStatus"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOverride {
    /// Default values keyed by entity name.
    #[serde(default)]
    pub default_values: BTreeMap<String, String>,
    /// Regular expression patterns keyed by entity name.
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
}

impl ModelOverride {
    /// Adds a default value override.
    pub fn with_default_value(mut self, entity: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_values.insert(entity.into(), value.into());
        self
    }

    /// Adds a pattern override.
    pub fn with_pattern(mut self, entity: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.patterns.insert(entity.into(), pattern.into());
        self
    }

    /// Overridden default value for `entity`.
    pub fn default_value_for(&self, entity: &str) -> Option<&str> {
        self.default_values.get(entity).map(String::as_str)
    }

    /// Overridden pattern for `entity`.
    pub fn pattern_for(&self, entity: &str) -> Option<&str> {
        self.patterns.get(entity).map(String::as_str)
    }

    /// Returns true if no overrides are set.
    pub fn is_empty(&self) -> bool {
        self.default_values.is_empty() && self.patterns.is_empty()
    }
}
