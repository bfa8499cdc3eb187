//! Generation configuration.
//!
//! Defines the YAML-serializable configuration that controls which
//! components are built, how anonymous list items are named, and which
//! string defaults and patterns are overridden.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! naming:
//!   plural_suffix: "s"
//! model_override:
//!   default_values:
//!     PetStatus: available
//!   patterns:
//!     PetName: "^[A-Za-z ]+$"
//! include: []
//! exclude:
//!   - LegacyPet
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use service_model_core::{BuildOptions, ModelOverride, NamingPolicy};

use crate::error::Result;

/// Current configuration format version.
pub const CONFIG_VERSION: &str = "1.0";

/// Top-level generation configuration.
///
/// Every section is optional in the file; missing sections take their
/// defaults.
///
/// # Examples
///
/// ```
/// use service_model_document::GenerationConfig;
///
/// let config: GenerationConfig = serde_yaml::from_str("exclude: [Legacy]").unwrap();
/// assert_eq!(config.naming.plural_suffix, "s");
/// assert!(config.is_included("Pet"));
/// assert!(!config.is_included("Legacy"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Pluralization rule for list/element names.
    pub naming: NamingPolicy,
    /// String default and pattern overrides.
    pub model_override: ModelOverride,
    /// Components to build (empty = all components).
    pub include: Vec<String>,
    /// Components to skip.
    pub exclude: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            naming: NamingPolicy::default(),
            model_override: ModelOverride::default(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl GenerationConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DocumentError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DocumentError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DocumentError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::DocumentError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if the component `name` should be built.
    ///
    /// Exclusions always win; an empty include list admits everything else.
    pub fn is_included(&self, name: &str) -> bool {
        self.build_options().is_selected(name)
    }

    /// Converts the configuration into builder options.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            naming: self.naming.clone(),
            model_override: (!self.model_override.is_empty()).then(|| self.model_override.clone()),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
        }
    }
}
