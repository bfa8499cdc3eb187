//! OpenAPI document loading for the service model builder.
//!
//! This crate is the document-parser side of the builder: it turns OpenAPI
//! JSON or YAML into the core [`SchemaDocument`] and loads the
//! [`GenerationConfig`] that steers a build.
//!
//! # Quick start
//!
//! ```no_run
//! use service_model_document::{GenerationConfig, load_and_build};
//!
//! let config = GenerationConfig::load("service-model.yml").unwrap();
//! let (document, model) = load_and_build("petstore.yaml", &config).unwrap();
//! println!(
//!     "{}: {} fields, {} structures",
//!     document.title.unwrap_or_default(),
//!     model.field_descriptions.len(),
//!     model.structure_descriptions.len()
//! );
//! ```

mod config;
mod error;
mod openapi;

use std::path::Path;

use service_model_core::{SchemaDocument, ServiceModel, build_service_model};

pub use config::{CONFIG_VERSION, GenerationConfig};
pub use error::{DocumentError, Result};
pub use openapi::{DocumentFormat, convert_document, convert_schema, load_document, parse_document};

/// Builds the model of an already loaded document.
///
/// # Errors
///
/// Returns [`ModelError`](DocumentError::ModelError) if the build fails.
pub fn build_model(document: &SchemaDocument, config: &GenerationConfig) -> Result<ServiceModel> {
    let model = build_service_model(document, &config.build_options())?;
    Ok(model)
}

/// Loads the document at `path` and builds its model.
///
/// # Errors
///
/// Returns any error of [`load_document`] or [`build_model`].
pub fn load_and_build(
    path: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<(SchemaDocument, ServiceModel)> {
    let document = load_document(path)?;
    let model = build_model(&document, config)?;
    Ok((document, model))
}
