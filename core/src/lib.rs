//! Service model construction from OpenAPI-style schema trees.
//!
//! This crate turns an already-parsed schema document into a flat
//! [`ServiceModel`]: a registry of named [`Field`] types and named
//! [`StructureDescription`] types that code generators can consume.
//!
//! - [`Schema`] / [`SchemaDocument`]: the input tree, produced by a document
//!   parser with references already resolved to names.
//! - [`build_service_model`]: walks every component of a document.
//! - [`ModelBuilder`]: the recursive walker, for driving single schemas.
//! - [`NamingPolicy`]: how anonymous list items are named.
//! - [`ModelOverride`]: per-entity default values and patterns for strings.
//!
//! Validation ([`validate_model`]) reports dangling type names and invalid
//! string patterns in a finished model.
//!
//! # Example
//!
//! ```
//! use service_model_core::*;
//!
//! let document = SchemaDocument::new()
//!     .with_component("Tag", Schema::string())
//!     .with_component(
//!         "Pet",
//!         Schema::object(
//!             ObjectContext::default()
//!                 .with_required_property("id", Schema::integer(IntegerContext {
//!                     format: IntegerFormat::Int64,
//!                     ..Default::default()
//!                 }))
//!                 .with_property("tags", Schema::array(ArrayContext::of(Schema::reference("Tag")))),
//!         ),
//!     );
//!
//! let model = build_service_model(&document, &BuildOptions::default()).unwrap();
//!
//! let pet = model.structure("Pet").unwrap();
//! assert_eq!(pet.members["id"].type_name, "PetId");
//! assert!(pet.members["id"].required);
//! assert!(matches!(model.field("PetId"), Some(Field::Long { .. })));
//! assert!(matches!(model.field("PetTags"), Some(Field::List { element_type, .. }) if element_type == "Tag"));
//! assert!(validate_model(&model, &document).is_empty());
//! ```

mod builder;
mod constraints;
mod error;
mod naming;
mod overrides;
mod schema;
mod string_field;
mod types;
mod validate;

pub use builder::{BuildOptions, ModelBuilder, Registration, build_service_model, escape_pointer_segment};
pub use constraints::{
    integer_range, item_count_range, length_range, number_range, numeric_range,
    string_length_range,
};
pub use error::{ModelError, Result, UnsupportedShape};
pub use naming::{
    ListNames, NamingPolicy, combinator_entity_name, property_entity_name, uppercase_first,
};
pub use overrides::ModelOverride;
pub use schema::*;
pub use string_field::build_string_field;
pub use types::*;
pub use validate::{ValidationError, validate_model};
