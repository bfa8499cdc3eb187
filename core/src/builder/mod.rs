//! Recursive schema walk that fills a [`ServiceModel`].
//!
//! The walk is driven by [`ModelBuilder::dispatch`], which classifies a node
//! and routes it to one of the specialized parsers:
//!
//! - **object**: properties become ordered structure members
//! - **map**: schema-valued additional properties become a map field
//! - **array**: item schemas become a list field with a singular element name
//! - **combinator**: allOf/anyOf/oneOf members fold into one structure
//!
//! Parsers recurse back into the dispatcher for anonymous sub-schemas, each
//! time with a synthetic name derived from the enclosing one. Properties are
//! always visited in lexicographic order, so identical input yields an
//! identical model.
//!
//! # Example
//!
//! ```
//! use service_model_core::*;
//!
//! let document = SchemaDocument::new().with_component(
//!     "Pet",
//!     Schema::object(
//!         ObjectContext::default()
//!             .with_required_property("name", Schema::string())
//!             .with_property("tags", Schema::array(ArrayContext::of(Schema::string()))),
//!     ),
//! );
//!
//! let model = build_service_model(&document, &BuildOptions::default()).unwrap();
//! let pet = model.structure("Pet").unwrap();
//! assert_eq!(pet.members["name"].type_name, "PetName");
//! assert_eq!(pet.members["tags"].type_name, "PetTags");
//! assert!(matches!(model.field("PetTag"), Some(Field::String(_))));
//! ```

mod array;
mod combinator;
mod map;
mod object;

use tracing::{debug, info, warn};

use crate::constraints::{integer_range, number_range};
use crate::error::{ModelError, Result, UnsupportedShape};
use crate::naming::NamingPolicy;
use crate::overrides::ModelOverride;
use crate::schema::{IntegerFormat, Reference, Schema, SchemaDocument, SchemaKind};
use crate::string_field::build_string_field;
use crate::types::{Field, ServiceModel, StructureDescription};

/// Outcome of dispatching one schema node.
///
/// `type_name` is what the caller records when it refers to the node.
/// `registered_name` is the entity the node was stored under, or `None` for
/// a reference, which registers nothing. The two differ from the proposed
/// enclosing name when array handling pluralizes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Entity name the node was registered under.
    pub registered_name: Option<String>,
    /// Name to use when referring to the node.
    pub type_name: String,
}

impl Registration {
    fn registered(name: &str) -> Self {
        Self {
            registered_name: Some(name.to_string()),
            type_name: name.to_string(),
        }
    }

    fn reference(target: &str) -> Self {
        Self {
            registered_name: None,
            type_name: target.to_string(),
        }
    }
}

/// Options for [`build_service_model`].
///
/// # Examples
///
/// ```
/// use service_model_core::BuildOptions;
///
/// let options = BuildOptions {
///     exclude: vec!["Legacy".into()],
///     ..Default::default()
/// };
/// assert!(options.is_selected("Pet"));
/// assert!(!options.is_selected("Legacy"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Pluralization rule for list/element names.
    pub naming: NamingPolicy,
    /// Overrides consulted by string fields.
    pub model_override: Option<ModelOverride>,
    /// Components to build; empty means all.
    pub include: Vec<String>,
    /// Components to skip.
    pub exclude: Vec<String>,
}

impl BuildOptions {
    /// Returns true if the component `name` should be built.
    pub fn is_selected(&self, name: &str) -> bool {
        if self.exclude.iter().any(|e| e == name) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|i| i == name)
    }
}

/// Builds a model from every selected component of `document`.
///
/// Components are visited in name order and registered under their own
/// names. The first error aborts the build and the partial model is
/// discarded.
///
/// # Errors
///
/// Returns [`ModelError::UnsupportedSchemaShape`] for schema shapes the
/// model cannot express and [`ModelError::MissingReferenceTarget`] for
/// references with no resolved name.
pub fn build_service_model(document: &SchemaDocument, options: &BuildOptions) -> Result<ServiceModel> {
    let mut model = ServiceModel::new();
    let mut builder = ModelBuilder::new(&mut model, document)
        .with_naming(options.naming.clone())
        .with_override(options.model_override.as_ref());

    for (name, schema) in &document.components {
        if !options.is_selected(name) {
            debug!(component = %name, "Skipping component");
            continue;
        }
        builder.build_component(name, schema)?;
    }

    info!(
        title = ?document.title,
        fields = model.field_descriptions.len(),
        structures = model.structure_descriptions.len(),
        "Built service model"
    );
    Ok(model)
}

/// Single-owner walker over a schema tree.
///
/// Holds the model by exclusive borrow for the duration of the walk, along
/// with the per-run override, the naming policy and the current schema path
/// used in error reports.
pub struct ModelBuilder<'a> {
    model: &'a mut ServiceModel,
    document: &'a SchemaDocument,
    model_override: Option<&'a ModelOverride>,
    naming: NamingPolicy,
    path: Vec<String>,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder writing into `model`.
    pub fn new(model: &'a mut ServiceModel, document: &'a SchemaDocument) -> Self {
        Self {
            model,
            document,
            model_override: None,
            naming: NamingPolicy::default(),
            path: vec!["#".to_string()],
        }
    }

    /// Sets the override consulted by string fields.
    pub fn with_override(mut self, model_override: Option<&'a ModelOverride>) -> Self {
        self.model_override = model_override;
        self
    }

    /// Sets the pluralization rule.
    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Walks one component schema, registering it under `name`.
    ///
    /// # Errors
    ///
    /// See [`build_service_model`].
    pub fn build_component(&mut self, name: &str, schema: &Schema) -> Result<Registration> {
        debug!(component = %name, document = ?self.document.title, "Building component");
        self.in_path(&["components", "schemas", name], |builder| {
            builder.dispatch(schema, name)
        })
    }

    /// Classifies `schema` and registers it under `enclosing` or a name
    /// derived from it.
    ///
    /// # Errors
    ///
    /// See [`build_service_model`].
    pub fn dispatch(&mut self, schema: &Schema, enclosing: &str) -> Result<Registration> {
        match &schema.kind {
            SchemaKind::Boolean => Ok(self.register_field(enclosing, Field::Boolean)),
            SchemaKind::Integer(context) => {
                let range_constraint = integer_range(context);
                let field = if context.format == IntegerFormat::Int64 {
                    Field::Long { range_constraint }
                } else {
                    Field::Integer { range_constraint }
                };
                Ok(self.register_field(enclosing, field))
            }
            SchemaKind::Number(context) => {
                let range_constraint = number_range(context);
                Ok(self.register_field(enclosing, Field::Double { range_constraint }))
            }
            SchemaKind::String(context) => {
                let field = build_string_field(enclosing, context, self.model_override);
                Ok(self.register_field(enclosing, Field::String(field)))
            }
            SchemaKind::Object(context) => match context.map_value_schema() {
                Some(value) => self.parse_map(value, enclosing),
                None => {
                    let mut structure = StructureDescription::default();
                    self.parse_object(&mut structure, context, enclosing)?;
                    Ok(self.register_structure(enclosing, structure))
                }
            },
            SchemaKind::Array(context) => self.parse_array(context, enclosing),
            SchemaKind::AllOf(members) => self.parse_combinator("allOf", members, enclosing),
            SchemaKind::AnyOf(members) => self.parse_combinator("anyOf", members, enclosing),
            SchemaKind::OneOf(members) => self.parse_combinator("oneOf", members, enclosing),
            SchemaKind::Reference(reference) => {
                let target = self.reference_target(reference)?;
                Ok(Registration::reference(&target))
            }
            SchemaKind::Fragment => Err(self.unsupported(UnsupportedShape::Fragment)),
            SchemaKind::Not(_) => Err(self.unsupported(UnsupportedShape::Negation)),
        }
    }

    fn register_field(&mut self, name: &str, field: Field) -> Registration {
        debug!(entity = %name, kind = field.kind(), "Registering field");
        if let Some(previous) = self.model.insert_field(name, field) {
            warn!(entity = %name, previous = previous.kind(), "Field name collision, keeping last");
        }
        if self.model.structure(name).is_some() {
            warn!(entity = %name, "Field shares its name with a structure");
        }
        Registration::registered(name)
    }

    fn register_structure(&mut self, name: &str, structure: StructureDescription) -> Registration {
        debug!(entity = %name, members = structure.members.len(), "Registering structure");
        if self.model.insert_structure(name, structure).is_some() {
            warn!(entity = %name, "Structure name collision, keeping last");
        }
        if self.model.field(name).is_some() {
            warn!(entity = %name, "Structure shares its name with a field");
        }
        Registration::registered(name)
    }

    fn reference_target(&self, reference: &Reference) -> Result<String> {
        reference
            .name
            .clone()
            .ok_or_else(|| ModelError::MissingReferenceTarget {
                path: self.current_path(),
                reference: reference.path.clone(),
            })
    }

    fn unsupported(&self, shape: UnsupportedShape) -> ModelError {
        ModelError::UnsupportedSchemaShape {
            path: self.current_path(),
            shape,
        }
    }

    /// Runs `f` with `segments` appended to the schema path.
    fn in_path<T>(&mut self, segments: &[&str], f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let depth = self.path.len();
        self.path.extend(segments.iter().map(|s| escape_pointer_segment(s)));
        let result = f(self);
        self.path.truncate(depth);
        result
    }

    fn current_path(&self) -> String {
        self.path.join("/")
    }
}

/// Escapes one JSON-pointer segment (`~` → `~0`, `/` → `~1`).
///
/// ```
/// use service_model_core::escape_pointer_segment;
///
/// assert_eq!(escape_pointer_segment("a/b~c"), "a~1b~0c");
/// ```
pub fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
