//! Schema tree consumed by the model builder.
//!
//! A [`Schema`] is one node of an already-parsed, JSON-Schema-like tree. The
//! document parser is responsible for producing it; references are resolved
//! to a target name before the walk starts.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Integer format declared on an integer schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegerFormat {
    /// No format, or a format this model does not distinguish.
    #[default]
    Generic,
    /// `int32`.
    Int32,
    /// `int64`; produces a long field.
    Int64,
}

impl IntegerFormat {
    /// Maps a schema `format` string to an integer format.
    ///
    /// # Examples
    ///
    /// ```
    /// use service_model_core::IntegerFormat;
    ///
    /// assert_eq!(IntegerFormat::from_format(Some("int64")), IntegerFormat::Int64);
    /// assert_eq!(IntegerFormat::from_format(Some("int32")), IntegerFormat::Int32);
    /// assert_eq!(IntegerFormat::from_format(None), IntegerFormat::Generic);
    /// ```
    pub fn from_format(format: Option<&str>) -> Self {
        match format {
            Some("int64") => IntegerFormat::Int64,
            Some("int32") => IntegerFormat::Int32,
            _ => IntegerFormat::Generic,
        }
    }
}

/// A numeric bound and whether it is exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound<T> {
    /// Bound value.
    pub value: T,
    /// Whether the value itself is excluded.
    pub exclusive: bool,
}

impl<T> Bound<T> {
    /// Inclusive bound.
    pub fn inclusive(value: T) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    /// Exclusive bound.
    pub fn exclusive(value: T) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }
}

/// Metadata of an integer schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerContext {
    /// Declared format.
    pub format: IntegerFormat,
    /// Lower bound.
    pub minimum: Option<Bound<i64>>,
    /// Upper bound.
    pub maximum: Option<Bound<i64>>,
}

/// Metadata of a number schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberContext {
    /// Declared format (`float`, `double`), informational only.
    pub format: Option<String>,
    /// Lower bound.
    pub minimum: Option<Bound<f64>>,
    /// Upper bound.
    pub maximum: Option<Bound<f64>>,
}

/// Metadata of a string schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringContext {
    /// `minLength`.
    pub min_length: usize,
    /// `maxLength`.
    pub max_length: Option<usize>,
    /// `pattern`.
    pub pattern: Option<String>,
    /// `format`.
    pub format: Option<String>,
    /// `default`, rendered as a string.
    pub default_value: Option<String>,
    /// `enum` values.
    pub allowed_values: Vec<String>,
}

/// The `additionalProperties` clause of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// `true` or `false`.
    Allowed(bool),
    /// A value schema; turns the object into a map.
    Schema(Box<Schema>),
}

/// Metadata of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectContext {
    /// Property schemas keyed by property name. Iteration order is not
    /// meaningful; the walk sorts names itself.
    pub properties: HashMap<String, Schema>,
    /// Names of required properties.
    pub required_properties: Vec<String>,
    /// The additional-properties clause, if declared.
    pub additional_properties: Option<AdditionalProperties>,
}

impl ObjectContext {
    /// Adds a property.
    pub fn with_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Adds a property and marks it required.
    pub fn with_required_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required_properties.push(name.clone());
        self.properties.insert(name, schema);
        self
    }

    /// Sets the additional-properties clause to a value schema.
    pub fn with_additional_properties(mut self, schema: Schema) -> Self {
        self.additional_properties = Some(AdditionalProperties::Schema(Box::new(schema)));
        self
    }

    /// Returns true if `name` is in the required set.
    pub fn is_required(&self, name: &str) -> bool {
        self.required_properties.iter().any(|r| r == name)
    }

    /// Property names in lexicographic order.
    pub fn sorted_property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The value schema when additional properties are schema-valued.
    pub fn map_value_schema(&self) -> Option<&Schema> {
        match &self.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(schema),
            _ => None,
        }
    }
}

/// Metadata of an array schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayContext {
    /// Item schema.
    pub items: Option<Box<Schema>>,
    /// `minItems`; zero when undeclared.
    pub min_items: usize,
    /// `maxItems`.
    pub max_items: Option<usize>,
}

impl ArrayContext {
    /// Array of the given item schema with no item-count bounds.
    pub fn of(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }
}

/// A named reference to a schema defined elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The reference as written (e.g. `#/components/schemas/Pet`).
    pub path: String,
    /// Resolved target name; `None` when the parser could not name it.
    pub name: Option<String>,
}

impl Reference {
    /// Reference to a component schema by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use service_model_core::Reference;
    ///
    /// let pet = Reference::component("Pet");
    /// assert_eq!(pet.path, "#/components/schemas/Pet");
    /// assert_eq!(pet.name.as_deref(), Some("Pet"));
    /// ```
    pub fn component(name: &str) -> Self {
        Self {
            path: format!("#/components/schemas/{name}"),
            name: Some(name.to_string()),
        }
    }

    /// Reference whose target could not be resolved to a name.
    pub fn unresolved(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
        }
    }
}

/// Shape of a schema node, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// `type: boolean`.
    Boolean,
    /// `type: integer`.
    Integer(IntegerContext),
    /// `type: number`.
    Number(NumberContext),
    /// `type: string`.
    String(StringContext),
    /// `type: object`.
    Object(ObjectContext),
    /// `type: array`.
    Array(ArrayContext),
    /// `allOf`.
    AllOf(Vec<Schema>),
    /// `anyOf`.
    AnyOf(Vec<Schema>),
    /// `oneOf`.
    OneOf(Vec<Schema>),
    /// `$ref`.
    Reference(Reference),
    /// A schema with no recognizable constraints.
    Fragment,
    /// `not`.
    Not(Box<Schema>),
}

impl SchemaKind {
    /// Lowercase keyword naming the kind, used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::Boolean => "boolean",
            SchemaKind::Integer(_) => "integer",
            SchemaKind::Number(_) => "number",
            SchemaKind::String(_) => "string",
            SchemaKind::Object(_) => "object",
            SchemaKind::Array(_) => "array",
            SchemaKind::AllOf(_) => "allOf",
            SchemaKind::AnyOf(_) => "anyOf",
            SchemaKind::OneOf(_) => "oneOf",
            SchemaKind::Reference(_) => "reference",
            SchemaKind::Fragment => "fragment",
            SchemaKind::Not(_) => "not",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of a schema tree.
///
/// # Examples
///
/// ```
/// use service_model_core::{ObjectContext, Schema};
///
/// let pet = Schema::object(
///     ObjectContext::default()
///         .with_required_property("name", Schema::string())
///         .with_property("owner", Schema::reference("Person")),
/// );
/// assert_eq!(pet.kind.name(), "object");
/// assert!(pet.reference_name().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Kind-specific shape.
    pub kind: SchemaKind,
    /// `description` text.
    pub description: Option<String>,
}

impl From<SchemaKind> for Schema {
    fn from(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }
}

impl Schema {
    /// Boolean schema.
    pub fn boolean() -> Self {
        SchemaKind::Boolean.into()
    }

    /// Integer schema.
    pub fn integer(context: IntegerContext) -> Self {
        SchemaKind::Integer(context).into()
    }

    /// Number schema.
    pub fn number(context: NumberContext) -> Self {
        SchemaKind::Number(context).into()
    }

    /// Unconstrained string schema.
    pub fn string() -> Self {
        SchemaKind::String(StringContext::default()).into()
    }

    /// String schema with metadata.
    pub fn string_with(context: StringContext) -> Self {
        SchemaKind::String(context).into()
    }

    /// Object schema.
    pub fn object(context: ObjectContext) -> Self {
        SchemaKind::Object(context).into()
    }

    /// Array schema.
    pub fn array(context: ArrayContext) -> Self {
        SchemaKind::Array(context).into()
    }

    /// Reference to a component schema by name.
    pub fn reference(name: &str) -> Self {
        SchemaKind::Reference(Reference::component(name)).into()
    }

    /// Attaches description text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Resolved target name when this node is a named reference.
    pub fn reference_name(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(reference) => reference.name.as_deref(),
            _ => None,
        }
    }
}

/// A parsed schema document: the named component schemas plus metadata.
///
/// Passed through the walk as a handle; the builder only iterates its
/// components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDocument {
    /// `info.title`.
    pub title: Option<String>,
    /// `info.version`.
    pub version: Option<String>,
    /// Component schemas keyed by name.
    pub components: BTreeMap<String, Schema>,
}

impl SchemaDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component schema.
    pub fn with_component(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.components.insert(name.into(), schema);
        self
    }

    /// Names of all components, in order.
    pub fn component_names(&self) -> Vec<&str> {
        self.components.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_property_names_ignores_insertion_order() {
        let context = ObjectContext::default()
            .with_property("zeta", Schema::boolean())
            .with_property("alpha", Schema::boolean())
            .with_property("Mid", Schema::boolean());

        assert_eq!(context.sorted_property_names(), vec!["Mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_map_value_schema_only_for_schema_clause() {
        let mut context = ObjectContext::default();
        assert!(context.map_value_schema().is_none());

        context.additional_properties = Some(AdditionalProperties::Allowed(true));
        assert!(context.map_value_schema().is_none());

        let context = context.with_additional_properties(Schema::string());
        assert_eq!(context.map_value_schema(), Some(&Schema::string()));
    }

    #[test]
    fn test_unresolved_reference_has_no_name() {
        let schema: Schema = SchemaKind::Reference(Reference::unresolved("other.yaml#/Pet")).into();
        assert!(schema.reference_name().is_none());
        assert_eq!(schema.kind.to_string(), "reference");
    }
}
