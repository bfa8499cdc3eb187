//! Service model type definitions.
//!
//! This module defines the flat, normalized model produced by a schema walk:
//! a registry of named [`Field`] types and named [`StructureDescription`]
//! types. The model is what code generators consume, so every collection is
//! ordered and every type round-trips through [`serde`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the built-in string type.
///
/// Used as the key type of every [`Field::Map`] and as the value type of maps
/// whose additional-properties schema is a plain string.
pub const STRING_TYPE: &str = "String";

/// Numeric range constraint for integer, long and double fields.
///
/// An undeclared bound is `None`, never a sentinel value.
///
/// # Examples
///
/// ```
/// use service_model_core::NumericRange;
///
/// let range = NumericRange::<i64>::default();
/// assert!(range.is_unbounded());
///
/// let range = NumericRange::new(Some(0), Some(100)).with_exclusive_maximum(true);
/// assert_eq!(range.maximum, Some(100));
/// assert!(range.exclusive_maximum);
/// assert!(!range.exclusive_minimum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange<T> {
    /// Lower bound, if declared.
    pub minimum: Option<T>,
    /// Upper bound, if declared.
    pub maximum: Option<T>,
    /// Whether the lower bound itself is excluded.
    #[serde(default)]
    pub exclusive_minimum: bool,
    /// Whether the upper bound itself is excluded.
    #[serde(default)]
    pub exclusive_maximum: bool,
}

impl<T> Default for NumericRange<T> {
    fn default() -> Self {
        Self {
            minimum: None,
            maximum: None,
            exclusive_minimum: false,
            exclusive_maximum: false,
        }
    }
}

impl<T> NumericRange<T> {
    /// Creates an inclusive range from optional bounds.
    pub fn new(minimum: Option<T>, maximum: Option<T>) -> Self {
        Self {
            minimum,
            maximum,
            exclusive_minimum: false,
            exclusive_maximum: false,
        }
    }

    /// Sets the lower-bound exclusivity flag.
    pub fn with_exclusive_minimum(mut self, exclusive: bool) -> Self {
        self.exclusive_minimum = exclusive;
        self
    }

    /// Sets the upper-bound exclusivity flag.
    pub fn with_exclusive_maximum(mut self, exclusive: bool) -> Self {
        self.exclusive_maximum = exclusive;
        self
    }

    /// Returns true when neither bound is declared.
    pub fn is_unbounded(&self) -> bool {
        self.minimum.is_none() && self.maximum.is_none()
    }
}

/// Length range constraint for strings, lists and maps.
///
/// A zero minimum carries no information and is stored as `None`; see
/// [`length_range`](crate::length_range).
///
/// # Examples
///
/// ```
/// use service_model_core::LengthRange;
///
/// let range = LengthRange::<usize>::default();
/// assert_eq!(range.minimum, None);
/// assert_eq!(range.maximum, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange<T> {
    /// Minimum length, if declared and non-zero.
    pub minimum: Option<T>,
    /// Maximum length, if declared.
    pub maximum: Option<T>,
}

impl<T> Default for LengthRange<T> {
    fn default() -> Self {
        Self {
            minimum: None,
            maximum: None,
        }
    }
}

impl<T> LengthRange<T> {
    /// Creates a range from optional bounds as given.
    pub fn new(minimum: Option<T>, maximum: Option<T>) -> Self {
        Self { minimum, maximum }
    }
}

/// String field description.
///
/// Built by [`build_string_field`](crate::build_string_field) from string
/// schema metadata, with default values and patterns optionally replaced by
/// a [`ModelOverride`](crate::ModelOverride).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringField {
    /// Declared length bounds.
    pub length_constraint: LengthRange<usize>,
    /// Regular expression the value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Default value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Declared string format (e.g. `date-time`, `uuid`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Allowed values when the schema is an enumeration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

/// A named field type in the service model.
///
/// # Examples
///
/// ```
/// use service_model_core::{Field, LengthRange, STRING_TYPE};
///
/// let tags = Field::Map {
///     key_type: STRING_TYPE.to_string(),
///     value_type: "Tag".to_string(),
///     length_constraint: LengthRange::default(),
/// };
/// assert_eq!(tags.kind(), "map");
/// assert_eq!(tags.referenced_types(), vec!["Tag"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Field {
    /// Boolean value.
    Boolean,
    /// 32-bit integer value.
    Integer {
        /// Declared numeric bounds.
        range_constraint: NumericRange<i64>,
    },
    /// 64-bit integer value (schema format `int64`).
    Long {
        /// Declared numeric bounds.
        range_constraint: NumericRange<i64>,
    },
    /// Floating point value.
    Double {
        /// Declared numeric bounds.
        range_constraint: NumericRange<f64>,
    },
    /// String value.
    String(StringField),
    /// Homogeneous list of a named element type.
    List {
        /// Entity name of the element type.
        element_type: String,
        /// Declared item-count bounds.
        length_constraint: LengthRange<usize>,
    },
    /// String-keyed map of a named value type.
    Map {
        /// Always [`STRING_TYPE`].
        key_type: String,
        /// Entity name of the value type.
        value_type: String,
        /// Declared entry-count bounds.
        length_constraint: LengthRange<usize>,
    },
}

impl Field {
    /// Short lowercase name of the variant, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Field::Boolean => "boolean",
            Field::Integer { .. } => "integer",
            Field::Long { .. } => "long",
            Field::Double { .. } => "double",
            Field::String(_) => "string",
            Field::List { .. } => "list",
            Field::Map { .. } => "map",
        }
    }

    /// Entity names this field points at (list elements, map values).
    ///
    /// The built-in [`STRING_TYPE`] map key is not included.
    pub fn referenced_types(&self) -> Vec<&str> {
        match self {
            Field::List { element_type, .. } => vec![element_type.as_str()],
            Field::Map { value_type, .. } => vec![value_type.as_str()],
            _ => Vec::new(),
        }
    }
}

/// A member of a structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Entity name of the member's type.
    pub type_name: String,
    /// Index of the member in the sorted property order.
    pub position: usize,
    /// Whether the member is listed as required.
    pub required: bool,
    /// Description text from the schema, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Member {
    /// Creates an undocumented member.
    pub fn new(type_name: impl Into<String>, position: usize, required: bool) -> Self {
        Self {
            type_name: type_name.into(),
            position,
            required,
            documentation: None,
        }
    }

    /// Attaches documentation text.
    pub fn with_documentation(mut self, documentation: Option<String>) -> Self {
        self.documentation = documentation;
        self
    }
}

/// A named structure: a set of members keyed by member name.
///
/// # Examples
///
/// ```
/// use service_model_core::{Member, StructureDescription};
///
/// let mut pet = StructureDescription::default();
/// pet.members.insert("name".into(), Member::new("PetName", 1, true));
/// pet.members.insert("id".into(), Member::new("PetId", 0, true));
///
/// let ordered: Vec<&str> = pet.ordered_members().iter().map(|(n, _)| *n).collect();
/// assert_eq!(ordered, vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureDescription {
    /// Members keyed by member name.
    pub members: BTreeMap<String, Member>,
}

impl StructureDescription {
    /// Returns members sorted by their recorded position.
    ///
    /// Members merged from several combinator sub-schemas can share a
    /// position; ties are broken by member name.
    pub fn ordered_members(&self) -> Vec<(&str, &Member)> {
        let mut members: Vec<(&str, &Member)> = self
            .members
            .iter()
            .map(|(name, member)| (name.as_str(), member))
            .collect();
        members.sort_by(|a, b| a.1.position.cmp(&b.1.position).then(a.0.cmp(b.0)));
        members
    }

    /// Names of required members, in name order.
    pub fn required_members(&self) -> Vec<&str> {
        self.members
            .iter()
            .filter(|(_, m)| m.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// The service model: every named field and structure found in a document.
///
/// Created empty by the caller, filled by a single schema walk through
/// exclusive `&mut` access, and read afterwards.
///
/// # Examples
///
/// ```
/// use service_model_core::{Field, ServiceModel};
///
/// let mut model = ServiceModel::new();
/// model.insert_field("Flag", Field::Boolean);
///
/// assert!(model.contains("Flag"));
/// assert_eq!(model.field("Flag"), Some(&Field::Boolean));
/// assert!(model.structure("Flag").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceModel {
    /// Named field types.
    pub field_descriptions: BTreeMap<String, Field>,
    /// Named structure types.
    pub structure_descriptions: BTreeMap<String, StructureDescription>,
}

impl ServiceModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field, replacing any previous field of the same name.
    ///
    /// Returns the replaced field, if there was one.
    pub fn insert_field(&mut self, name: impl Into<String>, field: Field) -> Option<Field> {
        self.field_descriptions.insert(name.into(), field)
    }

    /// Registers a structure, replacing any previous structure of the same name.
    ///
    /// Returns the replaced structure, if there was one.
    pub fn insert_structure(
        &mut self,
        name: impl Into<String>,
        structure: StructureDescription,
    ) -> Option<StructureDescription> {
        self.structure_descriptions.insert(name.into(), structure)
    }

    /// Looks up a field by entity name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.field_descriptions.get(name)
    }

    /// Looks up a structure by entity name.
    pub fn structure(&self, name: &str) -> Option<&StructureDescription> {
        self.structure_descriptions.get(name)
    }

    /// Returns true if `name` is registered as a field or a structure.
    pub fn contains(&self, name: &str) -> bool {
        self.field_descriptions.contains_key(name) || self.structure_descriptions.contains_key(name)
    }

    /// Total number of registered entities.
    pub fn len(&self) -> usize {
        self.field_descriptions.len() + self.structure_descriptions.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.field_descriptions.is_empty() && self.structure_descriptions.is_empty()
    }
}
