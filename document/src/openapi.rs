//! OpenAPI document → schema tree conversion.
//!
//! Reads `components.schemas` of an OpenAPI 3.0 or 3.1 document and converts
//! every schema into the core [`Schema`] tree. Local component references
//! (`#/components/schemas/<Name>`) are resolved to `<Name>`; any other
//! reference is kept unresolved and rejected later by the model builder.
//!
//! Classification order for a schema object:
//!
//! 1. `$ref` → reference (sibling keywords are ignored)
//! 2. `allOf` / `anyOf` / `oneOf` / `not`
//! 3. `type` (a string, or the first non-`null` entry of a type array)
//! 4. no `type`: `properties` or `additionalProperties` → object,
//!    `items` → array
//! 5. anything else → fragment

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde_json::{Map, Value};
use service_model_core::{
    AdditionalProperties, ArrayContext, Bound, IntegerContext, IntegerFormat, NumberContext,
    ObjectContext, Reference, Schema, SchemaDocument, SchemaKind, StringContext,
    escape_pointer_segment,
};
use tracing::debug;

use crate::error::{DocumentError, Result};

const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// Encoding of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON text.
    Json,
    /// YAML text.
    Yaml,
}

impl DocumentFormat {
    /// Guesses the format from a file extension; anything but `.json` is
    /// read as YAML.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use service_model_document::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path(Path::new("api.json")), DocumentFormat::Json);
    /// assert_eq!(DocumentFormat::from_path(Path::new("api.yaml")), DocumentFormat::Yaml);
    /// ```
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Reads and converts the document at `path`.
///
/// # Errors
///
/// Returns [`IoError`](DocumentError::IoError) if the file cannot be read,
/// and any error of [`parse_document`].
pub fn load_document(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), "Loaded document text");
    parse_document(&text, DocumentFormat::from_path(path))
}

/// Parses document text and converts it.
///
/// # Errors
///
/// Returns [`JsonError`](DocumentError::JsonError) or
/// [`YamlError`](DocumentError::YamlError) for undecodable text, and any
/// error of [`convert_document`].
///
/// # Examples
///
/// ```
/// use service_model_document::{parse_document, DocumentFormat};
///
/// let yaml = r##"
/// openapi: 3.0.3
/// info: { title: Pets, version: "1.0" }
/// components:
///   schemas:
///     Pet:
///       type: object
///       properties:
///         owner: { $ref: "#/components/schemas/Person" }
/// "##;
/// let document = parse_document(yaml, DocumentFormat::Yaml).unwrap();
/// assert_eq!(document.title.as_deref(), Some("Pets"));
/// assert_eq!(document.component_names(), vec!["Pet"]);
/// ```
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<SchemaDocument> {
    let value: Value = match format {
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
    };
    convert_document(&value)
}

/// Converts a decoded OpenAPI document.
///
/// A document without `components.schemas` converts to an empty
/// [`SchemaDocument`].
///
/// # Errors
///
/// Returns [`InvalidDocument`](DocumentError::InvalidDocument) if the root
/// or `components.schemas` is not an object, and
/// [`InvalidSchema`](DocumentError::InvalidSchema) for malformed schemas.
pub fn convert_document(value: &Value) -> Result<SchemaDocument> {
    let root = value
        .as_object()
        .ok_or_else(|| DocumentError::InvalidDocument("document root must be an object".into()))?;

    let info = root.get("info").and_then(Value::as_object);
    let title = info.and_then(|i| string_keyword(i, "title"));
    let version = info.and_then(|i| string_keyword(i, "version"));

    let mut components = BTreeMap::new();
    if let Some(schemas) = root.get("components").and_then(|c| c.get("schemas")) {
        let schemas = schemas.as_object().ok_or_else(|| {
            DocumentError::InvalidDocument("components.schemas must be an object".into())
        })?;
        for (name, schema) in schemas {
            let path = format!("{COMPONENT_REF_PREFIX}{}", escape_pointer_segment(name));
            components.insert(name.clone(), convert_schema(schema, &path)?);
        }
    }

    debug!(components = components.len(), "Converted document");
    Ok(SchemaDocument {
        title,
        version,
        components,
    })
}

/// Converts one schema node located at `path`.
///
/// # Errors
///
/// Returns [`InvalidSchema`](DocumentError::InvalidSchema) when the node or
/// one of its keywords has the wrong JSON type.
pub fn convert_schema(value: &Value, path: &str) -> Result<Schema> {
    let object = match value {
        // `true` admits anything, `false` admits nothing.
        Value::Bool(true) => return Ok(SchemaKind::Fragment.into()),
        Value::Bool(false) => return Ok(SchemaKind::Not(Box::new(SchemaKind::Fragment.into())).into()),
        Value::Object(object) => object,
        _ => return Err(invalid(path, "schema must be an object or a boolean")),
    };

    let kind = classify(object, path)?;
    Ok(Schema {
        kind,
        description: string_keyword(object, "description"),
    })
}

fn classify(object: &Map<String, Value>, path: &str) -> Result<SchemaKind> {
    if let Some(reference) = object.get("$ref") {
        let reference = reference
            .as_str()
            .ok_or_else(|| invalid(path, "$ref must be a string"))?;
        return Ok(SchemaKind::Reference(resolve_reference(reference)));
    }

    for keyword in ["allOf", "anyOf", "oneOf"] {
        if let Some(members) = object.get(keyword) {
            let members = convert_schema_list(members, &format!("{path}/{keyword}"))?;
            return Ok(match keyword {
                "allOf" => SchemaKind::AllOf(members),
                "anyOf" => SchemaKind::AnyOf(members),
                _ => SchemaKind::OneOf(members),
            });
        }
    }

    if let Some(negated) = object.get("not") {
        return Ok(SchemaKind::Not(Box::new(convert_schema(negated, &format!("{path}/not"))?)));
    }

    let kind = match declared_type(object, path)? {
        Some("boolean") => SchemaKind::Boolean,
        Some("integer") => SchemaKind::Integer(integer_context(object, path)?),
        Some("number") => SchemaKind::Number(number_context(object, path)?),
        Some("string") => SchemaKind::String(string_context(object, path)?),
        Some("object") => SchemaKind::Object(object_context(object, path)?),
        Some("array") => SchemaKind::Array(array_context(object, path)?),
        Some(other) => return Err(invalid(path, &format!("unknown type '{other}'"))),
        None if object.contains_key("properties") || object.contains_key("additionalProperties") => {
            SchemaKind::Object(object_context(object, path)?)
        }
        None if object.contains_key("items") => SchemaKind::Array(array_context(object, path)?),
        None => SchemaKind::Fragment,
    };
    Ok(kind)
}

fn resolve_reference(reference: &str) -> Reference {
    match reference.strip_prefix(COMPONENT_REF_PREFIX) {
        Some(name) if !name.is_empty() && !name.contains('/') => Reference {
            path: reference.to_string(),
            name: Some(unescape_pointer_segment(name)),
        },
        _ => Reference::unresolved(reference),
    }
}

fn declared_type<'a>(object: &'a Map<String, Value>, path: &str) -> Result<Option<&'a str>> {
    match object.get("type") {
        None => Ok(None),
        Some(Value::String(name)) => Ok(Some(name.as_str())),
        Some(Value::Array(names)) => {
            let mut non_null = Vec::new();
            for name in names {
                let name = name
                    .as_str()
                    .ok_or_else(|| invalid(path, "type array entries must be strings"))?;
                if name != "null" {
                    non_null.push(name);
                }
            }
            Ok(non_null.first().copied())
        }
        Some(_) => Err(invalid(path, "type must be a string or an array")),
    }
}

fn integer_context(object: &Map<String, Value>, path: &str) -> Result<IntegerContext> {
    Ok(IntegerContext {
        format: IntegerFormat::from_format(object.get("format").and_then(Value::as_str)),
        minimum: bound(object, BoundSide::Lower, path, integer_value)?,
        maximum: bound(object, BoundSide::Upper, path, integer_value)?,
    })
}

/// Whole numbers only; `i64::MAX as f64` rounds up to 2^63, hence the
/// half-open range.
fn integer_value(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f))
            .map(|f| f as i64)
    })
}

fn number_context(object: &Map<String, Value>, path: &str) -> Result<NumberContext> {
    Ok(NumberContext {
        format: string_keyword(object, "format"),
        minimum: bound(object, BoundSide::Lower, path, Value::as_f64)?,
        maximum: bound(object, BoundSide::Upper, path, Value::as_f64)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundSide {
    Lower,
    Upper,
}

impl BoundSide {
    fn keywords(self) -> (&'static str, &'static str) {
        match self {
            BoundSide::Lower => ("minimum", "exclusiveMinimum"),
            BoundSide::Upper => ("maximum", "exclusiveMaximum"),
        }
    }

    /// True if `candidate` constrains more than `current` on this side.
    fn is_tighter<T: PartialOrd>(self, candidate: &Bound<T>, current: &Bound<T>) -> bool {
        if candidate.value == current.value {
            return candidate.exclusive && !current.exclusive;
        }
        match self {
            BoundSide::Lower => candidate.value > current.value,
            BoundSide::Upper => candidate.value < current.value,
        }
    }
}

/// Reads a numeric bound, accepting both the OpenAPI 3.0 form (`minimum`
/// plus boolean `exclusiveMinimum`) and the 3.1 form (numeric
/// `exclusiveMinimum`). When the 3.1 form sits next to a plain `minimum`,
/// the tighter of the two is kept.
fn bound<T: PartialOrd>(
    object: &Map<String, Value>,
    side: BoundSide,
    path: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Result<Option<Bound<T>>> {
    let (keyword, exclusive_keyword) = side.keywords();
    let (is_exclusive, numeric_exclusive) = match object.get(exclusive_keyword) {
        None => (false, None),
        Some(Value::Bool(flag)) => (*flag, None),
        Some(value) if value.is_number() => {
            let value = convert(value)
                .ok_or_else(|| invalid(path, &format!("{exclusive_keyword} is out of range")))?;
            (false, Some(Bound::exclusive(value)))
        }
        Some(_) => {
            return Err(invalid(path, &format!("{exclusive_keyword} must be a boolean or a number")));
        }
    };

    let plain = match object.get(keyword) {
        None => None,
        Some(value) => {
            let value = convert(value)
                .ok_or_else(|| invalid(path, &format!("{keyword} is out of range")))?;
            Some(Bound {
                value,
                exclusive: is_exclusive,
            })
        }
    };

    Ok(match (plain, numeric_exclusive) {
        (Some(plain), Some(exclusive)) => {
            if side.is_tighter(&exclusive, &plain) {
                Some(exclusive)
            } else {
                Some(plain)
            }
        }
        (plain, exclusive) => plain.or(exclusive),
    })
}

fn string_context(object: &Map<String, Value>, path: &str) -> Result<StringContext> {
    let allowed_values = match object.get("enum") {
        None => Vec::new(),
        Some(Value::Array(values)) => values
            .iter()
            .filter(|v| !v.is_null())
            .map(render_scalar)
            .collect(),
        Some(_) => return Err(invalid(path, "enum must be an array")),
    };

    Ok(StringContext {
        min_length: count_keyword(object, "minLength", path)?.unwrap_or(0),
        max_length: count_keyword(object, "maxLength", path)?,
        pattern: string_keyword(object, "pattern"),
        format: string_keyword(object, "format"),
        default_value: object.get("default").filter(|v| !v.is_null()).map(render_scalar),
        allowed_values,
    })
}

fn object_context(object: &Map<String, Value>, path: &str) -> Result<ObjectContext> {
    let mut properties = HashMap::new();
    if let Some(declared) = object.get("properties") {
        let declared = declared
            .as_object()
            .ok_or_else(|| invalid(path, "properties must be an object"))?;
        for (name, schema) in declared {
            let child_path = format!("{path}/properties/{}", escape_pointer_segment(name));
            properties.insert(name.clone(), convert_schema(schema, &child_path)?);
        }
    }

    let required_properties = match object.get("required") {
        None => Vec::new(),
        Some(Value::Array(names)) => names
            .iter()
            .map(|n| n.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| invalid(path, "required entries must be strings"))?,
        Some(_) => return Err(invalid(path, "required must be an array")),
    };

    let additional_properties = match object.get("additionalProperties") {
        None => None,
        Some(Value::Bool(allowed)) => Some(AdditionalProperties::Allowed(*allowed)),
        Some(schema) => Some(AdditionalProperties::Schema(Box::new(convert_schema(
            schema,
            &format!("{path}/additionalProperties"),
        )?))),
    };

    Ok(ObjectContext {
        properties,
        required_properties,
        additional_properties,
    })
}

fn array_context(object: &Map<String, Value>, path: &str) -> Result<ArrayContext> {
    let items = match object.get("items") {
        None => None,
        Some(schema) => Some(Box::new(convert_schema(schema, &format!("{path}/items"))?)),
    };
    Ok(ArrayContext {
        items,
        min_items: count_keyword(object, "minItems", path)?.unwrap_or(0),
        max_items: count_keyword(object, "maxItems", path)?,
    })
}

fn convert_schema_list(value: &Value, path: &str) -> Result<Vec<Schema>> {
    let members = value
        .as_array()
        .ok_or_else(|| invalid(path, "composition must be an array"))?;
    members
        .iter()
        .enumerate()
        .map(|(index, member)| convert_schema(member, &format!("{path}/{index}")))
        .collect()
}

fn count_keyword(object: &Map<String, Value>, keyword: &str, path: &str) -> Result<Option<usize>> {
    match object.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(path, &format!("{keyword} must be a non-negative integer"))),
    }
}

fn string_keyword(object: &Map<String, Value>, keyword: &str) -> Option<String> {
    object.get(keyword).and_then(Value::as_str).map(String::from)
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn unescape_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

fn invalid(path: &str, message: &str) -> DocumentError {
    DocumentError::InvalidSchema {
        path: path.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn convert(value: Value) -> Schema {
        convert_schema(&value, "#").unwrap()
    }

    #[test]
    fn test_local_reference_resolves_to_name() {
        let schema = convert(json!({ "$ref": "#/components/schemas/Pet", "description": "ignored" }));
        assert_eq!(schema.reference_name(), Some("Pet"));
    }

    #[test]
    fn test_external_reference_is_unresolved() {
        let schema = convert(json!({ "$ref": "common.yaml#/components/schemas/Error" }));
        assert_eq!(
            schema.kind,
            SchemaKind::Reference(Reference::unresolved("common.yaml#/components/schemas/Error"))
        );
    }

    #[test]
    fn test_escaped_reference_name() {
        let schema = convert(json!({ "$ref": "#/components/schemas/a~1b" }));
        assert_eq!(schema.reference_name(), Some("a/b"));
    }

    #[test]
    fn test_openapi_30_exclusive_flags() {
        let schema = convert(json!({
            "type": "integer",
            "minimum": 0,
            "maximum": 100,
            "exclusiveMaximum": true
        }));
        assert_eq!(
            schema.kind,
            SchemaKind::Integer(IntegerContext {
                format: IntegerFormat::Generic,
                minimum: Some(Bound::inclusive(0)),
                maximum: Some(Bound::exclusive(100)),
            })
        );
    }

    #[test]
    fn test_openapi_31_numeric_exclusive_bounds() {
        let schema = convert(json!({ "type": "number", "exclusiveMinimum": 0.5, "maximum": 10 }));
        match schema.kind {
            SchemaKind::Number(context) => {
                assert_eq!(context.minimum, Some(Bound::exclusive(0.5)));
                assert_eq!(context.maximum, Some(Bound::inclusive(10.0)));
            }
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn test_tighter_of_minimum_and_numeric_exclusive_wins() {
        let schema = convert(json!({
            "type": "integer",
            "minimum": 5,
            "exclusiveMinimum": 3,
            "maximum": 10,
            "exclusiveMaximum": 10
        }));
        match schema.kind {
            SchemaKind::Integer(context) => {
                assert_eq!(context.minimum, Some(Bound::inclusive(5)));
                assert_eq!(context.maximum, Some(Bound::exclusive(10)));
            }
            other => panic!("expected integer, got {other:?}"),
        }

        let schema = convert(json!({ "type": "number", "minimum": 1, "exclusiveMinimum": 2.5 }));
        match schema.kind {
            SchemaKind::Number(context) => assert_eq!(context.minimum, Some(Bound::exclusive(2.5))),
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn test_integer_bound_outside_i64_is_rejected() {
        for maximum in [json!(1e20), json!(u64::MAX)] {
            let err = convert_schema(&json!({ "type": "integer", "maximum": maximum }), "#/x").unwrap_err();
            match err {
                DocumentError::InvalidSchema { path, message } => {
                    assert_eq!(path, "#/x");
                    assert_eq!(message, "maximum is out of range");
                }
                other => panic!("expected invalid schema, got {other:?}"),
            }
        }

        let err = convert_schema(&json!({ "type": "integer", "exclusiveMinimum": -1e19 }), "#").unwrap_err();
        assert!(matches!(err, DocumentError::InvalidSchema { .. }));

        let schema = convert(json!({ "type": "integer", "minimum": 2.0, "maximum": 9.007e15 }));
        match schema.kind {
            SchemaKind::Integer(context) => {
                assert_eq!(context.minimum, Some(Bound::inclusive(2)));
                assert_eq!(context.maximum, Some(Bound::inclusive(9_007_000_000_000_000)));
            }
            other => panic!("expected integer, got {other:?}"),
        }
    }

    #[test]
    fn test_type_array_skips_null() {
        let schema = convert(json!({ "type": ["null", "string"], "enum": ["a", null, 3] }));
        match schema.kind {
            SchemaKind::String(context) => assert_eq!(context.allowed_values, vec!["a", "3"]),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_untyped_schemas() {
        assert_eq!(convert(json!({ "description": "anything" })).kind, SchemaKind::Fragment);
        assert!(matches!(convert(json!({ "properties": {} })).kind, SchemaKind::Object(_)));
        assert!(matches!(convert(json!({ "items": { "type": "string" } })).kind, SchemaKind::Array(_)));
        assert_eq!(convert(json!(true)).kind, SchemaKind::Fragment);
    }

    #[test]
    fn test_object_keywords() {
        let schema = convert(json!({
            "type": "object",
            "required": ["id"],
            "properties": { "id": { "type": "integer", "format": "int64" } },
            "additionalProperties": { "type": "string" }
        }));
        match schema.kind {
            SchemaKind::Object(context) => {
                assert!(context.is_required("id"));
                assert_eq!(context.sorted_property_names(), vec!["id"]);
                assert_eq!(context.map_value_schema(), Some(&Schema::string()));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_keyword_reports_path() {
        let err = convert_schema(
            &json!({ "type": "object", "properties": { "tags": { "type": "array", "minItems": -1 } } }),
            "#/components/schemas/Pet",
        )
        .unwrap_err();
        match err {
            DocumentError::InvalidSchema { path, message } => {
                assert_eq!(path, "#/components/schemas/Pet/properties/tags");
                assert!(message.contains("minItems"));
            }
            other => panic!("expected invalid schema, got {other:?}"),
        }
    }

    #[test]
    fn test_error_path_escapes_property_name() {
        let err = convert_schema(
            &json!({ "type": "object", "properties": { "a/b~c": { "type": "weird" } } }),
            "#",
        )
        .unwrap_err();
        match err {
            DocumentError::InvalidSchema { path, .. } => assert_eq!(path, "#/properties/a~1b~0c"),
            other => panic!("expected invalid schema, got {other:?}"),
        }
    }

    #[test]
    fn test_document_without_components_is_empty() {
        let document = convert_document(&json!({ "openapi": "3.1.0", "info": { "title": "Empty" } })).unwrap();
        assert!(document.components.is_empty());
        assert_eq!(document.title.as_deref(), Some("Empty"));
        assert!(document.version.is_none());
    }
}
