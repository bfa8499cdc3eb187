//! Schema-valued additional properties → map fields.

use super::{ModelBuilder, Registration};
use crate::error::{Result, UnsupportedShape};
use crate::schema::{Schema, SchemaKind};
use crate::types::{Field, LengthRange, STRING_TYPE};

impl ModelBuilder<'_> {
    /// Registers a string-keyed map whose value schema is `value`.
    ///
    /// Only named references and plain string value schemas are supported.
    pub(crate) fn parse_map(&mut self, value: &Schema, enclosing: &str) -> Result<Registration> {
        let value_type = self.in_path(&["additionalProperties"], |builder| match &value.kind {
            SchemaKind::Reference(reference) => builder.reference_target(reference),
            SchemaKind::String(_) => Ok(STRING_TYPE.to_string()),
            other => Err(builder.unsupported(UnsupportedShape::UnsupportedMapValue { found: other.name() })),
        })?;

        let field = Field::Map {
            key_type: STRING_TYPE.to_string(),
            value_type,
            length_constraint: LengthRange::default(),
        };
        Ok(self.register_field(enclosing, field))
    }
}
