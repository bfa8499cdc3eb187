//! allOf / anyOf / oneOf → one merged structure.

use super::{ModelBuilder, Registration};
use crate::error::{Result, UnsupportedShape};
use crate::naming::combinator_entity_name;
use crate::schema::{Schema, SchemaKind};
use crate::types::StructureDescription;

impl ModelBuilder<'_> {
    /// Folds every member of a composition into a single structure.
    ///
    /// Member `i` is parsed as an object under the namespace
    /// `enclosing + (i + 1)`, so anonymous properties of different members
    /// never share synthetic names. A property declared by several members
    /// keeps the last declaration.
    pub(crate) fn parse_combinator(
        &mut self,
        keyword: &'static str,
        members: &[Schema],
        enclosing: &str,
    ) -> Result<Registration> {
        let mut structure = StructureDescription::default();

        for (index, member) in members.iter().enumerate() {
            let namespace = combinator_entity_name(enclosing, index);
            self.in_path(&[keyword, index.to_string().as_str()], |builder| match &member.kind {
                SchemaKind::Object(context) => builder.parse_object(&mut structure, context, &namespace),
                other => Err(builder.unsupported(UnsupportedShape::NonObjectCombinatorMember {
                    combinator: keyword,
                    found: other.name(),
                })),
            })?;
        }

        Ok(self.register_structure(enclosing, structure))
    }
}
