//! Object schemas → structure members.

use super::ModelBuilder;
use crate::error::Result;
use crate::naming::property_entity_name;
use crate::schema::{ObjectContext, SchemaKind};
use crate::types::{Member, StructureDescription};

impl ModelBuilder<'_> {
    /// Adds one member per property of `context` to `structure`.
    ///
    /// Property names are sorted first; a member's position is its index in
    /// that order. Referenced properties use the reference target as their
    /// type. Anonymous properties are dispatched under
    /// `enclosing + UppercaseFirst(name)` and use the resulting type name.
    pub(crate) fn parse_object(
        &mut self,
        structure: &mut StructureDescription,
        context: &ObjectContext,
        enclosing: &str,
    ) -> Result<()> {
        for (position, name) in context.sorted_property_names().into_iter().enumerate() {
            let Some(property) = context.properties.get(name) else {
                continue;
            };

            let type_name = self.in_path(&["properties", name], |builder| match &property.kind {
                SchemaKind::Reference(reference) => builder.reference_target(reference),
                _ => {
                    let child = property_entity_name(enclosing, name);
                    builder.dispatch(property, &child).map(|r| r.type_name)
                }
            })?;

            let member = Member::new(type_name, position, context.is_required(name))
                .with_documentation(property.description.clone());
            structure.members.insert(name.to_string(), member);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{ArrayContext, ObjectContext, Schema, SchemaDocument};
    use crate::types::{Field, Member, ServiceModel};
    use crate::{ModelBuilder, ModelError};

    fn build(schema: Schema, name: &str) -> Result<ServiceModel, ModelError> {
        let document = SchemaDocument::new();
        let mut model = ServiceModel::new();
        ModelBuilder::new(&mut model, &document).dispatch(&schema, name)?;
        Ok(model)
    }

    #[test]
    fn test_members_get_sorted_positions() {
        let schema = Schema::object(
            ObjectContext::default()
                .with_property("zip", Schema::string())
                .with_required_property("city", Schema::string())
                .with_property("owner", Schema::reference("Person")),
        );

        let model = build(schema, "Address").unwrap();
        let address = model.structure("Address").unwrap();
        assert_eq!(address.members["city"], Member::new("AddressCity", 0, true));
        assert_eq!(address.members["owner"], Member::new("Person", 1, false));
        assert_eq!(address.members["zip"], Member::new("AddressZip", 2, false));
    }

    #[test]
    fn test_reference_property_registers_nothing() {
        let schema = Schema::object(ObjectContext::default().with_property("owner", Schema::reference("Person")));

        let model = build(schema, "Pet").unwrap();
        assert!(model.field_descriptions.is_empty());
        assert_eq!(model.structure_descriptions.len(), 1);
    }

    #[test]
    fn test_member_uses_pluralized_list_name() {
        let item = Schema::object(ObjectContext::default().with_property("label", Schema::string()));
        let schema = Schema::object(ObjectContext::default().with_property("tag", Schema::array(ArrayContext::of(item))));

        let model = build(schema, "Pet").unwrap();
        assert_eq!(model.structure("Pet").unwrap().members["tag"].type_name, "PetTags");
        assert!(matches!(model.field("PetTags"), Some(Field::List { .. })));
        assert!(model.structure("PetTag").is_some());
        assert!(model.field("PetTagLabel").is_some());
    }

    #[test]
    fn test_description_becomes_documentation() {
        let schema = Schema::object(
            ObjectContext::default().with_property("name", Schema::string().with_description("Display name")),
        );

        let model = build(schema, "Pet").unwrap();
        let member = &model.structure("Pet").unwrap().members["name"];
        assert_eq!(member.documentation.as_deref(), Some("Display name"));
    }

    #[test]
    fn test_empty_object_is_empty_structure() {
        let model = build(Schema::object(ObjectContext::default()), "Empty").unwrap();
        assert!(model.structure("Empty").unwrap().members.is_empty());
    }
}
