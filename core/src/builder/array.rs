//! Array schemas → list fields.

use super::{ModelBuilder, Registration};
use crate::constraints::item_count_range;
use crate::error::{Result, UnsupportedShape};
use crate::naming::ListNames;
use crate::schema::{ArrayContext, SchemaKind};
use crate::types::Field;

impl ModelBuilder<'_> {
    /// Registers a list field for an array schema.
    ///
    /// A referenced item type is used as is and the list keeps the enclosing
    /// name. An anonymous item schema is dispatched under a singular element
    /// name picked by the naming policy, and the list is registered under the
    /// plural form; the returned [`Registration`] carries that plural name.
    pub(crate) fn parse_array(&mut self, context: &ArrayContext, enclosing: &str) -> Result<Registration> {
        let Some(items) = context.items.as_deref() else {
            return Err(self.unsupported(UnsupportedShape::MissingArrayItems));
        };
        let length_constraint = item_count_range(context);

        if let SchemaKind::Reference(reference) = &items.kind {
            let element_type = self.in_path(&["items"], |builder| builder.reference_target(reference))?;
            let field = Field::List {
                element_type,
                length_constraint,
            };
            return Ok(self.register_field(enclosing, field));
        }

        let ListNames {
            list_name,
            element_name,
        } = self.naming.list_names(enclosing);
        let element = self.in_path(&["items"], |builder| builder.dispatch(items, &element_name))?;

        let field = Field::List {
            element_type: element.type_name,
            length_constraint,
        };
        Ok(self.register_field(&list_name, field))
    }
}

#[cfg(test)]
mod tests {
    use crate::naming::NamingPolicy;
    use crate::schema::{ArrayContext, ObjectContext, Schema, SchemaDocument};
    use crate::types::{Field, LengthRange, ServiceModel};
    use crate::{ModelBuilder, ModelError, Registration, UnsupportedShape};

    fn build(context: ArrayContext, name: &str) -> Result<(ServiceModel, Registration), ModelError> {
        let document = SchemaDocument::new();
        let mut model = ServiceModel::new();
        let registration = ModelBuilder::new(&mut model, &document).dispatch(&Schema::array(context), name)?;
        Ok((model, registration))
    }

    fn anonymous_item() -> Schema {
        Schema::object(ObjectContext::default().with_property("size", Schema::boolean()))
    }

    #[test]
    fn test_plural_enclosing_name_is_kept() {
        let (model, registration) = build(ArrayContext::of(anonymous_item()), "Widgets").unwrap();

        assert_eq!(registration.type_name, "Widgets");
        assert!(model.structure("Widget").is_some());
        assert_eq!(
            model.field("Widgets"),
            Some(&Field::List {
                element_type: "Widget".into(),
                length_constraint: LengthRange::default(),
            })
        );
    }

    #[test]
    fn test_singular_enclosing_name_is_pluralized() {
        let (model, registration) = build(ArrayContext::of(anonymous_item()), "Widget").unwrap();

        assert_eq!(registration.registered_name.as_deref(), Some("Widgets"));
        assert_eq!(registration.type_name, "Widgets");
        assert!(model.structure("Widget").is_some());
        assert!(model.field("Widget").is_none());
        assert!(matches!(
            model.field("Widgets"),
            Some(Field::List { element_type, .. }) if element_type == "Widget"
        ));
    }

    #[test]
    fn test_reference_items_keep_enclosing_name() {
        let context = ArrayContext {
            items: Some(Box::new(Schema::reference("Pet"))),
            min_items: 1,
            max_items: Some(50),
        };

        let (model, registration) = build(context, "Pet").unwrap();
        assert_eq!(registration.type_name, "Pet");
        assert_eq!(
            model.field("Pet"),
            Some(&Field::List {
                element_type: "Pet".into(),
                length_constraint: LengthRange::new(Some(1), Some(50)),
            })
        );
    }

    #[test]
    fn test_zero_min_items_is_absent() {
        let context = ArrayContext {
            items: Some(Box::new(Schema::string())),
            min_items: 0,
            max_items: Some(3),
        };

        let (model, _) = build(context, "Names").unwrap();
        match model.field("Names") {
            Some(Field::List { length_constraint, element_type }) => {
                assert_eq!(element_type, "Name");
                assert_eq!(*length_constraint, LengthRange::new(None, Some(3)));
            }
            other => panic!("expected list, got {other:?}"),
        }
        assert!(matches!(model.field("Name"), Some(Field::String(_))));
    }

    #[test]
    fn test_nested_anonymous_arrays() {
        let inner = Schema::array(ArrayContext::of(Schema::boolean()));
        let (model, registration) = build(ArrayContext::of(inner), "Grids").unwrap();

        // Outer: Grids -> element Grid; inner array under Grid -> Grids again.
        assert_eq!(registration.type_name, "Grids");
        assert!(matches!(model.field("Grid"), Some(Field::Boolean)));
        assert!(matches!(
            model.field("Grids"),
            Some(Field::List { element_type, .. }) if element_type == "Grids"
        ));
    }

    #[test]
    fn test_missing_items_fails() {
        let err = build(ArrayContext::default(), "Things").unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnsupportedSchemaShape {
                shape: UnsupportedShape::MissingArrayItems,
                ..
            }
        ));
    }

    #[test]
    fn test_custom_plural_suffix() {
        let document = SchemaDocument::new();
        let mut model = ServiceModel::new();
        let registration = ModelBuilder::new(&mut model, &document)
            .with_naming(NamingPolicy::with_plural_suffix("List"))
            .dispatch(&Schema::array(ArrayContext::of(anonymous_item())), "Widget")
            .unwrap();

        assert_eq!(registration.type_name, "WidgetList");
        assert!(model.structure("Widget").is_some());
    }
}
