//! Service model validation.
//!
//! Checks a finished model for problems a code generator would trip over:
//! type names that point nowhere and string patterns that are not valid
//! regular expressions.
//!
//! # Examples
//!
//! ```
//! use service_model_core::*;
//!
//! let document = SchemaDocument::new();
//! let mut model = ServiceModel::new();
//! model.insert_field("Flag", Field::Boolean);
//! assert!(validate_model(&model, &document).is_empty());
//!
//! model.insert_field(
//!     "Flags",
//!     Field::List { element_type: "Missing".into(), length_constraint: LengthRange::default() },
//! );
//! assert_eq!(validate_model(&model, &document).len(), 1);
//! ```

use regex::Regex;
use thiserror::Error;

use crate::schema::SchemaDocument;
use crate::types::{Field, STRING_TYPE, ServiceModel};

/// Model validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A member, list element or map value names an unknown entity.
    #[error("{entity} refers to unknown type {type_name}")]
    DanglingTypeName {
        /// Entity holding the reference (`Structure.member` for members).
        entity: String,
        /// The unknown name.
        type_name: String,
    },
    /// A string field's pattern does not compile.
    #[error("invalid pattern for {entity}: {message}")]
    InvalidPattern {
        /// Field carrying the pattern.
        entity: String,
        /// Compiler error text.
        message: String,
    },
}

/// Validates a model built from `document`.
///
/// A type name is known when it is registered in the model, is the built-in
/// string type, or names a component of `document` (components left out of
/// the build still count). Errors are reported in entity-name order.
pub fn validate_model(model: &ServiceModel, document: &SchemaDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let is_known = |name: &str| {
        name == STRING_TYPE || model.contains(name) || document.components.contains_key(name)
    };

    for (entity, field) in &model.field_descriptions {
        for type_name in field.referenced_types() {
            if !is_known(type_name) {
                errors.push(ValidationError::DanglingTypeName {
                    entity: entity.clone(),
                    type_name: type_name.to_string(),
                });
            }
        }

        if let Field::String(string_field) = field {
            if let Some(pattern) = &string_field.pattern {
                if let Err(err) = Regex::new(pattern) {
                    errors.push(ValidationError::InvalidPattern {
                        entity: entity.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    for (entity, structure) in &model.structure_descriptions {
        for (member_name, member) in &structure.members {
            if !is_known(&member.type_name) {
                errors.push(ValidationError::DanglingTypeName {
                    entity: format!("{entity}.{member_name}"),
                    type_name: member.type_name.clone(),
                });
            }
        }
    }

    errors
}
