//! String field construction.

use crate::constraints::string_length_range;
use crate::overrides::ModelOverride;
use crate::schema::StringContext;
use crate::types::StringField;

/// Builds the string field registered under `entity`.
///
/// Length, pattern, format, default and enumeration values come from the
/// schema. A [`ModelOverride`] entry for `entity` replaces the schema's
/// default value or pattern.
///
/// # Examples
///
/// ```
/// use service_model_core::{build_string_field, ModelOverride, StringContext};
///
/// let context = StringContext {
///     min_length: 1,
///     max_length: Some(64),
///     pattern: Some("^[a-z]+$".into()),
///     ..Default::default()
/// };
/// let overrides = ModelOverride::default().with_pattern("PetName", "^[A-Za-z]+$");
///
/// let field = build_string_field("PetName", &context, Some(&overrides));
/// assert_eq!(field.length_constraint.minimum, Some(1));
/// assert_eq!(field.pattern.as_deref(), Some("^[A-Za-z]+$"));
///
/// let field = build_string_field("PetName", &context, None);
/// assert_eq!(field.pattern.as_deref(), Some("^[a-z]+$"));
/// ```
pub fn build_string_field(
    entity: &str,
    context: &StringContext,
    model_override: Option<&ModelOverride>,
) -> StringField {
    let default_value = model_override
        .and_then(|o| o.default_value_for(entity))
        .map(String::from)
        .or_else(|| context.default_value.clone());
    let pattern = model_override
        .and_then(|o| o.pattern_for(entity))
        .map(String::from)
        .or_else(|| context.pattern.clone());

    StringField {
        length_constraint: string_length_range(context),
        pattern,
        default_value,
        format: context.format.clone(),
        allowed_values: context.allowed_values.clone(),
    }
}
