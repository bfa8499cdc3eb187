//! Synthetic entity naming.
//!
//! Anonymous sub-schemas get names derived from their enclosing entity. The
//! list/element split uses a plural-suffix heuristic: it is approximate and
//! English-centric (`"Address"` is treated as already plural), so it lives
//! behind [`NamingPolicy`] where it can be reconfigured.

use serde::{Deserialize, Serialize};

/// Names chosen for a list field with an anonymous element schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNames {
    /// Name the list field is registered under.
    pub list_name: String,
    /// Name the element schema is registered under.
    pub element_name: String,
}

/// Pluralization rule used to split list and element names.
///
/// # Examples
///
/// ```
/// use service_model_core::NamingPolicy;
///
/// let policy = NamingPolicy::default();
///
/// let names = policy.list_names("Widgets");
/// assert_eq!(names.list_name, "Widgets");
/// assert_eq!(names.element_name, "Widget");
///
/// let names = policy.list_names("Widget");
/// assert_eq!(names.list_name, "Widgets");
/// assert_eq!(names.element_name, "Widget");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingPolicy {
    /// Suffix marking a plural name, compared case-insensitively.
    pub plural_suffix: String,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            plural_suffix: "s".to_string(),
        }
    }
}

impl NamingPolicy {
    /// Creates a policy with a custom plural suffix.
    pub fn with_plural_suffix(suffix: impl Into<String>) -> Self {
        Self {
            plural_suffix: suffix.into(),
        }
    }

    /// Splits an enclosing name into list and element names.
    ///
    /// A name already ending in the suffix is the list name and loses the
    /// suffix for the element. Otherwise the name is kept for the element
    /// and the list gets the suffix appended. An empty suffix leaves both
    /// names equal.
    pub fn list_names(&self, enclosing: &str) -> ListNames {
        match strip_suffix_ignore_case(enclosing, &self.plural_suffix) {
            Some(singular) if !singular.is_empty() => ListNames {
                list_name: enclosing.to_string(),
                element_name: singular.to_string(),
            },
            _ => ListNames {
                list_name: format!("{enclosing}{}", self.plural_suffix),
                element_name: enclosing.to_string(),
            },
        }
    }
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() || name.len() < suffix.len() {
        return None;
    }
    let split = name.len() - suffix.len();
    if !name.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Uppercases the first character.
///
/// # Examples
///
/// ```
/// use service_model_core::uppercase_first;
///
/// assert_eq!(uppercase_first("name"), "Name");
/// assert_eq!(uppercase_first("éclair"), "Éclair");
/// assert_eq!(uppercase_first(""), "");
/// ```
pub fn uppercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Synthetic name of an anonymous property schema.
pub fn property_entity_name(enclosing: &str, property: &str) -> String {
    format!("{enclosing}{}", uppercase_first(property))
}

/// Synthetic namespace of the combinator sub-schema at `index` (zero based).
pub fn combinator_entity_name(enclosing: &str, index: usize) -> String {
    format!("{enclosing}{}", index + 1)
}
