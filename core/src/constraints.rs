//! Constraint extraction from schema metadata.
//!
//! Pure functions: no model access, no failure modes. An undeclared bound
//! always maps to `None`.

use crate::schema::{ArrayContext, Bound, IntegerContext, NumberContext, StringContext};
use crate::types::{LengthRange, NumericRange};

/// Builds a numeric range from optional bounds.
///
/// # Examples
///
/// ```
/// use service_model_core::{numeric_range, Bound};
///
/// let range = numeric_range(Some(Bound::inclusive(0)), Some(Bound::exclusive(100)));
/// assert_eq!(range.minimum, Some(0));
/// assert_eq!(range.maximum, Some(100));
/// assert!(!range.exclusive_minimum);
/// assert!(range.exclusive_maximum);
/// ```
pub fn numeric_range<T: Copy>(minimum: Option<Bound<T>>, maximum: Option<Bound<T>>) -> NumericRange<T> {
    NumericRange {
        minimum: minimum.map(|b| b.value),
        maximum: maximum.map(|b| b.value),
        exclusive_minimum: minimum.is_some_and(|b| b.exclusive),
        exclusive_maximum: maximum.is_some_and(|b| b.exclusive),
    }
}

/// Builds a length range, treating a zero minimum as undeclared.
///
/// # Examples
///
/// ```
/// use service_model_core::length_range;
///
/// assert_eq!(length_range(0, Some(10)).minimum, None);
/// assert_eq!(length_range(2, None).minimum, Some(2));
/// assert_eq!(length_range(2, Some(10)).maximum, Some(10));
/// ```
pub fn length_range(minimum: usize, maximum: Option<usize>) -> LengthRange<usize> {
    LengthRange {
        minimum: (minimum > 0).then_some(minimum),
        maximum,
    }
}

/// Range of an integer schema.
pub fn integer_range(context: &IntegerContext) -> NumericRange<i64> {
    numeric_range(context.minimum, context.maximum)
}

/// Range of a number schema.
pub fn number_range(context: &NumberContext) -> NumericRange<f64> {
    numeric_range(context.minimum, context.maximum)
}

/// Item-count range of an array schema.
pub fn item_count_range(context: &ArrayContext) -> LengthRange<usize> {
    length_range(context.min_items, context.max_items)
}

/// Length range of a string schema.
pub fn string_length_range(context: &StringContext) -> LengthRange<usize> {
    length_range(context.min_length, context.max_length)
}
