//! Error types for model building.
//!
//! Every error is fatal to the run: the builder stops at the first one and
//! no partial model is returned.

use thiserror::Error;

/// Schema shapes the builder does not handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedShape {
    /// A schema with no recognizable constraints.
    #[error("fragment schemas are not supported")]
    Fragment,
    /// A `not` schema.
    #[error("'not' schemas are not supported")]
    Negation,
    /// An allOf/anyOf/oneOf member that is not an inline object schema.
    #[error("{combinator} members must be object schemas, found {found}")]
    NonObjectCombinatorMember {
        /// `allOf`, `anyOf` or `oneOf`.
        combinator: &'static str,
        /// Kind of the offending member.
        found: &'static str,
    },
    /// An additional-properties schema that is neither a reference nor a string.
    #[error("map values must be a reference or a string schema, found {found}")]
    UnsupportedMapValue {
        /// Kind of the offending value schema.
        found: &'static str,
    },
    /// An array schema without an item schema.
    #[error("array schemas must declare items")]
    MissingArrayItems,
}

/// Errors raised while building a service model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The schema at `path` has a shape the builder cannot model.
    #[error("unsupported schema at {path}: {shape}")]
    UnsupportedSchemaShape {
        /// Location of the offending schema node.
        path: String,
        /// What was unsupported.
        shape: UnsupportedShape,
    },

    /// A reference at `path` does not resolve to a type name.
    #[error("reference at {path} has no target name: {reference}")]
    MissingReferenceTarget {
        /// Location of the reference node.
        path: String,
        /// The reference as written.
        reference: String,
    },
}

impl ModelError {
    /// Location of the schema node that caused the error.
    pub fn path(&self) -> &str {
        match self {
            ModelError::UnsupportedSchemaShape { path, .. } => path,
            ModelError::MissingReferenceTarget { path, .. } => path,
        }
    }
}

/// Convenience alias for results with [`ModelError`].
pub type Result<T> = std::result::Result<T, ModelError>;
