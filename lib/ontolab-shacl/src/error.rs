//! Error types for SHACL validation.

use ontolab_reason::ReasoningError;
use oxrdf::{NamedNode, Term};

/// Main error type for SHACL operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaclError {
    /// Error parsing shapes graph.
    #[error(transparent)]
    Parse(#[from] ShaclParseError),

    /// Error during validation.
    #[error(transparent)]
    Validation(#[from] ShaclValidationError),

    /// Error while computing the inference closure of the data graph.
    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
}

/// Error type for parsing shapes from RDF graphs.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaclParseError {
    /// Invalid shape definition.
    #[error("Invalid shape definition for {shape}: {message}")]
    InvalidShape { shape: Term, message: String },

    /// Invalid property value.
    #[error(
        "Invalid value for property {property} in shape {shape}: expected {expected}, got {actual}"
    )]
    InvalidPropertyValue {
        shape: Term,
        property: NamedNode,
        expected: &'static str,
        actual: Term,
    },

    /// Invalid property path.
    #[error("Invalid property path in shape {shape}: {message}")]
    InvalidPropertyPath { shape: Term, message: String },

    /// Invalid RDF list.
    #[error("Invalid RDF list in shape {shape}: {message}")]
    InvalidRdfList { shape: Term, message: String },

    /// Invalid regex pattern.
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
}

/// Error type for validation operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaclValidationError {
    /// Maximum recursion depth exceeded.
    #[error("Maximum recursion depth ({depth}) exceeded during validation")]
    MaxRecursionDepth { depth: usize },
}

impl ShaclParseError {
    pub(crate) fn invalid_shape(shape: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_property_value(
        shape: impl Into<Term>,
        property: impl Into<NamedNode>,
        expected: &'static str,
        actual: impl Into<Term>,
    ) -> Self {
        Self::InvalidPropertyValue {
            shape: shape.into(),
            property: property.into(),
            expected,
            actual: actual.into(),
        }
    }

    pub(crate) fn invalid_property_path(
        shape: impl Into<Term>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidPropertyPath {
            shape: shape.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_rdf_list(shape: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::InvalidRdfList {
            shape: shape.into(),
            message: message.into(),
        }
    }
}
