//! Error types for engine configuration, schema compilation, and request
//! validation.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::types::Section;

/// Errors rejecting the engine configuration at construction time.
///
/// These are fatal: a [`Validator`](crate::Validator) cannot be built from a
/// configuration the engine rejects.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid schema \"{name}\": {message}")]
    InvalidSchema { name: String, message: String },

    #[error("schema \"{name}\" registered more than once")]
    DuplicateSchema { name: String },
}

/// Errors compiling a schema document.
///
/// Raised at middleware construction for literal documents and unknown
/// registered names, or per request for documents produced by a dynamic
/// resolver. Indicates a mistake in the rule set, not in client data, so it
/// is never folded into a [`ValidationError`].
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("no schema registered under \"{name}\"")]
    UnknownSchema { name: String },
}

/// Outcome of a middleware check that did not pass.
#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// A dynamic resolver produced a schema the engine rejected.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// One or more request sections failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl MiddlewareError {
    /// The validation outcome, if this is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            MiddlewareError::Invalid(err) => Some(err),
            MiddlewareError::Compile(_) => None,
        }
    }
}

/// Single schema-engine error descriptor with path context.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// JSON Pointer (RFC 6901) to the invalid part of the section value.
    pub instance_path: String,
    /// JSON Pointer into the schema keyword that failed.
    pub schema_path: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorDetail {
    /// The schema keyword that failed (last segment of the schema path).
    pub fn keyword(&self) -> Option<&str> {
        self.schema_path.rsplit('/').next().filter(|k| !k.is_empty())
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Structured validation failure: which sections failed, and how.
///
/// Carries an ordered mapping from section to the error descriptors the
/// engine produced for it. Only failing sections appear, and at least one
/// always does. The mapping is fixed at construction; there is no mutating
/// API.
///
/// Serializes with a stable [`KIND`](Self::KIND) discriminator so a generic
/// error handler can recognize a schema validation failure before inspecting
/// the details:
///
/// ```json
/// {
///   "kind": "schema-validation",
///   "errors": {
///     "body": [ { "instance_path": "", "schema_path": "/required", "message": "..." } ]
///   }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    errors: Vec<(Section, Vec<ErrorDetail>)>,
}

impl ValidationError {
    /// Discriminator carried in the serialized form.
    pub const KIND: &'static str = "schema-validation";

    pub(crate) fn new(errors: Vec<(Section, Vec<ErrorDetail>)>) -> Self {
        debug_assert!(!errors.is_empty());
        debug_assert!(errors.iter().all(|(_, details)| !details.is_empty()));
        Self { errors }
    }

    /// Failing sections, in rule order.
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.errors.iter().map(|(section, _)| *section)
    }

    /// Error descriptors recorded for a section, if it failed.
    pub fn details(&self, section: Section) -> Option<&[ErrorDetail]> {
        self.errors
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, details)| details.as_slice())
    }

    /// Iterate over failing sections and their error descriptors.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &[ErrorDetail])> + '_ {
        self.errors
            .iter()
            .map(|(section, details)| (*section, details.as_slice()))
    }

    /// Number of failing sections.
    pub fn section_count(&self) -> usize {
        self.errors.len()
    }

    /// Total number of error descriptors across all sections.
    pub fn error_count(&self) -> usize {
        self.errors.iter().map(|(_, details)| details.len()).sum()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections: Vec<&str> = self.sections().map(|s| s.as_str()).collect();
        write!(
            f,
            "request validation failed with {} error(s) in {}",
            self.error_count(),
            sections.join(", ")
        )
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct SectionMap<'a>(&'a [(Section, Vec<ErrorDetail>)]);

        impl Serialize for SectionMap<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (section, details) in self.0 {
                    map.serialize_entry(section.as_str(), details)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("kind", Self::KIND)?;
        map.serialize_entry("errors", &SectionMap(&self.errors))?;
        map.end()
    }
}
