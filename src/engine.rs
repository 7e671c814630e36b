//! Schema engine: compilation and the named-schema table.
//!
//! Thin ownership layer over the `jsonschema` crate. The engine holds the
//! configuration used for every compilation (draft selection, format
//! checking) and the table of schemas pre-registered by name at
//! construction. The table is immutable afterwards, so an engine can be
//! shared freely across concurrent request handlers without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{CompileError, ConfigError, ErrorDetail};

pub use jsonschema::Draft;

/// Engine configuration, forwarded to the `jsonschema` crate at
/// construction.
///
/// This crate neither validates nor defaults any of it beyond passing it
/// through; which drafts and formats are supported is entirely the engine's
/// concern.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    draft: Option<Draft>,
    validate_formats: bool,
    schemas: Vec<(String, Value)>,
}

impl EngineOptions {
    /// Default options: draft auto-detected from `$schema`, format
    /// annotations not enforced, no pre-registered schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a specific JSON Schema draft instead of auto-detection.
    pub fn draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    /// Enforce `format` annotations as assertions.
    pub fn validate_formats(mut self, yes: bool) -> Self {
        self.validate_formats = yes;
        self
    }

    /// Pre-register a named schema, available to rule sets by identifier.
    pub fn schema(mut self, name: impl Into<String>, document: Value) -> Self {
        self.schemas.push((name.into(), document));
        self
    }
}

/// A compiled schema ready to evaluate candidate values.
///
/// Cheap to clone; evaluation never touches shared engine state, so every
/// call yields its own error list.
#[derive(Clone)]
pub struct CompiledSchema {
    inner: Arc<jsonschema::Validator>,
}

impl CompiledSchema {
    /// Returns true if the candidate satisfies the schema.
    pub fn is_valid(&self, candidate: &Value) -> bool {
        self.inner.is_valid(candidate)
    }

    /// Evaluate the candidate and return every error descriptor.
    ///
    /// An empty list means the candidate is valid.
    pub fn errors(&self, candidate: &Value) -> Vec<ErrorDetail> {
        self.inner
            .iter_errors(candidate)
            .map(|e| ErrorDetail {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompiledSchema")
    }
}

/// Compiles schema documents and owns the named-schema table.
#[derive(Debug)]
pub struct Engine {
    draft: Option<Draft>,
    validate_formats: bool,
    registry: HashMap<String, CompiledSchema>,
}

impl Engine {
    /// Build an engine from its configuration.
    ///
    /// Compiles every pre-registered schema up front.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSchema` if a pre-registered document is
    /// rejected by the engine, or `ConfigError::DuplicateSchema` if a name
    /// is registered twice.
    pub fn new(options: EngineOptions) -> Result<Self, ConfigError> {
        let EngineOptions {
            draft,
            validate_formats,
            schemas,
        } = options;

        let mut engine = Engine {
            draft,
            validate_formats,
            registry: HashMap::with_capacity(schemas.len()),
        };

        for (name, document) in schemas {
            if engine.registry.contains_key(&name) {
                return Err(ConfigError::DuplicateSchema { name });
            }
            let compiled = engine
                .try_build(&document)
                .map_err(|message| ConfigError::InvalidSchema {
                    name: name.clone(),
                    message,
                })?;
            engine.registry.insert(name, compiled);
        }

        debug!(schemas = engine.registry.len(), "schema engine initialized");
        Ok(engine)
    }

    /// Compile a schema document.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::InvalidSchema` if the document is rejected by
    /// the engine's meta-schema.
    pub fn compile(&self, document: &Value) -> Result<CompiledSchema, CompileError> {
        trace!("compiling schema document");
        self.try_build(document)
            .map_err(|message| CompileError::InvalidSchema { message })
    }

    /// Look up a pre-registered schema by name.
    pub fn schema(&self, name: &str) -> Option<&CompiledSchema> {
        self.registry.get(name)
    }

    /// Returns true if a schema is registered under the given name.
    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Names of all registered schemas, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registry.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Validate a candidate against a registered schema by name.
    ///
    /// Returns the per-call error descriptor list; an empty list means the
    /// candidate is valid.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::UnknownSchema` if no schema is registered
    /// under the name.
    pub fn validate_named(
        &self,
        name: &str,
        candidate: &Value,
    ) -> Result<Vec<ErrorDetail>, CompileError> {
        let compiled = self
            .registry
            .get(name)
            .ok_or_else(|| CompileError::UnknownSchema {
                name: name.to_string(),
            })?;
        Ok(compiled.errors(candidate))
    }

    fn try_build(&self, document: &Value) -> Result<CompiledSchema, String> {
        let mut opts = jsonschema::options();
        if let Some(draft) = self.draft {
            opts.with_draft(draft);
        }
        if self.validate_formats {
            opts.should_validate_formats(true);
        }

        opts.build(document)
            .map(|validator| CompiledSchema {
                inner: Arc::new(validator),
            })
            .map_err(|e| e.to_string())
    }
}
