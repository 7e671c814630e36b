//! Per-request validation orchestration.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::engine::{CompiledSchema, Engine};
use crate::error::{CompileError, ErrorDetail, MiddlewareError, ValidationError};
use crate::request::{Request, SectionSource};
use crate::types::{SchemaResolver, Section};

/// One rule of a compiled rule set.
pub(crate) enum CompiledRule<R> {
    /// Compiled once at middleware construction.
    Static(CompiledSchema),
    /// Resolved from the engine table at middleware construction; the name
    /// is kept for diagnostics.
    Registered { name: String, schema: CompiledSchema },
    /// Compiled per request from the resolver's output.
    Dynamic(SchemaResolver<R>),
}

impl<R> fmt::Debug for CompiledRule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledRule::Static(_) => f.write_str("Static"),
            CompiledRule::Registered { name, .. } => {
                f.debug_tuple("Registered").field(name).finish()
            }
            CompiledRule::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

/// Per-request validation middleware produced by
/// [`Validator::validate`](crate::Validator::validate).
///
/// `Send + Sync`: one instance may serve concurrent requests. Dynamic rules
/// compile their schema per request without locking; concurrent compilations
/// of the same document are independent of each other. The middleware never
/// mutates the request.
pub struct RequestMiddleware<R = Request> {
    engine: Arc<Engine>,
    rules: Vec<(Section, CompiledRule<R>)>,
}

impl<R> RequestMiddleware<R> {
    pub(crate) fn new(engine: Arc<Engine>, rules: Vec<(Section, CompiledRule<R>)>) -> Self {
        Self { engine, rules }
    }

    /// Configured sections, in rule order.
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.rules.iter().map(|(section, _)| *section)
    }
}

impl<R: SectionSource> RequestMiddleware<R> {
    /// Validate every configured section of the request.
    ///
    /// Sections are evaluated in rule order and all of them get a verdict in
    /// the same invocation; errors accumulate rather than short-circuiting.
    /// A section the request does not carry validates as JSON `null`.
    ///
    /// # Errors
    ///
    /// `MiddlewareError::Invalid` when at least one section fails its
    /// schema, carrying every failing section's error descriptors.
    /// `MiddlewareError::Compile` when a dynamic resolver returns a
    /// document the engine rejects; that is a rule-set defect, not a
    /// validation outcome.
    pub fn check(&self, request: &R) -> Result<(), MiddlewareError> {
        let mut failures: Vec<(Section, Vec<ErrorDetail>)> = Vec::new();
        let null = Value::Null;

        for (section, rule) in &self.rules {
            // An absent section is validated as JSON null.
            let candidate = request.section(*section).unwrap_or(&null);

            let errors = match rule {
                CompiledRule::Static(schema) => schema.errors(candidate),
                CompiledRule::Registered { schema, .. } => schema.errors(candidate),
                CompiledRule::Dynamic(resolver) => {
                    let document = resolver(request);
                    let schema = self.engine.compile(&document)?;
                    schema.errors(candidate)
                }
            };

            if !errors.is_empty() {
                trace!(section = %section, errors = errors.len(), "section failed validation");
                failures.push((*section, errors));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            debug!(sections = failures.len(), "request failed validation");
            Err(MiddlewareError::Invalid(ValidationError::new(failures)))
        }
    }

    /// Validate the request and report through an error-first completion
    /// callback.
    ///
    /// On success the callback receives `None`; on validation failure it
    /// receives the [`ValidationError`]. A validation failure is never
    /// raised as an `Err` here.
    ///
    /// # Errors
    ///
    /// A dynamic-schema compile fault propagates as `Err` and the callback
    /// is not invoked; it represents a programming error in the rule set
    /// rather than a validation outcome.
    pub fn invoke<F>(&self, request: &R, complete: F) -> Result<(), CompileError>
    where
        F: FnOnce(Option<ValidationError>),
    {
        match self.check(request) {
            Ok(()) => {
                complete(None);
                Ok(())
            }
            Err(MiddlewareError::Invalid(err)) => {
                complete(Some(err));
                Ok(())
            }
            Err(MiddlewareError::Compile(err)) => Err(err),
        }
    }
}

impl<R> fmt::Debug for RequestMiddleware<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.rules.iter().map(|(s, r)| (s, r)))
            .finish()
    }
}
