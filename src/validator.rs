//! Validator: engine ownership and rule-set compilation.

use std::sync::Arc;

use tracing::debug;

use crate::engine::{Engine, EngineOptions};
use crate::error::{CompileError, ConfigError};
use crate::middleware::{CompiledRule, RequestMiddleware};
use crate::types::{RuleSet, SchemaRule};

/// Owns a schema engine and produces request middlewares from rule sets.
///
/// Construct one per engine configuration and reuse it for every route;
/// each [`validate`](Self::validate) call yields an independent middleware
/// sharing the same engine.
#[derive(Debug, Clone)]
pub struct Validator {
    engine: Arc<Engine>,
}

impl Validator {
    /// Build a validator from engine configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the engine rejects the configuration, e.g.
    /// a malformed pre-registered schema.
    pub fn new(options: EngineOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: Arc::new(Engine::new(options)?),
        })
    }

    /// Build a validator around an existing shared engine.
    pub fn with_engine(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// The underlying engine, for advanced use (introspection, manual
    /// compilation). Not needed for the validation contract itself.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compile a rule set into a per-request middleware.
    ///
    /// Literal schema documents are compiled here, exactly once for the
    /// lifetime of the middleware. Registered names are resolved against
    /// the engine table. Dynamic rules stay unresolved and compile per
    /// request. Construction does not change the engine's registered table.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::InvalidSchema` for a malformed literal
    /// document, or `CompileError::UnknownSchema` for a name with no
    /// registered schema.
    pub fn validate<R>(&self, rules: RuleSet<R>) -> Result<RequestMiddleware<R>, CompileError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for (section, rule) in rules.into_rules() {
            let entry = match rule {
                SchemaRule::Document(document) => {
                    CompiledRule::Static(self.engine.compile(&document)?)
                }
                SchemaRule::Registered(name) => {
                    let schema = self.engine.schema(&name).cloned().ok_or_else(|| {
                        CompileError::UnknownSchema { name: name.clone() }
                    })?;
                    CompiledRule::Registered { name, schema }
                }
                SchemaRule::Dynamic(resolver) => CompiledRule::Dynamic(resolver),
            };
            compiled.push((section, entry));
        }

        debug!(rules = compiled.len(), "rule set compiled");
        Ok(RequestMiddleware::new(Arc::clone(&self.engine), compiled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Section;
    use serde_json::json;

    #[test]
    fn validate_compiles_static_rules() {
        let validator = Validator::new(EngineOptions::new()).unwrap();
        let middleware = validator
            .validate(RuleSet::<crate::Request>::new().body(json!({ "type": "object" })))
            .unwrap();

        let sections: Vec<Section> = middleware.sections().collect();
        assert_eq!(sections, vec![Section::Body]);
    }

    #[test]
    fn validate_rejects_malformed_document() {
        let validator = Validator::new(EngineOptions::new()).unwrap();
        let result =
            validator.validate(RuleSet::<crate::Request>::new().body(json!({ "pattern": "(" })));
        assert!(matches!(result, Err(CompileError::InvalidSchema { .. })));
    }

    #[test]
    fn validate_rejects_unknown_registered_name() {
        let validator = Validator::new(EngineOptions::new()).unwrap();
        let result = validator.validate(RuleSet::<crate::Request>::new().body("missingSchema"));
        assert!(matches!(
            result,
            Err(CompileError::UnknownSchema { name }) if name == "missingSchema"
        ));
    }

    #[test]
    fn engine_escape_hatch_exposes_registry() {
        let validator = Validator::new(
            EngineOptions::new().schema("personSchema", json!({ "type": "object" })),
        )
        .unwrap();
        assert!(validator.engine().is_registered("personSchema"));
    }

    #[test]
    fn shared_engine_across_validators() {
        let engine = Arc::new(
            Engine::new(EngineOptions::new().schema("personSchema", json!({ "type": "object" })))
                .unwrap(),
        );
        let validator = Validator::with_engine(Arc::clone(&engine));
        assert!(validator
            .validate(RuleSet::<crate::Request>::new().body("personSchema"))
            .is_ok());
    }
}
