//! JSON Schema validation middleware for request pipelines.
//!
//! Maps request sections (`body`, `query`, `params`, `headers`) to JSON
//! Schemas and validates each section independently, aggregating every
//! failure into one structured [`ValidationError`]. Schema evaluation is
//! delegated to the `jsonschema` crate; this library is the orchestration
//! around it: rule-set compilation, per-request dispatch, and error shaping.
//!
//! # Example
//!
//! ```
//! use schema_gate::{EngineOptions, Request, RuleSet, Section, Validator};
//! use serde_json::json;
//!
//! let validator = Validator::new(EngineOptions::new()).unwrap();
//!
//! let middleware = validator
//!     .validate(RuleSet::new().body(json!({
//!         "type": "object",
//!         "required": ["name"],
//!         "properties": {
//!             "name": { "type": "string" }
//!         }
//!     })))
//!     .unwrap();
//!
//! // A conforming request passes.
//! let ok = Request::new().body(json!({ "name": "Ada" }));
//! assert!(middleware.check(&ok).is_ok());
//!
//! // A violating request reports which sections failed, and how.
//! let bad = Request::new().body(json!({}));
//! let err = middleware.check(&bad).unwrap_err();
//! let err = err.validation().unwrap();
//! assert_eq!(err.sections().collect::<Vec<_>>(), vec![Section::Body]);
//! ```
//!
//! # Schema rules
//!
//! A section's schema can be given three ways:
//!
//! - a literal document, compiled once when the middleware is built;
//! - the name of a schema pre-registered via
//!   [`EngineOptions::schema`], shared by every rule set on the engine;
//! - a per-request resolver closure, for schemas that depend on request
//!   content; resolved and compiled freshly on every request.
//!
//! ```
//! use schema_gate::{EngineOptions, Request, RuleSet, Section, Validator};
//! use serde_json::json;
//!
//! let validator = Validator::new(
//!     EngineOptions::new().schema("paging", json!({
//!         "type": "object",
//!         "properties": { "page": { "type": "integer", "minimum": 1 } }
//!     })),
//! )
//! .unwrap();
//!
//! let middleware = validator
//!     .validate(
//!         RuleSet::new()
//!             .query("paging")
//!             .dynamic(Section::Body, |_req: &Request| {
//!                 // schema may be derived from the request itself
//!                 json!({ "type": "object" })
//!             }),
//!     )
//!     .unwrap();
//!
//! let request = Request::new()
//!     .body(json!({}))
//!     .query(json!({ "page": 1 }));
//! assert!(middleware.check(&request).is_ok());
//! ```
//!
//! # Completion protocol
//!
//! Request pipelines built on error-first continuations use
//! [`RequestMiddleware::invoke`]: success calls the continuation with
//! `None`, a validation failure with `Some(ValidationError)`. Only
//! non-validation faults (a dynamic resolver producing a schema the engine
//! rejects) surface as `Err` from `invoke` itself.

mod engine;
mod error;
mod middleware;
mod request;
mod types;
mod validator;

pub use engine::{CompiledSchema, Draft, Engine, EngineOptions};
pub use error::{CompileError, ConfigError, ErrorDetail, MiddlewareError, ValidationError};
pub use middleware::RequestMiddleware;
pub use request::{Request, SectionSource};
pub use types::{RuleSet, SchemaResolver, SchemaRule, Section};
pub use validator::Validator;
