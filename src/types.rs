//! Core types for rule-set construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::Request;

/// A named part of an inbound request subject to independent validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Body,
    Query,
    Params,
    Headers,
}

impl Section {
    /// All sections, in conventional request order.
    pub const ALL: &'static [Section] = &[
        Section::Body,
        Section::Query,
        Section::Params,
        Section::Headers,
    ];

    /// Returns the section name as it appears on a request value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Body => "body",
            Section::Query => "query",
            Section::Params => "params",
            Section::Headers => "headers",
        }
    }

    /// Parse a section from its name.
    ///
    /// Returns `None` for unknown names (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "body" => Some(Section::Body),
            "query" => Some(Section::Query),
            "params" => Some(Section::Params),
            "headers" => Some(Section::Headers),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolver producing a schema document from the incoming request.
///
/// Invoked exactly once per request per configured section; the resulting
/// document is compiled immediately and discarded after the request.
pub type SchemaResolver<R> = Box<dyn Fn(&R) -> Value + Send + Sync>;

/// How the schema for a section is obtained.
///
/// The variant is fixed at rule-set construction time, so the per-request
/// path is a direct match rather than a runtime type check.
pub enum SchemaRule<R = Request> {
    /// Literal schema document, compiled once at middleware construction.
    Document(Value),
    /// Identifier of a schema pre-registered with the engine.
    Registered(String),
    /// Per-request resolver; the schema may depend on request content.
    Dynamic(SchemaResolver<R>),
}

impl<R> SchemaRule<R> {
    /// Rule from a literal schema document.
    pub fn document(schema: Value) -> Self {
        SchemaRule::Document(schema)
    }

    /// Rule referring to a schema registered at engine construction.
    pub fn registered(name: impl Into<String>) -> Self {
        SchemaRule::Registered(name.into())
    }

    /// Rule resolved from the request, once per incoming request.
    pub fn dynamic<F>(resolver: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        SchemaRule::Dynamic(Box::new(resolver))
    }
}

impl<R> From<Value> for SchemaRule<R> {
    fn from(schema: Value) -> Self {
        SchemaRule::Document(schema)
    }
}

impl<R> From<&str> for SchemaRule<R> {
    fn from(name: &str) -> Self {
        SchemaRule::Registered(name.to_string())
    }
}

impl<R> From<String> for SchemaRule<R> {
    fn from(name: String) -> Self {
        SchemaRule::Registered(name)
    }
}

impl<R> fmt::Debug for SchemaRule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaRule::Document(schema) => f.debug_tuple("Document").field(schema).finish(),
            SchemaRule::Registered(name) => f.debug_tuple("Registered").field(name).finish(),
            SchemaRule::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Ordered mapping from request section to schema rule.
///
/// Constructed once, typically at route-registration time, then turned into
/// a middleware with [`Validator::validate`](crate::Validator::validate).
/// Sections are validated in insertion order; re-configuring a section
/// replaces its rule in place.
pub struct RuleSet<R = Request> {
    rules: Vec<(Section, SchemaRule<R>)>,
}

impl<R> RuleSet<R> {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Configure a rule for a section.
    ///
    /// Accepts a schema document (`serde_json::Value`), a registered-schema
    /// name (`&str` / `String`), or an explicit [`SchemaRule`].
    pub fn rule(mut self, section: Section, rule: impl Into<SchemaRule<R>>) -> Self {
        self.insert(section, rule.into());
        self
    }

    /// Configure the `body` section.
    pub fn body(self, rule: impl Into<SchemaRule<R>>) -> Self {
        self.rule(Section::Body, rule)
    }

    /// Configure the `query` section.
    pub fn query(self, rule: impl Into<SchemaRule<R>>) -> Self {
        self.rule(Section::Query, rule)
    }

    /// Configure the `params` section.
    pub fn params(self, rule: impl Into<SchemaRule<R>>) -> Self {
        self.rule(Section::Params, rule)
    }

    /// Configure the `headers` section.
    pub fn headers(self, rule: impl Into<SchemaRule<R>>) -> Self {
        self.rule(Section::Headers, rule)
    }

    /// Configure a section with a per-request schema resolver.
    pub fn dynamic<F>(self, section: Section, resolver: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.rule(section, SchemaRule::dynamic(resolver))
    }

    /// Number of configured sections.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no sections are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Configured sections, in rule order.
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.rules.iter().map(|(section, _)| *section)
    }

    pub(crate) fn into_rules(self) -> Vec<(Section, SchemaRule<R>)> {
        self.rules
    }

    fn insert(&mut self, section: Section, rule: SchemaRule<R>) {
        match self.rules.iter_mut().find(|(s, _)| *s == section) {
            Some((_, slot)) => *slot = rule,
            None => self.rules.push((section, rule)),
        }
    }
}

impl<R> Default for RuleSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for RuleSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.rules.iter().map(|(s, r)| (s, r)))
            .finish()
    }
}
