//! Request-side seam: how the middleware reads section values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Section;

/// Anything that can hand out request sections as JSON values.
///
/// The middleware reads only the sections named in its rule set; a request
/// type may carry whatever else it likes. A section the request does not
/// carry validates as JSON `null`.
pub trait SectionSource {
    /// Returns the value carried in the given section, if present.
    fn section(&self, section: Section) -> Option<&Value>;
}

/// Owned, framework-independent request value.
///
/// Adapters for a concrete web framework typically build one of these from
/// the framework's request type, or implement [`SectionSource`] directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<Value>,
}

impl Request {
    /// Create a request with no sections set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `body` section.
    pub fn body(mut self, value: Value) -> Self {
        self.body = Some(value);
        self
    }

    /// Set the `query` section.
    pub fn query(mut self, value: Value) -> Self {
        self.query = Some(value);
        self
    }

    /// Set the `params` section.
    pub fn params(mut self, value: Value) -> Self {
        self.params = Some(value);
        self
    }

    /// Set the `headers` section.
    pub fn headers(mut self, value: Value) -> Self {
        self.headers = Some(value);
        self
    }

    /// Set an arbitrary section.
    pub fn section_value(mut self, section: Section, value: Value) -> Self {
        match section {
            Section::Body => self.body = Some(value),
            Section::Query => self.query = Some(value),
            Section::Params => self.params = Some(value),
            Section::Headers => self.headers = Some(value),
        }
        self
    }
}

impl SectionSource for Request {
    fn section(&self, section: Section) -> Option<&Value> {
        match section {
            Section::Body => self.body.as_ref(),
            Section::Query => self.query.as_ref(),
            Section::Params => self.params.as_ref(),
            Section::Headers => self.headers.as_ref(),
        }
    }
}

/// A plain JSON object keyed by section name also works as a request.
impl SectionSource for Value {
    fn section(&self, section: Section) -> Option<&Value> {
        self.get(section.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_hands_out_configured_sections() {
        let request = Request::new()
            .body(json!({ "name": "Ada" }))
            .query(json!({ "page": 1 }));

        assert_eq!(
            request.section(Section::Body),
            Some(&json!({ "name": "Ada" }))
        );
        assert_eq!(request.section(Section::Query), Some(&json!({ "page": 1 })));
        assert_eq!(request.section(Section::Params), None);
    }

    #[test]
    fn section_value_matches_named_builders() {
        let request = Request::new().section_value(Section::Headers, json!({ "x-id": "abc" }));
        assert_eq!(
            request.section(Section::Headers),
            Some(&json!({ "x-id": "abc" }))
        );
    }

    #[test]
    fn json_object_acts_as_request() {
        let request = json!({
            "body": { "name": "Ada" },
            "query": {}
        });

        assert_eq!(
            request.section(Section::Body),
            Some(&json!({ "name": "Ada" }))
        );
        assert_eq!(request.section(Section::Params), None);
    }

    #[test]
    fn request_serializes_only_set_sections() {
        let request = Request::new().body(json!({}));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "body": {} }));
    }
}
