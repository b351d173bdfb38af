//! Declared shape of a single connection parameter.

use serde::Serialize;

use crate::value::{ParamValue, ValueKind};

/// One recognized configuration key: its kind, requiredness and hints.
///
/// Descriptors are built at factory-definition time and not changed
/// afterwards; [`ParameterSet`](crate::ParameterSet) only hands out shared
/// references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    key: String,
    #[serde(rename = "type")]
    kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample: Option<ParamValue>,
}

impl ParameterDescriptor {
    /// A required text parameter with no description or sample.
    pub fn new(key: impl Into<String>) -> Self {
        Self::of(key, ValueKind::Text)
    }

    /// A required parameter of the given kind.
    pub fn of(key: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            key: key.into(),
            kind,
            description: None,
            required: true,
            sample: None,
        }
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the description (keep it short; it ends up in error messages).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set an example value. Never substituted for a missing value.
    pub fn with_sample(mut self, sample: impl Into<ParamValue>) -> Self {
        self.sample = Some(sample.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.required(false)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn sample(&self) -> Option<&ParamValue> {
        self.sample.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_plain_key_constructor() {
        let d = ParameterDescriptor::new("user");
        assert_eq!(d.key(), "user");
        assert_eq!(d.kind(), &ValueKind::Text);
        assert!(d.is_required());
        assert!(d.description().is_none());
        assert!(d.sample().is_none());
    }

    #[test]
    fn test_builder_chain() {
        let d = ParameterDescriptor::of("port", ValueKind::Integer)
            .with_description("Server port")
            .with_sample(8080_i64)
            .optional();

        assert_eq!(d.kind(), &ValueKind::Integer);
        assert_eq!(d.description(), Some("Server port"));
        assert_eq!(d.sample(), Some(&ParamValue::Integer(8080)));
        assert!(!d.is_required());
    }

    #[test]
    fn test_serializes_for_documentation() {
        let d = ParameterDescriptor::of("timeout", ValueKind::Duration).optional();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "key": "timeout", "type": "duration", "required": false })
        );
    }
}
