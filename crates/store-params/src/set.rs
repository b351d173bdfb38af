//! Immutable parameter sets and their validation results.

use std::collections::HashSet;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{DefinitionError, ParamResult, ParameterError};
use crate::lookup::NullPolicy;
use crate::parser::ParserRegistry;
use crate::raw::RawParameters;
use crate::value::{FromParamValue, ParamValue};
use crate::ParameterDescriptor;

/// Everything a factory accepts, in declaration order, together with the
/// parsers used to coerce text input.
///
/// Cloning is cheap; clones share the descriptors and the parser table.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    name: Option<String>,
    descriptors: Arc<[ParameterDescriptor]>,
    parsers: Arc<ParserRegistry>,
    null_policy: NullPolicy,
}

impl ParameterSet {
    pub fn builder() -> ParameterSetBuilder {
        ParameterSetBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn descriptors(&self) -> &[ParameterDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, key: &str) -> Option<&ParameterDescriptor> {
        self.descriptors.iter().find(|d| d.key() == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(ParameterDescriptor::key)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    /// Look up a single declared parameter.
    pub fn lookup(&self, key: &str, raw: &RawParameters) -> ParamResult<Option<ParamValue>> {
        let descriptor = self
            .get(key)
            .ok_or_else(|| ParameterError::UnknownParameter(key.to_string()))?;
        descriptor.lookup_with(&self.parsers, raw, self.null_policy)
    }

    /// Look up every parameter in order, stopping at the first failure.
    pub fn resolve(&self, raw: &RawParameters) -> ParamResult<ResolvedParameters> {
        let mut values = Vec::with_capacity(self.descriptors.len());
        for descriptor in self.descriptors.iter() {
            let value = descriptor.lookup_with(&self.parsers, raw, self.null_policy)?;
            values.push((descriptor.key().to_string(), value));
        }
        Ok(ResolvedParameters { values })
    }

    /// Look up every parameter and keep every outcome.
    pub fn validate(&self, raw: &RawParameters) -> ValidationReport {
        let entries: Vec<_> = self
            .descriptors
            .iter()
            .map(|d| {
                let outcome = d.lookup_with(&self.parsers, raw, self.null_policy);
                (d.key().to_string(), outcome)
            })
            .collect();

        let report = ValidationReport { entries };
        debug!(
            set = self.name.as_deref().unwrap_or("unnamed"),
            parameters = report.entries.len(),
            errors = report.errors().count(),
            "Validated parameters"
        );
        report
    }

    /// Input keys that no descriptor declares, sorted.
    pub fn unrecognized<'a>(&self, raw: &'a RawParameters) -> Vec<&'a str> {
        let mut keys: Vec<&str> = raw.keys().filter(|k| self.get(k).is_none()).collect();
        keys.sort_unstable();
        keys
    }
}

/// Builder for [`ParameterSet`]; checks the definition on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ParameterSetBuilder {
    name: Option<String>,
    descriptors: Vec<ParameterDescriptor>,
    parsers: Option<Arc<ParserRegistry>>,
    null_policy: NullPolicy,
}

impl ParameterSetBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn param(mut self, descriptor: ParameterDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn params(mut self, descriptors: impl IntoIterator<Item = ParameterDescriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Parsers to coerce with. Defaults to [`ParserRegistry::shared_defaults`].
    pub fn parsers(mut self, parsers: impl Into<Arc<ParserRegistry>>) -> Self {
        self.parsers = Some(parsers.into());
        self
    }

    pub fn null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    pub fn build(self) -> Result<ParameterSet, DefinitionError> {
        let parsers = self
            .parsers
            .unwrap_or_else(ParserRegistry::shared_defaults);

        check_definitions(&self.descriptors, &parsers)?;

        Ok(ParameterSet {
            name: self.name,
            descriptors: self.descriptors.into(),
            parsers,
            null_policy: self.null_policy,
        })
    }
}

fn check_definitions(
    descriptors: &[ParameterDescriptor],
    parsers: &ParserRegistry,
) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();
    for descriptor in descriptors {
        let key = descriptor.key();
        if key.is_empty() {
            return Err(DefinitionError::EmptyKey);
        }
        if !seen.insert(key) {
            return Err(DefinitionError::DuplicateKey(key.to_string()));
        }
        if let Some(sample) = descriptor.sample() {
            let actual = sample.kind();
            if &actual != descriptor.kind() {
                return Err(DefinitionError::SampleKindMismatch {
                    key: key.to_string(),
                    expected: descriptor.kind().clone(),
                    actual,
                });
            }
        }
        if !descriptor.kind().is_text() && !parsers.contains(descriptor.kind()) {
            return Err(DefinitionError::NoParser {
                key: key.to_string(),
                kind: descriptor.kind().clone(),
            });
        }
    }
    Ok(())
}

/// Successful lookup of every parameter in a set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParameters {
    values: Vec<(String, Option<ParamValue>)>,
}

impl ResolvedParameters {
    /// Typed value for `key`; `None` when absent, undeclared, or of another type.
    pub fn get<T: FromParamValue>(&self, key: &str) -> Option<T> {
        self.value(key).and_then(T::from_param_value)
    }

    pub fn value(&self, key: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for ResolvedParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Outcome of validating every parameter in a set.
#[derive(Debug)]
pub struct ValidationReport {
    entries: Vec<(String, ParamResult<Option<ParamValue>>)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|(_, outcome)| outcome.is_ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &ParameterError)> {
        self.entries
            .iter()
            .filter_map(|(key, outcome)| outcome.as_ref().err().map(|e| (key.as_str(), e)))
    }

    pub fn outcome(&self, key: &str) -> Option<&ParamResult<Option<ParamValue>>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, outcome)| outcome)
    }

    pub fn outcomes(&self) -> Vec<ParameterOutcome> {
        self.entries
            .iter()
            .map(|(key, outcome)| ParameterOutcome::new(key, outcome))
            .collect()
    }

    /// Convert into resolved values, failing with the first error.
    pub fn into_resolved(self) -> ParamResult<ResolvedParameters> {
        let mut values = Vec::with_capacity(self.entries.len());
        for (key, outcome) in self.entries {
            values.push((key, outcome?));
        }
        Ok(ResolvedParameters { values })
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("valid", &self.is_valid())?;
        map.serialize_entry("parameters", &self.outcomes())?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Present,
    Absent,
    Error,
}

/// Flattened view of one report entry, as written by `param-check`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterOutcome {
    pub key: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParameterOutcome {
    fn new(key: &str, outcome: &ParamResult<Option<ParamValue>>) -> Self {
        let (status, value, code, error) = match outcome {
            Ok(Some(value)) => (OutcomeStatus::Present, Some(value.clone()), None, None),
            Ok(None) => (OutcomeStatus::Absent, None, None, None),
            Err(err) => (
                OutcomeStatus::Error,
                None,
                Some(err.exception_code()),
                Some(err.to_string()),
            ),
        };
        Self {
            key: key.to_string(),
            status,
            value,
            code,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    fn connection_set() -> ParameterSet {
        ParameterSet::builder()
            .name("connection")
            .param(ParameterDescriptor::new("user"))
            .param(ParameterDescriptor::new("password"))
            .param(ParameterDescriptor::of("port", ValueKind::Integer).optional())
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_keeps_order() {
        let set = connection_set();
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["user", "password", "port"]);
        assert_eq!(set.name(), Some("connection"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_build_rejects_bad_definitions() {
        let empty = ParameterSet::builder()
            .param(ParameterDescriptor::new(""))
            .build();
        assert_eq!(empty.unwrap_err(), DefinitionError::EmptyKey);

        let duplicate = ParameterSet::builder()
            .param(ParameterDescriptor::new("user"))
            .param(ParameterDescriptor::new("user"))
            .build();
        assert_eq!(
            duplicate.unwrap_err(),
            DefinitionError::DuplicateKey("user".to_string())
        );

        let sample = ParameterSet::builder()
            .param(ParameterDescriptor::of("port", ValueKind::Integer).with_sample("8080"))
            .build();
        assert!(matches!(
            sample.unwrap_err(),
            DefinitionError::SampleKindMismatch { .. }
        ));

        let no_parser = ParameterSet::builder()
            .parsers(ParserRegistry::new())
            .param(ParameterDescriptor::of("port", ValueKind::Integer))
            .build();
        assert_eq!(
            no_parser.unwrap_err(),
            DefinitionError::NoParser {
                key: "port".to_string(),
                kind: ValueKind::Integer
            }
        );
    }

    #[test]
    fn test_text_only_set_needs_no_parsers() {
        let set = ParameterSet::builder()
            .parsers(ParserRegistry::new())
            .param(ParameterDescriptor::new("user"))
            .build();
        assert!(set.is_ok());
    }

    #[test]
    fn test_lookup_unknown_key() {
        let set = connection_set();
        let err = set.lookup("host", &RawParameters::new()).unwrap_err();
        assert!(matches!(err, ParameterError::UnknownParameter(k) if k == "host"));
    }

    #[test]
    fn test_resolve_stops_at_first_error() {
        let set = connection_set();
        let raw = RawParameters::from_pairs([("port", "abc")]);
        let err = set.resolve(&raw).unwrap_err();
        assert_eq!(err.key(), Some("user"));
    }

    #[test]
    fn test_validate_collects_everything() {
        let set = connection_set();
        let raw = RawParameters::from_pairs([("user", "gis"), ("port", "abc")]);
        let report = set.validate(&raw);

        assert!(!report.is_valid());
        let failed: Vec<&str> = report.errors().map(|(k, _)| k).collect();
        assert_eq!(failed, vec!["password", "port"]);
        assert!(matches!(report.outcome("user"), Some(Ok(Some(_)))));
    }

    #[test]
    fn test_report_json() {
        let set = connection_set();
        let raw = RawParameters::from_pairs([("user", "gis"), ("port", "8080")]);
        let json = serde_json::to_value(set.validate(&raw)).unwrap();

        assert_eq!(json["valid"], false);
        assert_eq!(json["parameters"][0]["status"], "present");
        assert_eq!(json["parameters"][0]["value"], "gis");
        assert_eq!(json["parameters"][1]["status"], "error");
        assert_eq!(json["parameters"][1]["code"], "MissingParameterValue");
        assert_eq!(json["parameters"][2]["value"], 8080);
    }

    #[test]
    fn test_resolved_typed_access() {
        let set = connection_set();
        let raw = RawParameters::from_pairs([("user", "gis"), ("password", "pw")]);
        let resolved = set.resolve(&raw).unwrap();

        assert_eq!(resolved.get::<String>("user").as_deref(), Some("gis"));
        assert_eq!(resolved.get::<i64>("port"), None);
        assert!(!resolved.is_present("port"));
        assert_eq!(resolved.len(), 3);
    }

    #[test]
    fn test_unrecognized_keys() {
        let set = connection_set();
        let raw = RawParameters::from_pairs([("user", "a"), ("zoom", "3"), ("host", "x")]);
        assert_eq!(set.unrecognized(&raw), vec!["host", "zoom"]);
    }

    #[test]
    fn test_strict_set_policy() {
        let set = ParameterSet::builder()
            .null_policy(NullPolicy::Strict)
            .param(ParameterDescriptor::new("user"))
            .build()
            .unwrap();
        let raw = RawParameters::new().with_null("user");
        assert!(set.lookup("user", &raw).unwrap_err().is_missing());
    }
}
