//! The JSON document printed by `param-check`.

use anyhow::Result;
use serde::Serialize;
use store_params::{ParameterSet, RawParameters, ValidationReport};

/// Output layout for the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Single-line JSON.
    Json,
    /// Indented JSON.
    #[default]
    Pretty,
}

/// Validation result for one definition and one input.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(flatten)]
    pub report: ValidationReport,
    /// Input keys the definition does not declare.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unrecognized: Vec<String>,
}

impl CheckReport {
    pub fn new(set: &ParameterSet, raw: &RawParameters) -> Self {
        Self {
            definition: set.name().map(str::to_string),
            report: set.validate(raw),
            unrecognized: set.unrecognized(raw).into_iter().map(str::to_string).collect(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let rendered = match format {
            OutputFormat::Json => serde_json::to_string(self)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
        };
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_params::{ParameterDescriptor, ValueKind};

    fn set() -> ParameterSet {
        ParameterSet::builder()
            .name("demo")
            .param(ParameterDescriptor::new("user"))
            .param(ParameterDescriptor::of("port", ValueKind::Integer).optional())
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_report() {
        let raw = RawParameters::from_pairs([("user", "gis"), ("port", "8080")]);
        let report = CheckReport::new(&set(), &raw);
        assert!(report.is_valid());

        let json: serde_json::Value =
            serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["definition"], "demo");
        assert_eq!(json["valid"], true);
        assert_eq!(json["parameters"][1]["key"], "port");
        assert_eq!(json["parameters"][1]["status"], "present");
        assert_eq!(json["parameters"][1]["value"], 8080);
        assert!(json.get("unrecognized").is_none());
    }

    #[test]
    fn test_invalid_report_lists_unrecognized() {
        let raw = RawParameters::from_pairs([("port", "abc"), ("layers", "temp")]);
        let report = CheckReport::new(&set(), &raw);
        assert!(!report.is_valid());

        let json: serde_json::Value =
            serde_json::from_str(&report.render(OutputFormat::Pretty).unwrap()).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["parameters"][0]["status"], "error");
        assert_eq!(json["parameters"][0]["code"], "MissingParameterValue");
        assert_eq!(json["parameters"][1]["code"], "InvalidParameterValue");
        assert_eq!(json["unrecognized"][0], "layers");
    }

    #[test]
    fn test_pretty_is_indented() {
        let raw = RawParameters::from_pairs([("user", "gis")]);
        let rendered = CheckReport::new(&set(), &raw)
            .render(OutputFormat::Pretty)
            .unwrap();
        assert!(rendered.contains("\n  "));
    }
}
