//! Parameter-set definitions loaded from YAML.
//!
//! ```yaml
//! name: wms-connection
//! parameters:
//!   - key: user
//!     type: text
//!     description: Username for authentication
//!   - key: port
//!     type: integer
//!     required: false
//!     sample: "${DEFAULT_PORT:-8080}"
//! ```
//!
//! Supports environment variable substitution using ${VAR} and
//! ${VAR:-default} syntax.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use store_params::{NullPolicy, ParameterDescriptor, ParameterSet, ParserRegistry, ValueKind};
use tracing::debug;

// ============================================================================
// Definition file
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionFile {
    #[serde(default)]
    pub name: Option<String>,
    pub parameters: Vec<ParameterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub key: String,
    /// Kind name; aliases such as `int` or `bounding_box` are accepted.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Text form of the sample, parsed with the kind's parser.
    #[serde(default)]
    pub sample: Option<String>,
}

fn default_kind() -> String {
    ValueKind::Text.name().to_string()
}

fn default_required() -> bool {
    true
}

impl DefinitionFile {
    /// Build the parameter set this file describes.
    ///
    /// Only built-in kinds are accepted; custom kinds need parsers this tool
    /// does not have.
    pub fn into_parameter_set(self, policy: NullPolicy) -> Result<ParameterSet> {
        let parsers = ParserRegistry::shared_defaults();
        let mut descriptors = Vec::with_capacity(self.parameters.len());

        for entry in self.parameters {
            let kind = ValueKind::from_alias(&entry.kind).with_context(|| {
                format!(
                    "Unknown type '{}' for parameter '{}'. Must be one of: {}",
                    entry.kind,
                    entry.key,
                    ValueKind::builtins()
                        .iter()
                        .map(ValueKind::name)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })?;

            let mut descriptor =
                ParameterDescriptor::of(&entry.key, kind.clone()).required(entry.required);
            if let Some(description) = entry.description {
                descriptor = descriptor.with_description(description);
            }
            if let Some(text) = entry.sample {
                let sample = parsers
                    .coerce(&kind, &text)
                    .with_context(|| format!("Invalid sample for parameter '{}'", entry.key))?
                    .with_context(|| {
                        format!(
                            "Empty sample for parameter '{}' of type {}",
                            entry.key, kind
                        )
                    })?;
                descriptor = descriptor.with_sample(sample);
            }
            descriptors.push(descriptor);
        }

        let mut builder = ParameterSet::builder()
            .params(descriptors)
            .parsers(parsers)
            .null_policy(policy);
        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        builder.build().context("Invalid parameter definition")
    }
}

// ============================================================================
// Loading Functions
// ============================================================================

/// Parse a definition with environment variable substitution.
pub fn parse_definition(content: &str, policy: NullPolicy) -> Result<ParameterSet> {
    let expanded = expand_env_vars(content)?;

    let file: DefinitionFile =
        serde_yaml::from_str(&expanded).context("Failed to parse parameter definition YAML")?;

    debug!(
        name = file.name.as_deref().unwrap_or("unnamed"),
        parameters = file.parameters.len(),
        "Parsed parameter definition"
    );

    file.into_parameter_set(policy)
}

/// Load and parse a definition file.
pub fn load_definition<P: AsRef<Path>>(path: P, policy: NullPolicy) -> Result<ParameterSet> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read parameter definition from {:?}", path.as_ref()))?;

    parse_definition(&content, policy)
        .with_context(|| format!("Failed to load parameter definition from {:?}", path.as_ref()))
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand ${VAR} and ${VAR:-default} references in `content`.
pub fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            let mut depth = 1;

            while depth > 0 {
                match chars.next() {
                    Some('{') => {
                        depth += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        depth -= 1;
                        if depth > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve a variable expression (VAR or VAR:-default).
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_params::ParamValue;

    const DEFINITION: &str = r#"
name: wms-connection
parameters:
  - key: user
    description: Username for authentication
  - key: port
    type: integer
    required: false
    sample: "8080"
  - key: extent
    type: bounding_box
    required: false
"#;

    #[test]
    fn test_parse_definition() {
        let set = parse_definition(DEFINITION, NullPolicy::Lenient).unwrap();
        assert_eq!(set.name(), Some("wms-connection"));
        assert_eq!(set.len(), 3);

        let user = set.get("user").unwrap();
        assert_eq!(user.kind(), &ValueKind::Text);
        assert!(user.is_required());

        let port = set.get("port").unwrap();
        assert!(!port.is_required());
        assert_eq!(port.sample(), Some(&ParamValue::Integer(8080)));

        assert_eq!(set.get("extent").unwrap().kind(), &ValueKind::BoundingBox);
    }

    #[test]
    fn test_policy_carried_into_set() {
        let set = parse_definition(DEFINITION, NullPolicy::Strict).unwrap();
        assert_eq!(set.null_policy(), NullPolicy::Strict);
    }

    #[test]
    fn test_custom_kind_rejected() {
        let yaml = "parameters:\n  - key: layer\n    type: layer_name\n";
        let err = parse_definition(yaml, NullPolicy::Lenient).unwrap_err();
        assert!(err.to_string().contains("Unknown type 'layer_name'"));
    }

    #[test]
    fn test_invalid_sample_rejected() {
        let yaml = "parameters:\n  - key: port\n    type: integer\n    sample: eighty\n";
        let err = parse_definition(yaml, NullPolicy::Lenient).unwrap_err();
        assert!(err.to_string().contains("Invalid sample for parameter 'port'"));
    }

    #[test]
    fn test_empty_sample_rejected_for_non_text() {
        let yaml = "parameters:\n  - key: port\n    type: integer\n    sample: \"\"\n";
        let err = parse_definition(yaml, NullPolicy::Lenient).unwrap_err();
        assert!(err
            .to_string()
            .contains("Empty sample for parameter 'port' of type integer"));
    }

    #[test]
    fn test_empty_sample_kept_for_text() {
        let yaml = "parameters:\n  - key: user\n    sample: \"\"\n";
        let set = parse_definition(yaml, NullPolicy::Lenient).unwrap();
        assert_eq!(
            set.get("user").unwrap().sample(),
            Some(&ParamValue::Text(String::new()))
        );
    }

    #[test]
    fn test_type_aliases() {
        let yaml = "parameters:\n  - key: a\n    type: int\n  - key: b\n    type: URL\n  - key: c\n    type: Date\n";
        let set = parse_definition(yaml, NullPolicy::Lenient).unwrap();
        assert_eq!(set.get("a").unwrap().kind(), &ValueKind::Integer);
        assert_eq!(set.get("b").unwrap().kind(), &ValueKind::Uri);
        assert_eq!(set.get("c").unwrap().kind(), &ValueKind::DateTime);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let yaml = "parameters:\n  - key: user\n  - key: user\n";
        let err = parse_definition(yaml, NullPolicy::Lenient).unwrap_err();
        assert!(format!("{err:#}").contains("Duplicate parameter key: user"));
    }

    #[test]
    fn test_expand_env_vars_simple() {
        std::env::set_var("PARAM_CHECK_TEST_VAR", "test_value");
        let result = expand_env_vars("prefix_${PARAM_CHECK_TEST_VAR}_suffix").unwrap();
        assert_eq!(result, "prefix_test_value_suffix");
    }

    #[test]
    fn test_expand_env_vars_with_default() {
        std::env::remove_var("PARAM_CHECK_NONEXISTENT_VAR");
        let result = expand_env_vars("value_${PARAM_CHECK_NONEXISTENT_VAR:-default}_end").unwrap();
        assert_eq!(result, "value_default_end");
    }

    #[test]
    fn test_expand_env_vars_missing_required() {
        std::env::remove_var("PARAM_CHECK_REQUIRED_VAR");
        assert!(expand_env_vars("${PARAM_CHECK_REQUIRED_VAR}").is_err());
    }

    #[test]
    fn test_expand_env_vars_unclosed() {
        assert!(expand_env_vars("${UNCLOSED").is_err());
    }

    #[test]
    fn test_resolve_var_expr_override_default() {
        std::env::set_var("PARAM_CHECK_SET_VAR", "custom");
        assert_eq!(resolve_var_expr("PARAM_CHECK_SET_VAR:-default").unwrap(), "custom");
    }
}
