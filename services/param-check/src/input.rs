//! Raw parameter input gathered from the environment, a query string and
//! `--param` assignments.
//!
//! Later sources override earlier ones: environment, then query, then params.

use anyhow::{Context, Result};
use store_params::{ParameterSet, RawParameters};
use tracing::debug;

/// Where raw input comes from.
#[derive(Debug, Default, Clone)]
pub struct InputSources {
    /// Read `<PREFIX><KEY>` variables for every declared key.
    pub env_prefix: Option<String>,
    /// `a=1&b=two`, percent-decoded.
    pub query: Option<String>,
    /// `key=value`, `key=` (empty text) or `key` (null).
    pub params: Vec<String>,
}

impl InputSources {
    /// Collect input using the process environment.
    pub fn collect(&self, set: &ParameterSet) -> Result<RawParameters> {
        self.collect_with(set, |name| std::env::var(name).ok())
    }

    /// Collect input, reading variables through `env`.
    pub fn collect_with<F>(&self, set: &ParameterSet, env: F) -> Result<RawParameters>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut raw = RawParameters::new();

        if let Some(prefix) = &self.env_prefix {
            let from_env = env_input(set, prefix, env);
            debug!(prefix = %prefix, count = from_env.len(), "Read parameters from environment");
            raw.merge(from_env);
        }

        if let Some(query) = &self.query {
            let from_query = RawParameters::from_query(query);
            debug!(count = from_query.len(), "Read parameters from query");
            raw.merge(from_query);
        }

        for assignment in &self.params {
            raw.insert_assignment(assignment)
                .with_context(|| format!("Invalid --param '{}'", assignment))?;
        }

        Ok(raw)
    }
}

/// Environment variable name for `key`: prefix plus the uppercased key.
pub fn env_var_name(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key.to_uppercase())
}

fn env_input<F>(set: &ParameterSet, prefix: &str, env: F) -> RawParameters
where
    F: Fn(&str) -> Option<String>,
{
    let mut raw = RawParameters::new();
    for key in set.keys() {
        if let Some(value) = env(&env_var_name(prefix, key)) {
            raw.insert_text(key, value);
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use store_params::{ParamValue, ParameterDescriptor, ValueKind};

    fn set() -> ParameterSet {
        ParameterSet::builder()
            .param(ParameterDescriptor::new("user"))
            .param(ParameterDescriptor::of("port", ValueKind::Integer).optional())
            .param(ParameterDescriptor::of("timeout", ValueKind::Duration).optional())
            .build()
            .unwrap()
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn text(raw: &RawParameters, key: &str) -> Option<String> {
        raw.get(key)
            .and_then(|v| v.as_ref())
            .and_then(ParamValue::as_text)
            .map(str::to_string)
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("STORE_", "read_only"), "STORE_READ_ONLY");
    }

    #[test]
    fn test_env_only_for_declared_keys() {
        let sources = InputSources {
            env_prefix: Some("STORE_".to_string()),
            ..Default::default()
        };
        let raw = sources
            .collect_with(&set(), env(&[("STORE_USER", "gis"), ("STORE_OTHER", "x")]))
            .unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(text(&raw, "user").as_deref(), Some("gis"));
    }

    #[test]
    fn test_env_ignored_without_prefix() {
        let raw = InputSources::default()
            .collect_with(&set(), env(&[("USER", "gis")]))
            .unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_precedence() {
        let sources = InputSources {
            env_prefix: Some("STORE_".to_string()),
            query: Some("user=query&port=1".to_string()),
            params: vec!["port=2".to_string(), "timeout".to_string()],
        };
        let raw = sources
            .collect_with(&set(), env(&[("STORE_USER", "env"), ("STORE_TIMEOUT", "5s")]))
            .unwrap();

        assert_eq!(text(&raw, "user").as_deref(), Some("query"));
        assert_eq!(text(&raw, "port").as_deref(), Some("2"));
        assert_eq!(raw.get("timeout"), Some(&None));
    }

    #[test]
    fn test_invalid_assignment() {
        let sources = InputSources {
            params: vec!["=value".to_string()],
            ..Default::default()
        };
        let err = sources.collect_with(&set(), env(&[])).unwrap_err();
        assert!(err.to_string().contains("Invalid --param '=value'"));
    }
}
