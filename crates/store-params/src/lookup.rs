//! Lookup of a single descriptor against raw input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParamResult, ParameterError};
use crate::parser::ParserRegistry;
use crate::raw::RawParameters;
use crate::value::ParamValue;
use crate::ParameterDescriptor;

/// How a present-but-empty entry is treated for required parameters.
///
/// Requiredness is always checked against key presence. The policy only
/// decides what happens when the key is there but carries no value (an
/// explicit null, or empty text for a non-text kind).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPolicy {
    /// Empty entries are absent, even for required parameters.
    #[default]
    Lenient,
    /// Empty entries for required parameters are reported as missing.
    Strict,
}

impl ParameterDescriptor {
    /// Look this parameter up in `raw` with the shared default parsers and
    /// the lenient null policy.
    pub fn lookup(&self, raw: &RawParameters) -> ParamResult<Option<ParamValue>> {
        self.lookup_with(&ParserRegistry::shared_defaults(), raw, NullPolicy::Lenient)
    }

    /// Look this parameter up in `raw`.
    ///
    /// Returns `Ok(None)` for an absent value, `Ok(Some(v))` with `v` of this
    /// descriptor's kind, or the classified failure.
    pub fn lookup_with(
        &self,
        parsers: &ParserRegistry,
        raw: &RawParameters,
        policy: NullPolicy,
    ) -> ParamResult<Option<ParamValue>> {
        let Some(entry) = raw.get(self.key()) else {
            if self.is_required() {
                return Err(self.missing());
            }
            return Ok(None);
        };

        let Some(value) = entry else {
            debug!(key = %self.key(), "Parameter present with null value");
            return self.empty_entry(policy);
        };

        let value = match value {
            ParamValue::Text(text) if !self.kind().is_text() => {
                let coerced = parsers
                    .coerce(self.kind(), text)
                    .map_err(|err| err.for_parameter(self.key(), self.description()))?;
                match coerced {
                    Some(value) => value,
                    None => {
                        debug!(key = %self.key(), "Parameter present with empty text");
                        return self.empty_entry(policy);
                    }
                }
            }
            other => other.clone(),
        };

        let actual = value.kind();
        if &actual != self.kind() {
            return Err(ParameterError::TypeMismatch {
                expected: self.kind().clone(),
                actual,
                key: self.key().to_string(),
            });
        }

        Ok(Some(value))
    }

    fn empty_entry(&self, policy: NullPolicy) -> ParamResult<Option<ParamValue>> {
        match policy {
            NullPolicy::Strict if self.is_required() => Err(self.missing()),
            _ => Ok(None),
        }
    }

    fn missing(&self) -> ParameterError {
        ParameterError::MissingRequiredParameter {
            key: self.key().to_string(),
            description: self.description().map(str::to_string),
        }
    }
}
