//! The type-to-parser table used to coerce text into typed values.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use tracing::debug;
use url::Url;

use crate::error::{BoxError, CoercionCause, ParamResult, ParameterError};
use crate::time::{parse_datetime, parse_duration};
use crate::value::{CustomValue, KindParseError, ParamValue, ValueKind};
use crate::{BoundingBox, CrsCode};

/// Builds a value of one kind from its text representation.
pub trait ValueParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParamValue, BoxError>;
}

impl<F> ValueParser for F
where
    F: Fn(&str) -> Result<ParamValue, BoxError> + Send + Sync,
{
    fn parse(&self, text: &str) -> Result<ParamValue, BoxError> {
        self(text)
    }
}

/// Mapping from [`ValueKind`] to the parser that produces it.
///
/// Registries are assembled at configuration time and shared read-only
/// (usually behind an `Arc`) by every parameter set built from them.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<ValueKind, Arc<dyn ValueParser>>,
}

impl ParserRegistry {
    /// An empty registry. Only `Text` parameters can be coerced with it.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with parsers for every built-in non-text kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(ValueKind::Integer, |text: &str| -> Result<ParamValue, BoxError> {
            Ok(ParamValue::Integer(text.parse::<i64>()?))
        });
        registry.register(ValueKind::Float, |text: &str| -> Result<ParamValue, BoxError> {
            Ok(ParamValue::Float(text.parse::<f64>()?))
        });
        registry.register(ValueKind::Boolean, |text: &str| -> Result<ParamValue, BoxError> {
            Ok(ParamValue::Boolean(parse_bool(text)?))
        });
        registry.register(ValueKind::Uri, |text: &str| -> Result<ParamValue, BoxError> {
            Ok(ParamValue::Uri(Url::parse(text)?))
        });
        registry.register(ValueKind::Duration, |text: &str| -> Result<ParamValue, BoxError> {
            Ok(ParamValue::Duration(parse_duration(text)?))
        });
        registry.register(ValueKind::DateTime, |text: &str| -> Result<ParamValue, BoxError> {
            Ok(ParamValue::DateTime(parse_datetime(text)?))
        });
        registry.register(ValueKind::Crs, |text: &str| -> Result<ParamValue, BoxError> {
            Ok(ParamValue::Crs(CrsCode::parse(text)?))
        });
        registry.register(ValueKind::BoundingBox, |text: &str| -> Result<ParamValue, BoxError> {
            Ok(ParamValue::BoundingBox(BoundingBox::parse(text)?))
        });

        registry
    }

    /// Process-wide default registry, built on first use.
    pub fn shared_defaults() -> Arc<ParserRegistry> {
        static DEFAULTS: OnceLock<Arc<ParserRegistry>> = OnceLock::new();
        DEFAULTS
            .get_or_init(|| Arc::new(ParserRegistry::with_defaults()))
            .clone()
    }

    /// Register `parser` for `kind`, returning the parser it replaced.
    pub fn register<P>(&mut self, kind: ValueKind, parser: P) -> Option<Arc<dyn ValueParser>>
    where
        P: ValueParser + 'static,
    {
        self.parsers.insert(kind, Arc::new(parser))
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<P>(mut self, kind: ValueKind, parser: P) -> Self
    where
        P: ValueParser + 'static,
    {
        self.register(kind, parser);
        self
    }

    /// Register a custom kind whose values are any `T: FromStr`.
    ///
    /// Parsed values are wrapped in [`CustomValue`] and can be recovered with
    /// `downcast_ref::<T>()`. Built-in kind names are refused.
    pub fn register_custom<T>(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ValueKind, KindParseError>
    where
        T: FromStr + fmt::Display + Send + Sync + 'static,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let kind = ValueKind::custom(name)?;
        let name = kind.name().to_string();
        self.register(kind.clone(), move |text: &str| -> Result<ParamValue, BoxError> {
            let value: T = text.parse()?;
            Ok(ParamValue::Custom(CustomValue::new(name.clone(), value)))
        });
        Ok(kind)
    }

    pub fn get(&self, kind: &ValueKind) -> Option<&Arc<dyn ValueParser>> {
        self.parsers.get(kind)
    }

    pub fn contains(&self, kind: &ValueKind) -> bool {
        self.parsers.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &ValueKind> {
        self.parsers.keys()
    }

    /// Run the parser registered for `kind` on `text`.
    ///
    /// No empty-text handling; see [`coerce`](Self::coerce) for the lookup rules.
    pub fn parse(&self, kind: &ValueKind, text: &str) -> ParamResult<ParamValue> {
        let parser = self
            .get(kind)
            .ok_or_else(|| coercion_failure(kind, text, CoercionCause::NoParser))?;

        parser
            .parse(text)
            .map_err(|err| coercion_failure(kind, text, CoercionCause::Parse(err)))
    }

    /// Coerce raw text into `kind`.
    ///
    /// - `Text` passes through unchanged, including the empty string.
    /// - Empty text for any other kind is absent (`Ok(None)`), not an error.
    /// - Otherwise the registered parser decides.
    pub fn coerce(&self, kind: &ValueKind, text: &str) -> ParamResult<Option<ParamValue>> {
        if kind.is_text() {
            return Ok(Some(ParamValue::Text(text.to_string())));
        }
        if text.is_empty() {
            return Ok(None);
        }

        let value = self.parse(kind, text)?;
        debug!(kind = %kind, text = %text, "Coerced parameter text");
        Ok(Some(value))
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.parsers.keys().map(ValueKind::name).collect();
        kinds.sort_unstable();
        f.debug_struct("ParserRegistry").field("kinds", &kinds).finish()
    }
}

fn coercion_failure(kind: &ValueKind, text: &str, cause: CoercionCause) -> ParameterError {
    ParameterError::CoercionFailure {
        key: None,
        description: None,
        kind: kind.clone(),
        text: text.to_string(),
        cause,
    }
}

fn parse_bool(text: &str) -> Result<bool, BoolParseError> {
    match text.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(BoolParseError(text.to_string())),
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid boolean '{0}' (expected true/false, yes/no, on/off or 1/0)")]
pub struct BoolParseError(String);
