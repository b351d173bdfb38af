//! Error types for parameter lookup and parameter-set definitions.

use thiserror::Error;

use crate::ValueKind;

/// Boxed error returned by value parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using ParameterError.
pub type ParamResult<T> = Result<T, ParameterError>;

/// Classified failure of a single parameter lookup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParameterError {
    #[error(
        "Parameter {key} is required{}",
        .description.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
    )]
    MissingRequiredParameter {
        key: String,
        description: Option<String>,
    },

    #[error(
        "Could not create {kind} from '{text}'{}: {cause}",
        parameter_context(.key, .description)
    )]
    CoercionFailure {
        /// Set once the failure is tied to a parameter.
        key: Option<String>,
        description: Option<String>,
        kind: ValueKind,
        text: String,
        #[source]
        cause: CoercionCause,
    },

    #[error("{expected} required for parameter {key}: not {actual}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
        key: String,
    },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

impl ParameterError {
    /// Key of the parameter this error refers to, when known.
    pub fn key(&self) -> Option<&str> {
        match self {
            ParameterError::MissingRequiredParameter { key, .. }
            | ParameterError::TypeMismatch { key, .. }
            | ParameterError::UnknownParameter(key) => Some(key),
            ParameterError::CoercionFailure { key, .. } => key.as_deref(),
        }
    }

    /// Attach the parameter a kind-level coercion failure belongs to.
    pub fn for_parameter(self, key: &str, description: Option<&str>) -> Self {
        match self {
            ParameterError::CoercionFailure {
                kind, text, cause, ..
            } => ParameterError::CoercionFailure {
                key: Some(key.to_string()),
                description: description.map(str::to_string),
                kind,
                text,
                cause,
            },
            other => other,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ParameterError::MissingRequiredParameter { .. })
    }

    /// Get the OGC exception code for this error.
    pub fn exception_code(&self) -> &'static str {
        match self {
            ParameterError::MissingRequiredParameter { .. } => "MissingParameterValue",
            _ => "InvalidParameterValue",
        }
    }
}

fn parameter_context(key: &Option<String>, description: &Option<String>) -> String {
    match (key, description) {
        (Some(key), Some(description)) => format!(" for parameter {key} ({description})"),
        (Some(key), None) => format!(" for parameter {key}"),
        _ => String::new(),
    }
}

/// Why a text value could not be coerced.
#[derive(Debug, Error)]
pub enum CoercionCause {
    /// Nothing is registered for the target kind.
    #[error("no parser registered for this type")]
    NoParser,

    /// The registered parser rejected the text.
    #[error("{0}")]
    Parse(#[source] BoxError),
}

impl CoercionCause {
    /// The parser's own error, if the parser ran.
    pub fn parse_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            CoercionCause::Parse(err) => Some(err.as_ref()),
            CoercionCause::NoParser => None,
        }
    }
}

/// Rejected parameter-set definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("Parameter key cannot be empty")]
    EmptyKey,

    #[error("Duplicate parameter key: {0}")]
    DuplicateKey(String),

    #[error("Sample for parameter '{key}' is {actual}, expected {expected}")]
    SampleKindMismatch {
        key: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("No parser registered for {kind} (parameter '{key}')")]
    NoParser { key: String, kind: ValueKind },
}

/// Malformed raw input, e.g. a `key=value` assignment without a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawInputError {
    #[error("Missing parameter name in '{0}'")]
    EmptyKey(String),
}
