//! Error types for graphic-store factories.

use store_params::{DefinitionError, ParameterError};
use thiserror::Error;

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to find or create a graphic store.
#[derive(Debug, Error)]
pub enum StoreError {
    // === Parameter Errors ===
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("Invalid parameter value for '{key}': {message}")]
    InvalidParameter { key: String, message: String },

    #[error("Invalid parameter definition: {0}")]
    Definition(#[from] DefinitionError),

    // === Provider Errors ===
    #[error("Provider not supported by this factory: {0}")]
    UnsupportedProvider(String),

    #[error("Factory unavailable: {0}")]
    Unavailable(String),

    #[error("No factory can process provider: {0}")]
    NoFactory(String),

    // === Store Errors ===
    #[error("Store is read-only: {0}")]
    ReadOnly(String),

    #[error("Store {provider} is full ({capacity} graphics)")]
    StoreFull { provider: String, capacity: usize },
}

impl StoreError {
    /// Get the OGC exception code for this error.
    pub fn exception_code(&self) -> &'static str {
        match self {
            StoreError::Parameter(err) => err.exception_code(),
            StoreError::InvalidParameter { .. } => "InvalidParameterValue",
            StoreError::UnsupportedProvider(_)
            | StoreError::NoFactory(_)
            | StoreError::ReadOnly(_) => "OperationNotSupported",
            StoreError::Unavailable(_)
            | StoreError::Definition(_)
            | StoreError::StoreFull { .. } => "NoApplicableCode",
        }
    }

    /// Whether the caller supplied bad parameters (as opposed to a provider problem).
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            StoreError::Parameter(_) | StoreError::InvalidParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_error_keeps_code() {
        let err: StoreError = ParameterError::MissingRequiredParameter {
            key: "user".to_string(),
            description: None,
        }
        .into();
        assert_eq!(err.exception_code(), "MissingParameterValue");
        assert!(err.is_parameter_error());
        assert_eq!(err.to_string(), "Parameter user is required");
    }

    #[test]
    fn test_provider_error_codes() {
        assert_eq!(
            StoreError::NoFactory("ftp://x".into()).exception_code(),
            "OperationNotSupported"
        );
        assert_eq!(
            StoreError::Unavailable("memory".into()).exception_code(),
            "NoApplicableCode"
        );
        let invalid = StoreError::InvalidParameter {
            key: "capacity".into(),
            message: "must be positive".into(),
        };
        assert_eq!(invalid.exception_code(), "InvalidParameterValue");
        assert_eq!(
            invalid.to_string(),
            "Invalid parameter value for 'capacity': must be positive"
        );
    }

    #[test]
    fn test_store_errors_are_not_parameter_errors() {
        let read_only = StoreError::ReadOnly("memory:symbols".into());
        assert_eq!(read_only.exception_code(), "OperationNotSupported");
        assert!(!read_only.is_parameter_error());

        let full = StoreError::StoreFull {
            provider: "memory:symbols".into(),
            capacity: 16,
        };
        assert_eq!(full.exception_code(), "NoApplicableCode");
        assert!(!full.is_parameter_error());
        assert_eq!(full.to_string(), "Store memory:symbols is full (16 graphics)");
    }
}
