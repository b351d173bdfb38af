//! Shared test utilities for the graphic-store workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Parameter-set and raw-input fixtures
//! - Definition files used by the `param-check` tests
//! - Assertion macros for lookup outcomes
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_param_error, fixtures};
//! ```

pub mod fixtures;
pub mod paths;

pub use fixtures::*;
pub use paths::*;

#[doc(hidden)]
pub use store_params;

/// Assert that a lookup result is an error of the given `ParameterError` variant.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_param_error;
///
/// let result = descriptor.lookup(&raw);
/// assert_param_error!(result, MissingRequiredParameter);
/// ```
#[macro_export]
macro_rules! assert_param_error {
    ($result:expr, $variant:ident) => {{
        match $result {
            Err($crate::store_params::ParameterError::$variant { .. }) => {}
            other => panic!(
                "assertion failed: expected Err({}), got {:?}",
                stringify!($variant),
                other
            ),
        }
    }};
}

/// Assert that a lookup result is the "absent" outcome (`Ok(None)`).
#[macro_export]
macro_rules! assert_absent {
    ($result:expr) => {{
        match $result {
            Ok(None) => {}
            other => panic!("assertion failed: expected Ok(None), got {:?}", other),
        }
    }};
}
