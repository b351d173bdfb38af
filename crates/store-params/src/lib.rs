//! Typed connection parameters for graphic-store factories.
//!
//! A factory declares the parameters it accepts as a [`ParameterSet`] of
//! [`ParameterDescriptor`]s. Callers hand it a [`RawParameters`] map (usually
//! text from a config file, a query string or the command line) and each
//! descriptor coerces its entry into the declared [`ValueKind`] using the
//! [`ParserRegistry`] the set was built with.
//!
//! # Lookup outcomes
//!
//! ```text
//! raw[key] missing ──► required? ──► MissingRequiredParameter
//!                           └──────► absent (None)
//! raw[key] = null  ──────────────► absent (None)
//! raw[key] = text  ──► kind != text ──► "" ──► absent (None)
//!                                  └──► parser(kind) ──► value / CoercionFailure
//! value.kind() != kind ──────────► TypeMismatch
//! ```
//!
//! # Example
//!
//! ```rust
//! use store_params::{ParameterDescriptor, ParameterSet, RawParameters, ValueKind};
//!
//! let params = ParameterSet::builder()
//!     .param(ParameterDescriptor::new("user").with_description("Username for authentication"))
//!     .param(ParameterDescriptor::of("port", ValueKind::Integer).optional())
//!     .build()
//!     .unwrap();
//!
//! let raw = RawParameters::from_pairs([("user", "gis"), ("port", "8080")]);
//! let resolved = params.resolve(&raw).unwrap();
//! assert_eq!(resolved.get::<i64>("port"), Some(8080));
//! ```

pub mod bbox;
pub mod crs;
pub mod descriptor;
pub mod error;
pub mod lookup;
pub mod parser;
pub mod raw;
pub mod set;
pub mod time;
pub mod value;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use descriptor::ParameterDescriptor;
pub use error::{
    BoxError, CoercionCause, DefinitionError, ParamResult, ParameterError, RawInputError,
};
pub use lookup::NullPolicy;
pub use parser::{ParserRegistry, ValueParser};
pub use raw::RawParameters;
pub use set::{
    OutcomeStatus, ParameterOutcome, ParameterSet, ParameterSetBuilder, ResolvedParameters,
    ValidationReport,
};
pub use value::{CustomValue, FromParamValue, KindParseError, ParamValue, ValueKind};
