//! Validate graphic-store connection parameters against a YAML definition.
//!
//! The binary loads a definition with [`definition::load_definition`],
//! gathers raw input with [`input::InputSources`] and prints a
//! [`report::CheckReport`].

pub mod definition;
pub mod input;
pub mod report;

pub use definition::{load_definition, parse_definition, DefinitionFile, ParameterEntry};
pub use input::InputSources;
pub use report::{CheckReport, OutputFormat};
