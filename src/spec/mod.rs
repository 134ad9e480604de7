//! # Spec Module
//!
//! Loads OpenAPI documents and turns their operations into [`ToolDefinition`]s.
//!
//! - [`load_spec`] / [`parse_spec`] read a YAML or JSON file into a
//!   [`SpecificationDocument`], keeping paths and methods in document order
//! - [`build_tools`] walks the document and builds one tool per valid operation
//! - [`resolve_parameters`] merges path, query and body parameters of one operation
//!
//! Local `$ref`s (`#/components/...`) are followed for schemas, parameters and
//! request bodies. External references are not resolved.

mod build;
mod load;
mod params;
mod types;

pub use build::*;
pub use load::*;
pub use params::*;
pub use types::*;
