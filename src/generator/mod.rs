//! # Generator Module
//!
//! Turns OpenAPI documents into Python tool modules that an MCP host server
//! can load.
//!
//! ## Overview
//!
//! Each spec file in the input directory becomes one artifact,
//! `generated_<stem>_tools.py`, containing:
//! - **Tool functions** - one `async def` per operation, calling the API with `httpx`
//! - **`TOOL_HANDLERS`** - tool name → adapter taking the call's arguments dict
//! - **`TOOL_SCHEMAS`** - tool name → JSON input schema
//! - **`TOOL_DESCRIPTIONS`** - tool name → description
//!
//! ## Architecture
//!
//! The generator uses an Askama template to produce the Python module:
//!
//! ```text
//! Spec files → load → build tools → render → artifacts
//! ```
//!
//! 1. **Discovery** - [`discover_specs`] lists specs sorted by file name and
//!    [`plan_artifacts`] assigns each a distinct artifact name
//! 2. **Build** - [`crate::spec::build_tools`] validates operations and resolves parameters
//! 3. **Render** - [`render_tools_module`] fills `templates/tools.py.txt`
//! 4. **Write** - artifacts whose content is unchanged are left alone
//!
//! Files are processed in parallel on a rayon pool; their reports are merged in
//! discovery order, so output never depends on scheduling.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use openapi_toolgen::config::GeneratorConfig;
//! use openapi_toolgen::generator::generate;
//!
//! let report = generate(&GeneratorConfig::default())?;
//! report.log();
//! ```
//!
//! ## Type Mapping
//!
//! | Schema                | Python hint      |
//! |-----------------------|------------------|
//! | `string`              | `str`            |
//! | `integer`             | `int`            |
//! | `number`              | `float`          |
//! | `boolean`             | `bool`           |
//! | `array` of `T`        | `List[T]`        |
//! | `object`              | `Dict[str, Any]` |
//! | missing / unknown     | `Any`            |
//!
//! Optional and nullable parameters are wrapped in `Optional[...]`.

mod driver;
mod schema;
mod templates;

pub use driver::*;
pub use schema::*;
pub use templates::*;
