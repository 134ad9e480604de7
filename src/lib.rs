//! # openapi-toolgen
//!
//! **openapi-toolgen** turns OpenAPI documents into Python tool modules for an
//! MCP host server. Every operation becomes an `async def` that calls the API
//! with `httpx`, registered in `TOOL_HANDLERS`, `TOOL_SCHEMAS` and
//! `TOOL_DESCRIPTIONS`.
//!
//! ## Architecture
//!
//! The library is organized into these modules:
//!
//! - **[`naming`]** - Canonical `snake_case` names for tools and parameters
//! - **[`spec`]** - Loading specs, building tool definitions, resolving parameters
//! - **[`generator`]** - Schema type mapping, Askama rendering and the file driver
//! - **[`report`]** - The generation report: skips, drops and collisions
//! - **[`config`]** - Layered run configuration
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `toolgen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(toolgen)
//!     participant Driver as generator::generate
//!     participant Spec as spec::load_spec
//!     participant Build as spec::build_tools
//!     participant Render as generator::render_tools_module
//!
//!     User->>CLI: toolgen generate --input specs --output generated
//!     CLI->>Driver: GeneratorConfig
//!     loop every spec file (rayon)
//!         Driver->>Spec: load_spec(path)
//!         Spec-->>Driver: SpecificationDocument
//!         Driver->>Build: build_tools(&doc)
//!         Build-->>Driver: ToolDefinitions + GenerationReport
//!         Driver->>Render: render_tools_module(header, tools)
//!         Render-->>Driver: Python module text
//!         Driver->>Driver: write if changed
//!     end
//!     Driver->>Driver: merge reports, find name collisions
//!     Driver-->>CLI: GenerationReport
//!     CLI-->>User: warnings + exit status
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use openapi_toolgen::config::GeneratorConfig;
//! use openapi_toolgen::generator::generate;
//!
//! let config = GeneratorConfig {
//!     input_dir: "specs".into(),
//!     output_dir: "generated".into(),
//!     ..Default::default()
//! };
//! let report = generate(&config)?;
//! assert!(report.is_success());
//! ```
//!
//! ## Determinism
//!
//! Paths and methods are processed in document order, spec files in file-name
//! order, and no hash-ordered map reaches the output. Running the generator
//! twice on the same input produces byte-identical artifacts, and artifacts
//! whose content did not change are not rewritten.

pub mod cli;
pub mod config;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod report;
pub mod spec;

pub use config::GeneratorConfig;
pub use generator::generate;
pub use report::GenerationReport;
pub use spec::{build_tools, load_spec, SpecificationDocument, ToolDefinition};
