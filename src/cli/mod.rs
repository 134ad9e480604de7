//! # CLI Module
//!
//! Command-line interface for the `toolgen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate one tools module per spec file:
//!
//! ```bash
//! toolgen generate --input specs --output generated
//! ```
//!
//! Options:
//! - `--input <DIR>` - Spec directory (default: `specs`, env `TOOLGEN_INPUT_DIR`)
//! - `--output <DIR>` - Artifact directory (default: `generated`, env `TOOLGEN_OUTPUT_DIR`)
//! - `--base-url <URL>` - Override every spec's `servers[0].url` (env `TOOLGEN_BASE_URL`)
//! - `--jobs <N>` - Worker threads (env `TOOLGEN_JOBS`)
//! - `--dry-run` - Render and compare without writing
//! - `--report <FILE>` - Write the generation report as JSON
//! - `--config <FILE>` - YAML configuration file
//!
//! The exit status is non-zero when any spec file cannot be read, parsed or
//! written. Skipped operations, dropped parameters and name collisions are
//! warnings only.
//!
//! ### `inspect`
//!
//! List the tools a single spec resolves to:
//!
//! ```bash
//! toolgen inspect --spec specs/petstore.yaml
//! toolgen inspect --spec specs/petstore.yaml --json
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use openapi_toolgen::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let code = run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{format_tool_listing, run_cli, Cli, Commands};
