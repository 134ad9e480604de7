use crate::config::{ConfigOverrides, GeneratorConfig};
use crate::generator::{generate, inspect_spec};
use crate::spec::ToolDefinition;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line interface for toolgen
///
/// Generates Python tool modules for an MCP host server from OpenAPI specs.
#[derive(Parser)]
#[command(name = "toolgen", version)]
#[command(about = "Generate MCP tool modules from OpenAPI specifications", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available toolgen commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate one tools module per spec file in the input directory
    Generate {
        /// Directory containing *.yaml, *.yml and *.json specs [default: specs]
        #[arg(short, long, env = "TOOLGEN_INPUT_DIR")]
        input: Option<PathBuf>,

        /// Directory receiving generated_<stem>_tools.py files [default: generated]
        #[arg(short, long, env = "TOOLGEN_OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// Base URL baked into every module, overriding servers[0].url
        #[arg(long, env = "TOOLGEN_BASE_URL")]
        base_url: Option<String>,

        /// Number of worker threads [default: available parallelism]
        #[arg(short, long, env = "TOOLGEN_JOBS")]
        jobs: Option<usize>,

        /// Show what would change without writing artifacts
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Write the generation report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// YAML configuration file; flags and environment variables take precedence
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the tools one spec resolves to, without writing anything
    Inspect {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Print the tool definitions as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Execute a parsed command line.
///
/// Returns a failure exit code when any spec file could not be read, parsed
/// or written; recovered anomalies only produce warnings.
///
/// # Errors
///
/// Returns an error when the run cannot start (bad configuration, missing
/// input directory) or, for `inspect`, when the spec cannot be loaded.
pub fn run_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            base_url,
            jobs,
            dry_run,
            report,
            config,
        } => {
            let overrides = ConfigOverrides {
                input_dir: input,
                output_dir: output,
                base_url,
                jobs,
                dry_run,
                report_path: report,
            };
            let config = GeneratorConfig::resolve(config.as_deref(), &overrides)?;
            tracing::info!(
                input = %config.input_dir.display(),
                output = %config.output_dir.display(),
                dry_run = config.dry_run,
                "Generating tools"
            );
            let report = generate(&config)?;
            report.log();
            Ok(if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Inspect { spec, json } => {
            let (tools, report) = inspect_spec(&spec)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tools)?);
            } else {
                print!("{}", format_tool_listing(&tools));
            }
            report.log();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Human-readable listing of tools and their parameters.
#[must_use]
pub fn format_tool_listing(tools: &[ToolDefinition]) -> String {
    let mut out = String::new();
    for tool in tools {
        out.push_str(&format!("{} ({} {})\n", tool.name, tool.method, tool.path));
        for param in &tool.parameters {
            let required = if param.required { ", required" } else { "" };
            out.push_str(&format!(
                "    {}: {} [{}{required}]\n",
                param.name,
                param.ty.python_hint(),
                param.location,
            ));
        }
    }
    out
}
