use clap::Parser;
use openapi_toolgen::cli::{run_cli, Cli};
use openapi_toolgen::logging::init_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging() {
        eprintln!("Warning: {err:#}");
    }
    match run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
