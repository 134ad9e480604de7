#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixtures::{BROKEN, MISSING_ID, PETSTORE};
use common::temp_files::Workspace;
use std::fs;
use std::process::{Command, Output};

const TOOLGEN_ENV: &[&str] = &[
    "TOOLGEN_INPUT_DIR",
    "TOOLGEN_OUTPUT_DIR",
    "TOOLGEN_BASE_URL",
    "TOOLGEN_JOBS",
];

/// A toolgen command running inside `ws`, isolated from the caller's environment.
fn toolgen(ws: &Workspace) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_toolgen"));
    cmd.current_dir(ws.root()).env("RUST_LOG", "warn");
    for var in TOOLGEN_ENV {
        cmd.env_remove(var);
    }
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("run toolgen")
}

#[test]
fn test_cli_generate_with_defaults() {
    let ws = Workspace::new();
    ws.add_spec("petstore.yaml", PETSTORE);

    let out = run(toolgen(&ws).arg("generate"));
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(ws.artifact("generated_petstore_tools.py").contains("async def list_pets("));
}

#[test]
fn test_cli_generate_explicit_dirs() {
    let ws = Workspace::new();
    ws.add_spec("petstore.yaml", PETSTORE);
    let out_dir = ws.root().join("server").join("tools");

    let out = run(toolgen(&ws)
        .arg("generate")
        .arg("--input")
        .arg(ws.input_dir())
        .arg("--output")
        .arg(&out_dir));
    assert!(out.status.success());
    assert!(out_dir.join("generated_petstore_tools.py").exists());
}

#[test]
fn test_cli_output_dir_from_env() {
    let ws = Workspace::new();
    ws.add_spec("partial.yaml", MISSING_ID);

    let out = run(toolgen(&ws)
        .env("TOOLGEN_OUTPUT_DIR", "from_env")
        .arg("generate"));
    assert!(out.status.success());
    assert!(ws.root().join("from_env").join("generated_partial_tools.py").exists());
    assert!(!ws.artifact_exists("generated_partial_tools.py"));
}

#[test]
fn test_cli_flag_beats_config_file() {
    let ws = Workspace::new();
    ws.add_spec("petstore.yaml", PETSTORE);
    let config = ws.root().join("toolgen.yaml");
    fs::write(
        &config,
        "output_dir: configured\nbase_url: http://configured.test\n",
    )
    .unwrap();

    let out = run(toolgen(&ws)
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .arg("--base-url")
        .arg("http://flag.test"));
    assert!(out.status.success());
    let module =
        fs::read_to_string(ws.root().join("configured").join("generated_petstore_tools.py"))
            .unwrap();
    assert!(module.contains("BASE_URL = \"http://flag.test\""));
}

#[test]
fn test_cli_invalid_config_fails() {
    let ws = Workspace::new();
    let config = ws.root().join("toolgen.yaml");
    fs::write(&config, "output: typo\n").unwrap();

    let out = run(toolgen(&ws).arg("generate").arg("-c").arg(&config));
    assert!(!out.status.success());
}

#[test]
fn test_cli_broken_spec_exits_nonzero() {
    let ws = Workspace::new();
    ws.add_spec("broken.yaml", BROKEN);
    ws.add_spec("petstore.yaml", PETSTORE);

    let out = run(toolgen(&ws).arg("generate"));
    assert!(!out.status.success());
    assert!(ws.artifact_exists("generated_petstore_tools.py"));
}

#[test]
fn test_cli_skipped_operation_still_succeeds() {
    let ws = Workspace::new();
    ws.add_spec("partial.yaml", MISSING_ID);

    let out = run(toolgen(&ws).arg("generate"));
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Skipped operation"), "stderr: {stderr}");
}

#[test]
fn test_cli_missing_input_dir_fails() {
    let ws = Workspace::new();
    let out = run(toolgen(&ws).arg("generate").arg("-i").arg("does_not_exist"));
    assert!(!out.status.success());
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let ws = Workspace::new();
    ws.add_spec("petstore.yaml", PETSTORE);

    let out = run(toolgen(&ws).arg("generate").arg("--dry-run"));
    assert!(out.status.success());
    assert!(!ws.output_dir().exists());
}

#[test]
fn test_cli_report_file() {
    let ws = Workspace::new();
    ws.add_spec("petstore.yaml", PETSTORE);

    let out = run(toolgen(&ws).arg("generate").arg("--report").arg("report.json"));
    assert!(out.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ws.root().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(json["generated_tools"], 3);
}

#[test]
fn test_cli_inspect_listing() {
    let ws = Workspace::new();
    let spec = ws.add_spec("petstore.yaml", PETSTORE);

    let out = run(toolgen(&ws).arg("inspect").arg("--spec").arg(&spec));
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("list_pets (GET /pets)\n"));
    assert!(stdout.contains("    tag: str [query, required]\n"));
    assert!(stdout.contains("    limit: int [query]\n"));
    assert!(!ws.output_dir().exists());
}

#[test]
fn test_cli_inspect_json() {
    let ws = Workspace::new();
    let spec = ws.add_spec("petstore.yaml", PETSTORE);

    let out = run(toolgen(&ws).arg("inspect").arg("-s").arg(&spec).arg("--json"));
    assert!(out.status.success());
    let tools: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<&str> = tools
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["list_pets", "create_pet", "show_pet_by_id"]);
}

#[test]
fn test_cli_inspect_unreadable_spec_fails() {
    let ws = Workspace::new();
    let out = run(toolgen(&ws).arg("inspect").arg("-s").arg("missing.yaml"));
    assert!(!out.status.success());
}
