use anyhow::Context;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::templates::{render_tools_module, ModuleHeader};
use crate::config::GeneratorConfig;
use crate::naming::to_snake_case;
use crate::report::{find_name_collisions, ArtifactCollision, FailedFile, GenerationReport};
use crate::spec::{build_tools, load_spec, OperationRef, SpecificationDocument, ToolDefinition};

const SPEC_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// A discovered spec file and the artifact it will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecInput {
    pub path: PathBuf,
    /// Artifact file name inside the output directory
    pub artifact: String,
}

/// What processing one spec file produced.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub report: GenerationReport,
    /// `(canonical name, origin)` of every generated tool, for collision checks
    pub tools: Vec<(String, OperationRef)>,
}

impl FileOutcome {
    /// Forget the tools of a file whose artifact was never written.
    fn discard_tools(&mut self) {
        self.tools.clear();
        self.report.generated_tools = 0;
    }
}

/// List spec files directly inside `input_dir`, sorted by file name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn discover_specs(input_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input directory: {}", input_dir.display()))?;
    let mut specs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read input directory: {}", input_dir.display()))?
            .path();
        if path.is_file() && has_spec_extension(&path) {
            specs.push(path);
        }
    }
    specs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(specs)
}

fn has_spec_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SPEC_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

fn stem_of(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| to_snake_case(&s.to_string_lossy()))
        .unwrap_or_default();
    if stem.is_empty() {
        "spec".to_string()
    } else {
        stem
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Artifact file name for a spec file: `generated_<normalized stem>_tools.py`.
#[must_use]
pub fn artifact_name(spec_path: &Path) -> String {
    format!("generated_{}_tools.py", stem_of(spec_path))
}

/// Assign every spec a distinct artifact name, in the given order.
///
/// When a name is already taken, the extension is appended to the stem, then a
/// numeric suffix until the name is free. Each rename is reported.
#[must_use]
pub fn plan_artifacts(paths: &[PathBuf]) -> (Vec<SpecInput>, Vec<ArtifactCollision>) {
    let mut owners: BTreeMap<String, String> = BTreeMap::new();
    let mut inputs = Vec::with_capacity(paths.len());
    let mut collisions = Vec::new();

    for path in paths {
        let source = file_name_of(path);
        let preferred = artifact_name(path);
        let artifact = match owners.get(&preferred) {
            None => preferred,
            Some(kept) => {
                let ext = path
                    .extension()
                    .map(|e| to_snake_case(&e.to_string_lossy()))
                    .unwrap_or_default();
                let base = format!("{}_{ext}", stem_of(path));
                let mut candidate = format!("generated_{base}_tools.py");
                let mut n = 2;
                while owners.contains_key(&candidate) {
                    candidate = format!("generated_{base}_{n}_tools.py");
                    n += 1;
                }
                collisions.push(ArtifactCollision {
                    artifact: preferred,
                    kept: kept.clone(),
                    renamed: source.clone(),
                    renamed_to: candidate.clone(),
                });
                candidate
            }
        };
        owners.insert(artifact.clone(), source);
        inputs.push(SpecInput {
            path: path.clone(),
            artifact,
        });
    }
    (inputs, collisions)
}

/// Header data for a document; `base_url_override` wins over `servers[0].url`.
#[must_use]
pub fn module_header(doc: &SpecificationDocument, spec_path: &Path, base_url_override: Option<&str>) -> ModuleHeader {
    let title = doc.title.clone().unwrap_or_else(|| {
        spec_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| doc.source.clone())
    });
    ModuleHeader {
        source: doc.source.clone(),
        title,
        base_url: base_url_override
            .map(str::to_string)
            .or_else(|| doc.base_url.clone())
            .unwrap_or_default(),
    }
}

/// Load, build, render and write one spec file.
///
/// Never fails: read, parse, render and write errors are recorded as a failed file.
pub fn process_spec(input: &SpecInput, config: &GeneratorConfig) -> FileOutcome {
    let mut outcome = FileOutcome::default();
    let source = file_name_of(&input.path);
    let fail = |outcome: &mut FileOutcome, error: String| {
        tracing::error!(source = %source, error = %error, "Spec file failed");
        outcome.report.failed_files.push(FailedFile {
            source: source.clone(),
            error,
        });
    };

    let doc = match load_spec(&input.path) {
        Ok(doc) => doc,
        Err(err) => {
            fail(&mut outcome, err.to_string());
            return outcome;
        }
    };

    let (tools, report) = build_tools(&doc);
    outcome.report = report;
    outcome.tools = tools
        .iter()
        .map(|t| (t.name.clone(), t.origin.clone()))
        .collect();

    let header = module_header(&doc, &input.path, config.base_url.as_deref());
    let rendered = match render_tools_module(&header, &tools) {
        Ok(text) => text,
        Err(err) => {
            fail(&mut outcome, format!("failed to render {}: {err}", input.artifact));
            outcome.discard_tools();
            return outcome;
        }
    };

    let target = config.output_dir.join(&input.artifact);
    if fs::read_to_string(&target).is_ok_and(|existing| existing == rendered) {
        tracing::info!(artifact = %target.display(), tools = tools.len(), "Artifact unchanged");
        outcome.report.artifacts_unchanged += 1;
        return outcome;
    }

    if config.dry_run {
        tracing::info!(artifact = %target.display(), tools = tools.len(), "Would write artifact");
    } else if let Err(err) = fs::write(&target, &rendered) {
        fail(&mut outcome, format!("failed to write {}: {err}", target.display()));
        outcome.discard_tools();
        return outcome;
    } else {
        tracing::info!(artifact = %target.display(), tools = tools.len(), "Wrote artifact");
    }
    outcome.report.artifacts_changed += 1;
    outcome
}

/// Run the generator over every spec in `config.input_dir`.
///
/// Files are processed on a rayon pool; per-file reports are merged in
/// discovery order, then tool-name collisions are detected across all files.
///
/// # Errors
///
/// Returns an error only when the run cannot start: the input directory is
/// unreadable, the output directory cannot be created, the thread pool cannot
/// be built, or the report file cannot be written. Per-file failures are in
/// the returned report.
pub fn generate(config: &GeneratorConfig) -> anyhow::Result<GenerationReport> {
    if !config.input_dir.is_dir() {
        anyhow::bail!(
            "Input directory does not exist: {}",
            config.input_dir.display()
        );
    }
    let specs = discover_specs(&config.input_dir)?;
    if specs.is_empty() {
        tracing::warn!(input = %config.input_dir.display(), "No spec files found");
    }
    if !config.dry_run {
        fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                config.output_dir.display()
            )
        })?;
    }

    let (inputs, artifact_collisions) = plan_artifacts(&specs);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.unwrap_or(0))
        .build()
        .context("Failed to build worker pool")?;
    let outcomes: Vec<FileOutcome> =
        pool.install(|| inputs.par_iter().map(|input| process_spec(input, config)).collect());

    let mut report = GenerationReport {
        artifact_collisions,
        ..Default::default()
    };
    let mut names = Vec::new();
    for outcome in outcomes {
        report.merge(outcome.report);
        names.extend(outcome.tools);
    }
    report.name_collisions = find_name_collisions(&names);

    if let Some(path) = &config.report_path {
        write_report(&report, path)?;
    }
    Ok(report)
}

/// Write `report` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_report(report: &GenerationReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    tracing::info!(report = %path.display(), "Wrote generation report");
    Ok(())
}

/// Load one spec and build its tools without writing anything.
///
/// # Errors
///
/// Returns an error if the spec cannot be read or parsed.
pub fn inspect_spec(path: &Path) -> anyhow::Result<(Vec<ToolDefinition>, GenerationReport)> {
    let doc = load_spec(path)?;
    Ok(build_tools(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/specs").join(n)).collect()
    }

    #[test]
    fn test_artifact_name_normalizes_stem() {
        assert_eq!(artifact_name(Path::new("specs/Pet-Store.yaml")), "generated_pet_store_tools.py");
        assert_eq!(artifact_name(Path::new("n8nAPI.json")), "generated_n_8_n_api_tools.py");
        assert_eq!(artifact_name(Path::new("---.yaml")), "generated_spec_tools.py");
    }

    #[test]
    fn test_plan_artifacts_renames_clashes() {
        let (inputs, collisions) = plan_artifacts(&paths(&["api.json", "api.yaml", "API.yml"]));
        let artifacts: Vec<&str> = inputs.iter().map(|i| i.artifact.as_str()).collect();
        assert_eq!(
            artifacts,
            vec![
                "generated_api_tools.py",
                "generated_api_yaml_tools.py",
                "generated_api_yml_tools.py",
            ]
        );
        assert_eq!(collisions.len(), 2);
        assert_eq!(collisions[0].kept, "api.json");
        assert_eq!(collisions[0].renamed, "api.yaml");
    }

    #[test]
    fn test_plan_artifacts_numeric_suffix() {
        let (inputs, collisions) =
            plan_artifacts(&paths(&["a_b.yaml", "a-b.yaml", "aB.yaml", "a_b_yaml.yaml"]));
        let artifacts: Vec<&str> = inputs.iter().map(|i| i.artifact.as_str()).collect();
        assert_eq!(
            artifacts,
            vec![
                "generated_a_b_tools.py",
                "generated_a_b_yaml_tools.py",
                "generated_a_b_yaml_2_tools.py",
                "generated_a_b_yaml_yaml_tools.py",
            ]
        );
        assert_eq!(collisions.len(), 3);
        assert_eq!(collisions[2].kept, "a-b.yaml");
    }

    #[test]
    fn test_plan_artifacts_no_clash() {
        let (inputs, collisions) = plan_artifacts(&paths(&["a.yaml", "b.yaml"]));
        assert_eq!(inputs.len(), 2);
        assert!(collisions.is_empty());
    }
}
