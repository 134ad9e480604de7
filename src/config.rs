//! # Generator Configuration
//!
//! Settings for one `toolgen generate` run, layered from lowest to highest
//! precedence:
//!
//! 1. Built-in defaults (`specs/` in, `generated/` out)
//! 2. A YAML file passed with `--config`
//! 3. Environment variables (`TOOLGEN_INPUT_DIR`, `TOOLGEN_OUTPUT_DIR`,
//!    `TOOLGEN_BASE_URL`, `TOOLGEN_JOBS`)
//! 4. Command-line flags
//!
//! Layers 3 and 4 are both read by clap and arrive here as one
//! [`ConfigOverrides`] value.
//!
//! ## Example
//!
//! ```yaml
//! input_dir: api/specs
//! output_dir: server/tools
//! base_url: https://staging.example.com/v1
//! jobs: 4
//! report_path: build/toolgen-report.json
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory scanned for `*.yaml`, `*.yml` and `*.json` specs
    pub input_dir: PathBuf,
    /// Directory receiving one `generated_<stem>_tools.py` per spec
    pub output_dir: PathBuf,
    /// Overrides each document's `servers[0].url`
    pub base_url: Option<String>,
    /// Worker threads; `None` uses the available parallelism
    pub jobs: Option<usize>,
    /// Render and compare, but write nothing
    pub dry_run: bool,
    /// Where to write the JSON generation report
    pub report_path: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("specs"),
            output_dir: PathBuf::from("generated"),
            base_url: None,
            jobs: None,
            dry_run: false,
            report_path: None,
        }
    }
}

/// Values supplied through the environment or the command line.
///
/// `None` (or `false`) leaves the lower layer untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub jobs: Option<usize>,
    pub dry_run: bool,
    pub report_path: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Load a configuration file; keys that are absent keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid configuration.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration YAML. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid YAML or unknown keys.
    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Resolve the effective configuration: defaults, then the optional file,
    /// then `overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config_file` is given and cannot be loaded, or if
    /// the result asks for zero worker threads.
    pub fn resolve(config_file: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply higher-precedence values on top of this configuration.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.input_dir {
            self.input_dir = dir.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(url) = &overrides.base_url {
            self.base_url = Some(url.clone());
        }
        if let Some(jobs) = overrides.jobs {
            self.jobs = Some(jobs);
        }
        if overrides.dry_run {
            self.dry_run = true;
        }
        if let Some(path) = &overrides.report_path {
            self.report_path = Some(path.clone());
        }
    }

    /// # Errors
    ///
    /// Returns an error if `jobs` is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jobs == Some(0) {
            anyhow::bail!("jobs must be at least 1");
        }
        Ok(())
    }
}
