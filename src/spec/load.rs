use super::types::{HttpMethod, PathItem, RawOperation, SpecificationDocument};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// Serialization format of a specification file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SpecFormat::Json,
            _ => SpecFormat::Yaml,
        }
    }
}

/// A specification file that could not be turned into a [`SpecificationDocument`].
///
/// This is the only failure that aborts generation for a file.
#[derive(Debug)]
pub enum SpecError {
    /// The file could not be read
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid YAML/JSON
    Parse { path: PathBuf, message: String },
    /// The document root is not a mapping
    NotAMapping { path: PathBuf },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::Read { path, source } => {
                write!(f, "failed to read spec file {}: {}", path.display(), source)
            }
            SpecError::Parse { path, message } => {
                write!(f, "failed to parse spec file {}: {}", path.display(), message)
            }
            SpecError::NotAMapping { path } => {
                write!(
                    f,
                    "spec file {} does not contain a mapping at its root",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SpecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpecError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Load and parse a specification file.
///
/// # Errors
///
/// Returns a [`SpecError`] if the file cannot be read, is not valid
/// YAML/JSON, or its root is not a mapping.
pub fn load_spec(path: &Path) -> Result<SpecificationDocument, SpecError> {
    let content = std::fs::read_to_string(path).map_err(|source| SpecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_spec(&content, SpecFormat::from_path(path), path)
}

/// Parse specification text that was read from `path`.
///
/// # Errors
///
/// Returns a [`SpecError`] if the content is not valid YAML/JSON or its root
/// is not a mapping.
pub fn parse_spec(
    content: &str,
    format: SpecFormat,
    path: &Path,
) -> Result<SpecificationDocument, SpecError> {
    let parse_err = |message: String| SpecError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let root: Value = match format {
        SpecFormat::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        SpecFormat::Yaml => {
            let mut yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            // `<<: *anchor` keys are plain mapping entries until merged
            yaml.apply_merge().map_err(|e| parse_err(e.to_string()))?;
            yaml_to_json(yaml)
        }
    };

    if !root.is_object() {
        return Err(SpecError::NotAMapping {
            path: path.to_path_buf(),
        });
    }

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let title = root
        .pointer("/info/title")
        .and_then(Value::as_str)
        .map(str::to_string);
    let base_url = root
        .pointer("/servers/0/url")
        .and_then(Value::as_str)
        .map(str::to_string);
    let paths = collect_paths(&root);

    Ok(SpecificationDocument::new(
        source, title, base_url, paths, root,
    ))
}

/// Split `paths` into path items, keeping only HTTP method keys as operations.
fn collect_paths(root: &Value) -> Vec<PathItem> {
    let Some(paths) = root.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };
    paths
        .iter()
        .filter_map(|(path, item)| {
            let item = item.as_object()?;
            let operations = item
                .iter()
                .filter_map(|(key, body)| {
                    HttpMethod::from_key(key).map(|method| RawOperation {
                        method,
                        body: body.clone(),
                    })
                })
                .collect();
            Some(PathItem {
                path: path.clone(),
                parameters: item.get("parameters").cloned(),
                operations,
            })
        })
        .collect()
}

/// Convert a YAML value into JSON, keeping mapping order.
///
/// Unquoted response codes such as `200:` are YAML integers; non-string keys
/// are stringified so they survive the conversion.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, val) in mapping {
                map.insert(yaml_key(key), yaml_to_json(val));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
