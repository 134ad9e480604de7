//! # Generation Report
//!
//! Everything a run recovered from instead of failing on: skipped operations,
//! dropped request bodies and parameters, and naming collisions. Each spec file
//! produces its own [`GenerationReport`]; the driver merges them in discovery
//! order, so no report state is shared between workers.

use crate::spec::{OperationRef, ParameterLocation, SourceLocation};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why an operation produced no tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No `operationId`, or an empty one
    MissingOperationId,
    /// The `operationId` has no letters or ASCII digits
    EmptyCanonicalName { operation_id: String },
    /// The operation is not a mapping
    MalformedOperation,
    /// A parameter could not be resolved into a name and location
    UnresolvableParameter { detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingOperationId => write!(f, "missing operationId"),
            SkipReason::EmptyCanonicalName { operation_id } => {
                write!(f, "operationId '{operation_id}' normalizes to an empty name")
            }
            SkipReason::MalformedOperation => write!(f, "operation is not a mapping"),
            SkipReason::UnresolvableParameter { detail } => {
                write!(f, "unresolvable parameter: {detail}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedOperation {
    pub operation: OperationRef,
    pub reason: SkipReason,
}

/// Why a request body contributed no parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyDropReason {
    /// None of the offered content types is JSON
    UnsupportedContentType { content_types: Vec<String> },
    /// The JSON schema is not an object, so there are no properties to expand
    NonObjectSchema { media_type: String },
    /// `requestBody` is a dangling `$ref` or not a mapping
    Unresolvable,
}

impl fmt::Display for BodyDropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyDropReason::UnsupportedContentType { content_types } if content_types.is_empty() => {
                write!(f, "request body declares no content")
            }
            BodyDropReason::UnsupportedContentType { content_types } => {
                write!(f, "unsupported content type(s): {}", content_types.join(", "))
            }
            BodyDropReason::NonObjectSchema { media_type } => {
                write!(f, "{media_type} body schema is not an object")
            }
            BodyDropReason::Unresolvable => write!(f, "request body could not be resolved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedBody {
    pub operation: OperationRef,
    pub reason: BodyDropReason,
}

/// Why a single parameter was left out of a generated tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterDropReason {
    /// Another parameter already claimed the canonical name
    Collision {
        canonical: String,
        kept: String,
        kept_location: SourceLocation,
    },
    /// Header and cookie parameters are not part of the tool signature
    UnsupportedLocation { location: ParameterLocation },
}

impl fmt::Display for ParameterDropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterDropReason::Collision {
                canonical,
                kept,
                kept_location,
            } => write!(
                f,
                "canonical name '{canonical}' already taken by {kept_location} parameter '{kept}'"
            ),
            ParameterDropReason::UnsupportedLocation { location } => {
                write!(f, "{location} parameters are not supported")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedParameter {
    pub operation: OperationRef,
    /// Parameter name as authored
    pub name: String,
    pub location: String,
    pub reason: ParameterDropReason,
}

/// Two tools that ended up with the same canonical name.
///
/// Both tools are generated; the pair is reported once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    pub name: String,
    pub first: OperationRef,
    pub second: OperationRef,
    pub cross_file: bool,
}

/// Two spec files whose stems map to the same artifact name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactCollision {
    pub artifact: String,
    pub kept: String,
    pub renamed: String,
    pub renamed_to: String,
}

/// A spec file that could not be processed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub source: String,
    pub error: String,
}

/// Accumulated outcome of one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub skipped_operations: Vec<SkippedOperation>,
    pub dropped_bodies: Vec<DroppedBody>,
    pub dropped_parameters: Vec<DroppedParameter>,
    pub name_collisions: Vec<NameCollision>,
    pub artifact_collisions: Vec<ArtifactCollision>,
    pub failed_files: Vec<FailedFile>,
    pub generated_tools: usize,
    /// Artifacts written (or, in a dry run, that would be written)
    pub artifacts_changed: usize,
    pub artifacts_unchanged: usize,
}

impl GenerationReport {
    /// Append another report's entries and add its counts.
    pub fn merge(&mut self, other: GenerationReport) {
        self.skipped_operations.extend(other.skipped_operations);
        self.dropped_bodies.extend(other.dropped_bodies);
        self.dropped_parameters.extend(other.dropped_parameters);
        self.name_collisions.extend(other.name_collisions);
        self.artifact_collisions.extend(other.artifact_collisions);
        self.failed_files.extend(other.failed_files);
        self.generated_tools += other.generated_tools;
        self.artifacts_changed += other.artifacts_changed;
        self.artifacts_unchanged += other.artifacts_unchanged;
    }

    /// A run succeeds when every spec file could be read, parsed and written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_files.is_empty()
    }

    /// Number of recovered anomalies.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.skipped_operations.len()
            + self.dropped_bodies.len()
            + self.dropped_parameters.len()
            + self.name_collisions.len()
            + self.artifact_collisions.len()
    }

    /// Emit one warning per recovered anomaly and a summary line.
    ///
    /// Failed files are logged by the driver as they happen.
    pub fn log(&self) {
        for s in &self.skipped_operations {
            tracing::warn!(operation = %s.operation, reason = %s.reason, "Skipped operation");
        }
        for d in &self.dropped_bodies {
            tracing::warn!(operation = %d.operation, reason = %d.reason, "Dropped request body");
        }
        for p in &self.dropped_parameters {
            tracing::warn!(
                operation = %p.operation,
                parameter = %p.name,
                location = %p.location,
                reason = %p.reason,
                "Dropped parameter"
            );
        }
        for c in &self.name_collisions {
            tracing::warn!(
                name = %c.name,
                first = %c.first,
                second = %c.second,
                cross_file = c.cross_file,
                "Tool name collision"
            );
        }
        for a in &self.artifact_collisions {
            tracing::warn!(
                artifact = %a.artifact,
                kept = %a.kept,
                renamed = %a.renamed,
                renamed_to = %a.renamed_to,
                "Artifact name collision"
            );
        }
        tracing::info!(
            tools = self.generated_tools,
            changed = self.artifacts_changed,
            unchanged = self.artifacts_unchanged,
            warnings = self.warning_count(),
            failed_files = self.failed_files.len(),
            "Generation finished"
        );
    }
}

/// Find every pair of tools sharing a canonical name.
///
/// `tools` is `(canonical name, origin)` in generation order. Each colliding
/// pair is reported exactly once, earlier tool first; entries are ordered by name.
#[must_use]
pub fn find_name_collisions(tools: &[(String, OperationRef)]) -> Vec<NameCollision> {
    let mut by_name: BTreeMap<&str, Vec<&OperationRef>> = BTreeMap::new();
    for (name, origin) in tools {
        by_name.entry(name.as_str()).or_default().push(origin);
    }

    let mut collisions = Vec::new();
    for (name, origins) in by_name {
        for (i, first) in origins.iter().enumerate() {
            for second in &origins[i + 1..] {
                collisions.push(NameCollision {
                    name: name.to_string(),
                    first: (*first).clone(),
                    second: (*second).clone(),
                    cross_file: first.source != second.source,
                });
            }
        }
    }
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::HttpMethod;

    fn origin(source: &str, path: &str, id: &str) -> OperationRef {
        OperationRef {
            source: source.to_string(),
            method: HttpMethod::Get,
            path: path.to_string(),
            operation_id: Some(id.to_string()),
        }
    }

    #[test]
    fn test_find_name_collisions_once_per_pair() {
        let tools = vec![
            ("get_item".to_string(), origin("a.yaml", "/items/{id}", "getItem")),
            ("list_items".to_string(), origin("a.yaml", "/items", "listItems")),
            ("get_item".to_string(), origin("a.yaml", "/item/{id}", "get_item")),
        ];
        let collisions = find_name_collisions(&tools);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].name, "get_item");
        assert_eq!(collisions[0].first.operation_id.as_deref(), Some("getItem"));
        assert_eq!(collisions[0].second.operation_id.as_deref(), Some("get_item"));
        assert!(!collisions[0].cross_file);
    }

    #[test]
    fn test_find_name_collisions_three_way_and_cross_file() {
        let tools = vec![
            ("ping".to_string(), origin("a.yaml", "/ping", "ping")),
            ("ping".to_string(), origin("b.yaml", "/ping", "ping")),
            ("ping".to_string(), origin("c.yaml", "/ping", "Ping")),
        ];
        let collisions = find_name_collisions(&tools);
        assert_eq!(collisions.len(), 3);
        assert!(collisions.iter().all(|c| c.cross_file));
    }

    #[test]
    fn test_merge_and_counts() {
        let mut a = GenerationReport {
            generated_tools: 2,
            artifacts_changed: 1,
            ..Default::default()
        };
        let b = GenerationReport {
            generated_tools: 3,
            artifacts_unchanged: 1,
            skipped_operations: vec![SkippedOperation {
                operation: origin("b.yaml", "/x", "x"),
                reason: SkipReason::MissingOperationId,
            }],
            failed_files: vec![FailedFile {
                source: "c.yaml".to_string(),
                error: "boom".to_string(),
            }],
            ..Default::default()
        };
        a.merge(b);
        assert_eq!(a.generated_tools, 5);
        assert_eq!(a.artifacts_changed, 1);
        assert_eq!(a.artifacts_unchanged, 1);
        assert_eq!(a.warning_count(), 1);
        assert!(!a.is_success());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(SkipReason::MissingOperationId.to_string(), "missing operationId");
        let body = BodyDropReason::UnsupportedContentType {
            content_types: vec!["multipart/form-data".to_string()],
        };
        assert_eq!(
            body.to_string(),
            "unsupported content type(s): multipart/form-data"
        );
    }
}
