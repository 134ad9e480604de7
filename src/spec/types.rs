use crate::generator::SemanticType;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Maximum number of `$ref` hops followed before a reference is treated as unresolvable.
pub const MAX_REF_DEPTH: usize = 16;

/// HTTP methods that can carry an operation inside a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Map a path item key to a method; keys such as `parameters` or `x-*` return `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is declared in the source document (`in:`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

/// Where a resolved parameter is sent when the tool is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLocation {
    Path,
    Query,
    Body,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Path => write!(f, "path"),
            SourceLocation::Query => write!(f, "query"),
            SourceLocation::Body => write!(f, "body"),
        }
    }
}

/// A parsed specification document.
///
/// Keeps the raw document so local `$ref`s can be resolved by JSON pointer, and
/// the path items in the order they were authored.
#[derive(Debug, Clone)]
pub struct SpecificationDocument {
    /// File name the document was loaded from (e.g. `petstore.yaml`)
    pub source: String,
    /// `info.title`, if present
    pub title: Option<String>,
    /// First `servers[].url`, if present
    pub base_url: Option<String>,
    /// Path items in document order
    pub paths: Vec<PathItem>,
    root: Value,
}

impl SpecificationDocument {
    pub(crate) fn new(
        source: String,
        title: Option<String>,
        base_url: Option<String>,
        paths: Vec<PathItem>,
        root: Value,
    ) -> Self {
        Self {
            source,
            title,
            base_url,
            paths,
            root,
        }
    }

    /// Follow local `$ref` chains (`#/components/...`) starting at `value`.
    ///
    /// Returns `value` itself when it is not a reference, and `None` when a
    /// reference is external, dangling, or exceeds [`MAX_REF_DEPTH`] hops.
    #[must_use]
    pub fn resolve<'a>(&'a self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for _ in 0..MAX_REF_DEPTH {
            match current.get("$ref").and_then(Value::as_str) {
                Some(reference) => {
                    let pointer = reference.strip_prefix('#')?;
                    current = self.root.pointer(pointer)?;
                }
                None => return Some(current),
            }
        }
        None
    }

    /// Total number of operations across all path items.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|p| p.operations.len()).sum()
    }
}

/// One entry of `paths`.
#[derive(Debug, Clone)]
pub struct PathItem {
    pub path: String,
    /// Path-level `parameters`, shared by every operation of the item
    pub parameters: Option<Value>,
    /// Operations in document order
    pub operations: Vec<RawOperation>,
}

/// An operation as authored, before validation.
#[derive(Debug, Clone)]
pub struct RawOperation {
    pub method: HttpMethod,
    pub body: Value,
}

/// A validated operation (one path × method).
#[derive(Debug, Clone)]
pub struct Operation {
    pub operation_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub parameters: Vec<ParameterSpec>,
    pub request_body: Option<RequestBodySpec>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
}

/// A declared path/query/header/cookie parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Value>,
    pub description: Option<String>,
}

/// A declared request body.
#[derive(Debug, Clone)]
pub struct RequestBodySpec {
    pub required: bool,
    /// Every media type listed under `content`, in document order
    pub content_types: Vec<String>,
    pub content: BodyContent,
}

/// What the generator can do with a request body.
#[derive(Debug, Clone)]
pub enum BodyContent {
    /// JSON body with an object schema; properties become parameters
    JsonObject {
        media_type: String,
        properties: Vec<(String, Value)>,
        required: BTreeSet<String>,
    },
    /// JSON body whose schema is not an object
    JsonOther { media_type: String },
    /// No JSON media type offered
    Unsupported,
}

/// A parameter resolved into its renderable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterModel {
    /// Canonical `snake_case` name used in the generated signature
    pub name: String,
    /// Name as authored; used as the wire key
    pub wire_name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    pub nullable: bool,
    pub required: bool,
    pub location: SourceLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Identifies the operation a tool (or a report entry) came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationRef {
    pub source: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

impl fmt::Display for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.source, self.method, self.path)?;
        if let Some(id) = &self.operation_id {
            write!(f, " ({id})")?;
        }
        Ok(())
    }
}

/// The render-ready form of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    /// Canonical function name
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    /// Required parameters first, source order kept within each group
    pub parameters: Vec<ParameterModel>,
    pub docstring: String,
    /// Short description used in the tool registry
    pub description: String,
    pub origin: OperationRef,
}
