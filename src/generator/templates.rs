use askama::Template;
use serde_json::{json, Map, Value};

use crate::naming::python_identifier;
use crate::spec::{ParameterModel, SourceLocation, ToolDefinition};

/// Document-level data printed in a module's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHeader {
    /// Spec file name the module was generated from
    pub source: String,
    /// `info.title`, falling back to the file stem
    pub title: String,
    /// Prefix for every request URL; may be empty
    pub base_url: String,
}

/// One tool, pre-formatted for the module template.
///
/// Every string field is either a Python identifier or a Python literal, so
/// the template never has to escape anything.
#[derive(Debug, Clone)]
pub struct ToolView {
    /// Function name
    pub name: String,
    /// Adapter registered in `TOOL_HANDLERS`; takes the tool call's arguments dict
    pub handler: String,
    /// Registry key (the canonical tool name as a string literal)
    pub key: String,
    /// Signature entries such as `limit: Optional[int] = None`
    pub params: Vec<String>,
    /// Docstring lines, already indented
    pub doc_lines: Vec<String>,
    /// Statements that route each argument into path, query or body
    pub body_lines: Vec<String>,
    /// Path template as a string literal
    pub path: String,
    /// HTTP method as a string literal
    pub method: String,
    /// Input schema as a Python dict literal
    pub schema: String,
    /// Registry description as a string literal
    pub description: String,
}

/// Template for one generated tools module
#[derive(Template)]
#[template(path = "tools.py.txt", escape = "none")]
pub struct ToolsModuleTemplate {
    pub title: String,
    pub source: String,
    /// `BASE_URL` as a string literal
    pub base_url: String,
    pub tools: Vec<ToolView>,
}

const INDENT: &str = "    ";

/// Render the tools module for one spec file.
///
/// Output depends only on `header` and `tools`, so unchanged input renders
/// byte-identical text. The result always ends with a newline.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn render_tools_module(header: &ModuleHeader, tools: &[ToolDefinition]) -> anyhow::Result<String> {
    let mut rendered = ToolsModuleTemplate {
        title: docstring_text(&header.title),
        source: docstring_text(&header.source),
        base_url: string_literal(header.base_url.trim_end_matches('/')),
        tools: tools.iter().map(tool_view).collect(),
    }
    .render()?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Build the template view of a tool.
#[must_use]
pub fn tool_view(tool: &ToolDefinition) -> ToolView {
    let name = python_identifier(&tool.name);
    ToolView {
        handler: format!("_call_{name}"),
        name,
        key: string_literal(&tool.name),
        params: tool.parameters.iter().map(signature_entry).collect(),
        doc_lines: doc_lines(tool),
        body_lines: tool.parameters.iter().map(routing_statement).collect(),
        path: string_literal(&tool.path),
        method: string_literal(tool.method.as_str()),
        schema: python_literal(&input_schema(tool), 1),
        description: string_literal(&tool.description),
    }
}

/// Python hint for a parameter as it appears in the signature.
fn signature_hint(param: &ParameterModel) -> String {
    let hint = param.ty.python_hint();
    if param.nullable || !param.required {
        format!("Optional[{hint}]")
    } else {
        hint
    }
}

fn signature_entry(param: &ParameterModel) -> String {
    let ident = python_identifier(&param.name);
    let hint = signature_hint(param);
    if param.required {
        format!("{ident}: {hint}")
    } else {
        format!("{ident}: {hint} = None")
    }
}

fn routing_statement(param: &ParameterModel) -> String {
    let ident = python_identifier(&param.name);
    let target = match param.location {
        SourceLocation::Path => "_path_params",
        SourceLocation::Query => "_query",
        SourceLocation::Body => "_body",
    };
    let assign = format!("{target}[{}] = {ident}", string_literal(&param.wire_name));
    if param.required {
        format!("{INDENT}{assign}")
    } else {
        format!("{INDENT}if {ident} is not None:\n{INDENT}{INDENT}{assign}")
    }
}

fn doc_lines(tool: &ToolDefinition) -> Vec<String> {
    let mut lines: Vec<String> = tool
        .docstring
        .lines()
        .map(|line| indented(1, &escape_docstring(line.trim_end())))
        .collect();

    if !tool.parameters.is_empty() {
        lines.push(String::new());
        lines.push(indented(1, "Args:"));
        for param in &tool.parameters {
            let mut entry = format!(
                "{} ({})",
                python_identifier(&param.name),
                signature_hint(param)
            );
            if let Some(description) = &param.description {
                let text = docstring_text(description);
                if !text.is_empty() {
                    entry.push_str(": ");
                    entry.push_str(&text);
                }
            }
            lines.push(indented(2, &entry));
        }
    }

    lines.push(String::new());
    lines.push(indented(1, "Returns:"));
    lines.push(indented(
        2,
        "The decoded JSON response, or the response text when it is not JSON.",
    ));
    lines
}

fn indented(level: usize, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    format!("{}{text}", INDENT.repeat(level))
}

/// Collapse whitespace and escape for use inside a docstring line.
fn docstring_text(text: &str) -> String {
    escape_docstring(&text.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn escape_docstring(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

/// JSON schema describing the tool's keyword arguments.
#[must_use]
pub fn input_schema(tool: &ToolDefinition) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for param in &tool.parameters {
        let ident = python_identifier(&param.name);
        let mut schema = param.ty.json_schema();
        if let Some(obj) = schema.as_object_mut() {
            if param.nullable {
                if let Some(Value::String(ty)) = obj.get("type").cloned() {
                    obj.insert("type".to_string(), json!([ty, "null"]));
                }
            }
            if let Some(description) = &param.description {
                obj.insert("description".to_string(), Value::from(description.as_str()));
            }
        }
        if param.required {
            required.push(Value::from(ident.as_str()));
        }
        properties.insert(ident, schema);
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// A Python string literal; JSON string escapes are valid Python escapes.
fn string_literal(s: &str) -> String {
    Value::from(s).to_string()
}

/// Format a JSON value as a Python literal, one entry per line.
///
/// `level` is the indentation level of the line the literal starts on.
#[must_use]
pub fn python_literal(value: &Value, level: usize) -> String {
    let closing = INDENT.repeat(level);
    let inner = INDENT.repeat(level + 1);
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_literal(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let mut out = String::from("[\n");
            for item in items {
                out.push_str(&inner);
                out.push_str(&python_literal(item, level + 1));
                out.push_str(",\n");
            }
            out.push_str(&closing);
            out.push(']');
            out
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let mut out = String::from("{\n");
            for (key, item) in map {
                out.push_str(&inner);
                out.push_str(&string_literal(key));
                out.push_str(": ");
                out.push_str(&python_literal(item, level + 1));
                out.push_str(",\n");
            }
            out.push_str(&closing);
            out.push('}');
            out
        }
    }
}
