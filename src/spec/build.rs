use super::params::resolve_parameters;
use super::types::{
    BodyContent, HttpMethod, Operation, OperationRef, ParameterLocation, ParameterSpec, PathItem,
    RequestBodySpec, SpecificationDocument, ToolDefinition,
};
use crate::generator::is_object_schema;
use crate::naming::to_snake_case;
use crate::report::{
    BodyDropReason, DroppedBody, GenerationReport, SkipReason, SkippedOperation,
};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Build one [`ToolDefinition`] per valid operation of `doc`, in document order.
///
/// Invalid operations are skipped and recorded in the returned report; nothing
/// here fails the document as a whole.
#[must_use]
pub fn build_tools(doc: &SpecificationDocument) -> (Vec<ToolDefinition>, GenerationReport) {
    let mut tools = Vec::new();
    let mut report = GenerationReport::default();

    for item in &doc.paths {
        for raw in &item.operations {
            let origin = OperationRef {
                source: doc.source.clone(),
                method: raw.method,
                path: item.path.clone(),
                operation_id: raw
                    .body
                    .get("operationId")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            };
            match build_tool(doc, item, raw.method, &raw.body, &origin, &mut report) {
                Ok(tool) => {
                    tracing::debug!(
                        operation = %origin,
                        tool = %tool.name,
                        parameters = tool.parameters.len(),
                        "Built tool"
                    );
                    tools.push(tool);
                }
                Err(reason) => report.skipped_operations.push(SkippedOperation {
                    operation: origin,
                    reason,
                }),
            }
        }
    }

    report.generated_tools = tools.len();
    (tools, report)
}

fn build_tool(
    doc: &SpecificationDocument,
    item: &PathItem,
    method: HttpMethod,
    body: &Value,
    origin: &OperationRef,
    report: &mut GenerationReport,
) -> Result<ToolDefinition, SkipReason> {
    let op_obj = body.as_object().ok_or(SkipReason::MalformedOperation)?;
    let operation_id = resolve_operation_id(op_obj)?;
    let name = to_snake_case(&operation_id);
    if name.is_empty() {
        return Err(SkipReason::EmptyCanonicalName { operation_id });
    }

    let mut parameters = extract_parameters(doc, item.parameters.as_ref())?;
    for spec in extract_parameters(doc, op_obj.get("parameters"))? {
        match parameters
            .iter_mut()
            .find(|p| p.name == spec.name && p.location == spec.location)
        {
            Some(existing) => *existing = spec,
            None => parameters.push(spec),
        }
    }

    let raw_body = op_obj.get("requestBody");
    let request_body = raw_body.and_then(|raw| extract_request_body(doc, raw));

    let operation = Operation {
        operation_id,
        method,
        path: item.path.clone(),
        parameters,
        request_body,
        summary: non_empty_str(op_obj.get("summary")),
        description: non_empty_str(op_obj.get("description")),
        deprecated: op_obj
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    };

    let resolved = resolve_parameters(&operation, doc, origin)?;
    report.dropped_parameters.extend(resolved.dropped_parameters);
    report.dropped_bodies.extend(resolved.dropped_body);
    if raw_body.is_some() && operation.request_body.is_none() {
        report.dropped_bodies.push(DroppedBody {
            operation: origin.clone(),
            reason: BodyDropReason::Unresolvable,
        });
    }

    Ok(ToolDefinition {
        name,
        method,
        path: operation.path.clone(),
        parameters: resolved.parameters,
        docstring: docstring(&operation),
        description: short_description(&operation),
        origin: origin.clone(),
    })
}

fn resolve_operation_id(op: &Map<String, Value>) -> Result<String, SkipReason> {
    non_empty_str(op.get("operationId")).ok_or(SkipReason::MissingOperationId)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a `parameters` list, following `$ref`s into `#/components/parameters`.
fn extract_parameters(
    doc: &SpecificationDocument,
    raw: Option<&Value>,
) -> Result<Vec<ParameterSpec>, SkipReason> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let list = raw.as_array().ok_or_else(|| unresolvable("parameters is not a list"))?;

    list.iter()
        .enumerate()
        .map(|(index, entry)| -> Result<ParameterSpec, SkipReason> {
            let resolved = doc.resolve(entry).ok_or_else(|| {
                let reference = entry.get("$ref").and_then(Value::as_str).unwrap_or("?");
                unresolvable(&format!("unresolved reference '{reference}'"))
            })?;
            let obj = resolved
                .as_object()
                .ok_or_else(|| unresolvable(&format!("parameter #{index} is not a mapping")))?;
            let name = obj
                .get("name")
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| unresolvable(&format!("parameter #{index} has no name")))?;
            let location_raw = obj
                .get("in")
                .and_then(Value::as_str)
                .ok_or_else(|| unresolvable(&format!("parameter '{name}' has no location")))?;
            let location = ParameterLocation::parse(location_raw).ok_or_else(|| {
                unresolvable(&format!(
                    "parameter '{name}' has unknown location '{location_raw}'"
                ))
            })?;
            Ok(ParameterSpec {
                name: name.to_string(),
                location,
                required: obj.get("required").and_then(Value::as_bool).unwrap_or(false),
                schema: obj.get("schema").cloned(),
                description: non_empty_str(obj.get("description")),
            })
        })
        .collect()
}

fn unresolvable(detail: &str) -> SkipReason {
    SkipReason::UnresolvableParameter {
        detail: detail.to_string(),
    }
}

/// Parse a `requestBody`, following a `$ref` into `#/components/requestBodies`.
///
/// Returns `None` when the body cannot be resolved to a mapping.
fn extract_request_body(doc: &SpecificationDocument, raw: &Value) -> Option<RequestBodySpec> {
    let body = doc.resolve(raw)?.as_object()?;
    let required = body.get("required").and_then(Value::as_bool).unwrap_or(false);
    let content = body.get("content").and_then(Value::as_object);
    let content_types: Vec<String> = content
        .map(|c| c.keys().cloned().collect())
        .unwrap_or_default();

    let json = content.and_then(|c| c.iter().find(|(media_type, _)| is_json_media_type(media_type)));
    let content = match json {
        None => BodyContent::Unsupported,
        Some((media_type, media)) => match media.get("schema") {
            Some(schema) if is_object_schema(schema, doc) => {
                object_body(doc, media_type, schema)
            }
            _ => BodyContent::JsonOther {
                media_type: media_type.clone(),
            },
        },
    };

    Some(RequestBodySpec {
        required,
        content_types,
        content,
    })
}

fn object_body(doc: &SpecificationDocument, media_type: &str, schema: &Value) -> BodyContent {
    let resolved = doc.resolve(schema);
    let properties = resolved
        .and_then(|s| s.get("properties"))
        .and_then(Value::as_object)
        .map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();
    let required: BTreeSet<String> = resolved
        .and_then(|s| s.get("required"))
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    BodyContent::JsonObject {
        media_type: media_type.to_string(),
        properties,
        required,
    }
}

/// `application/json` and any `+json` structured syntax suffix, ignoring parameters.
#[must_use]
pub fn is_json_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

fn placeholder(op: &Operation) -> String {
    format!("{} {}", op.method, op.path)
}

/// Summary and description joined by a blank line, or `"<METHOD> <path>"` when both are absent.
fn docstring(op: &Operation) -> String {
    let mut text = match (&op.summary, &op.description) {
        (Some(summary), Some(description)) if summary != description => {
            format!("{summary}\n\n{description}")
        }
        (Some(text), _) | (None, Some(text)) => text.clone(),
        (None, None) => placeholder(op),
    };
    if op.deprecated {
        text.push_str("\n\nDeprecated.");
    }
    text
}

fn short_description(op: &Operation) -> String {
    op.description
        .clone()
        .or_else(|| op.summary.clone())
        .unwrap_or_else(|| placeholder(op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{parse_spec, SourceLocation, SpecFormat};
    use crate::report::ParameterDropReason;
    use std::path::Path;

    fn build(yaml: &str) -> (Vec<ToolDefinition>, GenerationReport) {
        let doc = parse_spec(yaml, SpecFormat::Yaml, Path::new("test.yaml")).unwrap();
        build_tools(&doc)
    }

    #[test]
    fn test_is_json_media_type() {
        assert!(is_json_media_type("application/json"));
        assert!(is_json_media_type("application/json; charset=utf-8"));
        assert!(is_json_media_type("application/merge-patch+json"));
        assert!(!is_json_media_type("multipart/form-data"));
        assert!(!is_json_media_type("text/plain"));
    }

    #[test]
    fn test_missing_operation_id_is_skipped() {
        let (tools, report) = build(
            r#"
paths:
  /a:
    get: { summary: no id }
    post: { operationId: "  " }
  /b:
    get: { operationId: listB }
"#,
        );
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "list_b");
        assert_eq!(report.skipped_operations.len(), 2);
        assert!(report
            .skipped_operations
            .iter()
            .all(|s| s.reason == SkipReason::MissingOperationId));
        assert_eq!(report.generated_tools, 1);
    }

    #[test]
    fn test_empty_canonical_name_is_skipped() {
        let (tools, report) = build("paths:\n  /a:\n    get: { operationId: '---' }\n");
        assert!(tools.is_empty());
        assert_eq!(
            report.skipped_operations[0].reason,
            SkipReason::EmptyCanonicalName {
                operation_id: "---".to_string()
            }
        );
    }

    #[test]
    fn test_path_level_parameters_merge() {
        let (tools, _) = build(
            r#"
paths:
  /items/{itemId}:
    parameters:
      - { name: itemId, in: path, schema: { type: string } }
      - { name: verbose, in: query, schema: { type: boolean } }
    get:
      operationId: getItem
      parameters:
        - { name: verbose, in: query, required: true, schema: { type: integer } }
        - { name: fields, in: query, schema: { type: array, items: { type: string } } }
"#,
        );
        let params = &tools[0].parameters;
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["item_id", "verbose", "fields"]);
        assert!(params[1].required, "operation-level definition wins");
    }

    #[test]
    fn test_parameter_and_body_refs() {
        let (tools, report) = build(
            r##"
components:
  parameters:
    Limit: { name: limit, in: query, schema: { type: integer } }
  schemas:
    NewItem:
      type: object
      required: [name]
      properties:
        name: { type: string, description: Item name }
        note: { type: string, nullable: true }
  requestBodies:
    NewItemBody:
      required: true
      content:
        application/json:
          schema: { $ref: "#/components/schemas/NewItem" }
paths:
  /items:
    post:
      operationId: createItem
      parameters:
        - $ref: "#/components/parameters/Limit"
      requestBody: { $ref: "#/components/requestBodies/NewItemBody" }
"##,
        );
        assert!(report.skipped_operations.is_empty());
        let params = &tools[0].parameters;
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "limit", "note"]);
        assert_eq!(params[0].location, SourceLocation::Body);
        assert_eq!(params[0].description.as_deref(), Some("Item name"));
        assert!(params[2].nullable);
    }

    #[test]
    fn test_unresolvable_parameters_skip_operation() {
        let (tools, report) = build(
            r##"
paths:
  /a:
    get:
      operationId: badRef
      parameters:
        - $ref: "#/components/parameters/Missing"
  /b:
    get:
      operationId: notAList
      parameters: { name: x }
  /c:
    get:
      operationId: noLocation
      parameters:
        - { name: x }
  /d:
    get:
      operationId: fine
"##,
        );
        assert_eq!(tools.len(), 1);
        assert_eq!(report.skipped_operations.len(), 3);
        assert!(report
            .skipped_operations
            .iter()
            .all(|s| matches!(s.reason, SkipReason::UnresolvableParameter { .. })));
    }

    #[test]
    fn test_non_json_body_is_dropped_not_skipped() {
        let (tools, report) = build(
            r#"
paths:
  /upload:
    post:
      operationId: uploadFile
      requestBody:
        content:
          multipart/form-data:
            schema: { type: object, properties: { file: { type: string } } }
"#,
        );
        assert_eq!(tools.len(), 1);
        assert!(tools[0].parameters.is_empty());
        assert_eq!(report.dropped_bodies.len(), 1);
        assert!(report.skipped_operations.is_empty());
    }

    #[test]
    fn test_dangling_body_ref_is_dropped() {
        let (tools, report) = build(
            r##"
paths:
  /a:
    post:
      operationId: postA
      requestBody: { $ref: "#/components/requestBodies/Nope" }
"##,
        );
        assert_eq!(tools.len(), 1);
        assert_eq!(report.dropped_bodies[0].reason, BodyDropReason::Unresolvable);
    }

    #[test]
    fn test_header_parameter_reported() {
        let (tools, report) = build(
            r#"
paths:
  /a:
    get:
      operationId: getA
      parameters:
        - { name: X-Trace, in: header, schema: { type: string } }
"#,
        );
        assert!(tools[0].parameters.is_empty());
        assert_eq!(report.dropped_parameters.len(), 1);
        assert!(matches!(
            report.dropped_parameters[0].reason,
            ParameterDropReason::UnsupportedLocation { .. }
        ));
    }

    #[test]
    fn test_docstring_and_description() {
        let (tools, _) = build(
            r#"
paths:
  /a:
    get: { operationId: both, summary: Short, description: Longer text }
    post: { operationId: none }
    put: { operationId: old, summary: Old way, deprecated: true }
"#,
        );
        assert_eq!(tools[0].docstring, "Short\n\nLonger text");
        assert_eq!(tools[0].description, "Longer text");
        assert_eq!(tools[1].docstring, "POST /a");
        assert_eq!(tools[1].description, "POST /a");
        assert_eq!(tools[2].docstring, "Old way\n\nDeprecated.");
        assert_eq!(tools[2].description, "Old way");
    }

    #[test]
    fn test_origin_carries_raw_operation_id() {
        let (tools, _) = build("paths:\n  /items:\n    get: { operationId: listItems }\n");
        assert_eq!(tools[0].origin.operation_id.as_deref(), Some("listItems"));
        assert_eq!(tools[0].origin.source, "test.yaml");
        assert_eq!(tools[0].origin.method, HttpMethod::Get);
    }
}
