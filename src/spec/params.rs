use super::types::{
    BodyContent, Operation, OperationRef, ParameterLocation, ParameterModel, ParameterSpec,
    SourceLocation, SpecificationDocument,
};
use crate::generator::schema_to_type;
use crate::naming::to_snake_case;
use crate::report::{
    BodyDropReason, DroppedBody, DroppedParameter, ParameterDropReason, SkipReason,
};
use serde_json::Value;

/// Parameters of one operation after resolution, plus what was left out.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParameters {
    /// Required first; path, query, body order within each group
    pub parameters: Vec<ParameterModel>,
    pub dropped_parameters: Vec<DroppedParameter>,
    pub dropped_body: Option<DroppedBody>,
}

/// Resolve an operation's path, query and body parameters into one ordered list.
///
/// Path parameters are always required. A parameter whose canonical name is
/// already taken is dropped and reported, never overwritten. Header and cookie
/// parameters, non-JSON bodies and JSON bodies without an object schema are
/// dropped and reported as well.
///
/// # Errors
///
/// Returns [`SkipReason::UnresolvableParameter`] when a parameter or body
/// property name has no letters or ASCII digits.
pub fn resolve_parameters(
    op: &Operation,
    doc: &SpecificationDocument,
    origin: &OperationRef,
) -> Result<ResolvedParameters, SkipReason> {
    let mut resolved = ResolvedParameters::default();
    let mut path_params = Vec::new();
    let mut query_params = Vec::new();

    for spec in &op.parameters {
        match spec.location {
            ParameterLocation::Path => path_params.push(spec),
            ParameterLocation::Query => query_params.push(spec),
            ParameterLocation::Header | ParameterLocation::Cookie => {
                resolved.dropped_parameters.push(DroppedParameter {
                    operation: origin.clone(),
                    name: spec.name.clone(),
                    location: spec.location.to_string(),
                    reason: ParameterDropReason::UnsupportedLocation {
                        location: spec.location,
                    },
                });
            }
        }
    }

    let mut collected: Vec<ParameterModel> = Vec::new();
    for spec in path_params {
        let model = declared_parameter(spec, SourceLocation::Path, true, doc)?;
        admit(&mut collected, &mut resolved.dropped_parameters, model, origin);
    }
    for spec in query_params {
        let model = declared_parameter(spec, SourceLocation::Query, spec.required, doc)?;
        admit(&mut collected, &mut resolved.dropped_parameters, model, origin);
    }

    if let Some(body) = &op.request_body {
        match &body.content {
            BodyContent::JsonObject {
                properties,
                required,
                ..
            } => {
                for (name, schema) in properties {
                    let model = body_property(name, schema, required.contains(name), doc)?;
                    admit(&mut collected, &mut resolved.dropped_parameters, model, origin);
                }
            }
            BodyContent::JsonOther { media_type } => {
                resolved.dropped_body = Some(DroppedBody {
                    operation: origin.clone(),
                    reason: BodyDropReason::NonObjectSchema {
                        media_type: media_type.clone(),
                    },
                });
            }
            BodyContent::Unsupported => {
                resolved.dropped_body = Some(DroppedBody {
                    operation: origin.clone(),
                    reason: BodyDropReason::UnsupportedContentType {
                        content_types: body.content_types.clone(),
                    },
                });
            }
        }
    }

    let (mut parameters, optional): (Vec<_>, Vec<_>) =
        collected.into_iter().partition(|p| p.required);
    parameters.extend(optional);
    resolved.parameters = parameters;
    Ok(resolved)
}

/// Push `model` unless its canonical name is already taken.
fn admit(
    collected: &mut Vec<ParameterModel>,
    dropped: &mut Vec<DroppedParameter>,
    model: ParameterModel,
    origin: &OperationRef,
) {
    if let Some(kept) = collected.iter().find(|p| p.name == model.name) {
        dropped.push(DroppedParameter {
            operation: origin.clone(),
            name: model.wire_name,
            location: model.location.to_string(),
            reason: ParameterDropReason::Collision {
                canonical: model.name,
                kept: kept.wire_name.clone(),
                kept_location: kept.location,
            },
        });
        return;
    }
    collected.push(model);
}

fn declared_parameter(
    spec: &ParameterSpec,
    location: SourceLocation,
    required: bool,
    doc: &SpecificationDocument,
) -> Result<ParameterModel, SkipReason> {
    let mapped = schema_to_type(spec.schema.as_ref().unwrap_or(&Value::Null), doc);
    Ok(ParameterModel {
        name: canonical_name(&spec.name, location)?,
        wire_name: spec.name.clone(),
        ty: mapped.ty,
        nullable: mapped.nullable,
        required,
        location,
        description: spec.description.clone(),
    })
}

fn body_property(
    name: &str,
    schema: &Value,
    required: bool,
    doc: &SpecificationDocument,
) -> Result<ParameterModel, SkipReason> {
    let mapped = schema_to_type(schema, doc);
    let description = doc
        .resolve(schema)
        .and_then(|s| s.get("description"))
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(ParameterModel {
        name: canonical_name(name, SourceLocation::Body)?,
        wire_name: name.to_string(),
        ty: mapped.ty,
        nullable: mapped.nullable,
        required,
        location: SourceLocation::Body,
        description,
    })
}

fn canonical_name(name: &str, location: SourceLocation) -> Result<String, SkipReason> {
    let canonical = to_snake_case(name);
    if canonical.is_empty() {
        return Err(SkipReason::UnresolvableParameter {
            detail: format!("{location} parameter '{name}' normalizes to an empty name"),
        });
    }
    Ok(canonical)
}
