use crate::spec::SpecificationDocument;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Arrays nested deeper than this are typed as `Array(Unknown)` at the innermost level.
const MAX_ARRAY_DEPTH: usize = 8;

/// The semantic type of a parameter, independent of the target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum SemanticType {
    String,
    Integer,
    Number,
    Boolean,
    Array(Box<SemanticType>),
    Object,
    Unknown,
}

/// Result of mapping a schema: the semantic type plus nullability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub ty: SemanticType,
    pub nullable: bool,
}

impl MappedType {
    fn unknown() -> Self {
        MappedType {
            ty: SemanticType::Unknown,
            nullable: false,
        }
    }
}

impl SemanticType {
    /// Python type hint for this type.
    ///
    /// - `string` → `str`
    /// - `integer` → `int`
    /// - `number` → `float`
    /// - `boolean` → `bool`
    /// - `array` → `List[T]`
    /// - `object` → `Dict[str, Any]`
    /// - anything else → `Any`
    #[must_use]
    pub fn python_hint(&self) -> String {
        match self {
            SemanticType::String => "str".to_string(),
            SemanticType::Integer => "int".to_string(),
            SemanticType::Number => "float".to_string(),
            SemanticType::Boolean => "bool".to_string(),
            SemanticType::Array(inner) => format!("List[{}]", inner.python_hint()),
            SemanticType::Object => "Dict[str, Any]".to_string(),
            SemanticType::Unknown => "Any".to_string(),
        }
    }

    /// JSON Schema fragment describing this type in a tool input schema.
    #[must_use]
    pub fn json_schema(&self) -> Value {
        match self {
            SemanticType::String => json!({"type": "string"}),
            SemanticType::Integer => json!({"type": "integer"}),
            SemanticType::Number => json!({"type": "number"}),
            SemanticType::Boolean => json!({"type": "boolean"}),
            SemanticType::Array(inner) => json!({"type": "array", "items": inner.json_schema()}),
            SemanticType::Object => json!({"type": "object"}),
            SemanticType::Unknown => Value::Object(Map::new()),
        }
    }
}

/// Map an OpenAPI schema to a [`MappedType`].
///
/// `$ref`s are resolved against `doc`; anything that cannot be resolved or
/// carries no recognizable `type` becomes [`SemanticType::Unknown`] so that
/// partially specified documents still generate.
///
/// Nullability comes from `nullable: true` (OpenAPI 3.0) or a `type` list
/// containing `"null"` (OpenAPI 3.1).
#[must_use]
pub fn schema_to_type(schema: &Value, doc: &SpecificationDocument) -> MappedType {
    map_schema(schema, doc, 0)
}

fn map_schema(schema: &Value, doc: &SpecificationDocument, depth: usize) -> MappedType {
    let Some(obj) = doc.resolve(schema).and_then(Value::as_object) else {
        return MappedType::unknown();
    };

    let (declared, type_list_nullable) = declared_type(obj);
    let nullable = type_list_nullable
        || obj
            .get("nullable")
            .and_then(Value::as_bool)
            .unwrap_or(false);

    let ty = match declared {
        Some("string") => SemanticType::String,
        Some("integer") => SemanticType::Integer,
        Some("number") => SemanticType::Number,
        Some("boolean") => SemanticType::Boolean,
        Some("object") => SemanticType::Object,
        Some("array") => {
            let inner = match obj.get("items") {
                Some(items) if depth < MAX_ARRAY_DEPTH => map_schema(items, doc, depth + 1).ty,
                _ => SemanticType::Unknown,
            };
            SemanticType::Array(Box::new(inner))
        }
        None if obj.contains_key("properties") => SemanticType::Object,
        _ => SemanticType::Unknown,
    };

    MappedType { ty, nullable }
}

/// Read `type`, which is a string in OpenAPI 3.0 and may be a list in 3.1.
fn declared_type(obj: &Map<String, Value>) -> (Option<&str>, bool) {
    match obj.get("type") {
        Some(Value::String(s)) => (Some(s.as_str()), false),
        Some(Value::Array(list)) => {
            let nullable = list.iter().any(|t| t.as_str() == Some("null"));
            let first = list
                .iter()
                .filter_map(Value::as_str)
                .find(|t| *t != "null");
            (first, nullable)
        }
        _ => (None, false),
    }
}

/// Whether a (resolved) schema describes a JSON object whose properties can be expanded.
#[must_use]
pub fn is_object_schema(schema: &Value, doc: &SpecificationDocument) -> bool {
    let Some(obj) = doc.resolve(schema).and_then(Value::as_object) else {
        return false;
    };
    match declared_type(obj).0 {
        Some("object") => true,
        None => obj.contains_key("properties"),
        Some(_) => false,
    }
}
