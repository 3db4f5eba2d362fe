//! JSON schema builders for MCP tools.

use schemars::JsonSchema;
use serde_json::{Map, Value};

/// Derive a tool output schema from a result type.
pub(crate) fn output_schema<T: JsonSchema>() -> Map<String, Value> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(schema)) => schema,
        _ => finalize_object_schema(Map::new(), &[]),
    }
}

/// Build the schema describing the `create-link` tool input.
pub(crate) fn create_link_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "target".into(),
        string_schema("Destination URL the short code should redirect to"),
    );

    let mut code_schema = Map::new();
    code_schema.insert("type".into(), Value::String("string".into()));
    code_schema.insert(
        "description".into(),
        Value::String(
            "Optional custom code; whitespace runs become '-'. Omit for a random 8-char hex code."
                .into(),
        ),
    );
    properties.insert("code".into(), Value::Object(code_schema));

    finalize_object_schema(properties, &["target"])
}

/// Build the schema for tools that take a single `code` argument.
pub(crate) fn code_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "code".into(),
        string_schema("Short code exactly as stored (case-sensitive)"),
    );
    finalize_object_schema(properties, &["code"])
}

/// Build the schema describing the `update-link` tool input.
pub(crate) fn update_link_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "code".into(),
        string_schema("Existing short code (case-sensitive)"),
    );
    properties.insert("target".into(), string_schema("New destination URL"));
    finalize_object_schema(properties, &["code", "target"])
}

/// Schema for tools that accept no arguments.
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}
