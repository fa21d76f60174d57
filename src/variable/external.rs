//! External Vocabulary
//!
//! The UI describes variables with its own field names and type tags
//! (`variable` instead of `name`, `text-input` instead of `string`, ...).
//! This module is the only place that knows about them: everything here
//! translates to the canonical wire format before any definition is built.
//!
//! | UI tag        | Canonical tag  |
//! |---------------|----------------|
//! | `text-input`  | `string`       |
//! | `paragraph`   | `string`       |
//! | `select`      | `string`       |
//! | `number`      | `number`       |
//! | `checkbox`    | `boolean`      |
//! | `json_object` | `object`       |
//! | `file`        | `file`         |
//! | `file-list`   | `array[file]`  |
//!
//! Unknown tags pass through unchanged and are reported by deserialization.

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::{Map, Value};

use super::serializer::{deserialize_definition, WireMap};
use super::types::VariableType;
use super::validator::{validate_definition, ErrorCode, ValidationError};

/// Bumped whenever the UI→canonical table changes.
pub const EXTERNAL_VOCABULARY_VERSION: u32 = 1;

const TYPE_TABLE: &[(&str, &str)] = &[
    ("text-input", "string"),
    ("paragraph", "string"),
    ("select", "string"),
    ("number", "number"),
    ("checkbox", "boolean"),
    ("json_object", "object"),
    ("file", "file"),
    ("file-list", "array[file]"),
];

/// Canonical tag for a UI tag, or the input unchanged if it has no entry.
pub fn canonical_type_tag(tag: &str) -> &str {
    TYPE_TABLE
        .iter()
        .find(|(external, _)| *external == tag)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(tag)
}

/// Rewrites a UI-side variable into the canonical wire format.
///
/// - `variable` (falling back to `name`) becomes `name`
/// - `type` goes through the tag table
/// - `default_value`, or the UI's `default`, becomes `default_value`
/// - `children` are translated recursively; UI-only keys are dropped
pub fn translate_external_vocabulary(var: &WireMap) -> WireMap {
    let name = var
        .get("variable")
        .or_else(|| var.get("name"))
        .cloned()
        .unwrap_or_else(|| Value::from(""));

    let var_type = match var.get("type") {
        Some(Value::String(tag)) => Value::from(canonical_type_tag(tag)),
        Some(other) => other.clone(),
        None => Value::from(""),
    };

    let mut result = Map::new();
    result.insert("name".into(), name);
    result.insert("type".into(), var_type);
    result.insert(
        "required".into(),
        var.get("required").cloned().unwrap_or(Value::Bool(false)),
    );
    result.insert(
        "description".into(),
        var.get("description").cloned().unwrap_or_else(|| Value::from("")),
    );

    if let Some(default) = var.get("default_value").or_else(|| var.get("default")) {
        result.insert("default_value".into(), default.clone());
    }

    match var.get("children") {
        Some(Value::Array(children)) if !children.is_empty() => {
            let translated = children
                .iter()
                .map(|child| match child {
                    Value::Object(child) => Value::Object(translate_external_vocabulary(child)),
                    other => other.clone(),
                })
                .collect();
            result.insert("children".into(), Value::Array(translated));
        }
        Some(Value::Array(_)) | None | Some(Value::Null) => {}
        Some(other) => {
            result.insert("children".into(), other.clone());
        }
    }

    result
}

/// The `nodes[].data.variables` entries of a workflow graph, with node ids.
fn graph_variables(graph: &Value) -> impl Iterator<Item = (&str, &WireMap)> {
    graph
        .get("nodes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .flat_map(|node| {
            let node_id = node.get("id").and_then(Value::as_str).unwrap_or("unknown");
            node.get("data")
                .and_then(|data| data.get("variables"))
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_object)
                .map(move |var| (node_id, var))
        })
}

fn has_children(var: &WireMap) -> bool {
    var.get("children")
        .and_then(Value::as_array)
        .map(|c| !c.is_empty())
        .unwrap_or(false)
}

/// Collects, per node id, the variables that declare children.
pub fn extract_nested_variables_from_graph(graph: &Value) -> HashMap<String, Vec<WireMap>> {
    let mut result: HashMap<String, Vec<WireMap>> = HashMap::new();

    for (node_id, var) in graph_variables(graph) {
        if has_children(var) {
            result
                .entry(node_id.to_string())
                .or_default()
                .push(var.clone());
        }
    }

    result
}

/// Schema-validates every nested variable declared in a workflow graph.
///
/// Only variables with a non-empty `children` list and a nestable type
/// (after translation) are checked. Paths are prefixed with `node[<id>].`;
/// variables that cannot be deserialized at all yield `INVALID_DEFINITION`.
pub fn validate_graph_nested_variables(graph: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (node_id, var) in graph_variables(graph) {
        if !has_children(var) {
            continue;
        }

        let converted = translate_external_vocabulary(var);
        let nestable = converted
            .get("type")
            .and_then(Value::as_str)
            .and_then(|tag| tag.parse::<VariableType>().ok())
            .map(|t| t.is_nestable())
            .unwrap_or(false);
        if !nestable {
            debug!("Skipping non-nestable variable in node '{}'", node_id);
            continue;
        }

        match deserialize_definition(&converted) {
            Ok(definition) => {
                errors.extend(validate_definition(&definition).into_iter().map(|mut e| {
                    e.path = format!("node[{}].{}", node_id, e.path);
                    e
                }));
            }
            Err(e) => {
                let label = converted
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|n| !n.is_empty())
                    .unwrap_or("unknown");
                warn!("Invalid nested variable '{}' in node '{}': {}", label, node_id, e);
                errors.push(ValidationError::new(
                    format!("node[{}].{}", node_id, label),
                    e.to_string(),
                    ErrorCode::InvalidDefinition,
                ));
            }
        }
    }

    errors
}
