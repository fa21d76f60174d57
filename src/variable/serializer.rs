//! Wire Format
//!
//! Converts definitions, selectors and node input/output descriptors to and
//! from plain JSON maps. The same format is embedded in persisted workflow
//! documents, so it must stay stable across encode/decode cycles.
//!
//! # Example Definition
//!
//! ```yaml
//! name: user
//! type: object
//! required: true
//! description: ""
//! children:
//!   - name: email
//!     type: string
//!     required: true
//!     description: Primary address
//! ```
//!
//! `default_value` is omitted when unset and `children` when empty.

use log::{debug, warn};
use serde_json::{Map, Value};
use thiserror::Error;

use super::definition::{
    duplicate_names, is_valid_name, DefinitionError, VariableDefinition, MAX_NESTING_DEPTH,
};
use super::node_io::{NodeInputDefinition, NodeOutputDefinition, VariableSelector};
use super::types::VariableType;

/// Wire-format map.
pub type WireMap = Map<String, Value>;

/// Failure to read a definition or descriptor from its wire form.
#[derive(Error, Debug)]
pub enum SerializerError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid variable type: {0}")]
    InvalidType(String),

    #[error("Field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Failed to deserialize {context}: {source}")]
    Definition {
        context: &'static str,
        #[source]
        source: DefinitionError,
    },

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// A non-empty string field. Absent, `null` and `""` count as missing.
fn required_str<'a>(data: &'a WireMap, field: &'static str) -> Result<&'a str, SerializerError> {
    match data.get(field) {
        None | Some(Value::Null) => Err(SerializerError::MissingField(field)),
        Some(Value::String(s)) if s.is_empty() => Err(SerializerError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(SerializerError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn optional_str(data: &WireMap, field: &'static str) -> Result<String, SerializerError> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SerializerError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn optional_bool(data: &WireMap, field: &'static str) -> Result<bool, SerializerError> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SerializerError::InvalidField {
            field,
            expected: "a boolean",
        }),
    }
}

fn parse_type(data: &WireMap) -> Result<VariableType, SerializerError> {
    let tag = required_str(data, "type")?;
    tag.parse()
        .map_err(|_| SerializerError::InvalidType(tag.to_string()))
}

/// Object elements of `children`, empty when absent or `null`.
fn child_maps(data: &WireMap) -> Result<Vec<&WireMap>, SerializerError> {
    match data.get("children") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_object().ok_or(SerializerError::InvalidField {
                    field: "children",
                    expected: "a list of objects",
                })
            })
            .collect(),
        Some(_) => Err(SerializerError::InvalidField {
            field: "children",
            expected: "a list",
        }),
    }
}

fn parse_children(data: &WireMap) -> Result<Vec<VariableDefinition>, SerializerError> {
    child_maps(data)?
        .into_iter()
        .map(deserialize_definition)
        .collect()
}

fn default_value(data: &WireMap) -> Option<Value> {
    data.get("default_value").filter(|v| !v.is_null()).cloned()
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Serializes a definition tree, preserving child order.
///
/// Levels below `MAX_NESTING_DEPTH + 1` are not written: such a tree is
/// already invalid, and the deepest written level still carries the depth
/// violation for [`validate_serialized_definition`].
pub fn serialize_definition(definition: &VariableDefinition) -> WireMap {
    serialize_at(definition, 1)
}

fn serialize_at(definition: &VariableDefinition, depth: usize) -> WireMap {
    let mut result = Map::new();
    result.insert("name".into(), Value::from(definition.name()));
    result.insert("type".into(), Value::from(definition.var_type().as_str()));
    result.insert("required".into(), Value::from(definition.required()));
    result.insert("description".into(), Value::from(definition.description()));

    if let Some(default) = definition.default_value() {
        result.insert("default_value".into(), default.clone());
    }

    if definition.has_children() {
        if depth > MAX_NESTING_DEPTH {
            warn!(
                "Not serializing children of '{}': nesting depth {} exceeds {}",
                definition.name(),
                depth,
                MAX_NESTING_DEPTH
            );
            return result;
        }
        result.insert(
            "children".into(),
            Value::Array(
                definition
                    .children()
                    .iter()
                    .map(|child| Value::Object(serialize_at(child, depth + 1)))
                    .collect(),
            ),
        );
    }

    result
}

/// Reads a definition tree from its wire form.
///
/// Fails with the name of the offending field when `name` or `type` is
/// missing, the type tag is unknown, or `children` is not a list. Schema
/// rejections from the builder are wrapped with context.
pub fn deserialize_definition(data: &WireMap) -> Result<VariableDefinition, SerializerError> {
    let name = required_str(data, "name")?;
    let var_type = parse_type(data)?;
    let children = parse_children(data)?;

    let mut builder = VariableDefinition::builder(name, var_type)
        .set_required(optional_bool(data, "required")?)
        .description(optional_str(data, "description")?)
        .children(children);

    if let Some(default) = default_value(data) {
        builder = builder.default_value(default);
    }

    builder.build().map_err(|source| SerializerError::Definition {
        context: "nested variable definition",
        source,
    })
}

pub fn serialize_definitions(definitions: &[VariableDefinition]) -> Vec<WireMap> {
    definitions.iter().map(serialize_definition).collect()
}

pub fn deserialize_definitions(data: &[WireMap]) -> Result<Vec<VariableDefinition>, SerializerError> {
    data.iter().map(deserialize_definition).collect()
}

/// Parses a JSON array of definitions.
pub fn definitions_from_json(json: &str) -> Result<Vec<VariableDefinition>, SerializerError> {
    Ok(serde_json::from_str(json)?)
}

pub fn definitions_to_json(definitions: &[VariableDefinition]) -> Result<String, SerializerError> {
    Ok(serde_json::to_string_pretty(definitions)?)
}

/// Parses a YAML sequence of definitions, as embedded in workflow documents.
pub fn definitions_from_yaml(yaml: &str) -> Result<Vec<VariableDefinition>, SerializerError> {
    let definitions: Vec<VariableDefinition> = serde_yaml::from_str(yaml)?;
    debug!("Parsed {} definitions from YAML", definitions.len());
    Ok(definitions)
}

pub fn definitions_to_yaml(definitions: &[VariableDefinition]) -> Result<String, SerializerError> {
    Ok(serde_yaml::to_string(definitions)?)
}

impl From<VariableDefinition> for Value {
    fn from(definition: VariableDefinition) -> Self {
        Value::Object(serialize_definition(&definition))
    }
}

impl TryFrom<Value> for VariableDefinition {
    type Error = SerializerError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => deserialize_definition(&map),
            _ => Err(SerializerError::InvalidField {
                field: "definition",
                expected: "an object",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Selectors and node I/O
// ---------------------------------------------------------------------------

pub fn serialize_variable_selector(selector: &VariableSelector) -> WireMap {
    let mut result = Map::new();
    result.insert("variable".into(), Value::from(selector.variable.as_str()));
    result.insert(
        "value_selector".into(),
        Value::Array(selector.value_selector.iter().map(|s| Value::from(s.as_str())).collect()),
    );
    result
}

pub fn deserialize_variable_selector(data: &WireMap) -> Result<VariableSelector, SerializerError> {
    let variable = match data.get("variable") {
        None | Some(Value::Null) => return Err(SerializerError::MissingField("variable")),
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            return Err(SerializerError::InvalidField {
                field: "variable",
                expected: "a string",
            })
        }
    };

    let segments = match data.get("value_selector") {
        None | Some(Value::Null) => return Err(SerializerError::MissingField("value_selector")),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(SerializerError::InvalidField {
                field: "value_selector",
                expected: "a list",
            })
        }
    };

    let value_selector = segments
        .iter()
        .map(|s| {
            s.as_str().map(str::to_string).ok_or(SerializerError::InvalidField {
                field: "value_selector",
                expected: "a list of strings",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VariableSelector::new(variable, value_selector))
}

pub fn serialize_node_input(input: &NodeInputDefinition) -> WireMap {
    let mut result = Map::new();
    result.insert("name".into(), Value::from(input.name.as_str()));
    result.insert("type".into(), Value::from(input.var_type.as_str()));
    result.insert("required".into(), Value::from(input.required));
    result.insert("description".into(), Value::from(input.description.as_str()));

    if let Some(selector) = &input.variable_selector {
        result.insert(
            "variable_selector".into(),
            Value::Object(serialize_variable_selector(selector)),
        );
    }

    if !input.children.is_empty() {
        result.insert("children".into(), definitions_value(&input.children));
    }

    if let Some(default) = &input.default_value {
        result.insert("default_value".into(), default.clone());
    }

    result
}

pub fn deserialize_node_input(data: &WireMap) -> Result<NodeInputDefinition, SerializerError> {
    let name = required_str(data, "name")?;
    let var_type = parse_type(data)?;

    let variable_selector = match data.get("variable_selector") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(deserialize_variable_selector(map)?),
        Some(_) => {
            return Err(SerializerError::InvalidField {
                field: "variable_selector",
                expected: "an object",
            })
        }
    };

    Ok(NodeInputDefinition {
        name: name.to_string(),
        var_type,
        required: optional_bool(data, "required")?,
        description: optional_str(data, "description")?,
        variable_selector,
        children: parse_children(data)?,
        default_value: default_value(data),
    })
}

pub fn serialize_node_output(output: &NodeOutputDefinition) -> WireMap {
    let mut result = Map::new();
    result.insert("name".into(), Value::from(output.name.as_str()));
    result.insert("type".into(), Value::from(output.var_type.as_str()));
    result.insert("description".into(), Value::from(output.description.as_str()));

    if !output.children.is_empty() {
        result.insert("children".into(), definitions_value(&output.children));
    }

    result
}

pub fn deserialize_node_output(data: &WireMap) -> Result<NodeOutputDefinition, SerializerError> {
    let name = required_str(data, "name")?;
    let var_type = parse_type(data)?;

    Ok(NodeOutputDefinition {
        name: name.to_string(),
        var_type,
        description: optional_str(data, "description")?,
        children: parse_children(data)?,
    })
}

fn definitions_value(definitions: &[VariableDefinition]) -> Value {
    Value::Array(
        definitions
            .iter()
            .map(|d| Value::Object(serialize_definition(d)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Pre-checks
// ---------------------------------------------------------------------------

/// True if `data` declares a canonical type tag, i.e. is already in the
/// nested definition format rather than a flat or UI-side variable.
pub fn is_nested_variable_data(data: &WireMap) -> bool {
    data.get("type")
        .and_then(Value::as_str)
        .map(|tag| tag.parse::<VariableType>().is_ok())
        .unwrap_or(false)
}

/// Structural pre-check of a wire-format definition that never fails.
///
/// Applies the schema rules (names, type tags, depth, children only on
/// nestable types, unique child names) and reports nested problems as
/// `children[i]: ...`.
pub fn validate_serialized_definition(data: &WireMap) -> Vec<String> {
    let mut errors = Vec::new();
    check_serialized(data, 1, &mut errors);
    errors
}

fn check_serialized(data: &WireMap, depth: usize, errors: &mut Vec<String>) {
    if depth > MAX_NESTING_DEPTH {
        errors.push(format!("Maximum nesting depth of {} exceeded", MAX_NESTING_DEPTH));
        return;
    }

    match data.get("name").and_then(Value::as_str) {
        None | Some("") => errors.push("Missing required field 'name'".to_string()),
        Some(name) if !is_valid_name(name) => {
            errors.push(format!("Invalid variable name '{}'", name))
        }
        Some(_) => {}
    }

    let tag = match data.get("type").and_then(Value::as_str) {
        None | Some("") => {
            errors.push("Missing required field 'type'".to_string());
            return;
        }
        Some(tag) => tag,
    };

    let var_type = match tag.parse::<VariableType>() {
        Ok(var_type) => var_type,
        Err(_) => {
            errors.push(format!("Invalid variable type: {}", tag));
            return;
        }
    };

    let children = match data.get("children") {
        None | Some(Value::Null) => return,
        Some(Value::Array(items)) if items.is_empty() => return,
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push("Field 'children' must be a list".to_string());
            return;
        }
    };

    if !var_type.is_nestable() {
        errors.push(format!("Children not allowed for type '{}'", tag));
        return;
    }

    for (index, child) in children.iter().enumerate() {
        match child.as_object() {
            Some(child) => {
                let mut child_errors = Vec::new();
                check_serialized(child, depth + 1, &mut child_errors);
                errors.extend(
                    child_errors
                        .into_iter()
                        .map(|e| format!("children[{}]: {}", index, e)),
                );
            }
            None => errors.push(format!("children[{}]: Expected an object", index)),
        }
    }

    let names: Vec<&str> = children
        .iter()
        .filter_map(|c| c.get("name").and_then(Value::as_str))
        .filter(|n| !n.is_empty())
        .collect();
    if !duplicate_names(names).is_empty() {
        errors.push("Duplicate child variable names".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> WireMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn sample() -> VariableDefinition {
        VariableDefinition::builder("user_data", VariableType::Object)
            .required()
            .description("Profile payload")
            .child(
                VariableDefinition::builder("name", VariableType::String)
                    .required()
                    .build()
                    .unwrap(),
            )
            .child(
                VariableDefinition::builder("preferences", VariableType::Object)
                    .child(
                        VariableDefinition::builder("theme", VariableType::String)
                            .default_value(json!("light"))
                            .build()
                            .unwrap(),
                    )
                    .child(
                        VariableDefinition::builder("notifications", VariableType::Boolean)
                            .default_value(json!(true))
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap(),
            )
            .child(
                VariableDefinition::builder("tags", VariableType::ArrayObject)
                    .child(VariableDefinition::new("label", VariableType::String).unwrap())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        let leaf = VariableDefinition::new("name", VariableType::String).unwrap();
        let wire = serialize_definition(&leaf);

        assert_eq!(
            Value::Object(wire),
            json!({"name": "name", "type": "string", "required": false, "description": ""})
        );
    }

    #[test]
    fn test_serialize_nested() {
        let wire = Value::Object(serialize_definition(&sample()));

        assert_eq!(wire["type"], "object");
        assert_eq!(wire["children"][0]["name"], "name");
        assert_eq!(wire["children"][1]["children"][0]["default_value"], "light");
        assert_eq!(wire["children"][2]["type"], "array[object]");
    }

    #[test]
    fn test_round_trip() {
        let def = sample();
        let restored = deserialize_definition(&serialize_definition(&def)).unwrap();
        assert_eq!(restored, def);
    }

    #[test]
    fn test_round_trip_through_json_text() {
        let defs = vec![sample(), VariableDefinition::new("flag", VariableType::Boolean).unwrap()];
        let text = definitions_to_json(&defs).unwrap();
        assert_eq!(definitions_from_json(&text).unwrap(), defs);
    }

    #[test]
    fn test_round_trip_through_yaml() {
        let defs = vec![sample()];
        let yaml = definitions_to_yaml(&defs).unwrap();
        assert_eq!(definitions_from_yaml(&yaml).unwrap(), defs);
    }

    #[test]
    fn test_yaml_document() {
        let yaml = r#"
- name: user
  type: object
  required: true
  children:
    - name: email
      type: string
      required: true
    - name: age
      type: integer
"#;
        let defs = definitions_from_yaml(yaml).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].children().len(), 2);
        assert_eq!(defs[0].description(), "");
        assert!(!defs[0].children()[1].required());
    }

    #[test]
    fn test_yaml_rejects_invalid_definition() {
        let yaml = "- name: user\n  type: map\n";
        let err = definitions_from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("Invalid variable type: map"));
    }

    #[test]
    fn test_minimal_definition() {
        let def = deserialize_definition(&map(json!({"name": "q", "type": "string"}))).unwrap();

        assert!(!def.required());
        assert_eq!(def.description(), "");
        assert!(def.default_value().is_none());
        assert!(!def.has_children());
    }

    #[test]
    fn test_deserialize_missing_name() {
        let err = deserialize_definition(&map(json!({"type": "string"}))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'name'");

        let err = deserialize_definition(&map(json!({"name": "", "type": "string"}))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'name'");
    }

    #[test]
    fn test_deserialize_missing_type() {
        let err = deserialize_definition(&map(json!({"name": "a"}))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'type'");
    }

    #[test]
    fn test_deserialize_invalid_type() {
        let err = deserialize_definition(&map(json!({"name": "a", "type": "text-input"}))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid variable type: text-input");
    }

    #[test]
    fn test_deserialize_children_not_list() {
        let data = map(json!({"name": "a", "type": "object", "children": {"name": "b"}}));
        let err = deserialize_definition(&data).unwrap_err();
        assert_eq!(err.to_string(), "Field 'children' must be a list");
    }

    #[test]
    fn test_deserialize_wraps_schema_errors() {
        let data = map(json!({
            "name": "a",
            "type": "string",
            "children": [{"name": "b", "type": "string"}]
        }));
        let err = deserialize_definition(&data).unwrap_err();

        assert!(matches!(
            err,
            SerializerError::Definition {
                source: DefinitionError::ChildrenNotAllowed(VariableType::String),
                ..
            }
        ));
        assert!(err.to_string().starts_with("Failed to deserialize nested variable definition"));

        let err = deserialize_definition(&map(json!({"name": "bad name", "type": "string"}))).unwrap_err();
        assert!(err.to_string().contains("bad name"));
    }

    #[test]
    fn test_deserialize_nested_error_propagates() {
        let data = map(json!({
            "name": "a",
            "type": "object",
            "children": [{"name": "b"}]
        }));
        let err = deserialize_definition(&data).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'type'");
    }

    #[test]
    fn test_selector_round_trip() {
        let selector = VariableSelector::new(
            "#node.user.email#",
            vec!["node".into(), "user".into(), "email".into()],
        );
        let wire = serialize_variable_selector(&selector);
        assert_eq!(deserialize_variable_selector(&wire).unwrap(), selector);
    }

    #[test]
    fn test_selector_errors() {
        let err = deserialize_variable_selector(&map(json!({"value_selector": []}))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'variable'");

        let err = deserialize_variable_selector(&map(json!({"variable": "x"}))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'value_selector'");

        let err = deserialize_variable_selector(&map(json!({"variable": "x", "value_selector": "a.b"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Field 'value_selector' must be a list");

        let err = deserialize_variable_selector(&map(json!({"variable": "x", "value_selector": ["a", 1]})))
            .unwrap_err();
        assert!(err.to_string().contains("list of strings"));
    }

    #[test]
    fn test_node_input_round_trip() {
        let input = NodeInputDefinition::new("profile", VariableType::Object)
            .required()
            .with_description("upstream profile")
            .with_selector(VariableSelector::new(
                "#start.profile#",
                vec!["start".into(), "profile".into()],
            ))
            .with_children(vec![VariableDefinition::new("email", VariableType::String).unwrap()])
            .with_default(json!({}));

        let wire = serialize_node_input(&input);
        assert!(wire.contains_key("variable_selector"));
        assert_eq!(deserialize_node_input(&wire).unwrap(), input);
    }

    #[test]
    fn test_node_output_round_trip() {
        let output = NodeOutputDefinition::new("rows", VariableType::ArrayObject)
            .with_description("result rows")
            .with_children(vec![VariableDefinition::new("id", VariableType::Integer).unwrap()]);

        let wire = serialize_node_output(&output);
        assert!(!wire.contains_key("required"));
        assert_eq!(deserialize_node_output(&wire).unwrap(), output);
    }

    #[test]
    fn test_node_input_bad_selector() {
        let data = map(json!({
            "name": "a",
            "type": "string",
            "variable_selector": {"variable": "x"}
        }));
        let err = deserialize_node_input(&data).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'value_selector'");
    }

    #[test]
    fn test_is_nested_variable_data() {
        assert!(is_nested_variable_data(&map(json!({"type": "object", "children": []}))));
        assert!(is_nested_variable_data(&map(json!({"type": "string"}))));
        assert!(!is_nested_variable_data(&map(json!({"type": "text-input"}))));
        assert!(!is_nested_variable_data(&map(json!({"name": "x"}))));
    }

    #[test]
    fn test_validate_serialized_valid() {
        let wire = serialize_definition(&sample());
        assert!(validate_serialized_definition(&wire).is_empty());
    }

    #[test]
    fn test_validate_serialized_collects_errors() {
        let data = map(json!({
            "name": "root",
            "type": "object",
            "children": [
                {"name": "a", "type": "string"},
                {"type": "unknown"},
                {"name": "a", "type": "string", "children": [{"name": "x", "type": "string"}]}
            ]
        }));

        let errors = validate_serialized_definition(&data);
        assert_eq!(
            errors,
            vec![
                "children[1]: Missing required field 'name'".to_string(),
                "children[1]: Invalid variable type: unknown".to_string(),
                "children[2]: Children not allowed for type 'string'".to_string(),
                "Duplicate child variable names".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_serialized_depth() {
        let mut data = json!({"name": "leaf", "type": "string"});
        for i in 0..MAX_NESTING_DEPTH {
            data = json!({"name": format!("level{}", i), "type": "object", "children": [data]});
        }

        let errors = validate_serialized_definition(&map(data));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Maximum nesting depth of 5 exceeded"));
        assert!(errors[0].starts_with("children[0]: children[0]:"));
    }

    #[test]
    fn test_serialize_stops_past_depth_bound() {
        let mut def = VariableDefinition::new("leaf", VariableType::String).unwrap();
        for i in 0..20 {
            def = VariableDefinition::builder(format!("level{}", i), VariableType::Object)
                .child(def)
                .build()
                .unwrap();
        }

        let wire = serialize_definition(&def);
        let mut node = Value::Object(wire.clone());
        let mut levels = 1;
        while let Some(child) = node.get("children").and_then(|c| c.get(0)).cloned() {
            node = child;
            levels += 1;
        }
        assert_eq!(levels, MAX_NESTING_DEPTH + 1);

        let errors = validate_serialized_definition(&wire);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Maximum nesting depth of 5 exceeded"));
    }

    #[test]
    fn test_validate_serialized_missing_fields() {
        let errors = validate_serialized_definition(&Map::new());
        assert_eq!(
            errors,
            vec![
                "Missing required field 'name'".to_string(),
                "Missing required field 'type'".to_string(),
            ]
        );
    }
}
