//! Definition and Value Validation
//!
//! Two independent passes, both collecting every problem instead of
//! stopping at the first one:
//!
//! - Schema validation: depth bound, children only on nestable types,
//!   unique sibling names
//! - Value validation: required fields, declared types, array elements
//!
//! A fail-fast variant of value validation ([`first_value_violation`]) is
//! provided for trust boundaries that only need the first problem.

use std::fmt;
use std::ops::ControlFlow;

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::definition::{duplicate_names, VariableDefinition, MAX_NESTING_DEPTH};
use super::types::VariableType;

/// Machine-readable category of a validation error.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MaxDepthExceeded,
    InvalidChildrenType,
    DuplicateChildName,
    RequiredFieldMissing,
    TypeMismatch,
    InvalidArrayElement,
    InvalidDefinition,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxDepthExceeded => "MAX_DEPTH_EXCEEDED",
            Self::InvalidChildrenType => "INVALID_CHILDREN_TYPE",
            Self::DuplicateChildName => "DUPLICATE_CHILD_NAME",
            Self::RequiredFieldMissing => "REQUIRED_FIELD_MISSING",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::InvalidArrayElement => "INVALID_ARRAY_ELEMENT",
            Self::InvalidDefinition => "INVALID_DEFINITION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation problem, located by a dot path such as
/// `user.contact.email` or `users[1].id`.
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message} at '{path}'")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    #[serde(rename = "error_code")]
    pub code: ErrorCode,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
        }
    }
}

/// Non-empty list of validation errors, for callers that want a `Result`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Nested variable validation failed: {}", join_errors(.errors))]
pub struct ValidationFailed {
    pub errors: Vec<ValidationError>,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

// ---------------------------------------------------------------------------
// Schema validation
// ---------------------------------------------------------------------------

/// Validates a definition tree rooted at depth 1.
pub fn validate_definition(definition: &VariableDefinition) -> Vec<ValidationError> {
    validate_definition_at(definition, 1, "")
}

/// Validates a definition tree that sits at `current_depth` below `parent_path`.
///
/// Recursion stops one level past [`MAX_NESTING_DEPTH`], whatever the
/// actual depth of the tree.
pub fn validate_definition_at(
    definition: &VariableDefinition,
    current_depth: usize,
    parent_path: &str,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_definition(definition, current_depth, parent_path, &mut errors);
    errors
}

fn check_definition(
    definition: &VariableDefinition,
    depth: usize,
    parent_path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let path = join_path(parent_path, definition.name());

    if depth > MAX_NESTING_DEPTH {
        errors.push(ValidationError::new(
            path,
            format!("Maximum nesting depth of {} exceeded", MAX_NESTING_DEPTH),
            ErrorCode::MaxDepthExceeded,
        ));
        return;
    }

    if !definition.has_children() {
        return;
    }

    if !definition.var_type().is_nestable() {
        errors.push(ValidationError::new(
            path,
            format!("Type '{}' does not support children", definition.var_type()),
            ErrorCode::InvalidChildrenType,
        ));
        return;
    }

    let duplicates = duplicate_names(definition.children().iter().map(|c| c.name()));
    if !duplicates.is_empty() {
        errors.push(ValidationError::new(
            path.clone(),
            format!("Duplicate child names: {}", duplicates.join(", ")),
            ErrorCode::DuplicateChildName,
        ));
    }

    for child in definition.children() {
        check_definition(child, depth + 1, &path, errors);
    }
}

/// Validates a list of root definitions, including duplicate root names.
pub fn validate_definitions(definitions: &[VariableDefinition]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let duplicates = duplicate_names(definitions.iter().map(|d| d.name()));
    if !duplicates.is_empty() {
        errors.push(ValidationError::new(
            "",
            format!("Duplicate variable names at root level: {}", duplicates.join(", ")),
            ErrorCode::DuplicateChildName,
        ));
    }

    for definition in definitions {
        errors.extend(validate_definition(definition));
    }

    debug!(
        "Validated {} definitions: {} errors",
        definitions.len(),
        errors.len()
    );
    errors
}

/// Like [`validate_definitions`], but as a `Result`.
pub fn ensure_definitions_valid(definitions: &[VariableDefinition]) -> Result<(), ValidationFailed> {
    into_result(validate_definitions(definitions))
}

// ---------------------------------------------------------------------------
// Value validation
// ---------------------------------------------------------------------------

/// Accumulates errors, optionally stopping after the first one.
struct Collector {
    errors: Vec<ValidationError>,
    fail_fast: bool,
}

impl Collector {
    fn new(fail_fast: bool) -> Self {
        Self {
            errors: Vec::new(),
            fail_fast,
        }
    }

    fn push(&mut self, error: ValidationError) -> ControlFlow<()> {
        self.errors.push(error);
        if self.fail_fast {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Validates a runtime value against its definition.
///
/// `value` of `None` (or JSON `null`) means the value is absent. The
/// definition's own name is the first path segment.
pub fn validate_value(value: Option<&Value>, definition: &VariableDefinition) -> Vec<ValidationError> {
    validate_value_at(value, definition, "")
}

/// Validates a value whose definition sits below `parent_path`.
pub fn validate_value_at(
    value: Option<&Value>,
    definition: &VariableDefinition,
    parent_path: &str,
) -> Vec<ValidationError> {
    let mut collector = Collector::new(false);
    let _ = check_value(value, definition, parent_path, &mut collector);
    collector.errors
}

/// Returns the first violation in depth-first order, if any.
pub fn first_value_violation(
    value: Option<&Value>,
    definition: &VariableDefinition,
) -> Option<ValidationError> {
    let mut collector = Collector::new(true);
    let _ = check_value(value, definition, "", &mut collector);
    collector.errors.into_iter().next()
}

/// Validates a map of root values against their definitions by name.
pub fn validate_values(
    values: &Map<String, Value>,
    definitions: &[VariableDefinition],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for definition in definitions {
        errors.extend(validate_value(values.get(definition.name()), definition));
    }
    errors
}

/// Like [`validate_values`], but as a `Result`.
pub fn ensure_values_valid(
    values: &Map<String, Value>,
    definitions: &[VariableDefinition],
) -> Result<(), ValidationFailed> {
    into_result(validate_values(values, definitions))
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), ValidationFailed> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailed { errors })
    }
}

fn check_value(
    value: Option<&Value>,
    definition: &VariableDefinition,
    parent_path: &str,
    out: &mut Collector,
) -> ControlFlow<()> {
    let path = join_path(parent_path, definition.name());

    let value = match value {
        None | Some(Value::Null) => {
            if definition.required() {
                out.push(ValidationError::new(
                    path,
                    "Required field is missing",
                    ErrorCode::RequiredFieldMissing,
                ))?;
            }
            return ControlFlow::Continue(());
        }
        Some(value) => value,
    };

    if let Some(error) = check_type(value, definition, &path) {
        return out.push(error);
    }

    if !definition.has_children() {
        return ControlFlow::Continue(());
    }

    match value {
        Value::Object(map) => check_children(map, definition, &path, out)?,
        Value::Array(items) if definition.var_type() == VariableType::ArrayObject => {
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, index);
                match item {
                    Value::Object(map) => check_children(map, definition, &item_path, out)?,
                    _ => out.push(ValidationError::new(
                        item_path,
                        "Array element must be an object",
                        ErrorCode::InvalidArrayElement,
                    ))?,
                }
            }
        }
        _ => {}
    }

    ControlFlow::Continue(())
}

fn check_children(
    map: &Map<String, Value>,
    definition: &VariableDefinition,
    path: &str,
    out: &mut Collector,
) -> ControlFlow<()> {
    for child in definition.children() {
        check_value(map.get(child.name()), child, path, out)?;
    }
    ControlFlow::Continue(())
}

/// Name of a JSON value's runtime kind, as reported in mismatch messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Booleans are a separate JSON kind, so `integer` and `number` never
// accept `true`/`false`. Keep it that way if the value model changes.
fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_i64() || n.is_u64())
}

fn scalar_matches(value: &Value, expected: VariableType) -> bool {
    match expected {
        VariableType::String => value.is_string(),
        VariableType::Integer => is_integer(value),
        VariableType::Number => value.is_number(),
        VariableType::Boolean => value.is_boolean(),
        VariableType::Object => value.is_object(),
        VariableType::File => true,
        VariableType::ArrayString
        | VariableType::ArrayInteger
        | VariableType::ArrayNumber
        | VariableType::ArrayBoolean
        | VariableType::ArrayObject
        | VariableType::ArrayFile => value.is_array(),
    }
}

/// Checks the value's kind and, for arrays, the kind of each element.
///
/// `array[object]` elements are left to the per-element pass when the
/// definition declares children, which reports every bad element.
fn check_type(value: &Value, definition: &VariableDefinition, path: &str) -> Option<ValidationError> {
    let expected = definition.var_type();

    if !scalar_matches(value, expected) {
        return Some(ValidationError::new(
            path,
            format!("Expected {}, got {}", expected, kind_name(value)),
            ErrorCode::TypeMismatch,
        ));
    }

    let element_type = match expected.element_type() {
        Some(VariableType::File) | None => return None,
        Some(VariableType::Object) if definition.has_children() => return None,
        Some(element_type) => element_type,
    };

    let items = value.as_array()?;
    items
        .iter()
        .enumerate()
        .find(|(_, item)| !scalar_matches(item, element_type))
        .map(|(index, item)| {
            ValidationError::new(
                format!("{}[{}]", path, index),
                format!("Array element expected {}, got {}", element_type, kind_name(item)),
                ErrorCode::TypeMismatch,
            )
        })
}
