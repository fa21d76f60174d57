//! Variable Definition
//!
//! Recursive schema node describing a single declared variable and,
//! for `object` / `array[object]` types, its child variables.
//!
//! Definitions are checked when they are built: a name that does not match
//! `^[A-Za-z][A-Za-z0-9_]*$`, children on a non-nestable type, or duplicate
//! sibling names are rejected, so an invalid tree never exists in memory.
//! Depth is not checked at construction; see
//! [`validate_definition`](super::validator::validate_definition).
//!
//! # Example
//!
//! ```
//! use flowvars::variable::{VariableDefinition, VariableType};
//!
//! let user = VariableDefinition::builder("user", VariableType::Object)
//!     .required()
//!     .child(VariableDefinition::builder("name", VariableType::String).required().build()?)
//!     .child(VariableDefinition::new("age", VariableType::Integer)?)
//!     .build()?;
//!
//! assert_eq!(user.max_depth(), 2);
//! # Ok::<(), flowvars::variable::DefinitionError>(())
//! ```

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::types::VariableType;

/// Maximum depth of a definition tree, root counted as depth 1.
pub const MAX_NESTING_DEPTH: usize = 5;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("variable name pattern is a valid regex")
});

/// Returns true if `name` is a legal variable name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Reasons a definition cannot be constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error(
        "Variable name '{0}' must start with a letter and contain only alphanumeric characters and underscores"
    )]
    InvalidName(String),

    #[error("Children are only allowed for 'object' and 'array[object]' types, got '{0}'")]
    ChildrenNotAllowed(VariableType),

    #[error("Child variable names must be unique within the same parent. Duplicates: {}", .0.join(", "))]
    DuplicateChildNames(Vec<String>),

    #[error("Invalid variable type: {0}")]
    UnknownType(String),
}

/// A declared variable: name, type, requiredness and optional children.
///
/// Immutable once built. Transformations produce new trees.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Value", into = "Value")]
pub struct VariableDefinition {
    name: String,
    var_type: VariableType,
    required: bool,
    description: String,
    default_value: Option<Value>,
    children: Vec<VariableDefinition>,
}

impl VariableDefinition {
    /// Creates an optional leaf definition with no description or default.
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Result<Self, DefinitionError> {
        Self::builder(name, var_type).build()
    }

    /// Starts a builder for a definition.
    pub fn builder(name: impl Into<String>, var_type: VariableType) -> DefinitionBuilder {
        DefinitionBuilder {
            name: name.into(),
            var_type,
            required: false,
            description: String::new(),
            default_value: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Child definitions in declaration order. Empty for leaves.
    pub fn children(&self) -> &[VariableDefinition] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Looks up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&VariableDefinition> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth of this tree: 1 for a leaf, otherwise one more than the
    /// deepest child. Capped at `MAX_NESTING_DEPTH + 1`.
    pub fn max_depth(&self) -> usize {
        self.depth_up_to(MAX_NESTING_DEPTH + 1)
    }

    /// Depth of this tree, walking at most `limit` levels.
    pub fn depth_up_to(&self, limit: usize) -> usize {
        if limit <= 1 {
            return 1;
        }
        1 + self
            .children
            .iter()
            .map(|child| child.depth_up_to(limit - 1))
            .max()
            .unwrap_or(0)
    }

    /// Checks the tree depth against `max_depth`.
    ///
    /// Returns a list of messages, empty if the tree fits. The reported
    /// depth is capped one level past `max_depth`.
    pub fn validate_depth(&self, max_depth: usize) -> Vec<String> {
        let depth = self.depth_up_to(max_depth.saturating_add(1));
        if depth > max_depth {
            vec![format!(
                "Maximum nesting depth of {} exceeded at '{}' (depth: {})",
                max_depth, self.name, depth
            )]
        } else {
            Vec::new()
        }
    }

    /// Returns a copy of this definition with a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Result<Self, DefinitionError> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            ..self.clone()
        })
    }

    /// Builds a node without the construction checks, so tests can
    /// exercise the validator against trees that could not be built.
    #[cfg(test)]
    pub(crate) fn from_parts_unchecked(
        name: &str,
        var_type: VariableType,
        required: bool,
        children: Vec<VariableDefinition>,
    ) -> Self {
        Self {
            name: name.to_string(),
            var_type,
            required,
            description: String::new(),
            default_value: None,
            children,
        }
    }
}

/// Builder for [`VariableDefinition`].
#[derive(Debug, Clone)]
pub struct DefinitionBuilder {
    name: String,
    var_type: VariableType,
    required: bool,
    description: String,
    default_value: Option<Value>,
    children: Vec<VariableDefinition>,
}

impl DefinitionBuilder {
    /// Marks the variable as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn set_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the default value. `null` is treated as no default.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = match value {
            Value::Null => None,
            other => Some(other),
        };
        self
    }

    /// Appends a child definition.
    pub fn child(mut self, child: VariableDefinition) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several child definitions, keeping their order.
    pub fn children(mut self, children: impl IntoIterator<Item = VariableDefinition>) -> Self {
        self.children.extend(children);
        self
    }

    /// Finishes the definition, rejecting bad names, children on
    /// non-nestable types and duplicate sibling names.
    pub fn build(self) -> Result<VariableDefinition, DefinitionError> {
        check_name(&self.name)?;

        if !self.children.is_empty() {
            if !self.var_type.is_nestable() {
                return Err(DefinitionError::ChildrenNotAllowed(self.var_type));
            }

            let duplicates = duplicate_names(self.children.iter().map(|c| c.name.as_str()));
            if !duplicates.is_empty() {
                return Err(DefinitionError::DuplicateChildNames(duplicates));
            }
        }

        Ok(VariableDefinition {
            name: self.name,
            var_type: self.var_type,
            required: self.required,
            description: self.description,
            default_value: self.default_value,
            children: self.children,
        })
    }
}

fn check_name(name: &str) -> Result<(), DefinitionError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(DefinitionError::InvalidName(name.to_string()))
    }
}

/// Names that appear more than once, in order of their second occurrence.
pub(crate) fn duplicate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();

    for name in names {
        if !seen.insert(name) && !duplicates.iter().any(|d| d == name) {
            duplicates.push(name.to_string());
        }
    }

    duplicates
}
