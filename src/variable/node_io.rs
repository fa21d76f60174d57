//! Node Input/Output Descriptors
//!
//! Selectors pointing at upstream values and the input/output declarations
//! a workflow node publishes.

use std::fmt;

use serde_json::Value;

use super::definition::{DefinitionError, VariableDefinition};
use super::types::VariableType;

/// References a (possibly nested) value in the variable pool.
///
/// `value_selector` is `[scope, name, ...path]`, e.g.
/// `["node_a", "output", "user", "email"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSelector {
    /// Free-form display string, e.g. `#node_a.output.user.email#`
    pub variable: String,

    /// Ordered path segments
    pub value_selector: Vec<String>,
}

impl VariableSelector {
    pub fn new(variable: impl Into<String>, value_selector: Vec<String>) -> Self {
        Self {
            variable: variable.into(),
            value_selector,
        }
    }

    /// The selector path joined with dots.
    pub fn full_path(&self) -> String {
        self.value_selector.join(".")
    }
}

impl fmt::Display for VariableSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_path())
    }
}

/// Declared input of a workflow node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInputDefinition {
    pub name: String,
    pub var_type: VariableType,
    pub required: bool,
    pub description: String,

    /// Upstream value this input is bound to
    pub variable_selector: Option<VariableSelector>,

    /// Child definitions for `object` and `array[object]` inputs
    pub children: Vec<VariableDefinition>,

    pub default_value: Option<Value>,
}

impl NodeInputDefinition {
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_type,
            required: false,
            description: String::new(),
            variable_selector: None,
            children: Vec::new(),
            default_value: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_selector(mut self, selector: VariableSelector) -> Self {
        self.variable_selector = Some(selector);
        self
    }

    pub fn with_children(mut self, children: Vec<VariableDefinition>) -> Self {
        self.children = children;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value).filter(|v| !v.is_null());
        self
    }

    /// The schema this input accepts, for validating bound values.
    pub fn to_definition(&self) -> Result<VariableDefinition, DefinitionError> {
        let mut builder = VariableDefinition::builder(self.name.clone(), self.var_type)
            .set_required(self.required)
            .description(self.description.clone())
            .children(self.children.iter().cloned());

        if let Some(default) = &self.default_value {
            builder = builder.default_value(default.clone());
        }

        builder.build()
    }
}

/// Declared output of a workflow node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOutputDefinition {
    pub name: String,
    pub var_type: VariableType,
    pub description: String,
    pub children: Vec<VariableDefinition>,
}

impl NodeOutputDefinition {
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_type,
            description: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_children(mut self, children: Vec<VariableDefinition>) -> Self {
        self.children = children;
        self
    }

    /// The schema this output produces. Outputs are never required.
    pub fn to_definition(&self) -> Result<VariableDefinition, DefinitionError> {
        VariableDefinition::builder(self.name.clone(), self.var_type)
            .description(self.description.clone())
            .children(self.children.iter().cloned())
            .build()
    }
}
