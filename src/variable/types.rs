//! Variable Type Vocabulary
//!
//! The closed set of type tags a variable definition can declare.
//!
//! Tags serialize to the canonical strings used on the wire and in
//! persisted workflow documents:
//!
//! ```text
//! string  integer  number  boolean  object  file
//! array[string]  array[integer]  array[number]
//! array[boolean] array[object]   array[file]
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::definition::DefinitionError;

/// Declared type of a variable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "array[string]")]
    ArrayString,
    #[serde(rename = "array[integer]")]
    ArrayInteger,
    #[serde(rename = "array[number]")]
    ArrayNumber,
    #[serde(rename = "array[boolean]")]
    ArrayBoolean,
    #[serde(rename = "array[object]")]
    ArrayObject,
    #[serde(rename = "array[file]")]
    ArrayFile,
}

impl VariableType {
    /// Every tag, scalars first.
    pub const ALL: [VariableType; 12] = [
        VariableType::String,
        VariableType::Integer,
        VariableType::Number,
        VariableType::Boolean,
        VariableType::Object,
        VariableType::File,
        VariableType::ArrayString,
        VariableType::ArrayInteger,
        VariableType::ArrayNumber,
        VariableType::ArrayBoolean,
        VariableType::ArrayObject,
        VariableType::ArrayFile,
    ];

    /// Canonical tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::File => "file",
            Self::ArrayString => "array[string]",
            Self::ArrayInteger => "array[integer]",
            Self::ArrayNumber => "array[number]",
            Self::ArrayBoolean => "array[boolean]",
            Self::ArrayObject => "array[object]",
            Self::ArrayFile => "array[file]",
        }
    }

    /// True for the only two types allowed to carry children:
    /// `object` and `array[object]`.
    pub fn is_nestable(&self) -> bool {
        matches!(self, Self::Object | Self::ArrayObject)
    }

    /// True for every `array[...]` tag.
    pub fn is_array(&self) -> bool {
        self.element_type().is_some()
    }

    /// Element type of an array tag, `None` for scalars and `object`.
    pub fn element_type(&self) -> Option<VariableType> {
        match self {
            Self::ArrayString => Some(Self::String),
            Self::ArrayInteger => Some(Self::Integer),
            Self::ArrayNumber => Some(Self::Number),
            Self::ArrayBoolean => Some(Self::Boolean),
            Self::ArrayObject => Some(Self::Object),
            Self::ArrayFile => Some(Self::File),
            Self::String
            | Self::Integer
            | Self::Number
            | Self::Boolean
            | Self::Object
            | Self::File => None,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DefinitionError::UnknownType(s.to_string()))
    }
}
