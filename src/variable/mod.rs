//! Variable Schema Module
//!
//! Typed, optionally nested variable declarations for workflow nodes, and
//! the tools to check and exchange them.
//!
//! # Structure
//!
//! - [`types`]: Closed type vocabulary and the nestability rule
//! - [`definition`]: Recursive definition tree, checked at construction
//! - [`node_io`]: Selectors and node input/output descriptors
//! - [`validator`]: Schema and runtime-value validation
//! - [`serializer`]: Wire format (JSON/YAML maps)
//! - [`external`]: Translation from the UI vocabulary

pub mod definition;
pub mod external;
pub mod node_io;
pub mod serializer;
pub mod types;
pub mod validator;

pub use definition::{DefinitionBuilder, DefinitionError, VariableDefinition, MAX_NESTING_DEPTH};
pub use external::{translate_external_vocabulary, validate_graph_nested_variables};
pub use node_io::{NodeInputDefinition, NodeOutputDefinition, VariableSelector};
pub use serializer::{
    deserialize_definition,
    serialize_definition,
    validate_serialized_definition,
    SerializerError
};
pub use types::VariableType;
pub use validator::{
    validate_definition,
    validate_definitions,
    validate_value,
    validate_values,
    ErrorCode,
    ValidationError,
    ValidationFailed
};
