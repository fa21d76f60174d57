//! Variable Pool Module
//!
//! Runtime storage for one workflow execution.
//!
//! # Structure
//!
//! - [`segment`]: Typed wrapper around stored values
//! - [`variable_pool`]: Selector-addressed store with copy-on-write nested writes
//! - [`template`]: `{{#scope.name.path#}}` extraction and substitution

pub mod segment;
pub mod template;
pub mod variable_pool;

pub use segment::{Segment, SegmentType};
pub use template::{extract_selectors_from_template, Placeholder, VariableTemplateParser};
pub use variable_pool::{
    MergeStrategy,
    PoolError,
    SystemVariables,
    VariablePool,
    SYSTEM_VARIABLE_NODE_ID
};
