//! Variable Pool
//!
//! Per-execution store of node outputs and system variables, addressed by
//! selectors of the form `[scope, name, ...path]`.
//!
//! Entries are held as `Arc<Segment>` and never mutated in place: every
//! write builds a new segment and swaps the entry, so a segment handed out
//! by [`VariablePool::get`] keeps its value for as long as the caller holds it.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::segment::Segment;
use super::template::VariableTemplateParser;
use crate::variable::validator::{first_value_violation, ErrorCode, ValidationError};
use crate::variable::VariableDefinition;

/// Scope holding the system variables.
pub const SYSTEM_VARIABLE_NODE_ID: &str = "sys";

/// Number of segments in a top-level selector: `[scope, name]`.
pub const SELECTOR_LENGTH: usize = 2;

/// Errors raised by pool writes and fail-fast checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolError {
    #[error("Invalid selector {selector:?}: expected [scope, name]")]
    InvalidSelector { selector: Vec<String> },

    #[error("Variable '{0}' not found")]
    NotFound(String),

    #[error("Required field '{0}' is missing")]
    RequiredFieldMissing(String),

    #[error("Type mismatch at '{path}': {detail}")]
    TypeMismatch { path: String, detail: String },

    #[error("Array element at '{0}' must be an object")]
    InvalidArrayElement(String),

    #[error("Invalid definition at '{path}': {detail}")]
    InvalidDefinition { path: String, detail: String },
}

impl From<ValidationError> for PoolError {
    fn from(error: ValidationError) -> Self {
        match error.code {
            ErrorCode::RequiredFieldMissing => Self::RequiredFieldMissing(error.path),
            ErrorCode::TypeMismatch => Self::TypeMismatch {
                path: error.path,
                detail: lowercase_first(&error.message),
            },
            ErrorCode::InvalidArrayElement => Self::InvalidArrayElement(error.path),
            ErrorCode::MaxDepthExceeded
            | ErrorCode::InvalidChildrenType
            | ErrorCode::DuplicateChildName
            | ErrorCode::InvalidDefinition => Self::InvalidDefinition {
                path: error.path,
                detail: error.message,
            },
        }
    }
}

fn lowercase_first(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// How [`VariablePool::merge_nested_objects`] combines overlapping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Later sources replace whole top-level keys.
    Shallow,
    /// Maps present on both sides are merged key by key.
    #[default]
    Deep,
}

/// Values seeded into the `sys` scope when a pool is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SystemVariables {
    pub user_id: Option<String>,
    pub app_id: Option<String>,
    pub workflow_id: Option<String>,
    pub workflow_execution_id: Option<String>,
    pub query: Option<String>,
    pub conversation_id: Option<String>,
}

impl SystemVariables {
    fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("user_id", &self.user_id),
            ("app_id", &self.app_id),
            ("workflow_id", &self.workflow_id),
            ("workflow_execution_id", &self.workflow_execution_id),
            ("query", &self.query),
            ("conversation_id", &self.conversation_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
    }
}

type Scope = HashMap<String, Arc<Segment>>;

/// Two-level store: scope id → variable name → segment.
#[derive(Debug, Clone)]
pub struct VariablePool {
    variables: HashMap<String, Scope>,
}

impl Default for VariablePool {
    fn default() -> Self {
        Self::empty()
    }
}

impl VariablePool {
    pub fn new(system: SystemVariables) -> Self {
        let mut sys = Scope::new();
        for (key, value) in system.entries() {
            sys.insert(key.to_string(), Arc::new(Segment::from(value)));
        }

        let mut variables = HashMap::new();
        variables.insert(SYSTEM_VARIABLE_NODE_ID.to_string(), sys);

        Self { variables }
    }

    pub fn empty() -> Self {
        Self::new(SystemVariables::default())
    }

    /// Read-only view of every stored entry.
    pub fn variable_dictionary(&self) -> &HashMap<String, HashMap<String, Arc<Segment>>> {
        &self.variables
    }

    /// Stores `value` at `[scope, name]`, replacing any previous entry.
    pub fn add<S: AsRef<str>>(
        &mut self,
        selector: &[S],
        value: impl Into<Segment>,
    ) -> Result<(), PoolError> {
        let (scope, name) = split_selector(selector)?;
        let segment = value.into();
        debug!(
            "Adding variable {}.{} ({})",
            scope,
            name,
            segment.segment_type()
        );
        self.insert(scope, name, segment);
        Ok(())
    }

    /// Reads `[scope, name]`, or a nested value when the selector is longer.
    ///
    /// Extra segments walk maps only; anything else along the way, including
    /// a missing key, is "not found". Stored `null`, `""`, `0` and `false`
    /// all come back as segments.
    pub fn get<S: AsRef<str>>(&self, selector: &[S]) -> Option<Arc<Segment>> {
        if selector.len() < SELECTOR_LENGTH {
            return None;
        }

        let segment = self
            .variables
            .get(selector[0].as_ref())?
            .get(selector[1].as_ref())?;

        let path = &selector[SELECTOR_LENGTH..];
        if path.is_empty() {
            return Some(Arc::clone(segment));
        }

        let mut current = segment.as_object()?.get(path[0].as_ref())?;
        for key in &path[1..] {
            current = current.as_object()?.get(key.as_ref())?;
        }
        Some(Arc::new(Segment::from_value(current.clone())))
    }

    /// [`get`](Self::get) with an optional dot-joined path.
    pub fn get_nested<S: AsRef<str>>(&self, selector: &[S], path: Option<&str>) -> Option<Arc<Segment>> {
        let mut full: Vec<&str> = selector.iter().map(|s| s.as_ref()).collect();
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            full.extend(path.split('.'));
        }
        self.get(full.as_slice())
    }

    /// Sets `path` inside the object stored at `[scope, name]`.
    ///
    /// Missing intermediate maps are created. Returns `false` without
    /// touching the pool when there is no stored object, when the path has
    /// an empty segment, or when an intermediate value is not a map.
    pub fn set_nested<S: AsRef<str>>(&mut self, selector: &[S], path: &str, value: impl Into<Value>) -> bool {
        let (scope, name) = match split_selector(selector) {
            Ok(key) => key,
            Err(e) => {
                warn!("{}", e);
                return false;
            }
        };

        let mut root = match self.variables.get(scope).and_then(|s| s.get(name)) {
            Some(segment) => match segment.as_object() {
                Some(map) => map.clone(),
                None => {
                    warn!("Cannot set '{}' on {}.{}: not an object", path, scope, name);
                    return false;
                }
            },
            None => {
                warn!("Cannot set '{}' on {}.{}: variable not found", path, scope, name);
                return false;
            }
        };

        let parts: Vec<&str> = path.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            warn!("Rejected empty path segment in '{}'", path);
            return false;
        }
        let Some((last, intermediate)) = parts.split_last() else {
            return false;
        };

        let mut current = &mut root;
        for part in intermediate {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match entry {
                Value::Object(map) => map,
                _ => {
                    warn!(
                        "Cannot set '{}' on {}.{}: '{}' is not an object",
                        path, scope, name, part
                    );
                    return false;
                }
            };
        }
        current.insert(last.to_string(), value.into());

        debug!("Set {}.{}.{}", scope, name, path);
        self.insert(scope, name, Segment::Object(root));
        true
    }

    /// Like [`add`](Self::add), but rejects `value` on the first violation
    /// of `definition` when one is given.
    pub fn add_nested<S: AsRef<str>>(
        &mut self,
        selector: &[S],
        value: Value,
        definition: Option<&VariableDefinition>,
    ) -> Result<(), PoolError> {
        if let Some(definition) = definition {
            if let Some(violation) = first_value_violation(Some(&value), definition) {
                warn!("Rejected insert: {}", violation);
                return Err(violation.into());
            }
        }
        self.add(selector, value)
    }

    /// Drops a whole scope (one segment) or a single variable (two).
    ///
    /// The `sys` scope is emptied rather than removed.
    pub fn remove<S: AsRef<str>>(&mut self, selector: &[S]) {
        match selector {
            [] => {}
            [scope] => {
                let scope = scope.as_ref();
                debug!("Removing scope {}", scope);
                if scope == SYSTEM_VARIABLE_NODE_ID {
                    if let Some(sys) = self.variables.get_mut(scope) {
                        sys.clear();
                    }
                } else {
                    self.variables.remove(scope);
                }
            }
            [scope, name, ..] => {
                if let Some(vars) = self.variables.get_mut(scope.as_ref()) {
                    debug!("Removing variable {}.{}", scope.as_ref(), name.as_ref());
                    vars.remove(name.as_ref());
                }
            }
        }
    }

    /// Merges the objects at `sources`, in order, into a new entry at `target`.
    ///
    /// Sources that are missing or not objects are skipped.
    pub fn merge_nested_objects<S, T>(
        &mut self,
        target: &[S],
        sources: &[T],
        strategy: MergeStrategy,
    ) -> Result<(), PoolError>
    where
        S: AsRef<str>,
        T: AsRef<[S]>,
    {
        split_selector(target)?;

        let mut merged = Map::new();
        for source in sources {
            let source = source.as_ref();
            match self.get(source).as_deref() {
                Some(Segment::Object(map)) => match strategy {
                    MergeStrategy::Shallow => {
                        merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
                    }
                    MergeStrategy::Deep => deep_merge(&mut merged, map),
                },
                _ => debug!("Skipping non-object merge source {}", join_selector(source)),
            }
        }

        self.add(target, Segment::Object(merged))
    }

    /// Checks the stored value at `selector` against `definition`, failing
    /// on the first violation.
    pub fn validate_nested_structure<S: AsRef<str>>(
        &self,
        selector: &[S],
        definition: &VariableDefinition,
    ) -> Result<(), PoolError> {
        let segment = self
            .get(selector)
            .ok_or_else(|| PoolError::NotFound(join_selector(selector)))?;

        match first_value_violation(Some(&segment.to_value()), definition) {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }

    /// Expands every `{{#scope.name...#}}` placeholder against this pool.
    pub fn convert_template(&self, template: &str) -> String {
        VariableTemplateParser::new(template).format_with_pool(self)
    }

    fn insert(&mut self, scope: &str, name: &str, segment: Segment) {
        self.variables
            .entry(scope.to_string())
            .or_default()
            .insert(name.to_string(), Arc::new(segment));
    }
}

fn split_selector<S: AsRef<str>>(selector: &[S]) -> Result<(&str, &str), PoolError> {
    match selector {
        [scope, name] => Ok((scope.as_ref(), name.as_ref())),
        _ => Err(PoolError::InvalidSelector {
            selector: selector.iter().map(|s| s.as_ref().to_string()).collect(),
        }),
    }
}

fn join_selector<S: AsRef<str>>(selector: &[S]) -> String {
    selector
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(".")
}

fn deep_merge(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => deep_merge(existing, incoming),
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
