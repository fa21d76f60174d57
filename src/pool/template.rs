//! Template Placeholders
//!
//! Templates reference pool values with `{{#scope.name.path#}}`:
//! - Scope: 1-50 word characters
//! - 1 to 10 further segments, each an identifier of at most 30 characters
//!
//! Anything that does not match (unbalanced braces, empty segments, a bare
//! `{{#scope#}}`) is plain text and survives formatting unchanged.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::variable_pool::VariablePool;
use crate::variable::VariableSelector;

static TEMPLATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(#[a-zA-Z0-9_]{1,50}(?:\.[a-zA-Z_][a-zA-Z0-9_]{0,29}){1,10}#)\}\}")
        .expect("template pattern is valid")
});

/// One placeholder occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Full matched text, e.g. `{{#node.user.name#}}`
    pub raw: String,
    /// Key between the braces, e.g. `#node.user.name#`
    pub key: String,
    /// Dot-split path, e.g. `["node", "user", "name"]`
    pub segments: Vec<String>,
}

fn key_segments(key: &str) -> Vec<String> {
    key.trim_matches('#').split('.').map(str::to_string).collect()
}

// TODO: decide whether unresolved placeholders should keep their original
// `{{#...#}}` form instead of the lossy `{...}` one.
fn unresolved(key: &str) -> String {
    format!("{{{}}}", key.trim_matches('#'))
}

/// Parses a template once and formats it against different inputs.
///
/// # Example
/// ```
/// use flowvars::pool::VariableTemplateParser;
///
/// let parser = VariableTemplateParser::new("Hello {{#start.user.name#}}!");
/// assert_eq!(parser.extract(), vec!["#start.user.name#".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct VariableTemplateParser {
    template: String,
}

impl VariableTemplateParser {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Every placeholder occurrence, in order, duplicates included.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        TEMPLATE_PATTERN
            .captures_iter(&self.template)
            .map(|caps| {
                let key = caps[1].to_string();
                Placeholder {
                    raw: caps[0].to_string(),
                    segments: key_segments(&key),
                    key,
                }
            })
            .collect()
    }

    /// Distinct placeholder keys (`#scope.name#`) in first-seen order.
    pub fn extract(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for caps in TEMPLATE_PATTERN.captures_iter(&self.template) {
            let key = &caps[1];
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// Distinct placeholders as selectors.
    pub fn extract_variable_selectors(&self) -> Vec<VariableSelector> {
        self.extract()
            .into_iter()
            .map(|key| {
                let segments = key_segments(&key);
                VariableSelector::new(key, segments)
            })
            .collect()
    }

    /// Substitutes placeholders from a key → text map.
    ///
    /// `inputs` is keyed like [`extract`](Self::extract) (`#scope.name#`).
    pub fn format(&self, inputs: &HashMap<String, String>) -> String {
        self.render(|key| inputs.get(key).cloned())
    }

    /// Substitutes placeholders with values read from `pool`.
    pub fn format_with_pool(&self, pool: &VariablePool) -> String {
        self.render(|key| pool.get(key_segments(key).as_slice()).map(|segment| segment.text()))
    }

    fn render<F>(&self, resolve: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        TEMPLATE_PATTERN
            .replace_all(&self.template, |caps: &Captures| {
                let key = &caps[1];
                resolve(key).unwrap_or_else(|| {
                    debug!("Unresolved template variable {}", key);
                    unresolved(key)
                })
            })
            .into_owned()
    }
}

/// Shorthand for [`VariableTemplateParser::extract_variable_selectors`].
pub fn extract_selectors_from_template(template: &str) -> Vec<VariableSelector> {
    VariableTemplateParser::new(template).extract_variable_selectors()
}
