//! Reference scanner: `{{name}}` placeholder discovery.
//!
//! Every string anywhere in an entity's field tree is scanned, including fields no user ever
//! sees. Over-matching inside unrelated strings is accepted: a `{{name}}` that happens to name a
//! variable is a reference.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::config::GraphConfig;

/// `{{` + word characters, whitespace, `.` or `-` + `}}`. `\w` covers `_`.
pub static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([\w\s.\-]+)\}\}").expect("placeholder pattern is a valid regex")
});

/// Every placeholder name in `text`, in order of appearance.
pub fn placeholder_names(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Scans entity field trees for variable placeholders, dropping reserved names.
#[derive(Debug, Clone)]
pub struct ReferenceScanner<'c> {
    config: &'c GraphConfig,
}

impl<'c> ReferenceScanner<'c> {
    pub fn new(config: &'c GraphConfig) -> ReferenceScanner<'c> {
        ReferenceScanner { config }
    }

    /// Placeholder names found in `fields`, first-encountered order, duplicates removed.
    pub fn scan_fields(&self, fields: &Map<String, Value>) -> Vec<String> {
        let mut names = Vec::new();
        for value in fields.values() {
            self.scan_value(value, &mut names);
        }
        let mut seen = HashSet::new();
        names.retain(|name| seen.insert(name.clone()));
        names
    }

    /// Recursively collect placeholder names from any JSON value. Non-string scalars are
    /// ignored.
    pub fn scan_value(&self, value: &Value, names: &mut Vec<String>) {
        match value {
            Value::String(text) => names.extend(
                placeholder_names(text)
                    .filter(|name| !self.config.is_reserved(name))
                    .map(str::to_string),
            ),
            Value::Array(items) => {
                for item in items {
                    self.scan_value(item, names);
                }
            }
            Value::Object(map) => {
                for item in map.values() {
                    self.scan_value(item, names);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    /// Resolve scanned names through `lookup`.
    ///
    /// Returns the resolved targets deduplicated by identity (first-encountered order) and the
    /// names that did not resolve.
    pub fn resolve<T, F>(&self, names: &[String], lookup: F) -> (Vec<T>, Vec<String>)
    where
        T: Copy + Eq + std::hash::Hash,
        F: Fn(&str) -> Option<T>,
    {
        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        let mut seen = HashSet::new();
        for name in names {
            match lookup(name) {
                Some(target) => {
                    if seen.insert(target) {
                        resolved.push(target);
                    }
                }
                None => unresolved.push(name.clone()),
            }
        }
        (resolved, unresolved)
    }
}
