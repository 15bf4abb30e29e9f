//! Structural decoding of a container export.
//!
//! Only the shape needed to build the graph is checked: the `containerVersion` section must
//! exist and the entity collections, when present, must be arrays of objects. Everything inside
//! an entity is left untouched for the compiler to pass through.

use serde_json::{Map, Value};

use crate::{error::GtmGraphError, properties::EntityKind};

pub const CONTAINER_VERSION_FIELD: &str = "containerVersion";
pub const CONTAINER_FIELD: &str = "container";
pub const ENABLED_BUILT_IN_VARIABLE_FIELD: &str = "enabledBuiltInVariable";
pub const BUILT_IN_VARIABLE_FIELD: &str = "builtInVariable";

/// Parse container JSON text. Unparseable text is [GtmGraphError::InvalidInput].
pub fn parse_json(content: &str) -> Result<Value, GtmGraphError> {
    serde_json::from_str(content).map_err(|e| {
        GtmGraphError::InvalidInput(format!("Error in specified container JSON: {e}"))
    })
}

/// Borrowed view of the parts of a `containerVersion` the graph build consumes.
#[derive(Debug, Clone)]
pub struct RawContainerVersion<'a> {
    pub version: &'a Map<String, Value>,
    pub container: Option<&'a Map<String, Value>>,
    pub tags: Vec<&'a Map<String, Value>>,
    pub triggers: Vec<&'a Map<String, Value>>,
    pub variables: Vec<&'a Map<String, Value>>,
    /// `container.enabledBuiltInVariable` entries followed by `builtInVariable` entries.
    pub builtins: Vec<&'a Value>,
}

impl<'a> RawContainerVersion<'a> {
    /// Locate the container version within `root`.
    ///
    /// Accepts `{ "containerVersion": {...} }`, or a bare container version (an object carrying
    /// a `container` key) as returned by the container-version API directly.
    pub fn from_value(root: &'a Value) -> Result<RawContainerVersion<'a>, GtmGraphError> {
        let root = root.as_object().ok_or_else(|| {
            GtmGraphError::InvalidInput(format!(
                "Specified container is invalid: expected a JSON object, found {}",
                json_type_name(root)
            ))
        })?;

        let version = match root.get(CONTAINER_VERSION_FIELD).and_then(Value::as_object) {
            Some(version) => version,
            None if root.contains_key(CONTAINER_FIELD) => root,
            None => return Err(GtmGraphError::MissingContainerVersion),
        };

        let container = match version.get(CONTAINER_FIELD) {
            Some(Value::Object(container)) => Some(container),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(GtmGraphError::InvalidInput(format!(
                    "'{CONTAINER_FIELD}' must be an object, found {}",
                    json_type_name(other)
                )))
            }
        };

        let mut builtins = Vec::new();
        if let Some(container) = container {
            builtins.extend(builtin_entries(container, ENABLED_BUILT_IN_VARIABLE_FIELD));
        }
        builtins.extend(builtin_entries(version, BUILT_IN_VARIABLE_FIELD));

        Ok(RawContainerVersion {
            version,
            container,
            tags: collection(version, EntityKind::Tag)?,
            triggers: collection(version, EntityKind::Trigger)?,
            variables: collection(version, EntityKind::Variable)?,
            builtins,
        })
    }

    pub fn collection(&self, kind: EntityKind) -> &[&'a Map<String, Value>] {
        match kind {
            EntityKind::Tag => &self.tags,
            EntityKind::Trigger => &self.triggers,
            EntityKind::Variable => &self.variables,
        }
    }
}

fn collection(
    version: &Map<String, Value>,
    kind: EntityKind,
) -> Result<Vec<&Map<String, Value>>, GtmGraphError> {
    let field = kind.collection_field();
    match version.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                item.as_object().ok_or_else(|| {
                    GtmGraphError::InvalidInput(format!(
                        "'{field}[{idx}]' must be an object, found {}",
                        json_type_name(item)
                    ))
                })
            })
            .collect(),
        Some(other) => Err(GtmGraphError::InvalidInput(format!(
            "'{field}' must be an array, found {}",
            json_type_name(other)
        ))),
    }
}

fn builtin_entries<'a>(section: &'a Map<String, Value>, field: &str) -> Vec<&'a Value> {
    match section.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => {
            tracing::warn!(
                "[RawContainerVersion] ignoring '{}': expected an array, found {}",
                field,
                json_type_name(other)
            );
            Vec::new()
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_log::test;

    #[test]
    fn unparseable_text_is_invalid_input() {
        assert!(matches!(
            parse_json("{not json"),
            Err(GtmGraphError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_object_root_is_invalid_input() {
        let root = json!([1, 2, 3]);
        assert!(matches!(
            RawContainerVersion::from_value(&root),
            Err(GtmGraphError::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_container_version() {
        let root = json!({"tag": []});
        assert!(matches!(
            RawContainerVersion::from_value(&root),
            Err(GtmGraphError::MissingContainerVersion)
        ));
        let root = json!({"containerVersion": null});
        assert!(matches!(
            RawContainerVersion::from_value(&root),
            Err(GtmGraphError::MissingContainerVersion)
        ));
    }

    #[test]
    fn bare_container_version_is_accepted() {
        let root = json!({"container": {"enabledBuiltInVariable": ["PAGE_URL"]}, "tag": [{"tagId": "1"}]});
        let raw = RawContainerVersion::from_value(&root).unwrap();
        assert_eq!(raw.tags.len(), 1);
        assert_eq!(raw.builtins, vec![&json!("PAGE_URL")]);
    }

    #[test]
    fn absent_collections_are_empty() {
        let root = json!({"containerVersion": {"container": {}}});
        let raw = RawContainerVersion::from_value(&root).unwrap();
        assert!(raw.tags.is_empty());
        assert!(raw.triggers.is_empty());
        assert!(raw.variables.is_empty());
        assert!(raw.builtins.is_empty());
    }

    #[test]
    fn malformed_collections_are_invalid_input() {
        let root = json!({"containerVersion": {"tag": {"tagId": "1"}}});
        assert!(matches!(
            RawContainerVersion::from_value(&root),
            Err(GtmGraphError::InvalidInput(_))
        ));
        let root = json!({"containerVersion": {"variable": ["Page URL"]}});
        assert!(matches!(
            RawContainerVersion::from_value(&root),
            Err(GtmGraphError::InvalidInput(_))
        ));
    }

    #[test]
    fn builtins_are_collected_from_both_locations() {
        let root = json!({"containerVersion": {
            "container": {"enabledBuiltInVariable": ["PAGE_URL", "CLICK_ID"]},
            "builtInVariable": [{"type": "pagePath", "name": "Page Path"}]
        }});
        let raw = RawContainerVersion::from_value(&root).unwrap();
        assert_eq!(raw.builtins.len(), 3);
        assert!(raw.container.is_some());
    }
}
