//! Entity compiler: raw payload objects to typed records.
//!
//! The kind-specific ID field (`tagId`, `triggerId`, `variableId`) is normalized into the
//! record's [ObjectId]; every other field, `name` included, is copied through verbatim. Edge
//! lists start empty.

use serde_json::{Map, Value};

use crate::{
    codec::{diagnostic::BuildDiagnostic, input::RawContainerVersion},
    entity::{Tag, Trigger, Variable},
    properties::{EntityKind, ObjectId},
};

/// Split a raw entity into (object ID, name, passthrough fields).
pub fn split_entity(
    kind: EntityKind,
    raw: &Map<String, Value>,
    diagnostics: &mut Vec<BuildDiagnostic>,
) -> (ObjectId, String, Map<String, Value>) {
    let mut fields = raw.clone();
    let name = fields
        .get("name")
        .and_then(ObjectId::from_value)
        .map(|name| name.to_string())
        .unwrap_or_default();

    // shift_remove keeps the remaining fields in payload order.
    let object_id = match fields
        .shift_remove(kind.id_field())
        .map(|value| ObjectId::from_value(&value))
    {
        Some(Some(object_id)) => object_id,
        Some(None) => {
            tracing::warn!(
                "[compile] {} '{}' has a non-scalar {}; using an empty ID",
                kind,
                name,
                kind.id_field()
            );
            diagnostics.push(BuildDiagnostic::MissingObjectId {
                kind,
                name: name.clone(),
            });
            ObjectId::default()
        }
        None => {
            tracing::warn!("[compile] {} '{}' has no {}", kind, name, kind.id_field());
            diagnostics.push(BuildDiagnostic::MissingObjectId {
                kind,
                name: name.clone(),
            });
            ObjectId::default()
        }
    };
    (object_id, name, fields)
}

/// Compiled entity tables, in payload order.
#[derive(Debug, Default, Clone)]
pub struct CompiledEntities {
    pub tags: Vec<Tag>,
    pub triggers: Vec<Trigger>,
    pub variables: Vec<Variable>,
}

pub fn compile_entities(
    raw: &RawContainerVersion<'_>,
    diagnostics: &mut Vec<BuildDiagnostic>,
) -> CompiledEntities {
    let tags = raw
        .tags
        .iter()
        .map(|item| {
            let (object_id, name, fields) = split_entity(EntityKind::Tag, item, diagnostics);
            Tag::new(object_id, name, fields)
        })
        .collect::<Vec<_>>();
    let triggers = raw
        .triggers
        .iter()
        .map(|item| {
            let (object_id, name, fields) = split_entity(EntityKind::Trigger, item, diagnostics);
            Trigger::new(object_id, name, fields)
        })
        .collect::<Vec<_>>();
    let variables = raw
        .variables
        .iter()
        .map(|item| {
            let (object_id, name, fields) = split_entity(EntityKind::Variable, item, diagnostics);
            Variable::new(object_id, name, fields)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "[compile] compiled {} tags, {} triggers, {} variables",
        tags.len(),
        triggers.len(),
        variables.len()
    );
    CompiledEntities {
        tags,
        triggers,
        variables,
    }
}
