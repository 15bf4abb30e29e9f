//! ContainerGraph: the built, read-only graph of one container.
//!
//! Entities live in one table per kind and address each other by arena index
//! ([TagIndex], [TriggerIndex], [VariableIndex]); a back edge is just an index list on the
//! target. Nothing mutates the tables once [crate::codec::GraphBuilder] hands the graph out.

use serde::Serialize;
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

use crate::{
    codec::{compiler::CompiledEntities, input::CONTAINER_FIELD, BuildDiagnostic, GraphBuilder},
    entity::{sorted_by_name, ContainerEntity, Tag, Trigger, Variable},
    error::GtmGraphError,
    nodekey::EntityKey,
    properties::{EntityKind, EntityRef, TagIndex, TriggerIndex, VariableIndex},
};

use super::EntityContext;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContainerGraph {
    version: Map<String, Value>,
    tags: Vec<Tag>,
    triggers: Vec<Trigger>,
    variables: Vec<Variable>,
    diagnostics: Vec<BuildDiagnostic>,
}

impl fmt::Display for ContainerGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ContainerGraph({} tags, {} triggers, {} variables)",
            self.num_tags(),
            self.num_triggers(),
            self.num_variables()
        )
    }
}

impl FromStr for ContainerGraph {
    type Err = GtmGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GraphBuilder::default().build_str(s)
    }
}

impl TryFrom<&Value> for ContainerGraph {
    type Error = GtmGraphError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        GraphBuilder::default().build_value(value)
    }
}

impl ContainerGraph {
    pub(crate) fn from_parts(
        version: Map<String, Value>,
        entities: CompiledEntities,
        diagnostics: Vec<BuildDiagnostic>,
    ) -> ContainerGraph {
        ContainerGraph {
            version,
            tags: entities.tags,
            triggers: entities.triggers,
            variables: entities.variables,
            diagnostics,
        }
    }

    /// The raw `containerVersion` section the graph was built from.
    pub fn container_version(&self) -> &Map<String, Value> {
        &self.version
    }

    /// The raw `containerVersion.container` section, if present.
    pub fn container(&self) -> Option<&Map<String, Value>> {
        self.version.get(CONTAINER_FIELD).and_then(Value::as_object)
    }

    pub fn has_container(&self) -> bool {
        !self.version.is_empty()
    }

    pub fn diagnostics(&self) -> &[BuildDiagnostic] {
        &self.diagnostics
    }

    // Arena access, payload order

    pub fn tag(&self, idx: TagIndex) -> Option<&Tag> {
        self.tags.get(idx.index())
    }

    pub fn trigger(&self, idx: TriggerIndex) -> Option<&Trigger> {
        self.triggers.get(idx.index())
    }

    pub fn variable(&self, idx: VariableIndex) -> Option<&Variable> {
        self.variables.get(idx.index())
    }

    pub fn tag_table(&self) -> &[Tag] {
        &self.tags
    }

    pub fn trigger_table(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn variable_table(&self) -> &[Variable] {
        &self.variables
    }

    pub fn entity(&self, entity: EntityRef) -> Option<&dyn ContainerEntity> {
        match entity {
            EntityRef::Tag(idx) => self.tag(idx).map(|e| e as &dyn ContainerEntity),
            EntityRef::Trigger(idx) => self.trigger(idx).map(|e| e as &dyn ContainerEntity),
            EntityRef::Variable(idx) => self.variable(idx).map(|e| e as &dyn ContainerEntity),
        }
    }

    pub fn context(&self, entity: EntityRef) -> Option<EntityContext<'_>> {
        self.entity(entity)?;
        Some(EntityContext::new(self, entity))
    }

    /// Every entity address of `kind`, payload order.
    pub fn entity_refs(&self, kind: EntityKind) -> Vec<EntityRef> {
        match kind {
            EntityKind::Tag => (0..self.tags.len()).map(|i| TagIndex(i).into()).collect(),
            EntityKind::Trigger => (0..self.triggers.len())
                .map(|i| TriggerIndex(i).into())
                .collect(),
            EntityKind::Variable => (0..self.variables.len())
                .map(|i| VariableIndex(i).into())
                .collect(),
        }
    }

    // Counts

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn num_triggers(&self) -> usize {
        self.triggers.len()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn has_tags(&self) -> bool {
        self.num_tags() > 0
    }

    pub fn has_triggers(&self) -> bool {
        self.num_triggers() > 0
    }

    pub fn has_variables(&self) -> bool {
        self.num_variables() > 0
    }

    // Sorted listings

    pub fn get_tags(&self) -> Vec<&Tag> {
        sorted_by_name(self.tags.iter())
    }

    pub fn get_triggers(&self) -> Vec<&Trigger> {
        sorted_by_name(self.triggers.iter())
    }

    pub fn get_variables(&self) -> Vec<&Variable> {
        sorted_by_name(self.variables.iter())
    }

    // Finders: first match in payload order

    pub fn tag_index_by_id(&self, id: &str) -> Option<TagIndex> {
        self.tags.iter().position(|t| t.matches_id(id)).map(TagIndex)
    }

    pub fn tag_index_by_name(&self, name: &str) -> Option<TagIndex> {
        self.tags.iter().position(|t| t.matches_name(name)).map(TagIndex)
    }

    pub fn trigger_index_by_id(&self, id: &str) -> Option<TriggerIndex> {
        self.triggers
            .iter()
            .position(|t| t.matches_id(id))
            .map(TriggerIndex)
    }

    pub fn trigger_index_by_name(&self, name: &str) -> Option<TriggerIndex> {
        self.triggers
            .iter()
            .position(|t| t.matches_name(name))
            .map(TriggerIndex)
    }

    pub fn variable_index_by_id(&self, id: &str) -> Option<VariableIndex> {
        self.variables
            .iter()
            .position(|v| v.matches_id(id))
            .map(VariableIndex)
    }

    pub fn variable_index_by_name(&self, name: &str) -> Option<VariableIndex> {
        self.variables
            .iter()
            .position(|v| v.matches_name(name))
            .map(VariableIndex)
    }

    pub fn find_tag_by_id(&self, id: &str) -> Option<&Tag> {
        self.tag_index_by_id(id).and_then(|idx| self.tag(idx))
    }

    pub fn find_tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tag_index_by_name(name).and_then(|idx| self.tag(idx))
    }

    pub fn find_trigger_by_id(&self, id: &str) -> Option<&Trigger> {
        self.trigger_index_by_id(id).and_then(|idx| self.trigger(idx))
    }

    pub fn find_trigger_by_name(&self, name: &str) -> Option<&Trigger> {
        self.trigger_index_by_name(name)
            .and_then(|idx| self.trigger(idx))
    }

    pub fn find_variable_by_id(&self, id: &str) -> Option<&Variable> {
        self.variable_index_by_id(id)
            .and_then(|idx| self.variable(idx))
    }

    pub fn find_variable_by_name(&self, name: &str) -> Option<&Variable> {
        self.variable_index_by_name(name)
            .and_then(|idx| self.variable(idx))
    }

    /// Resolve an [EntityKey] to the first matching entity.
    pub fn find(&self, key: &EntityKey) -> Option<EntityRef> {
        match key {
            EntityKey::Id { kind, id } => match kind {
                EntityKind::Tag => self.tag_index_by_id(id).map(EntityRef::from),
                EntityKind::Trigger => self.trigger_index_by_id(id).map(EntityRef::from),
                EntityKind::Variable => self.variable_index_by_id(id).map(EntityRef::from),
            },
            EntityKey::Name { kind, name } => match kind {
                EntityKind::Tag => self.tag_index_by_name(name).map(EntityRef::from),
                EntityKind::Trigger => self.trigger_index_by_name(name).map(EntityRef::from),
                EntityKind::Variable => self.variable_index_by_name(name).map(EntityRef::from),
            },
        }
    }
}
