//! Context view for walking the graph from one entity.
//!
//! [EntityContext] bundles an entity address with its graph so display code can enumerate an
//! entity's related entities without matching on the entity kind.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    entity::ContainerEntity,
    properties::{EntityRef, ObjectId},
};

use super::ContainerGraph;

/// A named group of related entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// Tags referencing the entity (triggers, variables).
    Tags,
    /// Triggers used by a tag, or triggers referencing a variable.
    Triggers,
    /// Variables the entity references.
    Variables,
    /// Variables referencing a variable.
    ReferencingVariables,
}

impl Relation {
    pub fn label(&self) -> &'static str {
        match self {
            Relation::Tags => "Tags",
            Relation::Triggers => "Triggers",
            Relation::Variables => "Variables",
            Relation::ReferencingVariables => "Referenced by variables",
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntityContext<'a> {
    graph: &'a ContainerGraph,
    entity: EntityRef,
}

impl<'a> EntityContext<'a> {
    pub(crate) fn new(graph: &'a ContainerGraph, entity: EntityRef) -> EntityContext<'a> {
        EntityContext { graph, entity }
    }

    pub fn entity_ref(&self) -> EntityRef {
        self.entity
    }

    pub fn graph(&self) -> &'a ContainerGraph {
        self.graph
    }

    /// The entity itself. Contexts are only handed out for addresses present in the graph.
    pub fn node(&self) -> Option<&'a dyn ContainerEntity> {
        self.graph.entity(self.entity)
    }

    pub fn name(&self) -> &'a str {
        self.node().map(|n| n.name()).unwrap_or_default()
    }

    pub fn object_id(&self) -> Option<&'a ObjectId> {
        self.node().map(|n| n.object_id())
    }

    /// Addresses related to this entity through `relation`, unsorted.
    pub fn related_refs(&self, relation: Relation) -> Vec<EntityRef> {
        let graph = self.graph;
        match (self.entity, relation) {
            (EntityRef::Tag(idx), Relation::Triggers) => graph
                .tag(idx)
                .map(|t| t.triggers.iter().map(|i| EntityRef::from(*i)).collect())
                .unwrap_or_default(),
            (EntityRef::Tag(idx), Relation::Variables) => graph
                .tag(idx)
                .map(|t| t.variables.iter().map(|i| EntityRef::from(*i)).collect())
                .unwrap_or_default(),
            (EntityRef::Trigger(idx), Relation::Tags) => graph
                .trigger(idx)
                .map(|t| t.tags.iter().map(|i| EntityRef::from(*i)).collect())
                .unwrap_or_default(),
            (EntityRef::Trigger(idx), Relation::Variables) => graph
                .trigger(idx)
                .map(|t| t.variables.iter().map(|i| EntityRef::from(*i)).collect())
                .unwrap_or_default(),
            (EntityRef::Variable(idx), Relation::Tags) => graph
                .variable(idx)
                .map(|v| v.tags.iter().map(|i| EntityRef::from(*i)).collect())
                .unwrap_or_default(),
            (EntityRef::Variable(idx), Relation::Triggers) => graph
                .variable(idx)
                .map(|v| v.triggers.iter().map(|i| EntityRef::from(*i)).collect())
                .unwrap_or_default(),
            (EntityRef::Variable(idx), Relation::Variables) => graph
                .variable(idx)
                .map(|v| v.variables.iter().map(|i| EntityRef::from(*i)).collect())
                .unwrap_or_default(),
            (EntityRef::Variable(idx), Relation::ReferencingVariables) => graph
                .variable(idx)
                .map(|v| {
                    v.referencing_variables
                        .iter()
                        .map(|i| EntityRef::from(*i))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Related entities through `relation`, sorted by name.
    pub fn related(&self, relation: Relation) -> Vec<EntityContext<'a>> {
        let mut related = self
            .related_refs(relation)
            .into_iter()
            .map(|entity| EntityContext::new(self.graph, entity))
            .collect::<Vec<_>>();
        related.sort_by(|a, b| a.name().cmp(b.name()));
        related
    }

    pub fn has(&self, relation: Relation) -> bool {
        !self.related_refs(relation).is_empty()
    }

    /// Non-empty relation groups in display order: tags, triggers, variables, referrers.
    pub fn children(&self) -> Vec<(Relation, Vec<EntityContext<'a>>)> {
        [
            Relation::Tags,
            Relation::Triggers,
            Relation::Variables,
            Relation::ReferencingVariables,
        ]
        .into_iter()
        .map(|relation| (relation, self.related(relation)))
        .filter(|(_, related)| !related.is_empty())
        .collect()
    }
}
