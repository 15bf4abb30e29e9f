//! Graph exports of a [ContainerGraph].
//!
//! - [`RefGraph`]: petgraph view of every forward edge, nodes addressed by [EntityRef]
//! - [`ContainerSnapshot`]: serializable view keyed by object ID for rendering layers

use petgraph::{dot::Dot, graph::NodeIndex, IntoWeightedEdge};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::Write,
    ops::{Deref, DerefMut},
};

use crate::{
    entity::{sorted_by_name, ContainerEntity},
    error::GtmGraphError,
    properties::{EdgeKind, EntityKind, EntityRef, ObjectId},
};

use super::ContainerGraph;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefGraph(pub petgraph::Graph<EntityRef, EdgeKind>);

impl Default for RefGraph {
    fn default() -> Self {
        RefGraph(petgraph::Graph::new())
    }
}

impl RefGraph {
    /// Build from `nodes` (added first, in order, so isolated entities are kept) and `edges`.
    /// Edge endpoints missing from `nodes` are added on demand.
    pub fn from_edges<N, I>(nodes: N, edges: I) -> Self
    where
        N: IntoIterator<Item = EntityRef>,
        I: IntoIterator,
        I::Item: IntoWeightedEdge<EdgeKind, NodeId = EntityRef>,
    {
        let mut graph = petgraph::Graph::new();
        let mut ref_to_index: BTreeMap<EntityRef, NodeIndex> = BTreeMap::new();
        for node in nodes {
            ref_to_index
                .entry(node)
                .or_insert_with(|| graph.add_node(node));
        }

        for (source, sink, weight) in edges.into_iter().map(|edge| edge.into_weighted_edge()) {
            let source_idx = *ref_to_index
                .entry(source)
                .or_insert_with(|| graph.add_node(source));
            let sink_idx = *ref_to_index
                .entry(sink)
                .or_insert_with(|| graph.add_node(sink));
            graph.add_edge(source_idx, sink_idx, weight);
        }

        RefGraph(graph)
    }

    pub fn as_graph(&self) -> &petgraph::Graph<EntityRef, EdgeKind> {
        &self.0
    }

    pub fn as_graph_mut(&mut self) -> &mut petgraph::Graph<EntityRef, EdgeKind> {
        &mut self.0
    }

    pub fn node_index(&self, entity: EntityRef) -> Option<NodeIndex> {
        self.0.node_indices().find(|idx| self.0[*idx] == entity)
    }
}

impl Deref for RefGraph {
    type Target = petgraph::Graph<EntityRef, EdgeKind>;
    fn deref(&self) -> &petgraph::Graph<EntityRef, EdgeKind> {
        &self.0
    }
}

impl DerefMut for RefGraph {
    fn deref_mut(&mut self) -> &mut petgraph::Graph<EntityRef, EdgeKind> {
        &mut self.0
    }
}

/// One entity with its edge lists rendered as object IDs, sorted by target name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    pub object_id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub referencing_variables: Vec<ObjectId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub tags: Vec<EntitySnapshot>,
    pub triggers: Vec<EntitySnapshot>,
    pub variables: Vec<EntitySnapshot>,
}

impl ContainerSnapshot {
    pub fn len(&self) -> usize {
        self.tags.len() + self.triggers.len() + self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn ids<'a, E, I>(entities: I) -> Vec<ObjectId>
where
    E: ContainerEntity + ?Sized + 'a,
    I: IntoIterator<Item = &'a E>,
{
    entities
        .into_iter()
        .map(|e| e.object_id().clone())
        .collect()
}

fn snapshot_of<E: ContainerEntity + ?Sized>(entity: &E) -> EntitySnapshot {
    EntitySnapshot {
        kind: entity.kind(),
        object_id: entity.object_id().clone(),
        name: entity.name().to_string(),
        tags: Vec::new(),
        triggers: Vec::new(),
        variables: Vec::new(),
        referencing_variables: Vec::new(),
    }
}

impl ContainerGraph {
    /// Every forward edge as `(source, sink, kind)`: tag → trigger, then tag/trigger/variable →
    /// variable, in payload order.
    pub fn forward_edges(&self) -> Vec<(EntityRef, EntityRef, EdgeKind)> {
        let mut edges = Vec::new();
        for (idx, tag) in self.tag_table().iter().enumerate() {
            let source = EntityRef::Tag(idx.into());
            edges.extend(
                tag.triggers
                    .iter()
                    .map(|t| (source, EntityRef::from(*t), EdgeKind::Trigger)),
            );
            edges.extend(
                tag.variables
                    .iter()
                    .map(|v| (source, EntityRef::from(*v), EdgeKind::Variable)),
            );
        }
        for (idx, trigger) in self.trigger_table().iter().enumerate() {
            let source = EntityRef::Trigger(idx.into());
            edges.extend(
                trigger
                    .variables
                    .iter()
                    .map(|v| (source, EntityRef::from(*v), EdgeKind::Variable)),
            );
        }
        for (idx, variable) in self.variable_table().iter().enumerate() {
            let source = EntityRef::Variable(idx.into());
            edges.extend(
                variable
                    .variables
                    .iter()
                    .map(|v| (source, EntityRef::from(*v), EdgeKind::Variable)),
            );
        }
        edges
    }

    /// Directed graph of all entities and forward edges. Back edges are the reversed graph.
    pub fn to_petgraph(&self) -> RefGraph {
        let nodes = EntityKind::all()
            .iter()
            .flat_map(|kind| self.entity_refs(*kind))
            .collect::<Vec<_>>();
        RefGraph::from_edges(nodes, self.forward_edges())
    }

    /// Graphviz rendering of [ContainerGraph::to_petgraph], nodes labelled `kind: name`.
    pub fn to_dot(&self) -> Result<String, GtmGraphError> {
        let graph = self.to_petgraph();
        let labelled = graph.map(
            |_, entity| match self.entity(*entity) {
                Some(node) => format!("{}: {}", entity.kind(), node.name()),
                None => entity.to_string(),
            },
            |_, edge| *edge,
        );
        let mut dot = String::new();
        write!(dot, "{}", Dot::new(&labelled))?;
        Ok(dot)
    }

    /// Serializable view of the whole graph, each table and edge list sorted by name.
    pub fn snapshot(&self) -> ContainerSnapshot {
        let tags = self
            .get_tags()
            .into_iter()
            .map(|tag| EntitySnapshot {
                triggers: ids(tag.get_triggers(self)),
                variables: ids(tag.get_variables(self)),
                ..snapshot_of(tag)
            })
            .collect();
        let triggers = self
            .get_triggers()
            .into_iter()
            .map(|trigger| EntitySnapshot {
                tags: ids(trigger.get_tags(self)),
                variables: ids(trigger.get_variables(self)),
                ..snapshot_of(trigger)
            })
            .collect();
        let variables = self
            .get_variables()
            .into_iter()
            .map(|variable| EntitySnapshot {
                tags: ids(variable.get_tags(self)),
                triggers: ids(variable.get_triggers(self)),
                variables: ids(variable.get_variables(self)),
                referencing_variables: ids(variable.get_referencing_variables(self)),
                ..snapshot_of(variable)
            })
            .collect();
        ContainerSnapshot {
            tags,
            triggers,
            variables,
        }
    }

    /// Sorted `(kind, entities)` listing of every table, for outline rendering.
    pub fn entities_by_kind(&self) -> Vec<(EntityKind, Vec<&dyn ContainerEntity>)> {
        EntityKind::all()
            .iter()
            .map(|kind| {
                let entities = self
                    .entity_refs(*kind)
                    .into_iter()
                    .filter_map(|entity| self.entity(entity));
                (*kind, sorted_by_name(entities))
            })
            .collect()
    }
}
