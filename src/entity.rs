//! Entity records for the three container collections.
//!
//! Each record keeps the raw payload fields verbatim (minus the kind-specific ID field, which is
//! normalized into `object_id`) plus the edge lists populated by
//! [crate::codec::GraphBuilder]. Edges are arena indices into the owning
//! [ContainerGraph]; the `get_*` accessors resolve them back to records, sorted by name.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::{
    container::ContainerGraph,
    properties::{EntityKind, ObjectId, TagIndex, TriggerIndex, VariableIndex},
};

/// Capabilities shared by [Tag], [Trigger] and [Variable].
pub trait ContainerEntity {
    fn kind(&self) -> EntityKind;

    fn object_id(&self) -> &ObjectId;

    fn name(&self) -> &str;

    /// Passthrough payload fields, excluding the kind-specific ID field.
    fn fields(&self) -> &Map<String, Value>;

    fn field(&self, key: &str) -> Option<&Value> {
        self.fields().get(key)
    }

    fn matches_id(&self, id: &str) -> bool {
        self.object_id().as_str() == id
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name() == name
    }

    /// True for entities synthesized by the build rather than read from the payload.
    fn is_builtin(&self) -> bool;

    /// True when no other entity references this one. Tags are never referenced.
    fn is_unreferenced(&self) -> bool;
}

/// Case-sensitive lexical comparison of entity names (uppercase sorts before lowercase).
pub fn compare_names<E: ContainerEntity + ?Sized>(a: &E, b: &E) -> Ordering {
    a.name().cmp(b.name())
}

/// Collect entities into a list ordered by [compare_names]. Stable for equal names.
pub fn sorted_by_name<'a, E, I>(items: I) -> Vec<&'a E>
where
    E: ContainerEntity + ?Sized + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut sorted = items.into_iter().collect::<Vec<&E>>();
    sorted.sort_by(|a, b| compare_names(*a, *b));
    sorted
}

/// A GTM tag: an action definition fired or blocked by triggers.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "objectId")]
    pub object_id: ObjectId,
    pub name: String,
    pub fields: Map<String, Value>,
    /// Forward: firing and blocking triggers, deduplicated, first occurrence order.
    pub triggers: Vec<TriggerIndex>,
    /// Forward: variables referenced by `{{name}}` placeholders.
    pub variables: Vec<VariableIndex>,
}

/// A GTM trigger: the condition set gating when tags fire or block.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "objectId")]
    pub object_id: ObjectId,
    pub name: String,
    pub fields: Map<String, Value>,
    /// Set for the synthesized "All Pages" trigger.
    #[serde(default)]
    pub builtin: bool,
    /// Back: tags firing on or blocked by this trigger.
    pub tags: Vec<TagIndex>,
    /// Forward: variables referenced by `{{name}}` placeholders.
    pub variables: Vec<VariableIndex>,
}

/// A GTM variable, user-defined or built-in.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(rename = "objectId")]
    pub object_id: ObjectId,
    pub name: String,
    pub fields: Map<String, Value>,
    /// Set for variables synthesized from the built-in enablement list.
    #[serde(default)]
    pub builtin: bool,
    /// Back: tags referencing this variable.
    pub tags: Vec<TagIndex>,
    /// Back: triggers referencing this variable.
    pub triggers: Vec<TriggerIndex>,
    /// Forward: variables this variable references (lookup tables, custom JS, ...).
    pub variables: Vec<VariableIndex>,
    /// Back: variables referencing this variable.
    pub referencing_variables: Vec<VariableIndex>,
}

macro_rules! impl_container_entity {
    (
        $record:ty,
        $kind:expr,
        builtin: |$b:ident| $builtin:expr,
        unreferenced: |$this:ident| $unreferenced:expr
    ) => {
        impl ContainerEntity for $record {
            fn kind(&self) -> EntityKind {
                $kind
            }

            fn object_id(&self) -> &ObjectId {
                &self.object_id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn fields(&self) -> &Map<String, Value> {
                &self.fields
            }

            fn is_builtin(&self) -> bool {
                let $b = self;
                $builtin
            }

            fn is_unreferenced(&self) -> bool {
                let $this = self;
                $unreferenced
            }
        }
    };
}

impl_container_entity!(
    Tag,
    EntityKind::Tag,
    builtin: |_tag| false,
    unreferenced: |_tag| true
);
impl_container_entity!(
    Trigger,
    EntityKind::Trigger,
    builtin: |trigger| trigger.builtin,
    unreferenced: |trigger| trigger.tags.is_empty()
);
impl_container_entity!(
    Variable,
    EntityKind::Variable,
    builtin: |variable| variable.builtin,
    unreferenced: |variable| {
        variable.tags.is_empty()
            && variable.triggers.is_empty()
            && variable.referencing_variables.is_empty()
    }
);

impl Tag {
    pub fn new<S: Into<String>>(object_id: ObjectId, name: S, fields: Map<String, Value>) -> Tag {
        Tag {
            object_id,
            name: name.into(),
            fields,
            ..Default::default()
        }
    }

    pub fn get_triggers<'a>(&self, graph: &'a ContainerGraph) -> Vec<&'a Trigger> {
        sorted_by_name(self.triggers.iter().filter_map(|idx| graph.trigger(*idx)))
    }

    pub fn get_variables<'a>(&self, graph: &'a ContainerGraph) -> Vec<&'a Variable> {
        sorted_by_name(self.variables.iter().filter_map(|idx| graph.variable(*idx)))
    }

    pub fn has_triggers(&self) -> bool {
        !self.triggers.is_empty()
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }
}

impl Trigger {
    pub fn new<S: Into<String>>(
        object_id: ObjectId,
        name: S,
        fields: Map<String, Value>,
    ) -> Trigger {
        Trigger {
            object_id,
            name: name.into(),
            fields,
            ..Default::default()
        }
    }

    pub fn get_tags<'a>(&self, graph: &'a ContainerGraph) -> Vec<&'a Tag> {
        sorted_by_name(self.tags.iter().filter_map(|idx| graph.tag(*idx)))
    }

    pub fn get_variables<'a>(&self, graph: &'a ContainerGraph) -> Vec<&'a Variable> {
        sorted_by_name(self.variables.iter().filter_map(|idx| graph.variable(*idx)))
    }

    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }
}

impl Variable {
    pub fn new<S: Into<String>>(
        object_id: ObjectId,
        name: S,
        fields: Map<String, Value>,
    ) -> Variable {
        Variable {
            object_id,
            name: name.into(),
            fields,
            ..Default::default()
        }
    }

    pub fn get_tags<'a>(&self, graph: &'a ContainerGraph) -> Vec<&'a Tag> {
        sorted_by_name(self.tags.iter().filter_map(|idx| graph.tag(*idx)))
    }

    pub fn get_triggers<'a>(&self, graph: &'a ContainerGraph) -> Vec<&'a Trigger> {
        sorted_by_name(self.triggers.iter().filter_map(|idx| graph.trigger(*idx)))
    }

    pub fn get_variables<'a>(&self, graph: &'a ContainerGraph) -> Vec<&'a Variable> {
        sorted_by_name(self.variables.iter().filter_map(|idx| graph.variable(*idx)))
    }

    pub fn get_referencing_variables<'a>(&self, graph: &'a ContainerGraph) -> Vec<&'a Variable> {
        sorted_by_name(
            self.referencing_variables
                .iter()
                .filter_map(|idx| graph.variable(*idx)),
        )
    }

    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn has_triggers(&self) -> bool {
        !self.triggers.is_empty()
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    pub fn has_referencing_variables(&self) -> bool {
        !self.referencing_variables.is_empty()
    }
}
