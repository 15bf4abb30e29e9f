//! [crate::properties] contains the basic building blocks shared by the entity records and the
//! [crate::container::ContainerGraph]: entity kinds, normalized identities, arena indices and the
//! identities reserved for synthesized built-ins.
pub use enumset::EnumSet;
use enumset::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fmt::{Display, Formatter},
    ops::Deref,
    str::FromStr,
};

use crate::error::GtmGraphError;

/// Object ID of the built-in "All Pages" trigger. Lies outside the ID range GTM hands out to
/// user-defined triggers.
pub const BUILT_IN_ALL_PAGES_TRIGGER_ID: &str = "2147479553";

/// Display name of the built-in "All Pages" trigger.
pub const BUILT_IN_ALL_PAGES_TRIGGER_NAME: &str = "All Pages";

/// GTM's implicit event placeholder. Never a user variable.
pub const RESERVED_EVENT_VARIABLE: &str = "_event";

/// The three entity collections of a container.
#[derive(Debug, Serialize, Deserialize, PartialOrd, Ord, Hash, EnumSetType)]
#[enumset(serialize_repr = "list")]
pub enum EntityKind {
    Tag,
    Trigger,
    Variable,
}

pub type EntityKindSet = EnumSet<EntityKind>;

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Tag, EntityKind::Trigger, EntityKind::Variable]
    }

    /// Name of the kind-specific ID field in the raw payload.
    pub fn id_field(&self) -> &'static str {
        match self {
            EntityKind::Tag => "tagId",
            EntityKind::Trigger => "triggerId",
            EntityKind::Variable => "variableId",
        }
    }

    /// Name of the array holding this kind inside `containerVersion`.
    pub fn collection_field(&self) -> &'static str {
        match self {
            EntityKind::Tag => "tag",
            EntityKind::Trigger => "trigger",
            EntityKind::Variable => "variable",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Tag => "tags",
            EntityKind::Trigger => "triggers",
            EntityKind::Variable => "variables",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.collection_field())
    }
}

impl FromStr for EntityKind {
    type Err = GtmGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tag" | "tags" => Ok(EntityKind::Tag),
            "trigger" | "triggers" => Ok(EntityKind::Trigger),
            "variable" | "variables" => Ok(EntityKind::Variable),
            other => Err(GtmGraphError::InvalidInput(format!(
                "Unknown entity kind '{other}'. Expected one of tag, trigger, variable"
            ))),
        }
    }
}

/// Normalized entity identity.
///
/// GTM payloads mix string and numeric IDs (`"10"` in `triggerId`, `10` in a
/// `firingTriggerId` list). Every ID is converted to its string form once, at the compiler
/// boundary, so all comparisons downstream are plain string equality.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new<S: Into<String>>(id: S) -> ObjectId {
        ObjectId(id.into())
    }

    /// Normalize a scalar JSON value into an ID. Objects, arrays and null are not IDs.
    pub fn from_value(value: &Value) -> Option<ObjectId> {
        match value {
            Value::String(s) => Some(ObjectId(s.clone())),
            Value::Number(n) => Some(ObjectId(
                n.as_i64()
                    .map(|i| i.to_string())
                    .or_else(|| n.as_u64().map(|u| u.to_string()))
                    .unwrap_or_else(|| n.to_string()),
            )),
            Value::Bool(b) => Some(ObjectId(b.to_string())),
            _ => None,
        }
    }

    /// ID assigned to the `index`th synthesized built-in variable: `-1`, `-2`, ...
    pub fn builtin_variable(index: usize) -> ObjectId {
        ObjectId(format!("-{}", index + 1))
    }

    pub fn builtin_all_pages() -> ObjectId {
        ObjectId(BUILT_IN_ALL_PAGES_TRIGGER_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for ObjectId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        ObjectId(id.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        ObjectId(id)
    }
}

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(&self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(idx: usize) -> Self {
                $name(idx)
            }
        }
    };
}

arena_index!(
    /// Position of a [crate::entity::Tag] in its [crate::container::ContainerGraph] table.
    TagIndex
);
arena_index!(
    /// Position of a [crate::entity::Trigger] in its [crate::container::ContainerGraph] table.
    TriggerIndex
);
arena_index!(
    /// Position of a [crate::entity::Variable] in its [crate::container::ContainerGraph] table.
    VariableIndex
);

/// Kind-tagged arena address of any entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Tag(TagIndex),
    Trigger(TriggerIndex),
    Variable(VariableIndex),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Tag(_) => EntityKind::Tag,
            EntityRef::Trigger(_) => EntityKind::Trigger,
            EntityRef::Variable(_) => EntityKind::Variable,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            EntityRef::Tag(idx) => idx.index(),
            EntityRef::Trigger(idx) => idx.index(),
            EntityRef::Variable(idx) => idx.index(),
        }
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind(), self.index())
    }
}

impl From<TagIndex> for EntityRef {
    fn from(idx: TagIndex) -> Self {
        EntityRef::Tag(idx)
    }
}

impl From<TriggerIndex> for EntityRef {
    fn from(idx: TriggerIndex) -> Self {
        EntityRef::Trigger(idx)
    }
}

impl From<VariableIndex> for EntityRef {
    fn from(idx: VariableIndex) -> Self {
        EntityRef::Variable(idx)
    }
}

/// Label of a forward edge in the exported petgraph: what the source entity uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Tag → Trigger, from `firingTriggerId` / `blockingTriggerId`.
    Trigger,
    /// Tag/Trigger/Variable → Variable, from a `{{name}}` placeholder.
    Variable,
}

impl Display for EdgeKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            EdgeKind::Trigger => write!(f, "trigger"),
            EdgeKind::Variable => write!(f, "variable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_id_normalizes_numbers_and_strings() {
        assert_eq!(ObjectId::from_value(&json!("10")), Some(ObjectId::from("10")));
        assert_eq!(ObjectId::from_value(&json!(10)), Some(ObjectId::from("10")));
        assert_eq!(ObjectId::from_value(&json!(-3)), Some(ObjectId::from("-3")));
        assert_eq!(ObjectId::from_value(&json!(null)), None);
        assert_eq!(ObjectId::from_value(&json!(["10"])), None);
    }

    #[test]
    fn builtin_ids() {
        assert_eq!(ObjectId::builtin_all_pages().as_str(), BUILT_IN_ALL_PAGES_TRIGGER_ID);
        assert_eq!(ObjectId::builtin_variable(0).as_str(), "-1");
        assert_eq!(ObjectId::builtin_variable(4).as_str(), "-5");
    }

    #[test]
    fn entity_kind_parses_singular_and_plural() {
        assert_eq!("tags".parse::<EntityKind>().unwrap(), EntityKind::Tag);
        assert_eq!("Trigger".parse::<EntityKind>().unwrap(), EntityKind::Trigger);
        assert!("folder".parse::<EntityKind>().is_err());
    }
}
