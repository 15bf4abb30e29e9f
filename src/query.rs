//! Predicate-based entity selection over a [ContainerGraph].
use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    str::FromStr,
};

use regex::{escape as re_escape, Regex, RegexBuilder};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{
    container::ContainerGraph,
    entity::{compare_names, ContainerEntity},
    nodekey::EntityKey,
    properties::{EntityKind, EntityKindSet, EntityRef},
    GtmGraphError,
};

/// A serializable, comparable regex. Parsed and deserialized patterns are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedRegex(
    #[serde(serialize_with = "serialize_regex")]
    #[serde(deserialize_with = "deserialize_regex")]
    Regex,
);

fn serialize_regex<S>(re: &Regex, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(re.as_str())
}

struct ReVisitor;

impl<'de> de::Visitor<'de> for ReVisitor {
    type Value = Regex;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "A regex string, as validated by the Rust regex crate (https://docs.rs/regex/latest/regex/index.html)"
        )
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        case_insensitive(s).map_err(|_e| E::invalid_value(de::Unexpected::Str(s), &self))
    }
}

fn deserialize_regex<'de, D>(deserializer: D) -> Result<Regex, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(ReVisitor)
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .unicode(true)
        .case_insensitive(true)
        .build()
}

impl FromStr for WrappedRegex {
    type Err = GtmGraphError;

    /// Patterns that fail to compile are matched literally instead.
    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let regex = match case_insensitive(pattern) {
            Ok(regex) => regex,
            Err(_) => case_insensitive(&re_escape(pattern))?,
        };
        Ok(WrappedRegex(regex))
    }
}

impl Hash for WrappedRegex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

impl PartialEq for WrappedRegex {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Eq for WrappedRegex {}

impl Deref for WrappedRegex {
    type Target = Regex;
    fn deref(&self) -> &Regex {
        &self.0
    }
}

impl From<Regex> for WrappedRegex {
    fn from(other: Regex) -> WrappedRegex {
        WrappedRegex(other)
    }
}

/// Filter over entity properties. Combinators nest freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityPred {
    // Return all entities
    Any,
    // Return entities whose kind is in the set
    Kind(EntityKindSet),
    // Return entities whose objectId equals the value
    Id(String),
    // Return entities whose name equals the value (case-sensitive)
    Name(String),
    // Return entities whose name matches the regex
    NameMatches(WrappedRegex),
    // Return entities whose payload field, rendered as text, matches the regex
    Field(String, WrappedRegex),
    // Return synthesized built-in entities
    BuiltIn,
    // Return entities nothing references. Always true for tags.
    Unreferenced,
    And(Vec<EntityPred>),
    Or(Vec<EntityPred>),
    Not(Box<EntityPred>),
}

impl EntityPred {
    pub fn kind(kind: EntityKind) -> EntityPred {
        EntityPred::Kind(kind.into())
    }

    /// Referencable entities (triggers and variables) that no other entity uses.
    pub fn unused() -> EntityPred {
        EntityPred::And(vec![
            EntityPred::Kind(EntityKind::Trigger | EntityKind::Variable),
            EntityPred::Unreferenced,
        ])
    }

    pub fn match_entity<E: ContainerEntity + ?Sized>(&self, entity: &E) -> bool {
        match self {
            EntityPred::Any => true,
            EntityPred::Kind(kind_set) => kind_set.contains(entity.kind()),
            EntityPred::Id(id) => entity.matches_id(id),
            EntityPred::Name(name) => entity.matches_name(name),
            EntityPred::NameMatches(re) => re.is_match(entity.name()),
            EntityPred::Field(key, re) => match entity.field(key) {
                Some(Value::String(text)) => re.is_match(text),
                Some(value) => re.is_match(&value.to_string()),
                None => false,
            },
            EntityPred::BuiltIn => entity.is_builtin(),
            EntityPred::Unreferenced => entity.is_unreferenced(),
            EntityPred::And(preds) => preds.iter().all(|p| p.match_entity(entity)),
            EntityPred::Or(preds) => preds.iter().any(|p| p.match_entity(entity)),
            EntityPred::Not(pred) => !pred.match_entity(entity),
        }
    }
}

impl From<&EntityKey> for EntityPred {
    fn from(key: &EntityKey) -> EntityPred {
        match key {
            EntityKey::Id { kind, id } => EntityPred::And(vec![
                EntityPred::kind(*kind),
                EntityPred::Id(id.to_string()),
            ]),
            EntityKey::Name { kind, name } => EntityPred::And(vec![
                EntityPred::kind(*kind),
                EntityPred::Name(name.clone()),
            ]),
        }
    }
}

impl ContainerGraph {
    /// Every entity matching `pred`, sorted by name. Equal names keep tag, trigger, variable order.
    pub fn select(&self, pred: &EntityPred) -> Vec<EntityRef> {
        let mut matches = EntityKind::all()
            .iter()
            .flat_map(|kind| self.entity_refs(*kind))
            .filter_map(|entity| self.entity(entity).map(|node| (entity, node)))
            .filter(|(_, node)| pred.match_entity(*node))
            .collect::<Vec<_>>();
        matches.sort_by(|(_, a), (_, b)| compare_names(*a, *b));
        tracing::debug!(
            "[ContainerGraph::select] {} entities matched {:?}",
            matches.len(),
            pred
        );
        matches.into_iter().map(|(entity, _)| entity).collect()
    }
}
