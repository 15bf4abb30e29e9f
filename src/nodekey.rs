//! [crate::nodekey] contains [EntityKey], the textual address of a single entity within a
//! [crate::container::ContainerGraph].
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{
    properties::{EntityKind, ObjectId},
    GtmGraphError,
};

/// Addresses one entity by kind plus either its object ID or its name.
///
/// String forms:
/// - `tag:id:12` / `variable:id:-3`
/// - `trigger:name:All Pages`
/// - `variable:Page URL` (bare value is a name)
#[derive(Debug, Clone, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Id { kind: EntityKind, id: ObjectId },
    Name { kind: EntityKind, name: String },
}

impl EntityKey {
    pub fn id<I: Into<ObjectId>>(kind: EntityKind, id: I) -> EntityKey {
        EntityKey::Id {
            kind,
            id: id.into(),
        }
    }

    pub fn name<S: Into<String>>(kind: EntityKind, name: S) -> EntityKey {
        EntityKey::Name {
            kind,
            name: name.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityKey::Id { kind, .. } | EntityKey::Name { kind, .. } => *kind,
        }
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            EntityKey::Id { kind, id } => write!(f, "{kind}:id:{id}"),
            EntityKey::Name { kind, name } => write!(f, "{kind}:name:{name}"),
        }
    }
}

impl FromStr for EntityKey {
    type Err = GtmGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind_str, rest) = s.split_once(':').ok_or_else(|| {
            GtmGraphError::InvalidInput(format!(
                "[EntityKey] '{s}' is missing a kind prefix (tag:, trigger: or variable:)"
            ))
        })?;
        let kind = kind_str.parse::<EntityKind>()?;
        let key = match rest.split_once(':') {
            Some(("id", id)) => EntityKey::id(kind, id),
            Some(("name", name)) => EntityKey::name(kind, name),
            // Names may legitimately contain ':'
            _ => EntityKey::name(kind, rest),
        };
        let value_is_empty = match &key {
            EntityKey::Id { id, .. } => id.is_empty(),
            EntityKey::Name { name, .. } => name.is_empty(),
        };
        if value_is_empty {
            return Err(GtmGraphError::InvalidInput(format!(
                "[EntityKey] cannot generate a key from '{s}': value is empty"
            )));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn parses_id_and_name_forms() {
        assert_eq!(
            "tag:id:12".parse::<EntityKey>().unwrap(),
            EntityKey::id(EntityKind::Tag, "12")
        );
        assert_eq!(
            "variables:id:-3".parse::<EntityKey>().unwrap(),
            EntityKey::id(EntityKind::Variable, "-3")
        );
        assert_eq!(
            "trigger:name:All Pages".parse::<EntityKey>().unwrap(),
            EntityKey::name(EntityKind::Trigger, "All Pages")
        );
        assert_eq!(
            "variable:Page URL".parse::<EntityKey>().unwrap(),
            EntityKey::name(EntityKind::Variable, "Page URL")
        );
        assert_eq!(
            "variable:Lookup: Country".parse::<EntityKey>().unwrap(),
            EntityKey::name(EntityKind::Variable, "Lookup: Country")
        );
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("Page URL".parse::<EntityKey>().is_err());
        assert!("folder:id:1".parse::<EntityKey>().is_err());
        assert!("tag:id:".parse::<EntityKey>().is_err());
        assert!("tag:".parse::<EntityKey>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let key = EntityKey::name(EntityKind::Trigger, "All Pages");
        assert_eq!(key.to_string(), "trigger:name:All Pages");
        assert_eq!(key.to_string().parse::<EntityKey>().unwrap(), key);
    }
}
