//! Diagnostic types for graph assembly.
//!
//! Diagnostics record anomalies that degrade to "no match" instead of failing the build:
//! references that point nowhere, built-ins that collide with user variables, and tokens missing
//! from the built-in name table.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::properties::{EntityKind, ObjectId};

/// Identifies the entity that produced a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticSource {
    pub kind: EntityKind,
    pub object_id: ObjectId,
    pub name: String,
}

impl Display for DiagnosticSource {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} '{}' ({})", self.kind, self.name, self.object_id)
    }
}

/// Non-fatal issue discovered while building a container graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildDiagnostic {
    /// A `{{name}}` placeholder with no variable of that name.
    UnresolvedVariable {
        source: DiagnosticSource,
        name: String,
    },
    /// A firing/blocking trigger ID with no trigger of that ID.
    UnresolvedTrigger {
        tag: DiagnosticSource,
        trigger_id: ObjectId,
    },
    /// A built-in variable not synthesized because a variable with that name already exists.
    BuiltInSkipped { name: String, object_id: ObjectId },
    /// A built-in token missing from the canonical name table. Its raw form is used as name.
    UnknownBuiltIn { token: String },
    /// An entity whose kind-specific ID field is absent or not a string or number.
    MissingObjectId { kind: EntityKind, name: String },
}

impl BuildDiagnostic {
    pub fn is_unresolved_reference(&self) -> bool {
        matches!(
            self,
            BuildDiagnostic::UnresolvedVariable { .. } | BuildDiagnostic::UnresolvedTrigger { .. }
        )
    }
}

impl Display for BuildDiagnostic {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            BuildDiagnostic::UnresolvedVariable { source, name } => {
                write!(f, "{source} references unknown variable '{{{{{name}}}}}'")
            }
            BuildDiagnostic::UnresolvedTrigger { tag, trigger_id } => {
                write!(f, "{tag} references unknown trigger ID {trigger_id}")
            }
            BuildDiagnostic::BuiltInSkipped { name, object_id } => write!(
                f,
                "built-in variable '{name}' ({object_id}) skipped: a variable with that name exists"
            ),
            BuildDiagnostic::UnknownBuiltIn { token } => {
                write!(f, "unknown built-in variable token '{token}', using it verbatim")
            }
            BuildDiagnostic::MissingObjectId { kind, name } => {
                write!(f, "{kind} '{name}' has no scalar {} field", kind.id_field())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_wraps_placeholder() {
        let diag = BuildDiagnostic::UnresolvedVariable {
            source: DiagnosticSource {
                kind: EntityKind::Tag,
                object_id: ObjectId::from("1"),
                name: "T".to_string(),
            },
            name: "Nonexistent".to_string(),
        };
        assert_eq!(
            diag.to_string(),
            "tag 'T' (1) references unknown variable '{{Nonexistent}}'"
        );
        assert!(diag.is_unresolved_reference());
        assert!(!BuildDiagnostic::UnknownBuiltIn {
            token: "X".to_string()
        }
        .is_unresolved_reference());
    }
}
