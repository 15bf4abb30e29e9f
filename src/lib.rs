//! # gtm-graph
//!
//! A Rust library for turning a Google Tag Manager container export into a queryable dependency
//! graph of tags, triggers and variables.
//!
//! ## Overview
//!
//! A container export lists its tags, triggers and variables as flat JSON arrays. The
//! relationships between them are implicit: tags name their triggers by ID
//! (`firingTriggerId`, `blockingTriggerId`) and everything names variables through `{{Variable
//! Name}}` placeholders buried anywhere in its configuration. gtm-graph resolves those references
//! into explicit forward edges and derives the matching back edges, so that every entity can
//! answer both "what do I use?" and "who uses me?".
//!
//! ### Key Features
//!
//! - **Built-in synthesis**: enabled built-in variables and the "All Pages" trigger become real
//!   entities with reserved identities
//! - **Bidirectional edges**: every resolved forward reference has exactly one back reference
//! - **Error tolerance**: unresolved references are recorded as diagnostics, never fatal
//! - **Sorted listings**: every listing is ordered by name, case-sensitively
//! - **Exports**: petgraph, Graphviz DOT and a serializable snapshot
//!
//! ## Architecture
//!
//! - **[`codec`]**: the build pipeline (`GraphBuilder`, `build_graph`, `BuildDiagnostic`)
//! - **[`container`]**: the built graph (`ContainerGraph`) and its traversal helpers
//! - **[`entity`]**: the `Tag` / `Trigger` / `Variable` records and the `ContainerEntity` trait
//! - **[`properties`]**: kinds, normalized object IDs, arena indices, reserved identities
//! - **[`query`]**: predicate selection (`EntityPred`)
//! - **[`nodekey`]**: textual entity addressing (`EntityKey`)
//! - **[`config`]**: build options (`GraphConfig`)
//!
//! ## Quick Start
//!
//! ```rust
//! use gtm_graph::{build_graph, ContainerEntity};
//! use serde_json::json;
//!
//! let graph = build_graph(&json!({
//!     "containerVersion": {
//!         "tag": [{"tagId": "1", "name": "T", "firingTriggerId": ["10"], "html": "{{V}}"}],
//!         "trigger": [{"triggerId": "10", "name": "Trig"}],
//!         "variable": [{"variableId": "5", "name": "V"}]
//!     }
//! }))?;
//!
//! let variable = graph.find_variable_by_name("V").unwrap();
//! let users = variable.get_tags(&graph);
//! assert_eq!(users[0].name(), "T");
//! # Ok::<(), gtm_graph::GtmGraphError>(())
//! ```
//!
//! ### Working with Diagnostics
//!
//! Anything that could not be resolved is kept on the graph:
//!
//! ```rust
//! # use gtm_graph::{build_graph, BuildDiagnostic};
//! # use serde_json::json;
//! let graph = build_graph(&json!({"containerVersion": {
//!     "tag": [{"tagId": "1", "name": "T", "html": "{{Missing}}"}]
//! }}))?;
//! assert!(matches!(
//!     &graph.diagnostics()[0],
//!     BuildDiagnostic::UnresolvedVariable { name, .. } if name == "Missing"
//! ));
//! # Ok::<(), gtm_graph::GtmGraphError>(())
//! ```
//!
//! ## Features
//!
//! - **default**: graph construction and queries
//! - **bin**: the `gtmgraph` command line tool

pub mod codec;
pub mod config;
pub mod container;
pub mod entity;
pub mod error;
pub mod nodekey;
pub mod properties;
pub mod query;
#[cfg(test)]
mod tests;

pub use codec::{build_graph, BuildDiagnostic, GraphBuilder};
pub use config::GraphConfig;
pub use container::ContainerGraph;
pub use entity::{ContainerEntity, Tag, Trigger, Variable};
pub use error::*;
