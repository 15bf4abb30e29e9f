//! Container decoding and graph assembly.
//!
//! This module turns a raw GTM container export into a [`ContainerGraph`](crate::container::ContainerGraph).
//!
//! ## Key Components
//!
//! - [`GraphBuilder`] - Runs the full build pipeline for one container payload
//! - [`input::RawContainerVersion`] - Structural decoding of the `containerVersion` section
//! - [`compiler`] - Raw JSON objects to [`Tag`](crate::entity::Tag) / [`Trigger`](crate::entity::Trigger) / [`Variable`](crate::entity::Variable) records
//! - [`builtins`] - Synthesizes the built-in variables and the "All Pages" trigger
//! - [`scanner::ReferenceScanner`] - Finds `{{name}}` placeholders anywhere in an entity
//! - [`BuildDiagnostic`] - Non-fatal anomalies discovered while building
//!
//! ## Pipeline
//!
//! 1. **Decode**: locate `containerVersion` and its `tag` / `trigger` / `variable` arrays
//! 2. **Compile**: normalize IDs, copy every other field through
//! 3. **Synthesize**: append built-in variables (name-deduplicated) and the "All Pages" trigger
//! 4. **Forward edges**: placeholder scan for every entity, trigger-ID resolution for every tag
//! 5. **Back edges**: invert the forward edges onto their targets
//!
//! Unresolved references never abort a build. They are dropped from the forward lists and
//! reported as [`BuildDiagnostic::UnresolvedVariable`] / [`BuildDiagnostic::UnresolvedTrigger`].
//!
//! ```rust
//! use gtm_graph::codec::GraphBuilder;
//!
//! let json = r#"{"containerVersion": {
//!     "container": {},
//!     "tag": [{"tagId": "1", "name": "T", "firingTriggerId": ["10"], "html": "{{V}}"}],
//!     "trigger": [{"triggerId": "10", "name": "Trig"}],
//!     "variable": [{"variableId": "5", "name": "V"}]
//! }}"#;
//! let graph = GraphBuilder::default().build_str(json).unwrap();
//! let tag = graph.find_tag_by_name("T").unwrap();
//! assert_eq!(tag.get_triggers(&graph)[0].name, "Trig");
//! assert_eq!(tag.get_variables(&graph)[0].name, "V");
//! ```

pub mod builder;
pub mod builtins;
pub mod compiler;
pub mod diagnostic;
pub mod input;
pub mod scanner;

pub use builder::{build_graph, GraphBuilder};
pub use diagnostic::BuildDiagnostic;
pub use input::RawContainerVersion;
pub use scanner::ReferenceScanner;
