//! Container module: the built dependency graph of one GTM container.
//!
//! # Module Organization
//!
//! - [`base`]: [ContainerGraph] tables, finders and sorted listings
//! - [`context`]: [EntityContext] for walking an entity's related entities by [Relation]
//! - [`graph`]: petgraph export, Graphviz rendering and serializable snapshots
//!
//! ```rust
//! use gtm_graph::container::ContainerGraph;
//!
//! let graph: ContainerGraph = r#"{"containerVersion": {
//!     "tag": [{"tagId": "1", "name": "Pixel", "firingTriggerId": ["2147479553"]}]
//! }}"#
//! .parse()
//! .unwrap();
//! let tag = graph.find_tag_by_name("Pixel").unwrap();
//! assert_eq!(tag.get_triggers(&graph)[0].name, "All Pages");
//! ```

mod base;
mod context;
mod graph;


pub use base::ContainerGraph;
pub use context::{EntityContext, Relation};
pub use graph::{ContainerSnapshot, EntitySnapshot, RefGraph};
