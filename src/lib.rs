//! docforest derives hierarchical views from flat collections of typed
//! relationships between document nodes and renders them as readable,
//! filterable, relationship-grouped text.
//!
//! Two entry points cover the common path:
//!
//! - [`build_forest`] consolidates an edge collection into an immutable
//!   [`Forest`] under configurable orientation, level, and label policies;
//! - [`render_forest_text`] renders a forest as plain or
//!   relationship-grouped text.
//!
//! ```
//! use docforest::{build_forest, render_forest_text, BuildOptions, DocNode, Edge, RenderOptions};
//!
//! let a = DocNode::heading(1, "A");
//! let b = DocNode::paragraph("B");
//! let edges = vec![Edge::new("contains", &b, &a)];
//!
//! let forest = build_forest(&edges, BuildOptions::default()).unwrap();
//! let text = render_forest_text(&forest, &RenderOptions::default());
//! assert_eq!(text, "heading:#1 A\n└─ paragraph:B\n");
//! ```

pub mod arena;
pub mod builder;
pub mod cli;
pub mod config;
pub mod convert;
pub mod errors;
pub mod exitcode;
pub mod label;
pub mod model;
pub mod parser;
pub mod render;
pub mod select;
pub mod util;

pub use arena::{Forest, TreeNode};
pub use builder::{BuildOptions, ForestBuilder};
pub use convert::ForestDump;
pub use errors::{ForestError, ForestResult};
pub use model::{DocNode, Edge, NodeKind, NodeRef, Relationship};
pub use parser::{Dump, DumpParser};
pub use render::{render_forest_text, RenderOptions};

/// Build a forest from an edge collection under the given options.
pub fn build_forest(edges: &[Edge], options: BuildOptions) -> ForestResult<Forest> {
    ForestBuilder::with_options(options).build(edges)
}
