//! Core model: relationships, document nodes, and edge facts.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Caller-defined label naming the semantic meaning of an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationship(String);

impl Relationship {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Relationship {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Relationship {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Kind tag of a content-tree element, as far as this crate inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Heading { depth: u8 },
    Paragraph,
    /// Any other kind, carrying the tag the producing tree reported
    Other(String),
}

/// Content-tree element. Owned by the producing document model; this crate
/// reads the kind tag and text and otherwise treats nodes as opaque
/// identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocNode {
    pub kind: NodeKind,
    pub text: String,
}

/// Shared reference to a document node.
///
/// Identity is the allocation, not the value: two nodes with equal text are
/// distinct unless they share the same `Arc`. Everything downstream (handle
/// interning, root discovery, reachability) keys off this identity.
pub type NodeRef = Arc<DocNode>;

impl DocNode {
    pub fn heading(depth: u8, text: impl Into<String>) -> NodeRef {
        Arc::new(Self {
            kind: NodeKind::Heading { depth },
            text: text.into(),
        })
    }

    pub fn paragraph(text: impl Into<String>) -> NodeRef {
        Arc::new(Self {
            kind: NodeKind::Paragraph,
            text: text.into(),
        })
    }

    pub fn other(kind: impl Into<String>, text: impl Into<String>) -> NodeRef {
        Arc::new(Self {
            kind: NodeKind::Other(kind.into()),
            text: text.into(),
        })
    }
}

/// A directed relationship fact between two nodes.
///
/// Which side acts as parent is decided by the resolver policy at build
/// time, not by the edge itself.
#[derive(Debug, Clone)]
pub struct Edge {
    pub relationship: Relationship,
    pub from: NodeRef,
    pub to: NodeRef,
}

impl Edge {
    pub fn new(relationship: impl Into<Relationship>, from: &NodeRef, to: &NodeRef) -> Self {
        Self {
            relationship: relationship.into(),
            from: Arc::clone(from),
            to: Arc::clone(to),
        }
    }
}
