//! Hierarchy builder: consolidates an edge collection into a [`Forest`]
//! under configurable orientation, level, and label policies.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::arena::{Forest, TreeNode};
use crate::errors::{ForestError, ForestResult};
use crate::label::default_label;
use crate::model::{DocNode, Edge, NodeRef, Relationship};

/// Decides which side of an edge is the parent, returning `(parent, child)`.
/// Returning `None` excludes the edge from all further processing.
pub type ParentResolver = Box<dyn Fn(&Edge) -> Option<(NodeRef, NodeRef)>>;

/// Overrides the level of a node. Receives the inherited level: 0 for roots,
/// parent level + 1 otherwise.
pub type LevelPolicy = Box<dyn Fn(&NodeRef, usize) -> usize>;

/// Produces the stored label of a node.
pub type LabelPolicy = Box<dyn Fn(&DocNode) -> String>;

/// Configuration of a single build run.
pub struct BuildOptions {
    /// Relationship allow-list. Empty: every relationship shapes the tree.
    /// Non-empty: the first entry is the primary (structural) relationship,
    /// the rest are kept for per-node bookkeeping only, and anything
    /// unlisted is dropped before any bookkeeping.
    pub relationships: Vec<Relationship>,
    pub resolver: ParentResolver,
    pub level: LevelPolicy,
    pub label: LabelPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            relationships: Vec::new(),
            resolver: Box::new(|edge| Some((Arc::clone(&edge.to), Arc::clone(&edge.from)))),
            level: Box::new(|_, inherited| inherited),
            label: Box::new(default_label),
        }
    }
}

impl BuildOptions {
    pub fn with_relationships<I, R>(mut self, relationships: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Relationship>,
    {
        self.relationships = relationships.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resolver(
        mut self,
        resolver: impl Fn(&Edge) -> Option<(NodeRef, NodeRef)> + 'static,
    ) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_level(mut self, level: impl Fn(&NodeRef, usize) -> usize + 'static) -> Self {
        self.level = Box::new(level);
        self
    }

    pub fn with_label(mut self, label: impl Fn(&DocNode) -> String + 'static) -> Self {
        self.label = Box::new(label);
        self
    }
}

/// Consolidates edge collections into immutable forests.
pub struct ForestBuilder {
    options: BuildOptions,
}

impl Default for ForestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self {
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build a forest from the edge collection.
    ///
    /// Edges carrying a relationship outside a non-empty allow-list, and
    /// edges the resolver declines, are dropped before any bookkeeping. Of
    /// the remainder, only primary-relationship edges shape the tree; every
    /// surviving edge contributes to the child's incoming-relationship set.
    /// Conflicting parent assignments resolve last-write-wins.
    #[instrument(level = "debug", skip(self, edges))]
    pub fn build(&self, edges: &[Edge]) -> ForestResult<Forest> {
        let mut state = BuildState::default();
        let primary = self.options.relationships.first();

        for (edge_idx, edge) in edges.iter().enumerate() {
            if !self.options.relationships.is_empty()
                && !self.options.relationships.contains(&edge.relationship)
            {
                // unlisted relationships are invisible to all bookkeeping
                continue;
            }
            let Some((parent, child)) = (self.options.resolver)(edge) else {
                continue;
            };

            let parent_h = state.intern(&parent);
            let child_h = state.intern(&child);

            state.relationship_seq.push(edge.relationship.clone());
            state
                .incoming
                .entry(child_h)
                .or_default()
                .push(edge.relationship.clone());

            let structural = primary.map_or(true, |p| edge.relationship == *p);
            if structural {
                // last write wins on conflicting parent assignments
                state.parent_of.insert(child_h, parent_h);
                if state
                    .seen_links
                    .insert((parent_h, child_h, edge.relationship.clone()))
                {
                    state
                        .children_of
                        .entry(parent_h)
                        .or_default()
                        .push((child_h, edge_idx));
                }
                state.structural_edges += 1;
            }
        }

        if state.structural_edges == 0 {
            debug!("no structural edges, returning empty forest");
            return Ok(Forest::default());
        }

        self.materialize(edges, state)
    }

    /// Materialize tree nodes depth-first, parent before children, using an
    /// explicit stack. The cycle guard is a per-root "currently on path"
    /// handle set; parent chains no root can reach are caught afterwards.
    fn materialize(&self, edges: &[Edge], state: BuildState) -> ForestResult<Forest> {
        let relationships_used: Vec<Relationship> =
            state.relationship_seq.iter().cloned().unique().collect();
        let mut forest = Forest::with_bookkeeping(relationships_used, edges.to_vec());

        enum Frame {
            Enter {
                handle: usize,
                parent: Option<Index>,
                via: Option<usize>,
            },
            Exit {
                handle: usize,
            },
        }

        let roots: Vec<usize> = (0..state.payloads.len())
            .filter(|handle| !state.parent_of.contains_key(handle))
            .collect();
        debug!(roots = roots.len(), nodes = state.payloads.len(), "materializing");

        let mut materialized: HashSet<usize> = HashSet::new();
        let mut on_path: HashSet<usize> = HashSet::new();

        for &root in &roots {
            on_path.clear();
            let mut stack = vec![Frame::Enter {
                handle: root,
                parent: None,
                via: None,
            }];

            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Enter { handle, parent, via } => {
                        if !on_path.insert(handle) {
                            return Err(ForestError::CycleDetected(self.describe(&state, handle)));
                        }

                        let node = Arc::clone(&state.payloads[handle]);
                        let inherited = parent
                            .and_then(|p| forest.get(p))
                            .map(|p| p.level + 1)
                            .unwrap_or(0);
                        let level = (self.options.level)(&node, inherited);
                        let label = (self.options.label)(&node);
                        let relationships = state
                            .incoming
                            .get(&handle)
                            .map(|rels| rels.iter().cloned().unique().collect())
                            .unwrap_or_default();

                        let idx = forest.insert_node(
                            TreeNode {
                                node,
                                incoming_edge: via.map(|edge_idx| edges[edge_idx].clone()),
                                relationships,
                                label,
                                level,
                                parent,
                                children: Vec::new(),
                            },
                            parent,
                        );
                        materialized.insert(handle);
                        stack.push(Frame::Exit { handle });

                        if let Some(children) = state.children_of.get(&handle) {
                            for &(child, edge_idx) in children.iter().rev() {
                                // keep only entries whose final parent is this node
                                if state.parent_of.get(&child) == Some(&handle) {
                                    stack.push(Frame::Enter {
                                        handle: child,
                                        parent: Some(idx),
                                        via: Some(edge_idx),
                                    });
                                }
                            }
                        }
                    }
                    Frame::Exit { handle } => {
                        on_path.remove(&handle);
                    }
                }
            }
        }

        // A parent chain that is entirely cyclic is reachable from no root
        if let Some(stranded) =
            (0..state.payloads.len()).find(|handle| !materialized.contains(handle))
        {
            return Err(ForestError::CycleDetected(self.describe(&state, stranded)));
        }

        Ok(forest)
    }

    fn describe(&self, state: &BuildState, handle: usize) -> String {
        (self.options.label)(&state.payloads[handle])
    }
}

/// Per-build bookkeeping, keyed by stable integer node handles assigned at
/// first sight (node identity is the `Arc` allocation).
#[derive(Default)]
struct BuildState {
    /// Arc pointer -> handle
    handles: HashMap<usize, usize>,
    /// handle -> node, in discovery order
    payloads: Vec<NodeRef>,
    /// child handle -> final parent handle
    parent_of: HashMap<usize, usize>,
    /// parent handle -> (child handle, edge index), in discovery order
    children_of: HashMap<usize, Vec<(usize, usize)>>,
    /// structural links already recorded, as (parent, child, relationship)
    seen_links: HashSet<(usize, usize, Relationship)>,
    /// child handle -> relationships observed on incoming edges
    incoming: HashMap<usize, Vec<Relationship>>,
    /// every surviving edge's relationship, in processing order
    relationship_seq: Vec<Relationship>,
    structural_edges: usize,
}

impl BuildState {
    fn intern(&mut self, node: &NodeRef) -> usize {
        let ptr = Arc::as_ptr(node) as usize;
        if let Some(&handle) = self.handles.get(&ptr) {
            return handle;
        }
        let handle = self.payloads.len();
        self.handles.insert(ptr, handle);
        self.payloads.push(Arc::clone(node));
        handle
    }
}
