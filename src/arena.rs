use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::model::{Edge, NodeRef, Relationship};

/// Node of a materialized hierarchy.
#[derive(Debug)]
pub struct TreeNode {
    /// Underlying document node
    pub node: NodeRef,
    /// Structural edge that placed this node, None for roots
    pub incoming_edge: Option<Edge>,
    /// Relationships observed on incoming edges, ordered and de-duplicated
    pub relationships: Vec<Relationship>,
    /// Label produced by the label policy at build time
    pub label: String,
    /// Depth in the forest, subject to the level policy
    pub level: usize,
    /// Index of the parent node in the arena, None for roots
    pub parent: Option<Index>,
    /// Indices of child nodes, in edge discovery order
    pub children: Vec<Index>,
}

/// Arena-based forest of [`TreeNode`]s plus the bookkeeping the builder
/// collected while consolidating the edges.
///
/// Built once, atomically; read-only afterwards. A finished forest is
/// `Send + Sync` and can be shared across threads without synchronization.
#[derive(Debug)]
pub struct Forest {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Indices of root nodes, in discovery order
    roots: Vec<Index>,
    /// Relationships that survived filtering, in first-seen order
    relationships_used: Vec<Relationship>,
    /// The edge collection the forest was built from
    edges: Vec<Edge>,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    pub(crate) fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            relationships_used: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub(crate) fn with_bookkeeping(relationships_used: Vec<Relationship>, edges: Vec<Edge>) -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            relationships_used,
            edges,
        }
    }

    /// Insert a node, attaching it under `parent` or as a new root.
    pub(crate) fn insert_node(&mut self, node: TreeNode, parent: Option<Index>) -> Index {
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    pub fn get(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn relationships_used(&self) -> &[Relationship] {
        &self.relationships_used
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Maximum node count on any root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.roots.iter().map(|&root| (root, 1)).collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.arena.get(idx) {
                for &child in &node.children {
                    stack.push((child, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Labels of all leaf nodes, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_labels(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.label.clone())
            .collect()
    }

    /// Root-to-leaf label chains, one per leaf, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn branches(&self) -> Vec<Vec<String>> {
        let mut branches = Vec::new();
        let mut stack: Vec<(Index, Vec<String>)> = self
            .roots
            .iter()
            .rev()
            .map(|&root| (root, Vec::new()))
            .collect();

        while let Some((idx, mut path)) = stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                path.push(node.label.clone());
                if node.children.is_empty() {
                    branches.push(path);
                } else {
                    for &child in node.children.iter().rev() {
                        stack.push((child, path.clone()));
                    }
                }
            }
        }

        branches
    }
}

pub struct TreeIterator<'a> {
    forest: &'a Forest,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots.iter().rev().map(|&root| (root, false)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
