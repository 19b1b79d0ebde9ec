//! Pure text rendering of a [`Forest`]: one plain tree, or one section per
//! tracked relationship.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use generational_arena::Index;
use tracing::instrument;

use crate::arena::{Forest, TreeNode};
use crate::model::{NodeRef, Relationship};

/// Renderer label callback: node, ancestors (root first), tracked
/// relationship of the current section (None in plain mode).
pub type LabelFn = Box<dyn Fn(&TreeNode, &[NodeRef], Option<&Relationship>) -> String>;

/// Renderer predicate with the same arguments, gating emission or recursion.
pub type PredicateFn = Box<dyn Fn(&TreeNode, &[NodeRef], Option<&Relationship>) -> bool>;

/// Configuration of a single render call.
pub struct RenderOptions {
    /// Tracked relationships. Empty renders one plain tree; non-empty
    /// renders one section per entry, in the given order.
    pub relationships: Vec<Relationship>,
    /// Uniform indent of section bodies
    pub section_indent: usize,
    /// Label override, defaults to the stored label
    pub label: Option<LabelFn>,
    /// Gates recursion into a node's children, defaults to true
    pub follow: Option<PredicateFn>,
    /// Gates emission of the node's own line, defaults to true. A followed
    /// but non-emitted node is transparent: its children render beneath the
    /// last emitted ancestor without an extra indent level.
    pub emit: Option<PredicateFn>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            relationships: Vec::new(),
            section_indent: 2,
            label: None,
            follow: None,
            emit: None,
        }
    }
}

impl RenderOptions {
    pub fn with_relationships<I, R>(mut self, relationships: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Relationship>,
    {
        self.relationships = relationships.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(
        mut self,
        label: impl Fn(&TreeNode, &[NodeRef], Option<&Relationship>) -> String + 'static,
    ) -> Self {
        self.label = Some(Box::new(label));
        self
    }

    pub fn with_follow(
        mut self,
        follow: impl Fn(&TreeNode, &[NodeRef], Option<&Relationship>) -> bool + 'static,
    ) -> Self {
        self.follow = Some(Box::new(follow));
        self
    }

    pub fn with_emit(
        mut self,
        emit: impl Fn(&TreeNode, &[NodeRef], Option<&Relationship>) -> bool + 'static,
    ) -> Self {
        self.emit = Some(Box::new(emit));
        self
    }
}

const BRANCH: &str = "├─ ";
const BRANCH_LAST: &str = "└─ ";
const CONTINUATION: &str = "│  ";
const CONTINUATION_LAST: &str = "   ";

/// Render a forest as structured text.
///
/// With no tracked relationships the forest renders once, pre-order, roots
/// separated by a blank line. With tracked relationships the forest renders
/// once per relationship under a `name:` heading, each section restricted to
/// the subtrees that carry the relationship; sections nobody carries, or
/// whose emission predicates leave nothing to print, are omitted entirely.
#[instrument(level = "debug", skip(forest, options))]
pub fn render_forest_text(forest: &Forest, options: &RenderOptions) -> String {
    let mut renderer = Renderer {
        forest,
        options,
        reach: HashMap::new(),
        computed: HashSet::new(),
    };
    if options.relationships.is_empty() {
        renderer.render_plain()
    } else {
        renderer.render_sections()
    }
}

struct Renderer<'a> {
    forest: &'a Forest,
    options: &'a RenderOptions,
    /// (relationship, node) -> subtree carries the relationship; scoped to
    /// this render call, never shared
    reach: HashMap<(Relationship, Index), bool>,
    computed: HashSet<Relationship>,
}

impl<'a> Renderer<'a> {
    fn render_plain(&mut self) -> String {
        let mut out = String::new();
        let mut ancestors: Vec<NodeRef> = Vec::new();
        for (i, &root) in self.forest.roots().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.render_node(root, "", None, &mut ancestors, None, &mut out);
        }
        out
    }

    fn render_sections(&mut self) -> String {
        let tracked = self.options.relationships.clone();
        let indent = " ".repeat(self.options.section_indent);
        let mut sections: Vec<String> = Vec::new();

        for relationship in &tracked {
            self.compute_reach(relationship);
            let roots: Vec<Index> = self
                .forest
                .roots()
                .iter()
                .copied()
                .filter(|&root| self.reach[&(relationship.clone(), root)])
                .collect();
            if roots.is_empty() {
                continue;
            }

            let mut body = String::new();
            let mut ancestors: Vec<NodeRef> = Vec::new();
            for &root in &roots {
                self.render_node(root, &indent, None, &mut ancestors, Some(relationship), &mut body);
            }
            if body.is_empty() {
                // every reachable node was pruned from emission
                continue;
            }
            sections.push(format!("{}:\n{}", relationship, body));
        }

        sections.join("\n")
    }

    /// Bottom-up reachability pass for one relationship, memoized for the
    /// duration of this render call.
    fn compute_reach(&mut self, relationship: &Relationship) {
        if !self.computed.insert(relationship.clone()) {
            return;
        }
        for (idx, node) in self.forest.iter_postorder() {
            let carried = node.relationships.contains(relationship)
                || node
                    .children
                    .iter()
                    .any(|child| self.reach[&(relationship.clone(), *child)]);
            self.reach.insert((relationship.clone(), idx), carried);
        }
    }

    fn render_node(
        &self,
        idx: Index,
        prefix: &str,
        position: Option<bool>,
        ancestors: &mut Vec<NodeRef>,
        relationship: Option<&Relationship>,
        out: &mut String,
    ) {
        let Some(node) = self.forest.get(idx) else {
            return;
        };

        let emitted = self
            .options
            .emit
            .as_ref()
            .map_or(true, |emit| emit(node, ancestors, relationship));

        let child_prefix = if emitted {
            let label = self
                .options
                .label
                .as_ref()
                .map(|label| label(node, ancestors, relationship))
                .unwrap_or_else(|| node.label.clone());
            match position {
                // roots carry no branch marker
                None => {
                    out.push_str(prefix);
                    out.push_str(&label);
                    out.push('\n');
                    prefix.to_string()
                }
                Some(is_last) => {
                    out.push_str(prefix);
                    out.push_str(if is_last { BRANCH_LAST } else { BRANCH });
                    out.push_str(&label);
                    out.push('\n');
                    format!(
                        "{}{}",
                        prefix,
                        if is_last { CONTINUATION_LAST } else { CONTINUATION }
                    )
                }
            }
        } else {
            // transparent: children keep this node's prefix, no extra indent
            prefix.to_string()
        };

        let followed = self
            .options
            .follow
            .as_ref()
            .map_or(true, |follow| follow(node, ancestors, relationship));
        if !followed {
            return;
        }

        // In a section, children are pre-filtered before branch markers are
        // computed so "last child" reflects the filtered list.
        let children: Vec<Index> = match relationship {
            Some(rel) => node
                .children
                .iter()
                .copied()
                .filter(|child| self.reach[&(rel.clone(), *child)])
                .collect(),
            None => node.children.clone(),
        };

        ancestors.push(Arc::clone(&node.node));
        let last = children.len().saturating_sub(1);
        for (i, &child) in children.iter().enumerate() {
            self.render_node(child, &child_prefix, Some(i == last), ancestors, relationship, out);
        }
        ancestors.pop();
    }
}
