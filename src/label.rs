//! Label policies: the default heuristic and the level-styled decorator.

use colored::{Color, Colorize};

use crate::arena::TreeNode;
use crate::model::{DocNode, NodeKind, NodeRef, Relationship};
use crate::render::LabelFn;

/// Default label heuristic.
///
/// Headings and paragraphs get a compact `kind:text` form; everything else
/// falls back to a structural dump of the node.
pub fn default_label(node: &DocNode) -> String {
    match &node.kind {
        NodeKind::Heading { depth } => format!("heading:#{} {}", depth, node.text),
        NodeKind::Paragraph => format!("paragraph:{}", node.text),
        NodeKind::Other(_) => format!("{:?}", node),
    }
}

const LEVEL_PALETTE: [Color; 5] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
];

/// Label policy wrapping each stored label with terminal styling keyed by
/// tree level: roots bold, deeper levels cycling a fixed palette. Decoration
/// only, the emitted structure is untouched.
pub fn level_styled() -> LabelFn {
    Box::new(
        |node: &TreeNode, _ancestors: &[NodeRef], _relationship: Option<&Relationship>| {
            if node.level == 0 {
                node.label.bold().to_string()
            } else {
                let color = LEVEL_PALETTE[(node.level - 1) % LEVEL_PALETTE.len()];
                node.label.color(color).to_string()
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label_heading() {
        let node = DocNode::heading(2, "Overview");
        assert_eq!(default_label(&node), "heading:#2 Overview");
    }

    #[test]
    fn test_default_label_paragraph() {
        let node = DocNode::paragraph("some text");
        assert_eq!(default_label(&node), "paragraph:some text");
    }

    #[test]
    fn test_default_label_other_is_structural_dump() {
        let node = DocNode::other("figure", "fig 1");
        let label = default_label(&node);
        assert!(label.contains("figure"));
        assert!(label.contains("fig 1"));
    }

    #[test]
    fn test_level_styled_keeps_label_text() {
        let node = TreeNode {
            node: DocNode::paragraph("x"),
            incoming_edge: None,
            relationships: Vec::new(),
            label: "x".to_string(),
            level: 3,
            parent: None,
            children: Vec::new(),
        };
        let styled = level_styled()(&node, &[], None);
        assert!(styled.contains('x'));
    }
}
