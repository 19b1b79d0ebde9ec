//! Tests for ForestBuilder

use std::collections::HashSet;
use std::sync::Arc;

use docforest::{
    build_forest, render_forest_text, BuildOptions, DocNode, Edge, ForestError, NodeRef,
    Relationship, RenderOptions,
};

fn chain() -> (NodeRef, NodeRef, NodeRef, Vec<Edge>) {
    let a = DocNode::heading(1, "A");
    let b = DocNode::heading(2, "B");
    let c = DocNode::paragraph("C");
    let edges = vec![Edge::new("child-of", &b, &a), Edge::new("child-of", &c, &b)];
    (a, b, c, edges)
}

#[test]
fn given_chain_edges_when_building_then_single_root_chain() {
    // Arrange
    let (a, b, c, edges) = chain();

    // Act
    let forest = build_forest(&edges, BuildOptions::default()).unwrap();

    // Assert
    assert_eq!(forest.roots().len(), 1);
    let root = forest.get(forest.roots()[0]).unwrap();
    assert!(Arc::ptr_eq(&root.node, &a));
    assert_eq!(root.level, 0);
    assert_eq!(root.label, "heading:#1 A");
    assert!(root.incoming_edge.is_none());

    let child = forest.get(root.children[0]).unwrap();
    assert!(Arc::ptr_eq(&child.node, &b));
    assert_eq!(child.level, 1);
    assert!(child.incoming_edge.is_some());

    let grandchild = forest.get(child.children[0]).unwrap();
    assert!(Arc::ptr_eq(&grandchild.node, &c));
    assert_eq!(grandchild.level, 2);
    assert!(grandchild.children.is_empty());
}

#[test]
fn given_empty_edge_collection_when_building_then_forest_is_empty() {
    let forest = build_forest(&[], BuildOptions::default()).unwrap();

    assert!(forest.is_empty());
    assert!(forest.roots().is_empty());
    assert!(forest.relationships_used().is_empty());
}

#[test]
fn given_conflicting_parents_when_building_then_last_write_wins() {
    // Arrange: X assigned to P1 first, then to P2
    let p1 = DocNode::heading(1, "P1");
    let p2 = DocNode::heading(1, "P2");
    let x = DocNode::paragraph("X");
    let edges = vec![
        Edge::new("child-of", &x, &p1),
        Edge::new("child-of", &x, &p2),
    ];

    // Act
    let forest = build_forest(&edges, BuildOptions::default()).unwrap();

    // Assert: both parents are roots, X appears exactly once, under P2
    assert_eq!(forest.roots().len(), 2);
    let occurrences = forest
        .iter()
        .filter(|(_, node)| Arc::ptr_eq(&node.node, &x))
        .count();
    assert_eq!(occurrences, 1);

    let first = forest.get(forest.roots()[0]).unwrap();
    assert!(Arc::ptr_eq(&first.node, &p1));
    assert!(first.children.is_empty());

    let second = forest.get(forest.roots()[1]).unwrap();
    assert!(Arc::ptr_eq(&second.node, &p2));
    assert_eq!(second.children.len(), 1);
}

#[test]
fn given_duplicate_edges_when_building_then_child_recorded_once() {
    let a = DocNode::heading(1, "A");
    let b = DocNode::paragraph("B");
    let edges = vec![Edge::new("child-of", &b, &a), Edge::new("child-of", &b, &a)];

    let forest = build_forest(&edges, BuildOptions::default()).unwrap();

    let root = forest.get(forest.roots()[0]).unwrap();
    assert_eq!(root.children.len(), 1);
}

#[test]
fn given_two_distinct_edges_same_pair_when_building_then_child_appears_twice() {
    // Same child reached via two relationships, all structural
    let a = DocNode::heading(1, "A");
    let b = DocNode::paragraph("B");
    let edges = vec![Edge::new("r1", &b, &a), Edge::new("r2", &b, &a)];

    let forest = build_forest(&edges, BuildOptions::default()).unwrap();

    let root = forest.get(forest.roots()[0]).unwrap();
    assert_eq!(root.children.len(), 2);
    for &child_idx in &root.children {
        let child = forest.get(child_idx).unwrap();
        assert!(Arc::ptr_eq(&child.node, &b));
        // the incoming set is per node, not per occurrence
        assert_eq!(
            child.relationships,
            vec![Relationship::new("r1"), Relationship::new("r2")]
        );
    }
}

#[test]
fn given_allow_list_when_building_then_only_primary_shapes_tree() {
    // Arrange: r1 is primary, r2 is bookkeeping only
    let a = DocNode::heading(1, "A");
    let b = DocNode::paragraph("B");
    let c = DocNode::paragraph("C");
    let edges = vec![Edge::new("r1", &b, &a), Edge::new("r2", &c, &a)];
    let options = BuildOptions::default().with_relationships(["r1", "r2"]);

    // Act
    let forest = build_forest(&edges, options).unwrap();

    // Assert: A root with child B, C a childless root of its own
    assert_eq!(forest.roots().len(), 2);
    let first = forest.get(forest.roots()[0]).unwrap();
    assert!(Arc::ptr_eq(&first.node, &a));
    assert_eq!(first.children.len(), 1);
    let child = forest.get(first.children[0]).unwrap();
    assert!(Arc::ptr_eq(&child.node, &b));
    assert_eq!(child.relationships, vec![Relationship::new("r1")]);

    let second = forest.get(forest.roots()[1]).unwrap();
    assert!(Arc::ptr_eq(&second.node, &c));
    assert!(second.children.is_empty());
    assert_eq!(second.relationships, vec![Relationship::new("r2")]);

    assert_eq!(
        forest.relationships_used(),
        &[Relationship::new("r1"), Relationship::new("r2")]
    );
}

#[test]
fn given_unlisted_relationship_when_building_then_edge_is_invisible() {
    let a = DocNode::heading(1, "A");
    let b = DocNode::paragraph("B");
    let c = DocNode::paragraph("C");
    let edges = vec![Edge::new("r1", &b, &a), Edge::new("zz", &c, &a)];
    let options = BuildOptions::default().with_relationships(["r1"]);

    let forest = build_forest(&edges, options).unwrap();

    // the zz edge left no trace: no node, no bookkeeping
    assert_eq!(forest.len(), 2);
    assert!(forest.iter().all(|(_, node)| !Arc::ptr_eq(&node.node, &c)));
    assert_eq!(forest.relationships_used(), &[Relationship::new("r1")]);
}

#[test]
fn given_resolver_returning_none_when_building_then_edge_excluded() {
    let a = DocNode::heading(1, "A");
    let b = DocNode::paragraph("B");
    let c = DocNode::paragraph("C");
    let edges = vec![Edge::new("child-of", &b, &a), Edge::new("skip", &c, &a)];
    let options = BuildOptions::default().with_resolver(|edge| {
        if edge.relationship.as_str() == "skip" {
            None
        } else {
            Some((Arc::clone(&edge.to), Arc::clone(&edge.from)))
        }
    });

    let forest = build_forest(&edges, options).unwrap();

    assert_eq!(forest.len(), 2);
    assert_eq!(forest.relationships_used(), &[Relationship::new("child-of")]);
}

#[test]
fn given_empty_allow_list_when_building_then_all_edge_nodes_reachable() {
    // Every node appearing in the collection must be reachable from a root
    let a = DocNode::heading(1, "A");
    let b = DocNode::paragraph("B");
    let c = DocNode::paragraph("C");
    let d = DocNode::other("figure", "D");
    let edges = vec![
        Edge::new("r1", &b, &a),
        Edge::new("r2", &c, &b),
        Edge::new("r3", &d, &a),
    ];

    let forest = build_forest(&edges, BuildOptions::default()).unwrap();

    let expected: HashSet<*const DocNode> = edges
        .iter()
        .flat_map(|edge| [Arc::as_ptr(&edge.from), Arc::as_ptr(&edge.to)])
        .collect();
    let reachable: HashSet<*const DocNode> =
        forest.iter().map(|(_, node)| Arc::as_ptr(&node.node)).collect();
    assert_eq!(reachable, expected);
}

#[test]
fn given_structural_incoming_edge_when_building_then_node_is_never_a_root() {
    let (a, b, c, edges) = chain();

    let forest = build_forest(&edges, BuildOptions::default()).unwrap();

    for &root_idx in forest.roots() {
        let root = forest.get(root_idx).unwrap();
        assert!(Arc::ptr_eq(&root.node, &a));
        assert!(!Arc::ptr_eq(&root.node, &b));
        assert!(!Arc::ptr_eq(&root.node, &c));
    }
}

#[test]
fn given_same_input_when_building_twice_then_forests_identical() {
    let (_, _, _, edges) = chain();

    let first = build_forest(&edges, BuildOptions::default()).unwrap();
    let second = build_forest(&edges, BuildOptions::default()).unwrap();

    assert_eq!(first.roots().len(), second.roots().len());
    assert_eq!(first.relationships_used(), second.relationships_used());
    assert_eq!(
        render_forest_text(&first, &RenderOptions::default()),
        render_forest_text(&second, &RenderOptions::default()),
    );
}

#[test]
fn given_two_node_cycle_when_building_then_cycle_detected() {
    let a = DocNode::paragraph("A");
    let b = DocNode::paragraph("B");
    let edges = vec![Edge::new("child-of", &b, &a), Edge::new("child-of", &a, &b)];

    let result = build_forest(&edges, BuildOptions::default());

    assert!(matches!(result, Err(ForestError::CycleDetected(_))));
}

#[test]
fn given_cycle_behind_a_root_when_building_then_cycle_detected() {
    let root = DocNode::heading(1, "R");
    let a = DocNode::paragraph("A");
    let b = DocNode::paragraph("B");
    let edges = vec![
        Edge::new("child-of", &a, &root),
        Edge::new("child-of", &b, &a),
        Edge::new("child-of", &a, &b),
    ];

    let result = build_forest(&edges, BuildOptions::default());

    assert!(matches!(result, Err(ForestError::CycleDetected(_))));
}

#[test]
fn given_self_edge_when_building_then_cycle_detected() {
    let a = DocNode::paragraph("A");
    let edges = vec![Edge::new("child-of", &a, &a)];

    let result = build_forest(&edges, BuildOptions::default());

    assert!(matches!(result, Err(ForestError::CycleDetected(_))));
}

#[test]
fn given_level_policy_when_building_then_levels_overridden() {
    let (_, _, _, edges) = chain();
    let options = BuildOptions::default().with_level(|_, inherited| inherited + 10);

    let forest = build_forest(&edges, options).unwrap();

    let root = forest.get(forest.roots()[0]).unwrap();
    assert_eq!(root.level, 10);
    let child = forest.get(root.children[0]).unwrap();
    assert_eq!(child.level, 21);
    let grandchild = forest.get(child.children[0]).unwrap();
    assert_eq!(grandchild.level, 32);
}

#[test]
fn given_label_policy_when_building_then_labels_overridden() {
    let (_, _, _, edges) = chain();
    let options = BuildOptions::default().with_label(|node| format!("<{}>", node.text));

    let forest = build_forest(&edges, options).unwrap();

    let root = forest.get(forest.roots()[0]).unwrap();
    assert_eq!(root.label, "<A>");
}

#[test]
fn given_only_nonstructural_edges_when_building_then_forest_is_empty() {
    // r2 never shapes the tree when r1 is primary; with no structural edge
    // at all the forest collapses to empty
    let a = DocNode::heading(1, "A");
    let c = DocNode::paragraph("C");
    let edges = vec![Edge::new("r2", &c, &a)];
    let options = BuildOptions::default().with_relationships(["r1", "r2"]);

    let forest = build_forest(&edges, options).unwrap();

    assert!(forest.is_empty());
    assert!(forest.roots().is_empty());
    assert!(forest.relationships_used().is_empty());
}
