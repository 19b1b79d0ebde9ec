//! Serializable projection of a [`Forest`] for downstream consumers.

use generational_arena::Index;
use serde::Serialize;

use crate::arena::Forest;

/// One node of the exported view.
#[derive(Debug, Serialize)]
pub struct TreeNodeDump {
    pub label: String,
    pub level: usize,
    pub relationships: Vec<String>,
    pub children: Vec<TreeNodeDump>,
}

/// Exported view of a complete forest.
#[derive(Debug, Serialize)]
pub struct ForestDump {
    pub relationships_used: Vec<String>,
    pub roots: Vec<TreeNodeDump>,
}

impl From<&Forest> for ForestDump {
    fn from(forest: &Forest) -> Self {
        fn convert(forest: &Forest, idx: Index) -> Option<TreeNodeDump> {
            let node = forest.get(idx)?;
            Some(TreeNodeDump {
                label: node.label.clone(),
                level: node.level,
                relationships: node.relationships.iter().map(|r| r.to_string()).collect(),
                children: node
                    .children
                    .iter()
                    .filter_map(|&child| convert(forest, child))
                    .collect(),
            })
        }

        Self {
            relationships_used: forest
                .relationships_used()
                .iter()
                .map(|r| r.to_string())
                .collect(),
            roots: forest
                .roots()
                .iter()
                .filter_map(|&root| convert(forest, root))
                .collect(),
        }
    }
}
