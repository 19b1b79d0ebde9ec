//! Relation-dump ingestion: the line-oriented serialization in which an
//! edge-discovery mechanism hands over its node and edge facts.
//!
//! ```text
//! # comment and blank lines are ignored
//! node intro heading 1 Introduction
//! node p1 paragraph Some opening text
//! node fig1 figure
//! edge contains intro p1
//! edge references p1 fig1
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use tracing::instrument;

use crate::errors::{ForestError, ForestResult};
use crate::model::{DocNode, Edge, NodeRef};

/// Parsed relation dump: node declarations keyed by their file-local id,
/// plus the edge facts in declaration order. Every occurrence of an id
/// resolves to the same [`NodeRef`], so identity survives ingestion.
#[derive(Debug, Default)]
pub struct Dump {
    pub nodes: HashMap<String, NodeRef>,
    pub edges: Vec<Edge>,
}

pub struct DumpParser {
    node_regex: Regex,
    edge_regex: Regex,
}

impl Default for DumpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DumpParser {
    pub fn new() -> Self {
        Self {
            node_regex: Regex::new(r"^node\s+(\S+)\s+(\S+)(?:\s+(.*))?$").unwrap(),
            edge_regex: Regex::new(r"^edge\s+(\S+)\s+(\S+)\s+(\S+)\s*$").unwrap(),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn parse_file(&self, path: &Path) -> ForestResult<Dump> {
        if !path.exists() {
            return Err(ForestError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| ForestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let mut dump = Dump::default();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| ForestError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            self.parse_line(&line, line_no + 1, path, &mut dump)?;
        }
        Ok(dump)
    }

    /// Parse dump content from memory; `path` only contextualizes errors.
    pub fn parse_str(&self, content: &str, path: &Path) -> ForestResult<Dump> {
        let mut dump = Dump::default();
        for (line_no, line) in content.lines().enumerate() {
            self.parse_line(line, line_no + 1, path, &mut dump)?;
        }
        Ok(dump)
    }

    fn parse_line(
        &self,
        line: &str,
        line_no: usize,
        path: &Path,
        dump: &mut Dump,
    ) -> ForestResult<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        if let Some(caps) = self.node_regex.captures(trimmed) {
            let id = caps.get(1).unwrap().as_str();
            let kind = caps.get(2).unwrap().as_str();
            let rest = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");
            if dump.nodes.contains_key(id) {
                return Err(self.invalid(path, line_no, format!("duplicate node id `{}`", id)));
            }
            let node = self.parse_node(kind, rest, line_no, path)?;
            dump.nodes.insert(id.to_string(), node);
            return Ok(());
        }

        if let Some(caps) = self.edge_regex.captures(trimmed) {
            let relationship = caps.get(1).unwrap().as_str();
            let from_id = caps.get(2).unwrap().as_str();
            let to_id = caps.get(3).unwrap().as_str();
            let from = Arc::clone(self.lookup(dump, from_id, line_no, path)?);
            let to = Arc::clone(self.lookup(dump, to_id, line_no, path)?);
            dump.edges.push(Edge::new(relationship, &from, &to));
            return Ok(());
        }

        Err(self.invalid(path, line_no, "expected `node` or `edge` directive".to_string()))
    }

    fn parse_node(
        &self,
        kind: &str,
        rest: &str,
        line_no: usize,
        path: &Path,
    ) -> ForestResult<NodeRef> {
        match kind {
            "heading" => {
                let (depth_str, text) = rest
                    .split_once(char::is_whitespace)
                    .map(|(depth, text)| (depth, text.trim()))
                    .unwrap_or((rest, ""));
                let depth: u8 = depth_str.parse().map_err(|_| {
                    self.invalid(path, line_no, format!("invalid heading depth `{}`", depth_str))
                })?;
                Ok(DocNode::heading(depth, text))
            }
            "paragraph" => Ok(DocNode::paragraph(rest)),
            other => Ok(DocNode::other(other, rest)),
        }
    }

    fn lookup<'a>(
        &self,
        dump: &'a Dump,
        id: &str,
        line_no: usize,
        path: &Path,
    ) -> ForestResult<&'a NodeRef> {
        dump.nodes.get(id).ok_or_else(|| ForestError::UnknownNode {
            path: path.to_path_buf(),
            line: line_no,
            id: id.to_string(),
        })
    }

    fn invalid(&self, path: &Path, line: usize, reason: String) -> ForestError {
        ForestError::InvalidDirective {
            path: PathBuf::from(path),
            line,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_repeated_id_resolves_to_same_node() {
        let content = "node a section Intro\nnode b paragraph text\nedge contains b a\nedge mentions b a\n";
        let dump = DumpParser::new()
            .parse_str(content, Path::new("inline"))
            .unwrap();
        assert_eq!(dump.edges.len(), 2);
        assert!(Arc::ptr_eq(&dump.edges[0].from, &dump.edges[1].from));
        assert!(Arc::ptr_eq(&dump.edges[0].to, &dump.edges[1].to));
    }
}
