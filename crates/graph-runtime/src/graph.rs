// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The runtime's graph object.
//!
//! A [`Graph`] can only be built from a `GraphDef` that passes import
//! checks, so every `Graph` in the process has unique node names and no
//! dangling inputs.

use std::collections::HashMap;
use std::fmt;

use bundle_format::{GraphDef, NodeDef};

use crate::Status;

/// Strips the control marker (`^op`) and output index (`op:1`) from a tensor
/// or input reference, leaving the node name.
pub fn node_name(reference: &str) -> &str {
    let name = reference.strip_prefix('^').unwrap_or(reference);
    match name.rsplit_once(':') {
        Some((node, index)) if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) => {
            node
        }
        _ => name,
    }
}

/// An imported computation graph.
#[derive(Debug, Clone)]
pub struct Graph {
    def: GraphDef,
    /// Node name -> position in `def.node`.
    index: HashMap<String, usize>,
}

impl Graph {
    /// Imports a decoded graph.
    ///
    /// # Checks
    /// - Every node has a non-empty, unique name.
    /// - Every data and control input names a node in the graph.
    pub fn import(def: GraphDef) -> Result<Self, Status> {
        let mut index = HashMap::with_capacity(def.node.len());
        for (i, node) in def.node.iter().enumerate() {
            if node.name.is_empty() {
                return Err(Status::invalid_argument(format!(
                    "node {i} (op '{}') has no name",
                    node.op
                )));
            }
            if index.insert(node.name.clone(), i).is_some() {
                return Err(Status::invalid_argument(format!(
                    "Node '{}' is not unique",
                    node.name
                )));
            }
        }

        for node in &def.node {
            for input in &node.input {
                if !index.contains_key(node_name(input)) {
                    return Err(Status::invalid_argument(format!(
                        "Node '{}': Unknown input node '{input}'",
                        node.name
                    )));
                }
            }
        }

        Ok(Self { def, index })
    }

    pub fn num_nodes(&self) -> usize {
        self.def.node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.def.node.is_empty()
    }

    /// Looks up a node by name. Tensor references such as `"w:0"` resolve
    /// to their producing node.
    pub fn node(&self, reference: &str) -> Option<&NodeDef> {
        self.index
            .get(node_name(reference))
            .map(|&i| &self.def.node[i])
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.node(reference).is_some()
    }

    /// Nodes in definition order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeDef> {
        self.def.node.iter()
    }

    /// Distinct op types used by the graph, sorted.
    pub fn op_types(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.def.node.iter().map(|n| n.op.as_str()).collect();
        ops.sort_unstable();
        ops.dedup();
        ops
    }

    /// The `GraphDef` producer version, if the graph carries one.
    pub fn producer(&self) -> Option<i32> {
        self.def.versions.map(|v| v.producer)
    }

    pub fn graph_def(&self) -> &GraphDef {
        &self.def
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Graph ({} nodes, {} op types", self.num_nodes(), self.op_types().len())?;
        if let Some(producer) = self.producer() {
            write!(f, ", producer {producer}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> GraphDef {
        GraphDef::new(vec![
            NodeDef::new("x", "Placeholder"),
            NodeDef::new("w", "VariableV2"),
            NodeDef::new("y", "MatMul").with_inputs(["x", "w:0"]),
            NodeDef::new("train_op", "NoOp").with_inputs(["^y"]),
        ])
    }

    #[test]
    fn test_node_name() {
        assert_eq!(node_name("w"), "w");
        assert_eq!(node_name("w:0"), "w");
        assert_eq!(node_name("scope/w:12"), "scope/w");
        assert_eq!(node_name("^init"), "init");
        assert_eq!(node_name("odd:name"), "odd:name");
        assert_eq!(node_name("trailing:"), "trailing:");
    }

    #[test]
    fn test_import_ok() {
        let graph = Graph::import(chain()).unwrap();
        assert_eq!(graph.num_nodes(), 4);
        assert!(graph.contains("y:0"));
        assert!(graph.contains("^train_op"));
        assert!(!graph.contains("z"));
        assert_eq!(graph.node("w:0").unwrap().op, "VariableV2");
        assert_eq!(graph.op_types(), vec!["MatMul", "NoOp", "Placeholder", "VariableV2"]);
    }

    #[test]
    fn test_import_empty_graph() {
        let graph = Graph::import(GraphDef::default()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.producer(), None);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut def = chain();
        def.node.push(NodeDef::new("x", "Const"));
        let err = Graph::import(def).unwrap_err();
        assert_eq!(err.code, crate::Code::InvalidArgument);
        assert!(err.message.contains("'x' is not unique"));
    }

    #[test]
    fn test_dangling_input_rejected() {
        let mut def = chain();
        def.node.push(NodeDef::new("loss", "Mean").with_inputs(["missing:0"]));
        let err = Graph::import(def).unwrap_err();
        assert_eq!(err.code, crate::Code::InvalidArgument);
        assert!(err.message.contains("Unknown input node 'missing:0'"));
    }

    #[test]
    fn test_unnamed_node_rejected() {
        let def = GraphDef::new(vec![NodeDef::new("", "Const")]);
        assert!(Graph::import(def).is_err());
    }

    #[test]
    fn test_display() {
        let mut def = chain();
        def.versions = Some(bundle_format::VersionDef {
            producer: 21,
            min_consumer: 12,
        });
        let graph = Graph::import(def).unwrap();
        assert_eq!(graph.to_string(), "Graph (4 nodes, 4 op types, producer 21)");
    }
}
