// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution sessions over an imported graph.
//!
//! A [`Session`] pins a graph together with its [`SessionOptions`]. Running
//! kernels happens inside the numerical runtime; this type only resolves the
//! names a caller wants to feed, fetch or run against the graph it was
//! built from.

use std::sync::Arc;

use bundle_format::NodeDef;

use crate::{Graph, Status};

/// Options applied when a session is created.
///
/// ```toml
/// [session]
/// target = ""
/// intra_op_threads = 4
/// inter_op_threads = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionOptions {
    /// Execution engine address; empty for in-process.
    #[serde(default)]
    pub target: String,
    /// Threads per op (defaults to the runtime's choice).
    pub intra_op_threads: Option<usize>,
    /// Threads across independent ops (defaults to the runtime's choice).
    pub inter_op_threads: Option<usize>,
}

impl SessionOptions {
    pub fn resolve_intra_op_threads(&self) -> usize {
        self.intra_op_threads.unwrap_or_else(available_cores)
    }

    pub fn resolve_inter_op_threads(&self) -> usize {
        self.inter_op_threads.unwrap_or_else(available_cores)
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// A session bound to one graph.
#[derive(Debug)]
pub struct Session {
    graph: Arc<Graph>,
    options: SessionOptions,
}

impl Session {
    pub fn new(graph: Arc<Graph>, options: SessionOptions) -> Result<Self, Status> {
        if options.intra_op_threads == Some(0) || options.inter_op_threads == Some(0) {
            return Err(Status::invalid_argument(
                "thread pool sizes must be at least 1 when set",
            ));
        }
        tracing::debug!(
            "session: created over {} (intra={}, inter={})",
            graph,
            options.resolve_intra_op_threads(),
            options.resolve_inter_op_threads(),
        );
        Ok(Self { graph, options })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Resolves an op or tensor name (`"op"`, `"op:N"`, `"^op"`) to its node.
    pub fn resolve(&self, name: &str) -> Result<&NodeDef, Status> {
        self.graph
            .node(name)
            .ok_or_else(|| Status::not_found(format!("'{name}' is not an operation in the graph")))
    }

    /// Resolves every name, failing on the first one that is missing.
    pub fn resolve_all<'a, I>(&self, names: I) -> Result<Vec<&NodeDef>, Status>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(|n| self.resolve(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Code;
    use bundle_format::GraphDef;

    fn graph() -> Arc<Graph> {
        Arc::new(
            Graph::import(GraphDef::new(vec![
                NodeDef::new("x", "Placeholder"),
                NodeDef::new("y", "Softmax").with_inputs(["x"]),
            ]))
            .unwrap(),
        )
    }

    #[test]
    fn test_resolve() {
        let session = Session::new(graph(), SessionOptions::default()).unwrap();
        assert_eq!(session.resolve("y:0").unwrap().op, "Softmax");
        let err = session.resolve("z").unwrap_err();
        assert_eq!(err.code, Code::NotFound);
    }

    #[test]
    fn test_resolve_all() {
        let session = Session::new(graph(), SessionOptions::default()).unwrap();
        assert_eq!(session.resolve_all(["x", "y"]).unwrap().len(), 2);
        assert!(session.resolve_all(["x", "missing"]).is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let options = SessionOptions {
            intra_op_threads: Some(0),
            ..Default::default()
        };
        assert!(Session::new(graph(), options).is_err());
    }

    #[test]
    fn test_resolve_threads() {
        let options = SessionOptions {
            intra_op_threads: Some(3),
            ..Default::default()
        };
        assert_eq!(options.resolve_intra_op_threads(), 3);
        assert!(options.resolve_inter_op_threads() >= 1);
    }

    #[test]
    fn test_options_from_toml() {
        let options: SessionOptions = toml::from_str("intra_op_threads = 2").unwrap();
        assert_eq!(options.intra_op_threads, Some(2));
        assert_eq!(options.inter_op_threads, None);
        assert!(options.target.is_empty());
    }
}
