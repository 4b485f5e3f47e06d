// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reading binary `GraphDef` files into runtime graphs.

use std::path::Path;

use bundle_format::GraphDef;

use crate::{Graph, Status};

/// Reads a serialized `GraphDef` from disk and imports it.
///
/// This is the seam between the loader and the numerical runtime: the
/// loader only ever hands over a file path and receives a [`Graph`] or a
/// [`Status`].
pub trait GraphReader {
    fn read_binary_proto(&self, path: &Path) -> Result<Graph, Status>;
}

/// The default reader: reads the whole file, decodes it and imports it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryProtoReader;

impl GraphReader for BinaryProtoReader {
    fn read_binary_proto(&self, path: &Path) -> Result<Graph, Status> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Status::not_found(format!("{}: {e}", path.display())),
            _ => Status::internal(format!("cannot read '{}': {e}", path.display())),
        })?;

        let def = GraphDef::decode(&bytes).map_err(|e| {
            Status::data_loss(format!("can't parse {} as binary proto: {e}", path.display()))
        })?;

        let graph = Graph::import(def)?;
        tracing::debug!(
            "graph reader: imported {} nodes from {} ({} bytes)",
            graph.num_nodes(),
            path.display(),
            bytes.len(),
        );
        Ok(graph)
    }
}
