// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `GraphDef`: the computation graph carried inside a bundle.
//!
//! Only node identity and wiring are decoded. Attributes (`NodeDef.attr`),
//! the function library and experimental fields are skipped, so encoding
//! a decoded graph is lossy; callers that need the exact bytes keep the
//! original encoding instead.

use crate::wire::{WireReader, WireWriter, LEN, VARINT};
use crate::BundleError;

/// A single operation in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeDef {
    pub name: String,
    pub op: String,
    /// Inputs as `"node"`, `"node:N"` or `"^node"` (control dependency).
    pub input: Vec<String>,
    pub device: String,
}

impl NodeDef {
    pub fn new(name: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            ..Default::default()
        }
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input = inputs.into_iter().map(Into::into).collect();
        self
    }

    fn decode(data: &[u8]) -> Result<Self, BundleError> {
        let mut reader = WireReader::new(data);
        let mut node = Self::default();
        while reader.has_more() {
            match reader.read_tag()? {
                (1, LEN) => node.name = reader.read_string("NodeDef", "name")?,
                (2, LEN) => node.op = reader.read_string("NodeDef", "op")?,
                (3, LEN) => node.input.push(reader.read_string("NodeDef", "input")?),
                (4, LEN) => node.device = reader.read_string("NodeDef", "device")?,
                (field, wt) => reader.skip_field("NodeDef", field, wt)?,
            }
        }
        Ok(node)
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.string_field(1, &self.name);
        w.string_field(2, &self.op);
        for input in &self.input {
            w.bytes_field(3, input.as_bytes());
        }
        w.string_field(4, &self.device);
        w.into_bytes()
    }
}

/// Producer/consumer version stamp of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionDef {
    pub producer: i32,
    pub min_consumer: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphDef {
    pub node: Vec<NodeDef>,
    pub versions: Option<VersionDef>,
}

impl GraphDef {
    pub fn new(node: Vec<NodeDef>) -> Self {
        Self {
            node,
            versions: None,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, BundleError> {
        let mut reader = WireReader::new(data);
        let mut graph = Self::default();
        while reader.has_more() {
            match reader.read_tag()? {
                (1, LEN) => graph.node.push(NodeDef::decode(reader.read_bytes()?)?),
                (4, LEN) => {
                    let mut vr = WireReader::new(reader.read_bytes()?);
                    let mut versions = VersionDef::default();
                    while vr.has_more() {
                        match vr.read_tag()? {
                            (1, VARINT) => versions.producer = vr.read_varint()? as i32,
                            (2, VARINT) => versions.min_consumer = vr.read_varint()? as i32,
                            (field, wt) => vr.skip_field("VersionDef", field, wt)?,
                        }
                    }
                    graph.versions = Some(versions);
                }
                (field, wt) => reader.skip_field("GraphDef", field, wt)?,
            }
        }
        Ok(graph)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        for node in &self.node {
            w.bytes_field(1, &node.encode());
        }
        if let Some(v) = self.versions {
            let mut vw = WireWriter::new();
            vw.varint_field(1, v.producer as i64 as u64);
            vw.varint_field(2, v.min_consumer as i64 as u64);
            w.bytes_field(4, &vw.into_bytes());
        }
        w.into_bytes()
    }
}
