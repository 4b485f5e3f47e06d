// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `MetaGraphDef`: the top-level bundle message.
//!
//! ```text
//! MetaGraphDef {
//!   meta_info_def:  MetaInfoDef                  (field 1)
//!   graph_def:      GraphDef                     (field 2, kept encoded)
//!   saver_def:      SaverDef                     (field 3)
//!   collection_def: map<string, CollectionDef>   (field 4)
//!   signature_def:  map<string, SignatureDef>    (field 5)
//! }
//! ```
//!
//! Asset file definitions and the object graph are skipped.

use std::collections::BTreeMap;

use crate::collection::{CollectionDef, CollectionKind};
use crate::graph_def::GraphDef;
use crate::wire::{WireReader, WireWriter, FIXED32, LEN, VARINT};
use crate::BundleError;

/// Descriptive information about the exported graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaInfoDef {
    pub meta_graph_version: String,
    /// Names of the ops in `stripped_op_list`; op signatures are not kept.
    pub stripped_ops: Vec<String>,
    pub tags: Vec<String>,
    pub tensorflow_version: String,
    pub tensorflow_git_version: String,
}

impl MetaInfoDef {
    fn decode(data: &[u8]) -> Result<Self, BundleError> {
        let mut reader = WireReader::new(data);
        let mut info = Self::default();
        while reader.has_more() {
            match reader.read_tag()? {
                (1, LEN) => info.meta_graph_version = reader.read_string("MetaInfoDef", "meta_graph_version")?,
                (2, LEN) => info.stripped_ops.extend(decode_op_list(reader.read_bytes()?)?),
                (4, LEN) => info.tags.push(reader.read_string("MetaInfoDef", "tags")?),
                (5, LEN) => info.tensorflow_version = reader.read_string("MetaInfoDef", "tensorflow_version")?,
                (6, LEN) => {
                    info.tensorflow_git_version =
                        reader.read_string("MetaInfoDef", "tensorflow_git_version")?
                }
                (field, wt) => reader.skip_field("MetaInfoDef", field, wt)?,
            }
        }
        Ok(info)
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.string_field(1, &self.meta_graph_version);
        if !self.stripped_ops.is_empty() {
            let mut list = WireWriter::new();
            for op in &self.stripped_ops {
                let mut op_def = WireWriter::new();
                op_def.string_field(1, op);
                list.bytes_field(1, &op_def.into_bytes());
            }
            w.bytes_field(2, &list.into_bytes());
        }
        for tag in &self.tags {
            w.bytes_field(4, tag.as_bytes());
        }
        w.string_field(5, &self.tensorflow_version);
        w.string_field(6, &self.tensorflow_git_version);
        w.into_bytes()
    }
}

// OpList { repeated OpDef op = 1 }, OpDef { string name = 1, ... }
fn decode_op_list(data: &[u8]) -> Result<Vec<String>, BundleError> {
    let mut reader = WireReader::new(data);
    let mut names = Vec::new();
    while reader.has_more() {
        match reader.read_tag()? {
            (1, LEN) => {
                let mut op = WireReader::new(reader.read_bytes()?);
                let mut name = String::new();
                while op.has_more() {
                    match op.read_tag()? {
                        (1, LEN) => name = op.read_string("OpDef", "name")?,
                        (field, wt) => op.skip_field("OpDef", field, wt)?,
                    }
                }
                names.push(name);
            }
            (field, wt) => reader.skip_field("OpList", field, wt)?,
        }
    }
    Ok(names)
}

/// Names of the operations that save and restore model state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaverDef {
    pub filename_tensor_name: String,
    pub save_tensor_name: String,
    pub restore_op_name: String,
    pub max_to_keep: i32,
    pub sharded: bool,
    pub keep_checkpoint_every_n_hours: f32,
    /// `CheckpointFormatVersion`: 0 = legacy, 1 = V1, 2 = V2.
    pub version: i32,
}

impl SaverDef {
    fn decode(data: &[u8]) -> Result<Self, BundleError> {
        let mut reader = WireReader::new(data);
        let mut saver = Self::default();
        while reader.has_more() {
            match reader.read_tag()? {
                (1, LEN) => saver.filename_tensor_name = reader.read_string("SaverDef", "filename_tensor_name")?,
                (2, LEN) => saver.save_tensor_name = reader.read_string("SaverDef", "save_tensor_name")?,
                (3, LEN) => saver.restore_op_name = reader.read_string("SaverDef", "restore_op_name")?,
                (4, VARINT) => saver.max_to_keep = reader.read_varint()? as i32,
                (5, VARINT) => saver.sharded = reader.read_varint()? != 0,
                (6, FIXED32) => saver.keep_checkpoint_every_n_hours = reader.read_f32()?,
                (7, VARINT) => saver.version = reader.read_varint()? as i32,
                (field, wt) => reader.skip_field("SaverDef", field, wt)?,
            }
        }
        Ok(saver)
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.string_field(1, &self.filename_tensor_name);
        w.string_field(2, &self.save_tensor_name);
        w.string_field(3, &self.restore_op_name);
        w.varint_field(4, self.max_to_keep as i64 as u64);
        w.varint_field(5, u64::from(self.sharded));
        w.float_field(6, self.keep_checkpoint_every_n_hours);
        w.varint_field(7, self.version as i64 as u64);
        w.into_bytes()
    }
}

/// A named serving signature: logical input/output keys mapped to tensor names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignatureDef {
    pub inputs: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
    pub method_name: String,
}

impl SignatureDef {
    fn decode(data: &[u8]) -> Result<Self, BundleError> {
        let mut reader = WireReader::new(data);
        let mut sig = Self::default();
        while reader.has_more() {
            match reader.read_tag()? {
                (1, LEN) => {
                    let (key, info) = decode_map_entry(reader.read_bytes()?, "SignatureDef.inputs")?;
                    sig.inputs.insert(key, decode_tensor_info_name(info)?);
                }
                (2, LEN) => {
                    let (key, info) = decode_map_entry(reader.read_bytes()?, "SignatureDef.outputs")?;
                    sig.outputs.insert(key, decode_tensor_info_name(info)?);
                }
                (3, LEN) => sig.method_name = reader.read_string("SignatureDef", "method_name")?,
                (field, wt) => reader.skip_field("SignatureDef", field, wt)?,
            }
        }
        Ok(sig)
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        for (field, map) in [(1, &self.inputs), (2, &self.outputs)] {
            for (key, name) in map {
                let mut info = WireWriter::new();
                info.string_field(1, name);
                w.bytes_field(field, &encode_map_entry(key, &info.into_bytes()));
            }
        }
        w.string_field(3, &self.method_name);
        w.into_bytes()
    }
}

// TensorInfo { string name = 1; ... }: only the tensor name is kept.
fn decode_tensor_info_name(data: &[u8]) -> Result<String, BundleError> {
    let mut reader = WireReader::new(data);
    let mut name = String::new();
    while reader.has_more() {
        match reader.read_tag()? {
            (1, LEN) => name = reader.read_string("TensorInfo", "name")?,
            (field, wt) => reader.skip_field("TensorInfo", field, wt)?,
        }
    }
    Ok(name)
}

/// Map entries are encoded as `{ key = 1; value = 2 }` messages.
fn decode_map_entry<'a>(
    data: &'a [u8],
    message: &'static str,
) -> Result<(String, &'a [u8]), BundleError> {
    let mut reader = WireReader::new(data);
    let mut key = String::new();
    let mut value: &[u8] = &[];
    while reader.has_more() {
        match reader.read_tag()? {
            (1, LEN) => key = reader.read_string(message, "key")?,
            (2, LEN) => value = reader.read_bytes()?,
            (field, wt) => reader.skip_field(message, field, wt)?,
        }
    }
    Ok((key, value))
}

fn encode_map_entry(key: &str, value: &[u8]) -> Vec<u8> {
    let mut w = WireWriter::new();
    w.bytes_field(1, key.as_bytes());
    w.bytes_field(2, value);
    w.into_bytes()
}

/// A decoded bundle.
///
/// The graph is kept as its encoded bytes: the loader passes it through to
/// the runtime untouched, and [`MetaGraphDef::graph`] decodes it on demand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetaGraphDef {
    pub meta_info_def: MetaInfoDef,
    pub graph_def: Vec<u8>,
    pub saver_def: SaverDef,
    pub collection_def: BTreeMap<String, CollectionDef>,
    pub signature_def: BTreeMap<String, SignatureDef>,
}

impl MetaGraphDef {
    pub fn decode(data: &[u8]) -> Result<Self, BundleError> {
        let mut reader = WireReader::new(data);
        let mut meta = Self::default();
        while reader.has_more() {
            match reader.read_tag()? {
                (1, LEN) => meta.meta_info_def = MetaInfoDef::decode(reader.read_bytes()?)?,
                (2, LEN) => meta.graph_def = reader.read_bytes()?.to_vec(),
                (3, LEN) => meta.saver_def = SaverDef::decode(reader.read_bytes()?)?,
                (4, LEN) => {
                    let (name, value) = decode_map_entry(reader.read_bytes()?, "MetaGraphDef.collection_def")?;
                    meta.collection_def.insert(name, CollectionDef::decode(value)?);
                }
                (5, LEN) => {
                    let (name, value) = decode_map_entry(reader.read_bytes()?, "MetaGraphDef.signature_def")?;
                    meta.signature_def.insert(name, SignatureDef::decode(value)?);
                }
                (field @ 1..=5, wire_type) => {
                    return Err(BundleError::WireType {
                        message: "MetaGraphDef",
                        field,
                        wire_type,
                    })
                }
                (field, wt) => reader.skip_field("MetaGraphDef", field, wt)?,
            }
        }
        Ok(meta)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        let info = self.meta_info_def.encode();
        if !info.is_empty() {
            w.bytes_field(1, &info);
        }
        w.bytes_field(2, &self.graph_def);
        let saver = self.saver_def.encode();
        if !saver.is_empty() {
            w.bytes_field(3, &saver);
        }
        for (name, collection) in &self.collection_def {
            w.bytes_field(4, &encode_map_entry(name, &collection.encode()));
        }
        for (name, signature) in &self.signature_def {
            w.bytes_field(5, &encode_map_entry(name, &signature.encode()));
        }
        w.into_bytes()
    }

    /// Decodes the embedded graph.
    pub fn graph(&self) -> Result<GraphDef, BundleError> {
        GraphDef::decode(&self.graph_def)
    }

    /// Returns the entries of a collection as strings.
    ///
    /// - node list: the node names, in order.
    /// - bytes list: each entry decoded as (lossy) UTF-8, in order.
    /// - int64 / float / any lists and unset kinds: empty.
    /// - a collection that does not exist: empty.
    ///
    /// Fails only for a kind outside the five known ones.
    pub fn operations(&self, name: &str) -> Result<Vec<String>, BundleError> {
        let Some(collection) = self.collection_def.get(name) else {
            return Ok(Vec::new());
        };
        match &collection.kind {
            CollectionKind::NodeList(values) => Ok(values.clone()),
            CollectionKind::BytesList(values) => Ok(values
                .iter()
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .collect()),
            CollectionKind::Int64List(_)
            | CollectionKind::FloatList(_)
            | CollectionKind::AnyList(_)
            | CollectionKind::NotSet => Ok(Vec::new()),
            CollectionKind::Unknown(field) => Err(BundleError::UnsupportedCollectionKind {
                name: name.to_string(),
                field: *field,
            }),
        }
    }

    /// First entry of [`operations`](Self::operations), or `""`.
    pub fn first_operation(&self, name: &str) -> Result<String, BundleError> {
        Ok(self.operations(name)?.into_iter().next().unwrap_or_default())
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collection_def.keys().map(String::as_str)
    }
}
