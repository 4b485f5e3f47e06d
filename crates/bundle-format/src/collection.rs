// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `CollectionDef`: a named group of node references or values.
//!
//! On the wire the value kind is a protobuf `oneof`:
//!
//! ```text
//! CollectionDef {
//!   node_list:  NodeList  { repeated string value = 1 }   (field 1)
//!   bytes_list: BytesList { repeated bytes  value = 1 }   (field 2)
//!   int64_list: Int64List { repeated int64  value = 1 }   (field 3)
//!   float_list: FloatList { repeated float  value = 1 }   (field 4)
//!   any_list:   AnyList   { repeated Any    value = 1 }   (field 5)
//! }
//! ```
//!
//! Any other field is outside the `oneof`: it never replaces a kind that is
//! already set. A collection holding only such fields is kept as
//! [`CollectionKind::Unknown`] so that extraction can reject it instead of
//! silently treating the collection as empty.

use crate::wire::{WireReader, WireWriter, FIXED32, LEN, VARINT};
use crate::BundleError;

/// A packed `google.protobuf.Any`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnyValue {
    pub type_url: String,
    pub value: Vec<u8>,
}

/// The value kind held by a collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CollectionKind {
    /// Names of graph nodes or tensors, e.g. `"train_op"` or `"w:0"`.
    NodeList(Vec<String>),
    BytesList(Vec<Vec<u8>>),
    Int64List(Vec<i64>),
    FloatList(Vec<f32>),
    AnyList(Vec<AnyValue>),
    /// No `oneof` member present.
    #[default]
    NotSet,
    /// A field number outside the five known kinds.
    Unknown(u32),
}

impl CollectionKind {
    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NodeList(_) => "node_list",
            Self::BytesList(_) => "bytes_list",
            Self::Int64List(_) => "int64_list",
            Self::FloatList(_) => "float_list",
            Self::AnyList(_) => "any_list",
            Self::NotSet => "not_set",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Number of entries held, `0` for `NotSet` and `Unknown`.
    pub fn len(&self) -> usize {
        match self {
            Self::NodeList(v) => v.len(),
            Self::BytesList(v) => v.len(),
            Self::Int64List(v) => v.len(),
            Self::FloatList(v) => v.len(),
            Self::AnyList(v) => v.len(),
            Self::NotSet | Self::Unknown(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single entry of `MetaGraphDef.collection_def`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionDef {
    pub kind: CollectionKind,
}

impl CollectionDef {
    pub fn node_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: CollectionKind::NodeList(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn bytes_list<I, B>(values: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        Self {
            kind: CollectionKind::BytesList(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn with_kind(kind: CollectionKind) -> Self {
        Self { kind }
    }

    /// Decodes an encoded `CollectionDef`. The last `oneof` member on the
    /// wire wins, as protobuf requires; unrecognised fields of any wire type
    /// only mark the kind while no member has been seen.
    pub fn decode(data: &[u8]) -> Result<Self, BundleError> {
        let mut reader = WireReader::new(data);
        let mut kind = CollectionKind::NotSet;

        while reader.has_more() {
            let (field, wire_type) = reader.read_tag()?;
            match (field, wire_type) {
                (1, LEN) => kind = CollectionKind::NodeList(decode_strings(reader.read_bytes()?)?),
                (2, LEN) => kind = CollectionKind::BytesList(decode_byte_strings(reader.read_bytes()?)?),
                (3, LEN) => kind = CollectionKind::Int64List(decode_int64s(reader.read_bytes()?)?),
                (4, LEN) => kind = CollectionKind::FloatList(decode_floats(reader.read_bytes()?)?),
                (5, LEN) => kind = CollectionKind::AnyList(decode_anys(reader.read_bytes()?)?),
                (1..=5, _) => {
                    return Err(BundleError::WireType {
                        message: "CollectionDef",
                        field,
                        wire_type,
                    })
                }
                _ => {
                    reader.skip_field("CollectionDef", field, wire_type)?;
                    if kind == CollectionKind::NotSet {
                        kind = CollectionKind::Unknown(field);
                    }
                }
            }
        }

        Ok(Self { kind })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        match &self.kind {
            CollectionKind::NodeList(values) => {
                let mut inner = WireWriter::new();
                for v in values {
                    inner.bytes_field(1, v.as_bytes());
                }
                w.bytes_field(1, &inner.into_bytes());
            }
            CollectionKind::BytesList(values) => {
                let mut inner = WireWriter::new();
                for v in values {
                    inner.bytes_field(1, v);
                }
                w.bytes_field(2, &inner.into_bytes());
            }
            CollectionKind::Int64List(values) => {
                let mut packed = WireWriter::new();
                for &v in values {
                    packed.write_varint(v as u64);
                }
                let mut inner = WireWriter::new();
                if !values.is_empty() {
                    inner.bytes_field(1, &packed.into_bytes());
                }
                w.bytes_field(3, &inner.into_bytes());
            }
            CollectionKind::FloatList(values) => {
                let packed: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
                let mut inner = WireWriter::new();
                if !values.is_empty() {
                    inner.bytes_field(1, &packed);
                }
                w.bytes_field(4, &inner.into_bytes());
            }
            CollectionKind::AnyList(values) => {
                let mut inner = WireWriter::new();
                for v in values {
                    let mut any = WireWriter::new();
                    any.string_field(1, &v.type_url);
                    if !v.value.is_empty() {
                        any.bytes_field(2, &v.value);
                    }
                    inner.bytes_field(1, &any.into_bytes());
                }
                w.bytes_field(5, &inner.into_bytes());
            }
            CollectionKind::Unknown(field) => w.bytes_field(*field, &[]),
            CollectionKind::NotSet => {}
        }
        w.into_bytes()
    }
}

fn decode_strings(data: &[u8]) -> Result<Vec<String>, BundleError> {
    let mut reader = WireReader::new(data);
    let mut out = Vec::new();
    while reader.has_more() {
        match reader.read_tag()? {
            (1, LEN) => out.push(reader.read_string("NodeList", "value")?),
            (field, wt) => reader.skip_field("NodeList", field, wt)?,
        }
    }
    Ok(out)
}

fn decode_byte_strings(data: &[u8]) -> Result<Vec<Vec<u8>>, BundleError> {
    let mut reader = WireReader::new(data);
    let mut out = Vec::new();
    while reader.has_more() {
        match reader.read_tag()? {
            (1, LEN) => out.push(reader.read_bytes()?.to_vec()),
            (field, wt) => reader.skip_field("BytesList", field, wt)?,
        }
    }
    Ok(out)
}

// Repeated scalars may arrive packed (one LEN field) or unpacked (one
// field per value); parsers must accept both.
fn decode_int64s(data: &[u8]) -> Result<Vec<i64>, BundleError> {
    let mut reader = WireReader::new(data);
    let mut out = Vec::new();
    while reader.has_more() {
        match reader.read_tag()? {
            (1, VARINT) => out.push(reader.read_varint()? as i64),
            (1, LEN) => {
                let mut packed = WireReader::new(reader.read_bytes()?);
                while packed.has_more() {
                    out.push(packed.read_varint()? as i64);
                }
            }
            (field, wt) => reader.skip_field("Int64List", field, wt)?,
        }
    }
    Ok(out)
}

fn decode_floats(data: &[u8]) -> Result<Vec<f32>, BundleError> {
    let mut reader = WireReader::new(data);
    let mut out = Vec::new();
    while reader.has_more() {
        match reader.read_tag()? {
            (1, FIXED32) => out.push(reader.read_f32()?),
            (1, LEN) => {
                let mut packed = WireReader::new(reader.read_bytes()?);
                while packed.has_more() {
                    out.push(packed.read_f32()?);
                }
            }
            (field, wt) => reader.skip_field("FloatList", field, wt)?,
        }
    }
    Ok(out)
}

fn decode_anys(data: &[u8]) -> Result<Vec<AnyValue>, BundleError> {
    let mut reader = WireReader::new(data);
    let mut out = Vec::new();
    while reader.has_more() {
        match reader.read_tag()? {
            (1, LEN) => {
                let mut any_reader = WireReader::new(reader.read_bytes()?);
                let mut any = AnyValue::default();
                while any_reader.has_more() {
                    match any_reader.read_tag()? {
                        (1, LEN) => any.type_url = any_reader.read_string("Any", "type_url")?,
                        (2, LEN) => any.value = any_reader.read_bytes()?.to_vec(),
                        (field, wt) => any_reader.skip_field("Any", field, wt)?,
                    }
                }
                out.push(any);
            }
            (field, wt) => reader.skip_field("AnyList", field, wt)?,
        }
    }
    Ok(out)
}
