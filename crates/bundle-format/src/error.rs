// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for bundle decoding.

/// Errors that can occur while decoding a serialized bundle.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The input ended in the middle of a field.
    #[error("unexpected end of data at offset {offset}")]
    Truncated { offset: usize },

    /// A varint ran past 64 bits.
    #[error("varint overflow at offset {offset}")]
    VarintOverflow { offset: usize },

    /// A length-delimited field claims more bytes than remain.
    #[error("field length {len} at offset {offset} exceeds remaining {remaining} bytes")]
    LengthOverrun {
        offset: usize,
        len: usize,
        remaining: usize,
    },

    /// The wire type is not valid for this field, or not a protobuf wire type at all.
    #[error("unexpected wire type {wire_type} for field {field} in {message}")]
    WireType {
        message: &'static str,
        field: u32,
        wire_type: u32,
    },

    /// A string field does not hold valid UTF-8.
    #[error("invalid UTF-8 in {message}.{field}")]
    InvalidUtf8 { message: &'static str, field: &'static str },

    /// A collection uses a value kind outside node/bytes/int64/float/any lists.
    #[error("invalid collection format: '{name}' uses unsupported kind (field {field})")]
    UnsupportedCollectionKind { name: String, field: u32 },
}
