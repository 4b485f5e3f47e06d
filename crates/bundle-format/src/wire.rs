// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Protobuf wire-format primitives.
//!
//! Only the subset needed for the TensorFlow messages in this crate:
//! varints, 32/64-bit fixed values and length-delimited payloads. Group
//! wire types (3 and 4) are deprecated and rejected.
//!
//! ```text
//! tag    = varint(field_number << 3 | wire_type)
//! 0  VARINT   int32, int64, uint64, bool, enum
//! 1  I64      fixed64, double
//! 2  LEN      string, bytes, embedded message, packed repeated
//! 5  I32      fixed32, float
//! ```

use crate::BundleError;

/// Varint wire type.
pub const VARINT: u32 = 0;
/// 64-bit fixed wire type.
pub const FIXED64: u32 = 1;
/// Length-delimited wire type.
pub const LEN: u32 = 2;
/// 32-bit fixed wire type.
pub const FIXED32: u32 = 5;

/// A cursor over an encoded protobuf message.
///
/// Length-delimited reads borrow from the input, so nested messages are
/// decoded without copying.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn has_more(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Current byte offset into the message.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reads a field tag, returning `(field_number, wire_type)`.
    pub fn read_tag(&mut self) -> Result<(u32, u32), BundleError> {
        let tag = self.read_varint()?;
        Ok(((tag >> 3) as u32, (tag & 0x7) as u32))
    }

    pub fn read_varint(&mut self) -> Result<u64, BundleError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = *self
                .data
                .get(self.pos)
                .ok_or(BundleError::Truncated { offset: self.pos })?;
            self.pos += 1;
            result |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift >= 64 {
                return Err(BundleError::VarintOverflow { offset: start });
            }
        }
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8], BundleError> {
        let len = self.read_varint()? as usize;
        let remaining = self.data.len() - self.pos;
        if len > remaining {
            return Err(BundleError::LengthOverrun {
                offset: self.pos,
                len,
                remaining,
            });
        }
        let result = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(result)
    }

    /// Reads a length-delimited UTF-8 string. `message` and `field` only
    /// label the error.
    pub fn read_string(
        &mut self,
        message: &'static str,
        field: &'static str,
    ) -> Result<String, BundleError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| BundleError::InvalidUtf8 { message, field })
    }

    pub fn read_fixed32(&mut self) -> Result<u32, BundleError> {
        let bytes = self.take::<4>()?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_f32(&mut self) -> Result<f32, BundleError> {
        self.read_fixed32().map(f32::from_bits)
    }

    /// Skips over the payload of a field whose tag was just read.
    pub fn skip_field(
        &mut self,
        message: &'static str,
        field: u32,
        wire_type: u32,
    ) -> Result<(), BundleError> {
        match wire_type {
            VARINT => {
                self.read_varint()?;
            }
            FIXED64 => {
                self.take::<8>()?;
            }
            LEN => {
                self.read_bytes()?;
            }
            FIXED32 => {
                self.take::<4>()?;
            }
            _ => {
                return Err(BundleError::WireType {
                    message,
                    field,
                    wire_type,
                })
            }
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], BundleError> {
        let end = self.pos + N;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(BundleError::Truncated { offset: self.pos })?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.pos = end;
        Ok(out)
    }
}

/// Appends protobuf-encoded fields to a byte buffer.
#[derive(Debug, Default, Clone)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_tag(&mut self, field: u32, wire_type: u32) {
        self.write_varint((u64::from(field) << 3) | u64::from(wire_type));
    }

    pub fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    /// Writes a varint field; proto3 zero values are omitted.
    pub fn varint_field(&mut self, field: u32, value: u64) {
        if value != 0 {
            self.write_tag(field, VARINT);
            self.write_varint(value);
        }
    }

    /// Writes a length-delimited field, even when empty.
    pub fn bytes_field(&mut self, field: u32, bytes: &[u8]) {
        self.write_tag(field, LEN);
        self.write_varint(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a string field; proto3 empty strings are omitted.
    pub fn string_field(&mut self, field: u32, value: &str) {
        if !value.is_empty() {
            self.bytes_field(field, value.as_bytes());
        }
    }

    /// Writes a float field; proto3 zero values are omitted.
    pub fn float_field(&mut self, field: u32, value: f32) {
        if value != 0.0 {
            self.write_tag(field, FIXED32);
            self.buf.extend_from_slice(&value.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_multibyte() {
        // 300 = 0b1_0010_1100 -> [0xAC, 0x02]
        let mut r = WireReader::new(&[0xAC, 0x02]);
        assert_eq!(r.read_varint().unwrap(), 300);
        assert!(!r.has_more());

        let mut w = WireWriter::new();
        w.write_varint(300);
        assert_eq!(w.into_bytes(), vec![0xAC, 0x02]);
    }

    #[test]
    fn test_varint_truncated() {
        let mut r = WireReader::new(&[0x80, 0x80]);
        assert!(matches!(
            r.read_varint(),
            Err(BundleError::Truncated { offset: 2 })
        ));
    }

    #[test]
    fn test_varint_overflow() {
        let data = [0xFF; 11];
        let mut r = WireReader::new(&data);
        assert!(matches!(
            r.read_varint(),
            Err(BundleError::VarintOverflow { offset: 0 })
        ));
    }

    #[test]
    fn test_tag_split() {
        // field 4, wire type 2 -> (4 << 3) | 2 = 34
        let mut r = WireReader::new(&[34]);
        assert_eq!(r.read_tag().unwrap(), (4, LEN));
    }

    #[test]
    fn test_length_overrun() {
        let mut r = WireReader::new(&[5, b'a', b'b']);
        assert!(matches!(
            r.read_bytes(),
            Err(BundleError::LengthOverrun { len: 5, remaining: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut r = WireReader::new(&[2, 0xC3, 0x28]);
        let err = r.read_string("NodeDef", "name").unwrap_err();
        assert!(err.to_string().contains("NodeDef.name"));
    }

    #[test]
    fn test_skip_each_wire_type() {
        let mut w = WireWriter::new();
        w.varint_field(1, 150);
        w.write_tag(2, FIXED64);
        let mut bytes = w.into_bytes();
        bytes.extend_from_slice(&7u64.to_le_bytes());

        let mut w = WireWriter::new();
        w.bytes_field(3, b"skip me");
        w.float_field(4, 1.5);
        bytes.extend(w.into_bytes());

        let mut r = WireReader::new(&bytes);
        let mut fields = Vec::new();
        while r.has_more() {
            let (field, wt) = r.read_tag().unwrap();
            r.skip_field("Test", field, wt).unwrap();
            fields.push(field);
        }
        assert_eq!(fields, vec![1, 2, 3, 4]);
        assert_eq!(r.position(), bytes.len());
    }

    #[test]
    fn test_group_wire_type_rejected() {
        let mut r = WireReader::new(&[]);
        let err = r.skip_field("Test", 9, 3).unwrap_err();
        assert!(matches!(err, BundleError::WireType { field: 9, wire_type: 3, .. }));
    }

    #[test]
    fn test_proto3_defaults_omitted() {
        let mut w = WireWriter::new();
        w.varint_field(1, 0);
        w.string_field(2, "");
        w.float_field(3, 0.0);
        assert!(w.into_bytes().is_empty());
    }

    #[test]
    fn test_fixed32_float() {
        let mut w = WireWriter::new();
        w.float_field(1, 2.5);
        let bytes = w.into_bytes();
        let mut r = WireReader::new(&bytes);
        assert_eq!(r.read_tag().unwrap(), (1, FIXED32));
        assert_eq!(r.read_f32().unwrap(), 2.5);
    }
}
