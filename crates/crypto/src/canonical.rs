//! Canonical positional encoding.
//!
//! Records are written as MessagePack arrays of their fields in declaration
//! order, never as maps keyed by field name. Byte strings always use the
//! `bin` family and map entries are written in ascending key order, so two
//! equal records always produce the same bytes.
//!
//! Signed integers follow the width rules of the Go `codec` MessagePack
//! handle (positive values above 127 take the smallest *signed* width),
//! which keeps digests interoperable with logs produced by that tooling.

use rmp::decode::{self, NumValueReadError, ValueReadError};
use rmp::encode::{self, ValueWriteError};
use thiserror::Error;

use crate::ByteVisitor;

/// A record with a fixed, positional canonical form.
pub trait VisitCanonical {
    fn visit_canonical<BV: ?Sized + ByteVisitor>(
        &self,
        visitor: &mut CanonicalVisitor<'_, BV>,
    ) -> Result<(), EncodingError>;

    /// Produces the canonical bytes of the record.
    fn to_canonical(&self) -> Result<Vec<u8>, EncodingError> {
        let mut bytes = Vec::new();
        self.visit_canonical(&mut CanonicalVisitor::new(&mut bytes))?;
        Ok(bytes)
    }
}

impl<T: ?Sized + VisitCanonical> VisitCanonical for &T {
    fn visit_canonical<BV: ?Sized + ByteVisitor>(
        &self,
        visitor: &mut CanonicalVisitor<'_, BV>,
    ) -> Result<(), EncodingError> {
        (*self).visit_canonical(visitor)
    }
}

/// A record that can be read back from its canonical form.
pub trait DecodeCanonical: Sized {
    type Error: From<DecodeError>;

    fn read_canonical(reader: &mut CanonicalReader<'_>) -> Result<Self, Self::Error>;

    /// Decodes a record that must span all of `bytes`.
    fn from_canonical(bytes: &[u8]) -> Result<Self, Self::Error> {
        let mut reader = CanonicalReader::new(bytes);
        let value = Self::read_canonical(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("{what} of length {len} exceeds the canonical encoding limit")]
    TooLong { what: &'static str, len: usize },

    #[error("failed to write canonical value: {0}")]
    Value(#[from] ValueWriteError<std::io::Error>),

    #[error("failed to write canonical marker: {0}")]
    Marker(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed canonical value: {0}")]
    Value(#[from] ValueReadError<std::io::Error>),

    #[error("malformed canonical integer: {0}")]
    Integer(#[from] NumValueReadError<std::io::Error>),

    #[error("expected a record of {expected} fields, found {actual}")]
    Arity { expected: u32, actual: u32 },

    #[error("expected {expected} bytes, found {actual}")]
    Length { expected: usize, actual: usize },

    #[error("input ended inside a value")]
    UnexpectedEnd,

    #[error("{0} trailing bytes after canonical value")]
    TrailingBytes(usize),

    #[error("map keys are not in strictly ascending order")]
    UnorderedKeys,

    #[error("value is not in its minimal canonical form")]
    NonMinimal,
}

/// Writes `value` with the width rules of the Go `codec` handle.
fn write_signed(buf: &mut Vec<u8>, value: i64) -> Result<(), EncodingError> {
    match value {
        0..=127 => encode::write_pfix(buf, value as u8)?,
        -32..=-1 => encode::write_nfix(buf, value as i8)?,
        v if v > 0 => {
            if let Ok(v) = i16::try_from(v) {
                encode::write_i16(buf, v)?
            } else if let Ok(v) = i32::try_from(v) {
                encode::write_i32(buf, v)?
            } else {
                encode::write_i64(buf, v)?
            }
        }
        v => {
            if let Ok(v) = i8::try_from(v) {
                encode::write_i8(buf, v)?
            } else if let Ok(v) = i16::try_from(v) {
                encode::write_i16(buf, v)?
            } else if let Ok(v) = i32::try_from(v) {
                encode::write_i32(buf, v)?
            } else {
                encode::write_i64(buf, v)?
            }
        }
    }
    Ok(())
}

fn length(what: &'static str, len: usize) -> Result<u32, EncodingError> {
    u32::try_from(len).map_err(|_| EncodingError::TooLong { what, len })
}

/// Writes canonical markers and payloads into an inner [`ByteVisitor`].
pub struct CanonicalVisitor<'a, BV>
where
    BV: ?Sized + ByteVisitor,
{
    buffer: Vec<u8>,
    inner: &'a mut BV,
}

impl<'a, BV> CanonicalVisitor<'a, BV>
where
    BV: ?Sized + ByteVisitor,
{
    pub fn new(inner: &'a mut BV) -> Self {
        Self {
            buffer: Vec::with_capacity(9),
            inner,
        }
    }

    fn flush(&mut self) {
        self.inner.visit_bytes(&self.buffer);
        self.buffer.clear();
    }

    /// Starts a record of `fields` positional fields.
    pub fn visit_record(&mut self, fields: u32) -> Result<(), EncodingError> {
        encode::write_array_len(&mut self.buffer, fields)?;
        self.flush();
        Ok(())
    }

    /// Starts a homogeneous sequence of `len` elements.
    pub fn visit_seq_len(&mut self, len: usize) -> Result<(), EncodingError> {
        encode::write_array_len(&mut self.buffer, length("sequence", len)?)?;
        self.flush();
        Ok(())
    }

    /// Starts a map of `len` entries; callers emit keys in ascending order.
    pub fn visit_map_len(&mut self, len: usize) -> Result<(), EncodingError> {
        encode::write_map_len(&mut self.buffer, length("map", len)?)?;
        self.flush();
        Ok(())
    }

    pub fn visit_bin(&mut self, bytes: &[u8]) -> Result<(), EncodingError> {
        encode::write_bin_len(&mut self.buffer, length("byte string", bytes.len())?)?;
        self.flush();
        self.inner.visit_bytes(bytes);
        Ok(())
    }

    pub fn visit_unsigned(&mut self, value: u64) -> Result<(), EncodingError> {
        encode::write_uint(&mut self.buffer, value)?;
        self.flush();
        Ok(())
    }

    pub fn visit_signed(&mut self, value: i64) -> Result<(), EncodingError> {
        write_signed(&mut self.buffer, value)?;
        self.flush();
        Ok(())
    }

    pub fn visit_nested(&mut self, nested: &impl VisitCanonical) -> Result<(), EncodingError> {
        nested.visit_canonical(self)
    }
}

/// Reads canonical values back out of a byte slice.
pub struct CanonicalReader<'a> {
    rest: &'a [u8],
}

impl<'a> CanonicalReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    /// Reads one marker-prefixed value and checks that `write` reproduces
    /// exactly the bytes consumed, so wider-than-needed forms are rejected.
    fn read_minimal<T>(
        &mut self,
        read: impl FnOnce(&mut &'a [u8]) -> Result<T, DecodeError>,
        write: impl FnOnce(&mut Vec<u8>, &T) -> Result<(), EncodingError>,
    ) -> Result<T, DecodeError> {
        let start = self.rest;
        let value = read(&mut self.rest)?;
        let consumed = &start[..start.len() - self.rest.len()];

        let mut expected = Vec::with_capacity(consumed.len());
        match write(&mut expected, &value) {
            Ok(()) if expected == consumed => Ok(value),
            _ => Err(DecodeError::NonMinimal),
        }
    }

    fn read_array_len(&mut self) -> Result<u32, DecodeError> {
        self.read_minimal(
            |rd| Ok(decode::read_array_len(rd)?),
            |buf, len| {
                encode::write_array_len(buf, *len)?;
                Ok(())
            },
        )
    }

    fn read_unsigned<T: TryFrom<u64>>(&mut self) -> Result<T, DecodeError> {
        let value: u64 = self.read_minimal(
            |rd| Ok(decode::read_int(rd)?),
            |buf, value| {
                encode::write_uint(buf, *value)?;
                Ok(())
            },
        )?;
        T::try_from(value).map_err(|_| DecodeError::Integer(NumValueReadError::OutOfRange))
    }

    /// Reads a record header, requiring exactly `fields` fields.
    pub fn read_record(&mut self, fields: u32) -> Result<(), DecodeError> {
        let actual = self.read_array_len()?;
        if actual != fields {
            return Err(DecodeError::Arity {
                expected: fields,
                actual,
            });
        }
        Ok(())
    }

    pub fn read_seq_len(&mut self) -> Result<usize, DecodeError> {
        Ok(self.read_array_len()? as usize)
    }

    pub fn read_map_len(&mut self) -> Result<usize, DecodeError> {
        let len = self.read_minimal(
            |rd| Ok(decode::read_map_len(rd)?),
            |buf, len| {
                encode::write_map_len(buf, *len)?;
                Ok(())
            },
        )?;
        Ok(len as usize)
    }

    pub fn read_bin(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_minimal(
            |rd| Ok(decode::read_bin_len(rd)?),
            |buf, len| {
                encode::write_bin_len(buf, *len)?;
                Ok(())
            },
        )? as usize;
        if self.rest.len() < len {
            return Err(DecodeError::UnexpectedEnd);
        }
        let (bin, rest) = self.rest.split_at(len);
        self.rest = rest;
        Ok(bin)
    }

    /// Reads a byte string that must be exactly `N` bytes long.
    pub fn read_bin_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bin = self.read_bin()?;
        bin.try_into().map_err(|_| DecodeError::Length {
            expected: N,
            actual: bin.len(),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.read_unsigned()
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_unsigned()
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.read_minimal(
            |rd| Ok(decode::read_int(rd)?),
            |buf, value| write_signed(buf, *value),
        )
    }

    /// Fails unless every input byte has been consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.rest.len() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn signed(value: i64) -> Vec<u8> {
        let mut bytes = Vec::new();
        CanonicalVisitor::new(&mut bytes)
            .visit_signed(value)
            .unwrap();
        bytes
    }

    #[test]
    fn test_signed_widths() {
        assert_eq!(signed(0), vec![0x00]);
        assert_eq!(signed(123), vec![0x7b]);
        assert_eq!(signed(128), vec![0xd1, 0x00, 0x80]);
        assert_eq!(signed(70_000), vec![0xd2, 0x00, 0x01, 0x11, 0x70]);
        assert_eq!(signed(-1), vec![0xff]);
        assert_eq!(signed(-33), vec![0xd0, 0xdf]);
        assert_eq!(signed(-200), vec![0xd1, 0xff, 0x38]);
    }

    #[test]
    fn test_signed_reads_back() {
        for value in [0, 127, 128, 40_000, i64::MAX, -1, -32, -33, i64::MIN] {
            let bytes = signed(value);
            let mut reader = CanonicalReader::new(&bytes);
            assert_eq!(reader.read_i64().unwrap(), value);
            reader.finish().unwrap();
        }
    }

    #[test]
    fn test_bin_uses_bin_family() {
        let mut bytes = Vec::new();
        let mut visitor = CanonicalVisitor::new(&mut bytes);
        visitor.visit_record(2).unwrap();
        visitor.visit_unsigned(1).unwrap();
        visitor.visit_bin(&[0xaa; 3]).unwrap();
        assert_eq!(bytes, vec![0x92, 0x01, 0xc4, 0x03, 0xaa, 0xaa, 0xaa]);
    }

    #[test]
    fn test_reader_rejects_wrong_arity_and_trailing_bytes() {
        let mut reader = CanonicalReader::new(&[0x93, 0x01, 0x02, 0x03]);
        assert!(matches!(
            reader.read_record(2),
            Err(DecodeError::Arity {
                expected: 2,
                actual: 3
            })
        ));

        let mut reader = CanonicalReader::new(&[0x01, 0x02]);
        reader.read_u8().unwrap();
        assert!(matches!(reader.finish(), Err(DecodeError::TrailingBytes(1))));
    }

    #[test]
    fn test_reader_rejects_short_bin() {
        let mut reader = CanonicalReader::new(&[0xc4, 0x04, 0x01]);
        assert!(matches!(reader.read_bin(), Err(DecodeError::UnexpectedEnd)));

        let mut reader = CanonicalReader::new(&[0xc4, 0x01, 0x01]);
        assert!(matches!(
            reader.read_bin_array::<2>(),
            Err(DecodeError::Length {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_reader_rejects_wide_forms() {
        // seqno 1 as int64, tag 1 as uint8, a 2-field array as array16 and a
        // 1-byte string as bin16; the writer emits none of these.
        let wide: [&[u8]; 4] = [
            &[0xd3, 0, 0, 0, 0, 0, 0, 0, 0x01],
            &[0xcc, 0x01],
            &[0xdc, 0x00, 0x02],
            &[0xc5, 0x00, 0x01, 0xaa],
        ];

        assert!(matches!(
            CanonicalReader::new(wide[0]).read_i64(),
            Err(DecodeError::NonMinimal)
        ));
        assert!(matches!(
            CanonicalReader::new(wide[1]).read_u8(),
            Err(DecodeError::NonMinimal)
        ));
        assert!(matches!(
            CanonicalReader::new(wide[2]).read_record(2),
            Err(DecodeError::NonMinimal)
        ));
        assert!(matches!(
            CanonicalReader::new(wide[3]).read_bin(),
            Err(DecodeError::NonMinimal)
        ));
    }

    #[test]
    fn test_reader_rejects_unsigned_marker_for_signed() {
        // 200 written as uint8; the writer uses int16 for it.
        assert!(matches!(
            CanonicalReader::new(&[0xcc, 0xc8]).read_i64(),
            Err(DecodeError::NonMinimal)
        ));
        assert_eq!(
            CanonicalReader::new(&[0xd1, 0x00, 0xc8]).read_i64().unwrap(),
            200
        );
    }
}
