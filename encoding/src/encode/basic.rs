//! Byte-order-aware encoding of primitive values,
//! the writing counterpart of [`BasicDecoder`](crate::decode::BasicDecoder).

use byteordered::{ByteOrdered, Endianness};
use dcmio_core::Tag;
use std::io::Write;

type Result<T> = std::io::Result<T>;

/// An encoder of DICOM primitive values
/// with a run-time resolved byte order.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BasicEncoder {
    endianness: Endianness,
}

impl BasicEncoder {
    /// Create a basic encoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        BasicEncoder { endianness }
    }

    /// The byte order of this encoder.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Encode an unsigned 16-bit integer.
    pub fn encode_us<S>(&self, to: S, value: u16) -> Result<()>
    where
        S: Write,
    {
        ByteOrdered::runtime(to, self.endianness).write_u16(value)
    }

    /// Encode an unsigned 32-bit integer.
    pub fn encode_ul<S>(&self, to: S, value: u32) -> Result<()>
    where
        S: Write,
    {
        ByteOrdered::runtime(to, self.endianness).write_u32(value)
    }

    /// Encode an unsigned 64-bit integer.
    pub fn encode_uv<S>(&self, to: S, value: u64) -> Result<()>
    where
        S: Write,
    {
        ByteOrdered::runtime(to, self.endianness).write_u64(value)
    }

    /// Encode a signed 16-bit integer.
    pub fn encode_ss<S>(&self, to: S, value: i16) -> Result<()>
    where
        S: Write,
    {
        ByteOrdered::runtime(to, self.endianness).write_i16(value)
    }

    /// Encode a signed 32-bit integer.
    pub fn encode_sl<S>(&self, to: S, value: i32) -> Result<()>
    where
        S: Write,
    {
        ByteOrdered::runtime(to, self.endianness).write_i32(value)
    }

    /// Encode a signed 64-bit integer.
    pub fn encode_sv<S>(&self, to: S, value: i64) -> Result<()>
    where
        S: Write,
    {
        ByteOrdered::runtime(to, self.endianness).write_i64(value)
    }

    /// Encode a 32-bit floating point number.
    pub fn encode_fl<S>(&self, to: S, value: f32) -> Result<()>
    where
        S: Write,
    {
        ByteOrdered::runtime(to, self.endianness).write_f32(value)
    }

    /// Encode a 64-bit floating point number.
    pub fn encode_fd<S>(&self, to: S, value: f64) -> Result<()>
    where
        S: Write,
    {
        ByteOrdered::runtime(to, self.endianness).write_f64(value)
    }

    /// Encode an attribute tag: a pair of unsigned 16-bit integers.
    pub fn encode_tag<S>(&self, to: S, tag: Tag) -> Result<()>
    where
        S: Write,
    {
        let mut bo = ByteOrdered::runtime(to, self.endianness);
        bo.write_u16(tag.group())?;
        bo.write_u16(tag.element())
    }
}

impl From<Endianness> for BasicEncoder {
    fn from(endianness: Endianness) -> Self {
        BasicEncoder::new(endianness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_integers_both_orders() {
        let le = BasicEncoder::new(Endianness::Little);
        let mut out = vec![];
        le.encode_us(&mut out, 0x3CC3).unwrap();
        le.encode_ul(&mut out, 0xCC33_3CC3).unwrap();
        assert_eq!(&out, &[0xC3, 0x3C, 0xC3, 0x3C, 0x33, 0xCC]);

        let be = BasicEncoder::new(Endianness::Big);
        let mut out = vec![];
        be.encode_us(&mut out, 0x3CC3).unwrap();
        be.encode_sl(&mut out, -2).unwrap();
        assert_eq!(&out, &[0x3C, 0xC3, 0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn encode_tags() {
        let le = BasicEncoder::new(Endianness::Little);
        let mut out = vec![];
        le.encode_tag(&mut out, Tag(0xFFFE, 0xE000)).unwrap();
        assert_eq!(&out, &[0xFE, 0xFF, 0x00, 0xE0]);

        let be = BasicEncoder::new(Endianness::Big);
        let mut out = vec![];
        be.encode_tag(&mut out, Tag(0xFFFE, 0xE000)).unwrap();
        assert_eq!(&out, &[0xFF, 0xFE, 0xE0, 0x00]);
    }
}
