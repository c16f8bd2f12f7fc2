//! Byte-order-aware decoding of primitive values.
//!
//! The decoder carries its byte order as a runtime value, so that a parser
//! can flip it at the boundary where the transfer syntax takes effect.

use byteordered::{ByteOrdered, Endianness};
use dcmio_core::Tag;
use std::io::Read;

type Result<T> = std::io::Result<T>;

/// A decoder of DICOM primitive values
/// with a run-time resolved byte order.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BasicDecoder {
    endianness: Endianness,
}

impl BasicDecoder {
    /// Create a basic decoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        BasicDecoder { endianness }
    }

    /// The byte order of this decoder.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Decode an unsigned 16-bit integer.
    pub fn decode_us<S>(&self, source: S) -> Result<u16>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_u16()
    }

    /// Decode a sequence of unsigned 16-bit integers into the given slice.
    pub fn decode_us_into<S>(&self, source: S, target: &mut [u16]) -> Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_u16_into(target)
    }

    /// Decode an unsigned 32-bit integer.
    pub fn decode_ul<S>(&self, source: S) -> Result<u32>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_u32()
    }

    /// Decode a sequence of unsigned 32-bit integers into the given slice.
    pub fn decode_ul_into<S>(&self, source: S, target: &mut [u32]) -> Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_u32_into(target)
    }

    /// Decode an unsigned 64-bit integer.
    pub fn decode_uv<S>(&self, source: S) -> Result<u64>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_u64()
    }

    /// Decode a signed 16-bit integer.
    pub fn decode_ss<S>(&self, source: S) -> Result<i16>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_i16()
    }

    /// Decode a signed 32-bit integer.
    pub fn decode_sl<S>(&self, source: S) -> Result<i32>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_i32()
    }

    /// Decode a signed 64-bit integer.
    pub fn decode_sv<S>(&self, source: S) -> Result<i64>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_i64()
    }

    /// Decode a 32-bit floating point number.
    pub fn decode_fl<S>(&self, source: S) -> Result<f32>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_f32()
    }

    /// Decode a sequence of 32-bit floating point numbers into the given slice.
    pub fn decode_fl_into<S>(&self, source: S, target: &mut [f32]) -> Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_f32_into(target)
    }

    /// Decode a 64-bit floating point number.
    pub fn decode_fd<S>(&self, source: S) -> Result<f64>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_f64()
    }

    /// Decode a sequence of 64-bit floating point numbers into the given slice.
    pub fn decode_fd_into<S>(&self, source: S, target: &mut [f64]) -> Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness).read_f64_into(target)
    }

    /// Decode an attribute tag: a pair of unsigned 16-bit integers.
    pub fn decode_tag<S>(&self, source: S) -> Result<Tag>
    where
        S: Read,
    {
        let mut bo = ByteOrdered::runtime(source, self.endianness);
        let group = bo.read_u16()?;
        let element = bo.read_u16()?;
        Ok(Tag(group, element))
    }
}

impl From<Endianness> for BasicDecoder {
    fn from(endianness: Endianness) -> Self {
        BasicDecoder::new(endianness)
    }
}
