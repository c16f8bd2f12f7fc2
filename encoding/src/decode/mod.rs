//! Decoding of data element headers under a runtime encoding.
//!
//! The element header codec carries the current [`Encoding`] as data, so
//! that a parser can switch between the implicit and explicit disciplines
//! (and byte orders) mid-stream once the transfer syntax is known, as well
//! as override the discipline per recursion when decoding the children of
//! an unknown-VR sequence.

pub mod basic;

use crate::transfer_syntax::Encoding;
use dcmio_core::dictionary::{tags, DataDictionary, StandardDataDictionary};
use dcmio_core::header::SequenceItemHeaderError;
use dcmio_core::{DataElementHeader, Length, SequenceItemHeader, Tag, VR};
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::Read;

pub use self::basic::BasicDecoder;

/// An error which occurred while decoding an element header.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not read the tag of a data element header.
    #[snafu(display("Could not read tag"))]
    ReadTag {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not read the value representation bytes.
    #[snafu(display("Could not read VR of element tagged {}", tag))]
    ReadVr {
        tag: Tag,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not read the value length field.
    #[snafu(display("Could not read value length of element tagged {}", tag))]
    ReadLength {
        tag: Tag,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// The decoded item header was not a valid sequence framing token.
    #[snafu(display("Could not interpret sequence item header"))]
    BadSequenceHeader {
        #[snafu(backtrace)]
        source: SequenceItemHeaderError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A decoder of data element headers
/// under a run-time selected encoding configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeaderDecoder {
    encoding: Encoding,
    basic: BasicDecoder,
}

impl HeaderDecoder {
    /// Create a header decoder for the given encoding configuration.
    pub fn new(encoding: Encoding) -> Self {
        HeaderDecoder {
            encoding,
            basic: BasicDecoder::new(encoding.endianness),
        }
    }

    /// The encoding configuration of this decoder.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The primitive value decoder matching this header decoder's byte order.
    pub fn basic(&self) -> BasicDecoder {
        self.basic
    }

    /// Decode an attribute tag at the current position.
    pub fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: Read + ?Sized,
    {
        self.basic.decode_tag(source).context(ReadTagSnafu)
    }

    /// Decode a data element header at the current position.
    /// Returns the header and the number of bytes consumed.
    pub fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: Read + ?Sized,
    {
        let tag = self.decode_tag(source)?;
        let (header, rest) = self.decode_header_after_tag(source, tag)?;
        Ok((header, rest + 4))
    }

    /// Decode the remainder of a data element header,
    /// the tag having already been consumed.
    /// Returns the header and the number of bytes consumed after the tag.
    ///
    /// Sequence framing tokens (group 0xFFFE) carry no VR and must be
    /// decoded with [`decode_item_header`](Self::decode_item_header)
    /// instead when the encoding is explicit.
    pub fn decode_header_after_tag<S>(
        &self,
        source: &mut S,
        tag: Tag,
    ) -> Result<(DataElementHeader, usize)>
    where
        S: Read + ?Sized,
    {
        if self.encoding.implicit_vr {
            let len = self
                .basic
                .decode_ul(&mut *source)
                .context(ReadLengthSnafu { tag })?;
            let vr = resolve_implicit_vr(tag);
            return Ok((DataElementHeader::new(tag, vr, Length(len)), 4));
        }

        let mut raw_vr = [0u8; 2];
        source
            .read_exact(&mut raw_vr)
            .context(ReadVrSnafu { tag })?;

        // Unrecognized VR codes are downgraded to UN, keeping the raw
        // bytes; their length field is read in the short form.
        let parsed = VR::from_binary(raw_vr);
        let vr = parsed.unwrap_or(VR::UN);

        if parsed.is_some() && vr.is_long_form() {
            // skip the two reserved bytes
            let mut reserved = [0u8; 2];
            source
                .read_exact(&mut reserved)
                .context(ReadLengthSnafu { tag })?;
            let len = self
                .basic
                .decode_ul(&mut *source)
                .context(ReadLengthSnafu { tag })?;
            Ok((
                DataElementHeader::new_with_raw_vr(tag, vr, raw_vr, Length(len)),
                8,
            ))
        } else {
            let len = self
                .basic
                .decode_us(&mut *source)
                .context(ReadLengthSnafu { tag })?;
            Ok((
                DataElementHeader::new_with_raw_vr(tag, vr, raw_vr, Length(u32::from(len))),
                4,
            ))
        }
    }

    /// Decode a sequence item header (item, item delimiter or sequence
    /// delimiter) at the current position. Item headers carry no VR in
    /// either discipline: a tag followed by a 32-bit length.
    pub fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: Read + ?Sized,
    {
        let tag = self.decode_tag(source)?;
        self.decode_item_header_after_tag(source, tag)
    }

    /// Decode the remainder of a sequence item header,
    /// the tag having already been consumed.
    pub fn decode_item_header_after_tag<S>(
        &self,
        source: &mut S,
        tag: Tag,
    ) -> Result<SequenceItemHeader>
    where
        S: Read + ?Sized,
    {
        let len = self
            .basic
            .decode_ul(&mut *source)
            .context(ReadLengthSnafu { tag })?;
        SequenceItemHeader::new(tag, Length(len)).context(BadSequenceHeaderSnafu)
    }
}

/// Resolve the VR of a tag under the implicit discipline.
///
/// Pixel Data and repeating-group Overlay Data must resolve to OW;
/// everything else is taken from the dictionary, with UN as the fallback
/// for private and unregistered tags.
fn resolve_implicit_vr(tag: Tag) -> VR {
    if tag == tags::PIXEL_DATA || (tag.group() >> 8 == 0x60 && tag.element() == 0x3000) {
        return VR::OW;
    }
    StandardDataDictionary
        .by_tag(tag)
        .map(|entry| entry.vr)
        .unwrap_or(VR::UN)
}
