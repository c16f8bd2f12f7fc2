//! Encoding of data element headers under a runtime encoding.

pub mod basic;

use crate::transfer_syntax::Encoding;
use dcmio_core::{DataElementHeader, Tag};
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::Write;

pub use self::basic::BasicEncoder;

/// An error which occurred while encoding an element header.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not write an attribute tag.
    #[snafu(display("Could not write tag {}", tag))]
    WriteTag {
        tag: Tag,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not write a data element header.
    #[snafu(display("Could not write header of element tagged {}", tag))]
    WriteHeader {
        tag: Tag,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not write a sequence item header.
    #[snafu(display("Could not write item header"))]
    WriteItemHeader {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not write an item delimiter.
    #[snafu(display("Could not write item delimiter"))]
    WriteItemDelimiter {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not write a sequence delimiter.
    #[snafu(display("Could not write sequence delimiter"))]
    WriteSequenceDelimiter {
        backtrace: Backtrace,
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An encoder of data element headers
/// under a run-time selected encoding configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeaderEncoder {
    encoding: Encoding,
    basic: BasicEncoder,
}

impl HeaderEncoder {
    /// Create a header encoder for the given encoding configuration.
    pub fn new(encoding: Encoding) -> Self {
        HeaderEncoder {
            encoding,
            basic: BasicEncoder::new(encoding.endianness),
        }
    }

    /// The encoding configuration of this encoder.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The primitive value encoder matching this header encoder's byte order.
    pub fn basic(&self) -> BasicEncoder {
        self.basic
    }

    /// Encode and write an attribute tag.
    pub fn encode_tag<W>(&self, mut to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, tag)
            .context(WriteTagSnafu { tag })
    }

    /// Encode and write a data element header.
    /// Returns the number of bytes written.
    ///
    /// Under the explicit discipline, the header's `raw_vr` bytes are
    /// emitted, while the canonical VR selects between the short form
    /// (16-bit length) and the long form (two reserved bytes and a
    /// 32-bit length). Under the implicit discipline the VR is omitted
    /// and the length is always 32 bits wide.
    pub fn encode_element_header<W>(&self, mut to: W, header: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        let tag = header.tag();
        self.basic
            .encode_tag(&mut to, tag)
            .context(WriteHeaderSnafu { tag })?;

        if self.encoding.implicit_vr {
            self.basic
                .encode_ul(&mut to, header.length().0)
                .context(WriteHeaderSnafu { tag })?;
            return Ok(8);
        }

        to.write_all(&header.raw_vr)
            .context(WriteHeaderSnafu { tag })?;
        if header.vr().is_long_form() {
            // the two reserved bytes are kept zeroed
            to.write_all(&[0u8, 0u8])
                .context(WriteHeaderSnafu { tag })?;
            self.basic
                .encode_ul(&mut to, header.length().0)
                .context(WriteHeaderSnafu { tag })?;
            Ok(12)
        } else {
            self.basic
                .encode_us(&mut to, header.length().0 as u16)
                .context(WriteHeaderSnafu { tag })?;
            Ok(8)
        }
    }

    /// Encode and write an item header with the given length.
    pub fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, Tag(0xFFFE, 0xE000))
            .context(WriteItemHeaderSnafu)?;
        self.basic
            .encode_ul(&mut to, len)
            .context(WriteItemHeaderSnafu)
    }

    /// Encode and write an item delimiter.
    pub fn encode_item_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, Tag(0xFFFE, 0xE00D))
            .context(WriteItemDelimiterSnafu)?;
        self.basic
            .encode_ul(&mut to, 0)
            .context(WriteItemDelimiterSnafu)
    }

    /// Encode and write a sequence delimiter.
    pub fn encode_sequence_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, Tag(0xFFFE, 0xE0DD))
            .context(WriteSequenceDelimiterSnafu)?;
        self.basic
            .encode_ul(&mut to, 0)
            .context(WriteSequenceDelimiterSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmio_core::{Length, VR};

    // Tag: (0002,0010) Transfer Syntax UID; VR: UI; Length: 20
    const RAW_SHORT_LE: &[u8] = &[0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x14, 0x00];

    #[test]
    fn explicit_le_short_form() {
        let enc = HeaderEncoder::new(Encoding::EXPLICIT_LE);
        let mut out = vec![];
        let header = DataElementHeader::new(Tag(0x0002, 0x0010), VR::UI, Length(20));
        let bytes = enc.encode_element_header(&mut out, header).unwrap();
        assert_eq!(bytes, 8);
        assert_eq!(&out, RAW_SHORT_LE);
    }

    // Sequence of undefined length with explicit framing:
    //  (0008,2218) AnatomicRegionSequence SQ, reserved, undefined length
    //  (FFFE,E000) Item, undefined length
    //  (FFFE,E00D) Item Delimitation Item, zero length
    //  (FFFE,E0DD) Sequence Delimitation Item, zero length
    const RAW_SEQUENCE_LE: &[u8] = &[
        0x08, 0x00, 0x18, 0x22, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0x00,
        0xE0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, 0xFE, 0xFF,
        0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn explicit_le_sequence_framing() {
        let enc = HeaderEncoder::new(Encoding::EXPLICIT_LE);
        let mut out = vec![];

        let header = DataElementHeader::new(Tag(0x0008, 0x2218), VR::SQ, Length::UNDEFINED);
        let bytes = enc.encode_element_header(&mut out, header).unwrap();
        assert_eq!(bytes, 12);

        enc.encode_item_header(&mut out, Length::UNDEFINED.0).unwrap();
        enc.encode_item_delimiter(&mut out).unwrap();
        enc.encode_sequence_delimiter(&mut out).unwrap();

        assert_eq!(&out[..], RAW_SEQUENCE_LE);
    }

    #[test]
    fn implicit_le_has_no_vr() {
        let enc = HeaderEncoder::new(Encoding::IMPLICIT_LE);
        let mut out = vec![];
        let header = DataElementHeader::new(Tag(0x0010, 0x0010), VR::PN, Length(10));
        let bytes = enc.encode_element_header(&mut out, header).unwrap();
        assert_eq!(bytes, 8);
        assert_eq!(&out, &[0x10, 0x00, 0x10, 0x00, 0x0a, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn explicit_be_long_form() {
        let enc = HeaderEncoder::new(Encoding::EXPLICIT_BE);
        let mut out = vec![];
        let header = DataElementHeader::new(Tag(0x7FE0, 0x0010), VR::OW, Length(8));
        let bytes = enc.encode_element_header(&mut out, header).unwrap();
        assert_eq!(bytes, 12);
        assert_eq!(
            &out,
            &[0x7F, 0xE0, 0x00, 0x10, b'O', b'W', 0x00, 0x00, 0x00, 0x00, 0x00, 0x08]
        );
    }

    #[test]
    fn raw_vr_is_emitted_verbatim() {
        let enc = HeaderEncoder::new(Encoding::EXPLICIT_LE);
        let mut out = vec![];
        let header = DataElementHeader::new_with_raw_vr(
            Tag(0x7FE0, 0x0010),
            VR::OB,
            *b"OB",
            Length::UNDEFINED,
        );
        enc.encode_element_header(&mut out, header).unwrap();
        assert_eq!(&out[4..6], b"OB");
    }
}
