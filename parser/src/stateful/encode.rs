//! A stateful DICOM data encoding abstraction.
//!
//! [`StatefulEncoder`] owns the write target and the current encoding
//! configuration, and knows how to serialize every primitive value
//! category with its padding discipline. Length-prefixed framing is
//! handled by the buffer-then-emit pattern: callers construct a child
//! encoder over a `Vec<u8>` (possibly with an overridden encoding, as for
//! UN sequences), encode the payload there, and then emit the buffer's
//! length followed by its bytes.

use dcmio_encoding::encode::{BasicEncoder, HeaderEncoder};
use dcmio_encoding::text;
use dcmio_encoding::Encoding;
use dcmio_core::{DataElementHeader, Value, ValueKind, VR};
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::convert::TryFrom;
use std::io::Write;

/// An error which occurred while encoding data set content.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not encode an element or item header.
    #[snafu(display("Could not encode header"))]
    EncodeHeader {
        #[snafu(backtrace)]
        source: dcmio_encoding::encode::Error,
    },

    /// Could not write value data to the target.
    #[snafu(display("Could not write value data"))]
    WriteValueData {
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// An integer value does not fit the width of the target VR.
    #[snafu(display("Value {} out of range for {}", value, vr))]
    IntegerCast {
        vr: VR,
        value: i64,
        backtrace: Backtrace,
    },

    /// An OW value must span a whole number of 16-bit words.
    #[snafu(display("OW value of odd length {}", len))]
    OddLength { len: usize, backtrace: Backtrace },

    /// A sequence or pixel data value cannot be encoded as a primitive.
    #[snafu(display("Attempted to encode non-primitive value of kind {}", kind))]
    NonPrimitiveValue {
        kind: ValueKind,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

const PREAMBLE_LENGTH: usize = 128;
const MAGIC_CODE: &[u8; 4] = b"DICM";

/// A stateful encoder of DICOM data set content.
#[derive(Debug)]
pub struct StatefulEncoder<W> {
    to: W,
    encoder: HeaderEncoder,
    bytes_written: u64,
}

impl<W> StatefulEncoder<W> {
    /// Create a new stateful encoder with the given encoding configuration.
    pub fn new(to: W, encoding: Encoding) -> Self {
        StatefulEncoder {
            to,
            encoder: HeaderEncoder::new(encoding),
            bytes_written: 0,
        }
    }

    /// The current encoding configuration.
    pub fn encoding(&self) -> Encoding {
        self.encoder.encoding()
    }

    /// Switch the encoding configuration. This takes effect on the next
    /// byte written, which is how the codec transitions from the file meta
    /// group to the transfer-syntax-selected data set encoding.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoder = HeaderEncoder::new(encoding);
    }

    /// Retrieve the number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Unwrap this encoder, returning the write target.
    pub fn into_inner(self) -> W {
        self.to
    }
}

impl<W> StatefulEncoder<W>
where
    W: Write,
{
    fn basic(&self) -> BasicEncoder {
        self.encoder.basic()
    }

    /// Write raw bytes to the target, as-is.
    pub fn write_all_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.to.write_all(bytes).context(WriteValueDataSnafu)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Write the 128-byte preamble and the "DICM" magic code.
    pub fn write_preamble(&mut self) -> Result<()> {
        self.to
            .write_all(&[0u8; PREAMBLE_LENGTH])
            .context(WriteValueDataSnafu)?;
        self.to.write_all(MAGIC_CODE).context(WriteValueDataSnafu)?;
        self.bytes_written += (PREAMBLE_LENGTH + MAGIC_CODE.len()) as u64;
        Ok(())
    }

    /// Encode and write a data element header.
    pub fn write_element_header(&mut self, header: DataElementHeader) -> Result<()> {
        let bytes = self
            .encoder
            .encode_element_header(&mut self.to, header)
            .context(EncodeHeaderSnafu)?;
        self.bytes_written += bytes as u64;
        Ok(())
    }

    /// Encode and write an item header.
    pub fn write_item_header(&mut self, len: u32) -> Result<()> {
        self.encoder
            .encode_item_header(&mut self.to, len)
            .context(EncodeHeaderSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode and write an item delimiter.
    pub fn write_item_delimiter(&mut self) -> Result<()> {
        self.encoder
            .encode_item_delimiter(&mut self.to)
            .context(EncodeHeaderSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode and write a sequence delimiter.
    pub fn write_sequence_delimiter(&mut self) -> Result<()> {
        self.encoder
            .encode_sequence_delimiter(&mut self.to)
            .context(EncodeHeaderSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode and write a single unsigned 16-bit integer.
    pub fn write_us(&mut self, value: u16) -> Result<()> {
        self.basic()
            .encode_us(&mut self.to, value)
            .context(WriteValueDataSnafu)?;
        self.bytes_written += 2;
        Ok(())
    }

    /// Encode and write a single unsigned 32-bit integer.
    pub fn write_ul(&mut self, value: u32) -> Result<()> {
        self.basic()
            .encode_ul(&mut self.to, value)
            .context(WriteValueDataSnafu)?;
        self.bytes_written += 4;
        Ok(())
    }

    /// Encode and write a primitive value according to the given VR,
    /// including the even-length padding byte where required.
    ///
    /// Sequence and pixel data values are containers, not primitives,
    /// and are rejected here; their framing is the caller's concern.
    pub fn write_value(&mut self, vr: VR, value: &Value) -> Result<()> {
        match value {
            Value::Strings(values) => self.write_strings(vr, values),
            Value::Ints(values) => self.write_ints(vr, values),
            Value::Floats(values) => self.write_floats(vr, values),
            Value::Bytes(values) => self.write_bytes_value(vr, values),
            other => NonPrimitiveValueSnafu { kind: other.kind() }.fail(),
        }
    }

    /// Write a string-list value: components joined with a backslash,
    /// padded to even length with the VR's padding byte.
    pub fn write_strings<S: AsRef<str>>(&mut self, vr: VR, values: &[S]) -> Result<()> {
        let mut data = text::join_components(values);
        text::pad_to_even(&mut data, vr.padding());
        self.write_all_raw(&data)
    }

    /// Write an integer-list value at the width selected by the VR.
    /// IS values are rendered as decimal text.
    pub fn write_ints(&mut self, vr: VR, values: &[i64]) -> Result<()> {
        match vr {
            VR::US | VR::AT => {
                for &v in values {
                    let v = u16::try_from(v).ok().context(IntegerCastSnafu { vr, value: v })?;
                    self.write_us(v)?;
                }
                Ok(())
            }
            VR::SS => {
                for &v in values {
                    let v = i16::try_from(v).ok().context(IntegerCastSnafu { vr, value: v })?;
                    self.basic()
                        .encode_ss(&mut self.to, v)
                        .context(WriteValueDataSnafu)?;
                    self.bytes_written += 2;
                }
                Ok(())
            }
            VR::UL => {
                for &v in values {
                    let v = u32::try_from(v).ok().context(IntegerCastSnafu { vr, value: v })?;
                    self.write_ul(v)?;
                }
                Ok(())
            }
            VR::SL => {
                for &v in values {
                    let v = i32::try_from(v).ok().context(IntegerCastSnafu { vr, value: v })?;
                    self.basic()
                        .encode_sl(&mut self.to, v)
                        .context(WriteValueDataSnafu)?;
                    self.bytes_written += 4;
                }
                Ok(())
            }
            VR::UV => {
                for &v in values {
                    // values above i64::MAX arrive in two's complement
                    self.basic()
                        .encode_uv(&mut self.to, v as u64)
                        .context(WriteValueDataSnafu)?;
                    self.bytes_written += 8;
                }
                Ok(())
            }
            VR::SV => {
                for &v in values {
                    self.basic()
                        .encode_sv(&mut self.to, v)
                        .context(WriteValueDataSnafu)?;
                    self.bytes_written += 8;
                }
                Ok(())
            }
            // IS and anything else integer-shaped goes out as decimal text
            _ => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                self.write_strings(vr, &rendered)
            }
        }
    }

    /// Write a float-list value at the width selected by the VR.
    /// DS values are rendered as decimal text.
    pub fn write_floats(&mut self, vr: VR, values: &[f64]) -> Result<()> {
        match vr {
            VR::FL | VR::OF => {
                for &v in values {
                    self.basic()
                        .encode_fl(&mut self.to, v as f32)
                        .context(WriteValueDataSnafu)?;
                    self.bytes_written += 4;
                }
                Ok(())
            }
            VR::FD | VR::OD => {
                for &v in values {
                    self.basic()
                        .encode_fd(&mut self.to, v)
                        .context(WriteValueDataSnafu)?;
                    self.bytes_written += 8;
                }
                Ok(())
            }
            _ => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                self.write_strings(vr, &rendered)
            }
        }
    }

    /// Write a binary value. OB and UN values of odd length are padded
    /// with a NUL; OW values must already span whole 16-bit words.
    pub fn write_bytes_value(&mut self, vr: VR, values: &[u8]) -> Result<()> {
        if vr == VR::OW && values.len() % 2 == 1 {
            return OddLengthSnafu { len: values.len() }.fail();
        }
        self.write_all_raw(values)?;
        if values.len() % 2 == 1 {
            self.write_all_raw(&[0u8])?;
        }
        Ok(())
    }
}
