//! A stateful DICOM data decoding abstraction.
//!
//! [`StatefulDecoder`] wraps the data source with the three pieces of state
//! the format requires: the byte position (for error reporting and framing
//! arithmetic), a stack of read limits (defined-length elements, items and
//! sequences restrict how far their content may read), and a reusable read
//! buffer. The encoding configuration is deliberately *not* stored here:
//! callers pass it into every operation, so that a recursion step can
//! override it (UN sequences force implicit little-endian children)
//! without mutating shared state.

use dcmio_encoding::decode::{BasicDecoder, HeaderDecoder};
use dcmio_encoding::text;
use dcmio_encoding::Encoding;
use dcmio_core::value::C;
use dcmio_core::{DataElementHeader, SequenceItemHeader, Tag, Value, VR};
use smallvec::smallvec;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{ErrorKind, Read};

/// An error which occurred while decoding data set content.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not decode an element header.
    #[snafu(display("Could not decode element header at position {}", position))]
    DecodeHeader {
        position: u64,
        #[snafu(backtrace)]
        source: dcmio_encoding::decode::Error,
    },

    /// Could not read value data from the source.
    #[snafu(display("Could not read value data at position {}", position))]
    ReadValueData {
        position: u64,
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// The source ended in the middle of a data element.
    #[snafu(display("Unexpected end of stream at position {}", position))]
    UnexpectedEndOfStream { position: u64, backtrace: Backtrace },

    /// A read would cross the enclosing value length limit.
    #[snafu(display(
        "Value of {} bytes at position {} crosses the enclosing length limit",
        needed,
        position
    ))]
    LimitExceeded {
        position: u64,
        needed: u64,
        backtrace: Backtrace,
    },

    /// Attempted to read a primitive value with an undefined length.
    #[snafu(display(
        "Undefined value length of element tagged {} at position {}",
        tag,
        position
    ))]
    UndefinedValueLength {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },

    /// Attempted to read a sequence value as a primitive.
    #[snafu(display("Attempted to read non-primitive value at position {}", position))]
    NonPrimitiveType { position: u64, backtrace: Backtrace },

    /// A text value did not decode as character data.
    #[snafu(display("Could not decode text at position {}", position))]
    DecodeText {
        position: u64,
        backtrace: Backtrace,
        source: std::string::FromUtf8Error,
    },

    /// A numeric string did not parse as an integer.
    #[snafu(display("Invalid integer value at position {}", position))]
    ReadInt {
        position: u64,
        source: std::num::ParseIntError,
    },

    /// A numeric string did not parse as a floating point number.
    #[snafu(display("Invalid float value at position {}", position))]
    ReadFloat {
        position: u64,
        source: std::num::ParseFloatError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The initial capacity of the decoder's value buffer.
const BUFFER_CAPACITY: usize = 2048;

/// A stateful decoder of DICOM data set content.
///
/// The decoder owns the source, counts the bytes consumed, and maintains a
/// stack of read limits so that defined-length framing can be enforced on
/// every read. Encoding configuration is passed per call.
#[derive(Debug)]
pub struct StatefulDecoder<S> {
    from: S,
    /// the assumed position of the reader source
    position: u64,
    /// absolute end offsets of the active read limits, innermost last
    limits: Vec<u64>,
    buffer: Vec<u8>,
}

impl<S> StatefulDecoder<S> {
    /// Create a new stateful decoder at position 0.
    pub fn new(from: S) -> Self {
        Self::new_with_position(from, 0)
    }

    /// Create a new stateful decoder, assuming a base position of the
    /// source. Decoding errors may be misreported if this position does
    /// not match the real position of the reader.
    pub fn new_with_position(from: S, position: u64) -> Self {
        StatefulDecoder {
            from,
            position,
            limits: Vec::new(),
            buffer: Vec::with_capacity(BUFFER_CAPACITY),
        }
    }

    /// Retrieve the number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Restrict subsequent reads to the next `len` bytes.
    /// Limits nest: the new window must fit in the current one.
    pub fn push_limit(&mut self, len: u64) -> Result<()> {
        self.require_within_limit(len)?;
        self.limits.push(self.position + len);
        Ok(())
    }

    /// Release the innermost read limit.
    pub fn pop_limit(&mut self) {
        self.limits.pop();
    }

    /// The number of bytes left in the innermost read limit, if any.
    pub fn limit_remaining(&self) -> Option<u64> {
        self.limits
            .last()
            .map(|end| end.saturating_sub(self.position))
    }

    /// Whether the innermost read limit has been fully consumed.
    pub fn limit_exhausted(&self) -> bool {
        self.limit_remaining() == Some(0)
    }

    fn require_within_limit(&self, len: u64) -> Result<()> {
        if let Some(remaining) = self.limit_remaining() {
            ensure!(
                len <= remaining,
                LimitExceededSnafu {
                    position: self.position,
                    needed: len,
                }
            );
        }
        Ok(())
    }
}

impl<S> StatefulDecoder<S>
where
    S: Read,
{
    /// Read exactly `buf.len()` bytes, counting them against the
    /// current limit.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.require_within_limit(buf.len() as u64)?;
        self.from.read_exact(buf).context(ReadValueDataSnafu {
            position: self.position,
        })?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Read the given number of bytes into a new vector.
    pub fn read_to_vec(&mut self, len: u64) -> Result<Vec<u8>> {
        let mut v = vec![0u8; len as usize];
        self.read_exact(&mut v)?;
        Ok(v)
    }

    /// Skip the given number of bytes, counting them as read.
    pub fn skip(&mut self, len: u64) -> Result<()> {
        self.require_within_limit(len)?;
        let copied = std::io::copy(&mut self.from.by_ref().take(len), &mut std::io::sink())
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += copied;
        ensure!(
            copied == len,
            UnexpectedEndOfStreamSnafu {
                position: self.position,
            }
        );
        Ok(())
    }

    /// Try to read a tag at the current position, distinguishing a clean
    /// end of stream (no bytes available) from a truncated one.
    /// A read limit with less than one tag remaining also counts
    /// as the end.
    pub fn read_tag_or_eof(&mut self, enc: Encoding) -> Result<Option<Tag>> {
        if let Some(remaining) = self.limit_remaining() {
            if remaining < 4 {
                return Ok(None);
            }
        }
        let mut buf = [0u8; 4];
        let mut n = 0;
        while n < buf.len() {
            match self.from.read(&mut buf[n..]) {
                Ok(0) => break,
                Ok(k) => n += k,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(e).context(ReadValueDataSnafu {
                        position: self.position,
                    })
                }
            }
        }
        if n == 0 {
            return Ok(None);
        }
        ensure!(
            n == buf.len(),
            UnexpectedEndOfStreamSnafu {
                position: self.position + n as u64,
            }
        );
        self.position += 4;
        let tag = BasicDecoder::new(enc.endianness)
            .decode_tag(&buf[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        Ok(Some(tag))
    }

    /// Decode an attribute tag at the current position.
    pub fn decode_tag(&mut self, enc: Encoding) -> Result<Tag> {
        let tag = BasicDecoder::new(enc.endianness)
            .decode_tag(&mut self.from)
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += 4;
        Ok(tag)
    }

    /// Decode an unsigned 32-bit integer at the current position.
    pub fn decode_u32(&mut self, enc: Encoding) -> Result<u32> {
        let v = BasicDecoder::new(enc.endianness)
            .decode_ul(&mut self.from)
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += 4;
        Ok(v)
    }

    /// Decode a full data element header at the current position.
    pub fn decode_header(&mut self, enc: Encoding) -> Result<DataElementHeader> {
        let position = self.position;
        let (header, bytes_read) = HeaderDecoder::new(enc)
            .decode_header(&mut self.from)
            .context(DecodeHeaderSnafu { position })?;
        self.position += bytes_read as u64;
        Ok(header)
    }

    /// Decode the remainder of a data element header,
    /// the tag having already been consumed.
    pub fn decode_header_after_tag(&mut self, tag: Tag, enc: Encoding) -> Result<DataElementHeader> {
        let position = self.position;
        let (header, bytes_read) = HeaderDecoder::new(enc)
            .decode_header_after_tag(&mut self.from, tag)
            .context(DecodeHeaderSnafu { position })?;
        self.position += bytes_read as u64;
        Ok(header)
    }

    /// Decode a sequence item header at the current position.
    pub fn decode_item_header(&mut self, enc: Encoding) -> Result<SequenceItemHeader> {
        let position = self.position;
        let header = HeaderDecoder::new(enc)
            .decode_item_header(&mut self.from)
            .context(DecodeHeaderSnafu { position })?;
        self.position += 8;
        Ok(header)
    }

    /// Read a sequence of unsigned 16-bit integers.
    pub fn read_u16s(&mut self, n: usize, enc: Encoding) -> Result<Vec<u16>> {
        self.require_within_limit((n * 2) as u64)?;
        let mut v = vec![0u16; n];
        BasicDecoder::new(enc.endianness)
            .decode_us_into(&mut self.from, &mut v)
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n * 2) as u64;
        Ok(v)
    }

    /// Read a sequence of unsigned 32-bit integers.
    pub fn read_u32s(&mut self, n: usize, enc: Encoding) -> Result<Vec<u32>> {
        self.require_within_limit((n * 4) as u64)?;
        let mut v = vec![0u32; n];
        BasicDecoder::new(enc.endianness)
            .decode_ul_into(&mut self.from, &mut v)
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n * 4) as u64;
        Ok(v)
    }

    /// Eagerly read the following data as a primitive value, decoded
    /// according to the header's VR. Sequences must not be read through
    /// this method.
    pub fn read_value(&mut self, header: &DataElementHeader, enc: Encoding) -> Result<Value> {
        let len = header.len.get().context(UndefinedValueLengthSnafu {
            tag: header.tag,
            position: self.position,
        })? as usize;

        match header.vr {
            VR::SQ => NonPrimitiveTypeSnafu {
                position: self.position,
            }
            .fail(),
            VR::AE | VR::AS | VR::CS | VR::DA | VR::DT | VR::LO | VR::LT | VR::PN | VR::SH
            | VR::ST | VR::TM | VR::UC | VR::UI | VR::UR | VR::UT => self.read_value_strs(len, header.vr),
            VR::IS => self.read_value_is(len),
            VR::DS => self.read_value_ds(len),
            VR::US | VR::AT => self.read_value_us(len, enc),
            VR::SS => self.read_value_ss(len, enc),
            VR::UL => self.read_value_ul(len, enc),
            VR::SL => self.read_value_sl(len, enc),
            VR::UV => self.read_value_uv(len, enc),
            VR::SV => self.read_value_sv(len, enc),
            VR::FL | VR::OF => self.read_value_fl(len, enc),
            VR::FD | VR::OD => self.read_value_fd(len, enc),
            VR::OB | VR::OL | VR::OV | VR::OW | VR::UN => self.read_value_bytes(len),
        }
    }

    fn fill_buffer(&mut self, len: usize) -> Result<()> {
        self.require_within_limit(len as u64)?;
        self.buffer.resize(len, 0);
        let position = self.position;
        self.from
            .read_exact(&mut self.buffer)
            .context(ReadValueDataSnafu { position })?;
        self.position += len as u64;
        Ok(())
    }

    fn read_value_strs(&mut self, len: usize, vr: VR) -> Result<Value> {
        if len == 0 {
            return Ok(Value::Strings(smallvec![]));
        }
        self.fill_buffer(len)?;
        let position = self.position;
        let parts: Result<C<String>> = text::split_components(&self.buffer)
            .map(|component| {
                let trimmed = if vr == VR::UI {
                    text::trim_trailing_nulls(component)
                } else {
                    text::trim_trailing_spaces(component)
                };
                String::from_utf8(trimmed.to_vec()).context(DecodeTextSnafu { position })
            })
            .collect();
        Ok(Value::Strings(parts?))
    }

    fn read_value_is(&mut self, len: usize) -> Result<Value> {
        if len == 0 {
            return Ok(Value::Ints(smallvec![]));
        }
        self.fill_buffer(len)?;
        let position = self.position;
        let parts: Result<C<i64>> = text::split_components(&self.buffer)
            .map(|component| {
                let txt = String::from_utf8(component.to_vec())
                    .context(DecodeTextSnafu { position })?;
                txt.trim_matches(|c| c == ' ' || c == '\0')
                    .parse::<i64>()
                    .context(ReadIntSnafu { position })
            })
            .collect();
        Ok(Value::Ints(parts?))
    }

    fn read_value_ds(&mut self, len: usize) -> Result<Value> {
        if len == 0 {
            return Ok(Value::Floats(smallvec![]));
        }
        self.fill_buffer(len)?;
        let position = self.position;
        let parts: Result<C<f64>> = text::split_components(&self.buffer)
            .map(|component| {
                let txt = String::from_utf8(component.to_vec())
                    .context(DecodeTextSnafu { position })?;
                txt.trim_matches(|c| c == ' ' || c == '\0')
                    .parse::<f64>()
                    .context(ReadFloatSnafu { position })
            })
            .collect();
        Ok(Value::Floats(parts?))
    }

    fn read_value_us(&mut self, len: usize, enc: Encoding) -> Result<Value> {
        let values = self.read_u16s(len / 2, enc)?;
        Ok(Value::Ints(values.into_iter().map(i64::from).collect()))
    }

    fn read_value_ss(&mut self, len: usize, enc: Encoding) -> Result<Value> {
        let n = len / 2;
        self.require_within_limit((n * 2) as u64)?;
        let basic = BasicDecoder::new(enc.endianness);
        let mut values: C<i64> = C::with_capacity(n);
        for _ in 0..n {
            let v = basic.decode_ss(&mut self.from).context(ReadValueDataSnafu {
                position: self.position,
            })?;
            values.push(i64::from(v));
        }
        self.position += (n * 2) as u64;
        Ok(Value::Ints(values))
    }

    fn read_value_ul(&mut self, len: usize, enc: Encoding) -> Result<Value> {
        let values = self.read_u32s(len / 4, enc)?;
        Ok(Value::Ints(values.into_iter().map(i64::from).collect()))
    }

    fn read_value_sl(&mut self, len: usize, enc: Encoding) -> Result<Value> {
        let n = len / 4;
        self.require_within_limit((n * 4) as u64)?;
        let basic = BasicDecoder::new(enc.endianness);
        let mut values: C<i64> = C::with_capacity(n);
        for _ in 0..n {
            let v = basic.decode_sl(&mut self.from).context(ReadValueDataSnafu {
                position: self.position,
            })?;
            values.push(i64::from(v));
        }
        self.position += (n * 4) as u64;
        Ok(Value::Ints(values))
    }

    fn read_value_uv(&mut self, len: usize, enc: Encoding) -> Result<Value> {
        let n = len / 8;
        self.require_within_limit((n * 8) as u64)?;
        let basic = BasicDecoder::new(enc.endianness);
        let mut values: C<i64> = C::with_capacity(n);
        for _ in 0..n {
            let v = basic.decode_uv(&mut self.from).context(ReadValueDataSnafu {
                position: self.position,
            })?;
            values.push(v as i64);
        }
        self.position += (n * 8) as u64;
        Ok(Value::Ints(values))
    }

    fn read_value_sv(&mut self, len: usize, enc: Encoding) -> Result<Value> {
        let n = len / 8;
        self.require_within_limit((n * 8) as u64)?;
        let basic = BasicDecoder::new(enc.endianness);
        let mut values: C<i64> = C::with_capacity(n);
        for _ in 0..n {
            let v = basic.decode_sv(&mut self.from).context(ReadValueDataSnafu {
                position: self.position,
            })?;
            values.push(v);
        }
        self.position += (n * 8) as u64;
        Ok(Value::Ints(values))
    }

    fn read_value_fl(&mut self, len: usize, enc: Encoding) -> Result<Value> {
        let n = len / 4;
        self.require_within_limit((n * 4) as u64)?;
        let mut v = vec![0f32; n];
        BasicDecoder::new(enc.endianness)
            .decode_fl_into(&mut self.from, &mut v)
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n * 4) as u64;
        Ok(Value::Floats(v.into_iter().map(f64::from).collect()))
    }

    fn read_value_fd(&mut self, len: usize, enc: Encoding) -> Result<Value> {
        let n = len / 8;
        self.require_within_limit((n * 8) as u64)?;
        let mut v = vec![0f64; n];
        BasicDecoder::new(enc.endianness)
            .decode_fd_into(&mut self.from, &mut v)
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n * 8) as u64;
        Ok(Value::Floats(v.into_iter().collect()))
    }

    fn read_value_bytes(&mut self, len: usize) -> Result<Value> {
        self.require_within_limit(len as u64)?;
        let mut v: C<u8> = smallvec![0u8; len];
        let position = self.position;
        self.from
            .read_exact(&mut v)
            .context(ReadValueDataSnafu { position })?;
        self.position += len as u64;
        Ok(Value::Bytes(v))
    }
}
