//! Parsing of DICOM Part 10 streams into data sets.
//!
//! [`Parser`] drives the stateful decoder through the fixed portions of the
//! format (preamble, magic code, file meta group in Explicit VR Little
//! Endian), switches the data set encoding according to the Transfer
//! Syntax UID, and then yields one [`DataElement`] at a time, recursing
//! through sequence items and slicing or streaming pixel data.

use crate::stateful::decode::{self, StatefulDecoder};
use dcmio_encoding::transfer_syntax::{self, Encoding};
use dcmio_core::dictionary::tags;
use dcmio_core::value::pixeldata::{EncapsulatedFrame, Frame, NativeFrame, NativeSamples};
use dcmio_core::value::C;
use dcmio_core::{
    DataElement, Dataset, Item, Length, PixelDataInfo, SequenceItemHeader, Tag, Value, VR,
};
use byteordered::Endianness;
use smallvec::smallvec;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::convert::TryFrom;
use std::io::Read;
use std::sync::mpsc::Sender;

/// An error which occurred while parsing a DICOM stream.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The stream does not start with a DICOM preamble and magic code.
    #[snafu(display("Invalid DICOM preamble or magic code"))]
    MagicWord { backtrace: Backtrace },

    /// The file meta group does not start with a valid group length element.
    #[snafu(display("Invalid file meta information group length"))]
    MetaElementGroupLength { backtrace: Backtrace },

    /// A required element was not found.
    #[snafu(display("Element {} not found", tag))]
    ElementNotFound { tag: Tag, backtrace: Backtrace },

    /// The transfer syntax is not known to this library.
    #[snafu(display("Unsupported transfer syntax {:?}", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },

    /// The deflated transfer syntax is recognized but not supported.
    #[snafu(display("The deflated transfer syntax is not supported"))]
    DeflatedTransferSyntaxUnsupported { backtrace: Backtrace },

    /// Lower-level decoding failure.
    #[snafu(display("Could not decode data set content"))]
    DecodeContent {
        #[snafu(backtrace)]
        source: decode::Error,
    },

    /// An item or sequence delimiter appeared where it is not allowed.
    #[snafu(display("Unexpected delimiter {} at position {}", tag, position))]
    UnexpectedDelimiter {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },

    /// A primitive element carried an undefined length.
    #[snafu(display("Undefined length on non-sequence element {}", tag))]
    UndefinedElementLength { tag: Tag, backtrace: Backtrace },

    /// A pixel data fragment item carried an undefined length.
    #[snafu(display("Undefined pixel data item length"))]
    UndefinedItemLength { backtrace: Backtrace },

    /// The pixel data payload does not match the image geometry.
    #[snafu(display(
        "Pixel data of {} bytes does not match geometry ({} bytes expected)",
        got,
        expected
    ))]
    MismatchPixelDataType {
        expected: usize,
        got: usize,
        backtrace: Backtrace,
    },

    /// Native pixel data with a sample width this codec cannot slice.
    #[snafu(display("Unsupported bits allocated value {}", bits))]
    UnsupportedBitsAllocated { bits: u16, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

const PREAMBLE_LENGTH: usize = 128;
const MAGIC_CODE: &[u8; 4] = b"DICM";

/// The set of options for the parser.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Skip the pixel data value, marking it as intentionally skipped
    /// instead of materializing frames.
    pub skip_pixel_data: bool,
    /// Preserve the raw pixel data value bytes without interpreting them.
    pub skip_processing_pixel_data_value: bool,
    /// Do not read the preamble and file meta group at construction;
    /// begin in the caller-chosen transfer syntax instead.
    pub skip_metadata_read_on_new_parser_init: bool,
    /// The initial data set encoding when metadata reading is skipped.
    /// Defaults to Implicit VR Little Endian.
    pub initial_encoding: Option<Encoding>,
    /// The transfer syntax to assume when the file meta group has no
    /// Transfer Syntax UID element.
    pub default_transfer_syntax: Option<String>,
    /// A channel on which every decoded frame is delivered as soon as it
    /// is sliced or read, in addition to being stored in the data set.
    pub frame_sender: Option<Sender<Frame>>,
}

impl ParseOptions {
    /// Skip the pixel data value instead of materializing frames.
    pub fn skip_pixel_data(mut self) -> Self {
        self.skip_pixel_data = true;
        self
    }

    /// Preserve the raw pixel data value bytes without interpreting them.
    pub fn skip_processing_pixel_data_value(mut self) -> Self {
        self.skip_processing_pixel_data_value = true;
        self
    }

    /// Do not read the preamble and file meta group at construction.
    pub fn skip_metadata_read_on_new_parser_init(mut self) -> Self {
        self.skip_metadata_read_on_new_parser_init = true;
        self
    }

    /// Set the initial encoding for metadata-skipping parsers.
    pub fn initial_encoding(mut self, encoding: Encoding) -> Self {
        self.initial_encoding = Some(encoding);
        self
    }

    /// Assume the given transfer syntax when the meta group has none.
    pub fn default_transfer_syntax(mut self, uid: impl Into<String>) -> Self {
        self.default_transfer_syntax = Some(uid.into());
        self
    }

    /// Deliver decoded frames through the given channel.
    pub fn frame_sender(mut self, sender: Sender<Frame>) -> Self {
        self.frame_sender = Some(sender);
        self
    }
}

/// A streaming parser of one DICOM Part 10 data set.
///
/// The parser accumulates every element it yields, so that pixel data can
/// be sliced against the image geometry elements read before it. Retrieve
/// the full data set with [`into_dataset`](Self::into_dataset) after
/// iteration, or use [`parse`]/[`parse_until_eof`].
#[derive(Debug)]
pub struct Parser<R> {
    decoder: StatefulDecoder<R>,
    enc: Encoding,
    options: ParseOptions,
    dataset: Dataset,
    done: bool,
}

impl<R> Parser<R>
where
    R: Read,
{
    /// Create a new parser over the given source.
    ///
    /// Unless metadata reading is skipped via the options, this reads the
    /// preamble, the magic code and the whole file meta group, and
    /// switches to the transfer syntax announced there. When `length` is
    /// given, reading stops after that many bytes even if the source
    /// continues.
    pub fn new(source: R, length: Option<u64>, options: ParseOptions) -> Result<Self> {
        let mut decoder = StatefulDecoder::new(source);
        if let Some(length) = length {
            decoder.push_limit(length).context(DecodeContentSnafu)?;
        }

        let mut parser = Parser {
            decoder,
            enc: options.initial_encoding.unwrap_or(Encoding::IMPLICIT_LE),
            options,
            dataset: Dataset::new(),
            done: false,
        };

        if !parser.options.skip_metadata_read_on_new_parser_init {
            parser.read_preamble()?;
            let meta = parser.read_file_meta()?;
            parser.enc = parser.resolve_transfer_syntax(&meta)?;
            parser.dataset.elements = meta;
        }
        Ok(parser)
    }

    /// The data set encoding currently in effect.
    pub fn encoding(&self) -> Encoding {
        self.enc
    }

    /// Override the data set encoding, for parsers constructed without
    /// metadata reading.
    pub fn set_transfer_syntax(&mut self, endianness: Endianness, implicit_vr: bool) {
        self.enc = Encoding::new(endianness, implicit_vr);
    }

    /// The elements read so far, file meta group included.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Consume the parser, returning every element read so far.
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Read the next data element from the data set body.
    /// Returns `None` at a clean end of stream.
    pub fn next_element(&mut self) -> Result<Option<DataElement>> {
        if self.done {
            return Ok(None);
        }
        if self.decoder.limit_exhausted() {
            self.done = true;
            return Ok(None);
        }
        let enc = self.enc;
        let tag = match self
            .decoder
            .read_tag_or_eof(enc)
            .context(DecodeContentSnafu)?
        {
            None => {
                self.done = true;
                return Ok(None);
            }
            Some(tag) => tag,
        };

        if tag.group() == 0xFFFE {
            // a stray framing token outside of any sequence: skip it
            let len = self.decoder.decode_u32(enc).context(DecodeContentSnafu)?;
            tracing::warn!(
                "delimitation item {} (length {}) outside of a sequence at position {}",
                tag,
                len,
                self.decoder.position()
            );
            return self.next_element();
        }

        let element = self.finish_element(tag, enc)?;
        self.dataset.push(element.clone());
        Ok(Some(element))
    }

    // ---------------- preamble and file meta group ----------------

    fn read_preamble(&mut self) -> Result<()> {
        let mut preamble = [0u8; PREAMBLE_LENGTH + 4];
        self.decoder
            .read_exact(&mut preamble)
            .context(DecodeContentSnafu)?;
        ensure!(&preamble[PREAMBLE_LENGTH..] == MAGIC_CODE, MagicWordSnafu);
        Ok(())
    }

    fn read_file_meta(&mut self) -> Result<Vec<DataElement>> {
        let header = self
            .decoder
            .decode_header(Encoding::EXPLICIT_LE)
            .context(DecodeContentSnafu)?;
        ensure!(
            header.tag == tags::FILE_META_INFORMATION_GROUP_LENGTH
                && header.len.get() == Some(4),
            MetaElementGroupLengthSnafu
        );
        let group_length = self
            .decoder
            .decode_u32(Encoding::EXPLICIT_LE)
            .context(DecodeContentSnafu)?;

        let mut meta = vec![DataElement::from_parts(
            header,
            Value::ints([i64::from(group_length)]),
        )];

        self.decoder
            .push_limit(u64::from(group_length))
            .context(DecodeContentSnafu)?;
        let result = (|| {
            while !self.decoder.limit_exhausted() {
                let tag = self
                    .decoder
                    .decode_tag(Encoding::EXPLICIT_LE)
                    .context(DecodeContentSnafu)?;
                if tag.group() != 0x0002 {
                    tracing::warn!("non-meta element {} inside the file meta group", tag);
                }
                meta.push(self.finish_element(tag, Encoding::EXPLICIT_LE)?);
            }
            Ok(())
        })();
        self.decoder.pop_limit();
        result?;
        Ok(meta)
    }

    fn resolve_transfer_syntax(&self, meta: &[DataElement]) -> Result<Encoding> {
        let uid = match meta
            .iter()
            .find(|e| e.tag() == tags::TRANSFER_SYNTAX_UID)
            .and_then(|e| e.value().first_str())
        {
            Some(uid) => uid.to_owned(),
            None => self
                .options
                .default_transfer_syntax
                .clone()
                .context(ElementNotFoundSnafu {
                    tag: tags::TRANSFER_SYNTAX_UID,
                })?,
        };
        let ts = transfer_syntax::lookup(&uid)
            .context(UnsupportedTransferSyntaxSnafu { uid: uid.clone() })?;
        ensure!(!ts.deflated, DeflatedTransferSyntaxUnsupportedSnafu);
        Ok(ts.encoding())
    }

    // ---------------- element reading ----------------

    /// Read the rest of one element, the tag having been consumed,
    /// under the given encoding.
    fn finish_element(&mut self, tag: Tag, enc: Encoding) -> Result<DataElement> {
        let header = self
            .decoder
            .decode_header_after_tag(tag, enc)
            .context(DecodeContentSnafu)?;

        // encapsulated pixel data: a fragment sequence
        if header.is_encapsulated_pixeldata() {
            let value = self.read_encapsulated_pixel_data(enc)?;
            return Ok(DataElement::from_parts(header, value));
        }

        // sequences, and unknown-VR elements framed like them.
        // UN content is decoded as implicit little endian, framing included.
        if header.vr == VR::SQ || (header.vr == VR::UN && header.len.is_undefined()) {
            let child_enc = if header.vr == VR::UN {
                Encoding::IMPLICIT_LE
            } else {
                enc
            };
            let value = self.read_sequence(header.len, child_enc)?;
            return Ok(DataElement::from_parts(header, value));
        }

        // native pixel data: a flat buffer sliced by geometry
        if header.tag == tags::PIXEL_DATA {
            let value = self.read_native_pixel_data(header.len, enc)?;
            return Ok(DataElement::from_parts(header, value));
        }

        let len = header
            .len
            .get()
            .context(UndefinedElementLengthSnafu { tag })?;
        self.decoder
            .push_limit(u64::from(len))
            .context(DecodeContentSnafu)?;
        let value = self.decoder.read_value(&header, enc);
        self.decoder.pop_limit();
        Ok(DataElement::from_parts(
            header,
            value.context(DecodeContentSnafu)?,
        ))
    }

    /// Read the items of a sequence value. `enc` is the encoding of the
    /// sequence content, which the caller has already adjusted for
    /// UN-forced implicit decoding.
    fn read_sequence(&mut self, len: Length, enc: Encoding) -> Result<Value> {
        let mut items: C<Item> = smallvec![];
        if len.is_undefined() {
            loop {
                match self
                    .decoder
                    .decode_item_header(enc)
                    .context(DecodeContentSnafu)?
                {
                    SequenceItemHeader::Item { len } => items.push(self.read_item(len, enc)?),
                    SequenceItemHeader::SequenceDelimiter => break,
                    SequenceItemHeader::ItemDelimiter => {
                        return UnexpectedDelimiterSnafu {
                            tag: tags::ITEM_DELIMITATION_ITEM,
                            position: self.decoder.position(),
                        }
                        .fail()
                    }
                }
            }
        } else {
            self.decoder
                .push_limit(u64::from(len.0))
                .context(DecodeContentSnafu)?;
            let result = (|| {
                while !self.decoder.limit_exhausted() {
                    match self
                        .decoder
                        .decode_item_header(enc)
                        .context(DecodeContentSnafu)?
                    {
                        SequenceItemHeader::Item { len } => {
                            items.push(self.read_item(len, enc)?)
                        }
                        SequenceItemHeader::SequenceDelimiter => break,
                        SequenceItemHeader::ItemDelimiter => {
                            return UnexpectedDelimiterSnafu {
                                tag: tags::ITEM_DELIMITATION_ITEM,
                                position: self.decoder.position(),
                            }
                            .fail()
                        }
                    }
                }
                Ok(())
            })();
            self.decoder.pop_limit();
            result?;
        }
        Ok(Value::Items(items))
    }

    /// Read the child elements of one sequence item.
    fn read_item(&mut self, len: Length, enc: Encoding) -> Result<Item> {
        let mut elements = Vec::new();
        if len.is_undefined() {
            loop {
                let tag = self.decoder.decode_tag(enc).context(DecodeContentSnafu)?;
                if tag == tags::ITEM_DELIMITATION_ITEM {
                    let delim_len = self.decoder.decode_u32(enc).context(DecodeContentSnafu)?;
                    if delim_len != 0 {
                        tracing::warn!(
                            "item delimiter with non-zero length {} at position {}",
                            delim_len,
                            self.decoder.position()
                        );
                    }
                    break;
                }
                elements.push(self.finish_element(tag, enc)?);
            }
        } else {
            self.decoder
                .push_limit(u64::from(len.0))
                .context(DecodeContentSnafu)?;
            let result = (|| {
                while !self.decoder.limit_exhausted() {
                    let tag = self.decoder.decode_tag(enc).context(DecodeContentSnafu)?;
                    elements.push(self.finish_element(tag, enc)?);
                }
                Ok(())
            })();
            self.decoder.pop_limit();
            result?;
        }
        Ok(Item::new_with_length(len, elements))
    }

    // ---------------- pixel data ----------------

    fn send_frame(&self, frame: &Frame) {
        if let Some(sender) = &self.options.frame_sender {
            // a dropped receiver is not this parser's concern
            let _ = sender.send(frame.clone());
        }
    }

    fn geometry_u16(&self, tag: Tag) -> Result<u16> {
        let value = self
            .dataset
            .find(tag)
            .and_then(|e| e.value().first_int())
            .context(ElementNotFoundSnafu { tag })?;
        u16::try_from(value).ok().context(ElementNotFoundSnafu { tag })
    }

    fn read_native_pixel_data(&mut self, len: Length, enc: Encoding) -> Result<Value> {
        // the encapsulated branch has already claimed undefined lengths
        let len = len.get().context(UndefinedElementLengthSnafu {
            tag: tags::PIXEL_DATA,
        })? as usize;

        if self.options.skip_pixel_data {
            self.decoder.skip(len as u64).context(DecodeContentSnafu)?;
            return Ok(Value::PixelData(PixelDataInfo {
                intentionally_skipped: true,
                ..Default::default()
            }));
        }
        if self.options.skip_processing_pixel_data_value {
            let data = self
                .decoder
                .read_to_vec(len as u64)
                .context(DecodeContentSnafu)?;
            return Ok(Value::PixelData(PixelDataInfo {
                unprocessed_value_data: Some(data),
                ..Default::default()
            }));
        }

        let rows = self.geometry_u16(tags::ROWS)?;
        let cols = self.geometry_u16(tags::COLUMNS)?;
        let bits = self.geometry_u16(tags::BITS_ALLOCATED)?;
        let samples_per_pixel = self.geometry_u16(tags::SAMPLES_PER_PIXEL).unwrap_or(1);
        let frame_count = self
            .dataset
            .find(tags::NUMBER_OF_FRAMES)
            .and_then(|e| e.value().first_int())
            .unwrap_or(1)
            .max(1) as usize;

        ensure!(
            bits == 8 || bits == 16 || bits == 32,
            UnsupportedBitsAllocatedSnafu { bits }
        );
        let bytes_per_sample = usize::from(bits / 8);
        let samples_per_frame =
            usize::from(rows) * usize::from(cols) * usize::from(samples_per_pixel);
        let expected = samples_per_frame * bytes_per_sample * frame_count;
        // an odd pixel buffer arrives with one trailing pad byte
        ensure!(
            len == expected || len == expected + 1,
            MismatchPixelDataTypeSnafu { expected, got: len }
        );

        self.decoder
            .push_limit(len as u64)
            .context(DecodeContentSnafu)?;
        let result = (|| {
            let mut frames = Vec::with_capacity(frame_count);
            for _ in 0..frame_count {
                let data = match bits {
                    8 => {
                        let mut samples = vec![0u8; samples_per_frame];
                        self.decoder
                            .read_exact(&mut samples)
                            .context(DecodeContentSnafu)?;
                        NativeSamples::U8(samples)
                    }
                    16 => NativeSamples::U16(
                        self.decoder
                            .read_u16s(samples_per_frame, enc)
                            .context(DecodeContentSnafu)?,
                    ),
                    _ => NativeSamples::U32(
                        self.decoder
                            .read_u32s(samples_per_frame, enc)
                            .context(DecodeContentSnafu)?,
                    ),
                };
                let frame = Frame::Native(NativeFrame {
                    rows,
                    cols,
                    samples_per_pixel,
                    data,
                });
                self.send_frame(&frame);
                frames.push(frame);
            }
            if len == expected + 1 {
                // drop the pad byte
                self.decoder.skip(1).context(DecodeContentSnafu)?;
            }
            Ok(frames)
        })();
        self.decoder.pop_limit();

        Ok(Value::PixelData(PixelDataInfo {
            is_encapsulated: false,
            frames: result?,
            ..Default::default()
        }))
    }

    fn read_encapsulated_pixel_data(&mut self, enc: Encoding) -> Result<Value> {
        if self.options.skip_pixel_data {
            loop {
                match self
                    .decoder
                    .decode_item_header(enc)
                    .context(DecodeContentSnafu)?
                {
                    SequenceItemHeader::Item { len } => {
                        let len = len.get().context(UndefinedItemLengthSnafu)?;
                        self.decoder
                            .skip(u64::from(len))
                            .context(DecodeContentSnafu)?;
                    }
                    SequenceItemHeader::SequenceDelimiter => break,
                    SequenceItemHeader::ItemDelimiter => {
                        return UnexpectedDelimiterSnafu {
                            tag: tags::ITEM_DELIMITATION_ITEM,
                            position: self.decoder.position(),
                        }
                        .fail()
                    }
                }
            }
            return Ok(Value::PixelData(PixelDataInfo {
                is_encapsulated: true,
                intentionally_skipped: true,
                ..Default::default()
            }));
        }

        if self.options.skip_processing_pixel_data_value {
            return self.capture_encapsulated_pixel_data(enc);
        }

        let mut info = PixelDataInfo {
            is_encapsulated: true,
            ..Default::default()
        };

        // the basic offset table is the first item, possibly empty
        match self
            .decoder
            .decode_item_header(enc)
            .context(DecodeContentSnafu)?
        {
            SequenceItemHeader::Item { len } => {
                let len = len.get().context(UndefinedItemLengthSnafu)?;
                info.basic_offset_table = self
                    .decoder
                    .read_u32s(len as usize / 4, enc)
                    .context(DecodeContentSnafu)?;
            }
            SequenceItemHeader::SequenceDelimiter => return Ok(Value::PixelData(info)),
            SequenceItemHeader::ItemDelimiter => {
                return UnexpectedDelimiterSnafu {
                    tag: tags::ITEM_DELIMITATION_ITEM,
                    position: self.decoder.position(),
                }
                .fail()
            }
        }

        // each following item is one fragment; this codec presents
        // each fragment as one frame
        loop {
            match self
                .decoder
                .decode_item_header(enc)
                .context(DecodeContentSnafu)?
            {
                SequenceItemHeader::Item { len } => {
                    let len = len.get().context(UndefinedItemLengthSnafu)?;
                    let data = self
                        .decoder
                        .read_to_vec(u64::from(len))
                        .context(DecodeContentSnafu)?;
                    let frame = Frame::Encapsulated(EncapsulatedFrame { data });
                    self.send_frame(&frame);
                    info.frames.push(frame);
                }
                SequenceItemHeader::SequenceDelimiter => break,
                SequenceItemHeader::ItemDelimiter => {
                    return UnexpectedDelimiterSnafu {
                        tag: tags::ITEM_DELIMITATION_ITEM,
                        position: self.decoder.position(),
                    }
                    .fail()
                }
            }
        }
        Ok(Value::PixelData(info))
    }

    /// Preserve an encapsulated pixel data stream byte for byte,
    /// item framing included, re-serializing the headers as read.
    fn capture_encapsulated_pixel_data(&mut self, enc: Encoding) -> Result<Value> {
        let mut raw = Vec::new();
        loop {
            match self
                .decoder
                .decode_item_header(enc)
                .context(DecodeContentSnafu)?
            {
                SequenceItemHeader::Item { len } => {
                    let len = len.get().context(UndefinedItemLengthSnafu)?;
                    put_tag(&mut raw, tags::ITEM, enc.endianness);
                    put_u32(&mut raw, len, enc.endianness);
                    let data = self
                        .decoder
                        .read_to_vec(u64::from(len))
                        .context(DecodeContentSnafu)?;
                    raw.extend_from_slice(&data);
                }
                SequenceItemHeader::SequenceDelimiter => {
                    put_tag(&mut raw, tags::SEQUENCE_DELIMITATION_ITEM, enc.endianness);
                    put_u32(&mut raw, 0, enc.endianness);
                    break;
                }
                SequenceItemHeader::ItemDelimiter => {
                    return UnexpectedDelimiterSnafu {
                        tag: tags::ITEM_DELIMITATION_ITEM,
                        position: self.decoder.position(),
                    }
                    .fail()
                }
            }
        }
        Ok(Value::PixelData(PixelDataInfo {
            is_encapsulated: true,
            unprocessed_value_data: Some(raw),
            ..Default::default()
        }))
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16, endianness: Endianness) {
    match endianness {
        Endianness::Little => out.extend_from_slice(&value.to_le_bytes()),
        Endianness::Big => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn put_u32(out: &mut Vec<u8>, value: u32, endianness: Endianness) {
    match endianness {
        Endianness::Little => out.extend_from_slice(&value.to_le_bytes()),
        Endianness::Big => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn put_tag(out: &mut Vec<u8>, tag: Tag, endianness: Endianness) {
    put_u16(out, tag.group(), endianness);
    put_u16(out, tag.element(), endianness);
}

impl<R> Iterator for Parser<R>
where
    R: Read,
{
    type Item = Result<DataElement>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_element().transpose()
    }
}

/// Parse a data set from the given source, reading at most `length` bytes.
pub fn parse<R: Read>(source: R, length: u64, options: ParseOptions) -> Result<Dataset> {
    let mut parser = Parser::new(source, Some(length), options)?;
    while parser.next_element()?.is_some() {}
    Ok(parser.into_dataset())
}

/// Parse a data set from the given source until the end of the stream.
pub fn parse_until_eof<R: Read>(source: R, options: ParseOptions) -> Result<Dataset> {
    let mut parser = Parser::new(source, None, options)?;
    while parser.next_element()?.is_some() {}
    Ok(parser.into_dataset())
}
