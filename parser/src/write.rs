//! Writing of data sets as DICOM Part 10 streams.
//!
//! [`Writer`] mirrors the parser: it emits the preamble and magic code,
//! serializes the file meta group in Explicit VR Little Endian with a
//! recomputed group length, switches to the transfer syntax named in the
//! data set (or injected through the options), and then writes the body
//! elements in order. Value lengths are always recomputed; undefined
//! lengths are honored for sequences and mandatory for encapsulated
//! pixel data.

use crate::stateful::encode::{self, StatefulEncoder};
use dcmio_encoding::transfer_syntax::{self, uids, Encoding};
use dcmio_encoding::Endianness;
use dcmio_core::dictionary::{tags, DataDictionary, StandardDataDictionary};
use dcmio_core::value::pixeldata::{Frame, NativeSamples, PixelDataInfo};
use dcmio_core::{DataElement, DataElementHeader, Dataset, Item, Length, Tag, Value, ValueKind, VR};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::Write;
use std::str::FromStr;

/// An error which occurred while writing a data set.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// A required element was not found in the data set.
    #[snafu(display("Element {} not found", tag))]
    ElementNotFound { tag: Tag, backtrace: Backtrace },

    /// The transfer syntax is not known to this library.
    #[snafu(display("Unsupported transfer syntax {:?}", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },

    /// The deflated transfer syntax is recognized but not supported.
    #[snafu(display("The deflated transfer syntax is not supported"))]
    DeflatedTransferSyntaxUnsupported { backtrace: Backtrace },

    /// An element was written before a transfer syntax was selected.
    #[snafu(display("No transfer syntax has been set on this writer"))]
    TransferSyntaxNotSet { backtrace: Backtrace },

    /// The caller-supplied VR contradicts the canonical one.
    #[snafu(display(
        "VR mismatch on element {}: expected {}, got {:?}",
        tag,
        expected,
        got
    ))]
    VrVerification {
        tag: Tag,
        expected: VR,
        got: String,
        backtrace: Backtrace,
    },

    /// The element's value category does not match its VR.
    #[snafu(display(
        "Value of kind {} does not match VR {:?} on element {}",
        kind,
        vr,
        tag
    ))]
    MismatchValueTypeAndVr {
        tag: Tag,
        vr: String,
        kind: ValueKind,
        backtrace: Backtrace,
    },

    /// The pixel data payload is inconsistent with its element.
    #[snafu(display("Malformed pixel data payload: {}", detail))]
    MismatchPixelDataType {
        detail: String,
        backtrace: Backtrace,
    },

    /// Lower-level encoding failure.
    #[snafu(display("Could not encode data set content"))]
    EncodeContent {
        #[snafu(backtrace)]
        source: encode::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The set of options for the writer.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Do not check caller-supplied VRs against the dictionary.
    pub skip_vr_verification: bool,
    /// Insert Implicit VR Little Endian when the data set has no
    /// Transfer Syntax UID element.
    pub default_missing_transfer_syntax: bool,
    /// Insert the given transfer syntax when the data set has no
    /// Transfer Syntax UID element.
    pub override_missing_transfer_syntax: Option<String>,
}

impl WriteOptions {
    /// Do not check caller-supplied VRs against the dictionary.
    pub fn skip_vr_verification(mut self) -> Self {
        self.skip_vr_verification = true;
        self
    }

    /// Insert Implicit VR Little Endian when the transfer syntax is missing.
    pub fn default_missing_transfer_syntax(mut self) -> Self {
        self.default_missing_transfer_syntax = true;
        self
    }

    /// Insert the given transfer syntax when it is missing.
    pub fn override_missing_transfer_syntax(mut self, uid: impl Into<String>) -> Self {
        self.override_missing_transfer_syntax = Some(uid.into());
        self
    }
}

/// Determine the VR to put on the wire for the given tag.
///
/// When verification is skipped, the caller-supplied VR is used as-is
/// (unrecognized codes downgrade to UN). Otherwise, the canonical VR from
/// the dictionary wins: an empty supplied VR resolves to the canonical
/// one, private and unregistered tags keep the supplied VR (UN when also
/// absent), and a contradiction is an error — except inside the byte
/// class (OB, OW, UN), where the supplied VR of a long-form element is
/// authoritative, admitting the common "OB" pixel data.
pub fn verify_vr_or_default(tag: Tag, vr: &str, options: &WriteOptions) -> Result<VR> {
    if options.skip_vr_verification {
        return Ok(VR::from_str(vr).unwrap_or(VR::UN));
    }
    let entry = StandardDataDictionary.by_tag(tag);
    match entry {
        None => {
            if vr.is_empty() {
                Ok(VR::UN)
            } else {
                Ok(VR::from_str(vr).unwrap_or(VR::UN))
            }
        }
        Some(entry) => {
            if vr.is_empty() {
                return Ok(entry.vr);
            }
            match VR::from_str(vr) {
                Ok(supplied) if supplied == entry.vr => Ok(supplied),
                Ok(supplied) if is_byte_class(supplied) && is_byte_class(entry.vr) => Ok(supplied),
                _ => VrVerificationSnafu {
                    tag,
                    expected: entry.vr,
                    got: vr.to_string(),
                }
                .fail(),
            }
        }
    }
}

fn is_byte_class(vr: VR) -> bool {
    matches!(vr, VR::OB | VR::OW | VR::UN)
}

/// Assert that the runtime category of `value` matches the given VR.
pub fn verify_value_type(tag: Tag, value: &Value, vr: &str) -> Result<()> {
    let vr = match VR::from_str(vr) {
        Ok(vr) => vr,
        Err(_) => {
            return MismatchValueTypeAndVrSnafu {
                tag,
                vr: vr.to_string(),
                kind: value.kind(),
            }
            .fail()
        }
    };
    check_value_kind(tag, value, vr)
}

fn check_value_kind(tag: Tag, value: &Value, vr: VR) -> Result<()> {
    let ok = match value.kind() {
        ValueKind::PixelData => tag == tags::PIXEL_DATA && is_byte_class(vr),
        ValueKind::Items => vr == VR::SQ || vr == VR::UN,
        kind => kind == vr.kind(),
    };
    ensure!(
        ok,
        MismatchValueTypeAndVrSnafu {
            tag,
            vr: vr.to_str().to_string(),
            kind: value.kind(),
        }
    );
    Ok(())
}

/// A writer of one DICOM Part 10 stream.
#[derive(Debug)]
pub struct Writer<W> {
    encoder: StatefulEncoder<W>,
    encoding_set: bool,
    options: WriteOptions,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Create a writer over the given target with default options.
    pub fn new(to: W) -> Self {
        Writer::with_options(to, WriteOptions::default())
    }

    /// Create a writer over the given target.
    pub fn with_options(to: W, options: WriteOptions) -> Self {
        Writer {
            encoder: StatefulEncoder::new(to, Encoding::IMPLICIT_LE),
            encoding_set: false,
            options,
        }
    }

    /// Select the data set encoding for subsequent elements.
    /// Required before [`write_element`](Self::write_element) when the
    /// writer is used without [`write_dataset`](Self::write_dataset).
    pub fn set_transfer_syntax(&mut self, endianness: Endianness, implicit_vr: bool) {
        self.encoder.set_encoding(Encoding::new(endianness, implicit_vr));
        self.encoding_set = true;
    }

    /// Unwrap this writer, returning the write target.
    pub fn into_inner(self) -> W {
        self.encoder.into_inner()
    }

    /// Write a single element under the current transfer syntax.
    pub fn write_element(&mut self, element: &DataElement) -> Result<()> {
        ensure!(self.encoding_set, TransferSyntaxNotSetSnafu);
        write_element_to(&mut self.encoder, element, &self.options)
    }

    /// Write a whole data set as a Part 10 stream: preamble, magic code,
    /// file meta group with a recomputed group length, then the body in
    /// the transfer syntax named by the data set (or injected through the
    /// options).
    pub fn write_dataset(&mut self, dataset: &Dataset) -> Result<()> {
        let mut meta: Vec<DataElement> = Vec::new();
        let mut body: Vec<&DataElement> = Vec::new();
        for element in dataset {
            if element.tag().group() == 0x0002 {
                meta.push(element.clone());
            } else {
                body.push(element);
            }
        }

        let uid = match dataset
            .find(tags::TRANSFER_SYNTAX_UID)
            .and_then(|e| e.value().first_str())
        {
            Some(uid) => uid.to_owned(),
            None => {
                let uid = if let Some(uid) = &self.options.override_missing_transfer_syntax {
                    uid.clone()
                } else if self.options.default_missing_transfer_syntax {
                    uids::IMPLICIT_VR_LITTLE_ENDIAN.to_owned()
                } else {
                    return ElementNotFoundSnafu {
                        tag: tags::TRANSFER_SYNTAX_UID,
                    }
                    .fail();
                };
                meta.push(DataElement::new_inferred(
                    tags::TRANSFER_SYNTAX_UID,
                    Value::strings([uid.clone()]),
                ));
                uid
            }
        };
        let ts = transfer_syntax::lookup(&uid)
            .context(UnsupportedTransferSyntaxSnafu { uid: uid.clone() })?;
        ensure!(!ts.deflated, DeflatedTransferSyntaxUnsupportedSnafu);

        self.encoder.set_encoding(Encoding::EXPLICIT_LE);
        self.encoder.write_preamble().context(EncodeContentSnafu)?;

        // the group length element must know the meta group's byte size,
        // so the group is captured into a buffer first
        let mut meta_buf = StatefulEncoder::new(Vec::new(), Encoding::EXPLICIT_LE);
        for element in meta
            .iter()
            .filter(|e| e.tag() != tags::FILE_META_INFORMATION_GROUP_LENGTH)
        {
            write_element_to(&mut meta_buf, element, &self.options)?;
        }
        let meta_bytes = meta_buf.into_inner();
        let group_length = DataElement::new(
            tags::FILE_META_INFORMATION_GROUP_LENGTH,
            VR::UL,
            Value::ints([meta_bytes.len() as i64]),
        );
        write_element_to(&mut self.encoder, &group_length, &self.options)?;
        self.encoder
            .write_all_raw(&meta_bytes)
            .context(EncodeContentSnafu)?;

        self.encoder.set_encoding(ts.encoding());
        self.encoding_set = true;
        for element in body {
            write_element_to(&mut self.encoder, element, &self.options)?;
        }
        Ok(())
    }
}

/// Write a whole data set to the given target as a Part 10 stream.
pub fn write<W: Write>(to: W, dataset: &Dataset, options: WriteOptions) -> Result<()> {
    Writer::with_options(to, options).write_dataset(dataset)
}

/// Serialize one element to the given encoder.
fn write_element_to<W: Write>(
    to: &mut StatefulEncoder<W>,
    element: &DataElement,
    options: &WriteOptions,
) -> Result<()> {
    let raw_vr = element.raw_vr();
    let supplied = std::str::from_utf8(&raw_vr).unwrap_or("");
    let vr = verify_vr_or_default(element.tag(), supplied, options)?;
    if !options.skip_vr_verification {
        check_value_kind(element.tag(), element.value(), vr)?;
    }

    match element.value() {
        Value::Items(items) => write_sequence_to(to, element, vr, items, options),
        Value::PixelData(info) => write_pixel_data_to(to, element, vr, info),
        primitive => {
            // capture the value to learn its even-padded length,
            // which must precede it on the wire
            let mut buf = StatefulEncoder::new(Vec::new(), to.encoding());
            buf.write_value(vr, primitive).context(EncodeContentSnafu)?;
            let bytes = buf.into_inner();
            to.write_element_header(DataElementHeader::new(
                element.tag(),
                vr,
                Length(bytes.len() as u32),
            ))
            .context(EncodeContentSnafu)?;
            to.write_all_raw(&bytes).context(EncodeContentSnafu)
        }
    }
}

/// Serialize a sequence element. The element's value length selects the
/// framing: undefined lengths are preserved as delimited sequences,
/// defined lengths are recomputed from the buffered content. Items are
/// always written with a defined length. UN sequences carry their
/// content in Implicit VR Little Endian.
fn write_sequence_to<W: Write>(
    to: &mut StatefulEncoder<W>,
    element: &DataElement,
    vr: VR,
    items: &[Item],
    options: &WriteOptions,
) -> Result<()> {
    let child_encoding = if vr == VR::UN {
        Encoding::IMPLICIT_LE
    } else {
        to.encoding()
    };

    let mut content = StatefulEncoder::new(Vec::new(), child_encoding);
    for item in items {
        let mut item_buf = StatefulEncoder::new(Vec::new(), child_encoding);
        for child in &item.elements {
            write_element_to(&mut item_buf, child, options)?;
        }
        let item_bytes = item_buf.into_inner();
        content
            .write_item_header(item_bytes.len() as u32)
            .context(EncodeContentSnafu)?;
        content
            .write_all_raw(&item_bytes)
            .context(EncodeContentSnafu)?;
    }

    if element.length().is_undefined() {
        content
            .write_sequence_delimiter()
            .context(EncodeContentSnafu)?;
        let bytes = content.into_inner();
        to.write_element_header(DataElementHeader::new(element.tag(), vr, Length::UNDEFINED))
            .context(EncodeContentSnafu)?;
        to.write_all_raw(&bytes).context(EncodeContentSnafu)
    } else {
        let bytes = content.into_inner();
        to.write_element_header(DataElementHeader::new(
            element.tag(),
            vr,
            Length(bytes.len() as u32),
        ))
        .context(EncodeContentSnafu)?;
        to.write_all_raw(&bytes).context(EncodeContentSnafu)
    }
}

/// Serialize a pixel data element: native frames as one flat buffer with
/// a defined length, encapsulated frames as a delimited fragment sequence
/// introduced by the basic offset table. Skipped and unprocessed payloads
/// are passed through so that skip-parsed data sets survive a rewrite.
fn write_pixel_data_to<W: Write>(
    to: &mut StatefulEncoder<W>,
    element: &DataElement,
    vr: VR,
    info: &PixelDataInfo,
) -> Result<()> {
    let tag = element.tag();

    if let Some(data) = &info.unprocessed_value_data {
        let len = if element.length().is_undefined() {
            Length::UNDEFINED
        } else {
            Length(data.len() as u32)
        };
        to.write_element_header(DataElementHeader::new(tag, vr, len))
            .context(EncodeContentSnafu)?;
        return to.write_all_raw(data).context(EncodeContentSnafu);
    }

    if info.is_encapsulated {
        // encapsulated pixel data is always delimited
        to.write_element_header(DataElementHeader::new_with_raw_vr(
            tag,
            vr,
            element.raw_vr(),
            Length::UNDEFINED,
        ))
        .context(EncodeContentSnafu)?;
        if info.intentionally_skipped {
            return to.write_sequence_delimiter().context(EncodeContentSnafu);
        }

        to.write_item_header(4 * info.basic_offset_table.len() as u32)
            .context(EncodeContentSnafu)?;
        for offset in &info.basic_offset_table {
            to.write_ul(*offset).context(EncodeContentSnafu)?;
        }

        for frame in &info.frames {
            let data = match frame {
                Frame::Encapsulated(f) => &f.data,
                Frame::Native(_) => {
                    return MismatchPixelDataTypeSnafu {
                        detail: "native frame in encapsulated pixel data".to_string(),
                    }
                    .fail()
                }
            };
            let padded = data.len() + data.len() % 2;
            to.write_item_header(padded as u32)
                .context(EncodeContentSnafu)?;
            to.write_all_raw(data).context(EncodeContentSnafu)?;
            if data.len() % 2 == 1 {
                to.write_all_raw(&[0u8]).context(EncodeContentSnafu)?;
            }
        }
        return to.write_sequence_delimiter().context(EncodeContentSnafu);
    }

    if info.intentionally_skipped {
        // the value was discarded at parse time; keep the element
        to.write_element_header(DataElementHeader::new(tag, vr, Length(0)))
            .context(EncodeContentSnafu)?;
        return Ok(());
    }

    let mut buf = StatefulEncoder::new(Vec::new(), to.encoding());
    for frame in &info.frames {
        let nf = match frame {
            Frame::Native(nf) => nf,
            Frame::Encapsulated(_) => {
                return MismatchPixelDataTypeSnafu {
                    detail: "encapsulated frame in native pixel data".to_string(),
                }
                .fail()
            }
        };
        let samples_per_frame =
            usize::from(nf.rows) * usize::from(nf.cols) * usize::from(nf.samples_per_pixel);
        ensure!(
            nf.data.len() == samples_per_frame,
            MismatchPixelDataTypeSnafu {
                detail: format!(
                    "frame has {} samples, geometry calls for {}",
                    nf.data.len(),
                    samples_per_frame
                ),
            }
        );
        match &nf.data {
            NativeSamples::U8(samples) => {
                buf.write_all_raw(samples).context(EncodeContentSnafu)?;
            }
            NativeSamples::U16(samples) => {
                for s in samples {
                    buf.write_us(*s).context(EncodeContentSnafu)?;
                }
            }
            NativeSamples::U32(samples) => {
                for s in samples {
                    buf.write_ul(*s).context(EncodeContentSnafu)?;
                }
            }
        }
    }
    let mut bytes = buf.into_inner();
    if bytes.len() % 2 == 1 {
        bytes.push(0);
    }
    to.write_element_header(DataElementHeader::new(tag, vr, Length(bytes.len() as u32)))
        .context(EncodeContentSnafu)?;
    to.write_all_raw(&bytes).context(EncodeContentSnafu)
}
