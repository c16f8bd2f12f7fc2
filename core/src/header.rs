//! Attribute tags, value lengths, value representations and element headers.
//!
//! These are the building blocks which the rest of the library assembles
//! into data sets: a [`Tag`] identifies an attribute, a [`VR`] describes how
//! its value is encoded, a [`Length`] may be a concrete byte count or the
//! undefined sentinel, and a [`DataElement`] owns one decoded value.

use crate::dictionary::{DataDictionary, StandardDataDictionary};
use crate::value::{Value, ValueKind};
use snafu::{Backtrace, Snafu};
use std::cmp::Ordering;
use std::fmt;
use std::str::{from_utf8, FromStr};

/// Error type for issues constructing a sequence item header.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SequenceItemHeaderError {
    /// Unexpected header tag.
    /// Only Item (0xFFFE, 0xE000),
    /// Item Delimiter (0xFFFE, 0xE00D),
    /// or Sequence Delimiter (0xFFFE, 0xE0DD)
    /// are admitted.
    #[snafu(display("Unexpected tag {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },
    /// Unexpected delimiter value length.
    /// Must be zero for item delimiters.
    #[snafu(display("Unexpected delimiter length {}", len))]
    UnexpectedDelimiterLength { len: Length, backtrace: Backtrace },
}

type Result<T, E = SequenceItemHeaderError> = std::result::Result<T, E>;

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for DICOM data element tags.
///
/// Tags are a `(group, element)` pair of 16-bit numbers,
/// ordered lexicographically. Both `(u16, u16)` and `[u16; 2]` can be
/// efficiently converted to this type.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// Whether this tag belongs to an odd, privately defined group.
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 % 2 == 1
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl PartialEq<[u16; 2]> for Tag {
    fn eq(&self, other: &[u16; 2]) -> bool {
        self.0 == other[0] && self.1 == other[1]
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

/// A type for representing data set content length, in bytes.
/// An internal value of `0xFFFF_FFFF` represents an undefined
/// (unspecified) length, which would have to be determined
/// with a traversal based on the content's encoding.
///
/// Numeric comparisons treat the undefined sentinel as incomparable:
/// two undefined lengths are not equal, and ordering against an
/// undefined length is always `false`.
#[derive(Clone, Copy)]
pub struct Length(pub u32);

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Create a new length value from its internal representation.
    /// This is equivalent to `Length(len)`.
    #[inline]
    pub fn new(len: u32) -> Self {
        Length(len)
    }

    /// Create a new length value with the given number of bytes.
    ///
    /// # Panic
    ///
    /// This function will panic if `len` represents an undefined length.
    #[inline]
    pub fn defined(len: u32) -> Self {
        assert_ne!(len, UNDEFINED_LEN);
        Length(len)
    }

    /// Check whether this length is undefined (unknown).
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined (not undefined).
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if available.
    /// Returns `None` if it represents an undefined length.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }

    /// Check whether the length is equally specified as another length.
    /// Unlike the implemented `PartialEq`, two undefined lengths are
    /// considered equivalent by this method.
    #[inline]
    pub fn inner_eq(self, other: Length) -> bool {
        self.0 == other.0
    }
}

impl From<u32> for Length {
    #[inline]
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl PartialOrd<Length> for Length {
    fn partial_cmp(&self, rhs: &Length) -> Option<Ordering> {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => None,
            (l1, l2) => Some(l1.cmp(&l2)),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", &l),
        }
    }
}

/// An enum type for a DICOM value representation.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Very Long
    OV,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Signed Very Long
    SV,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier or Universal Resource Locator (URI/URL)
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
    /// Unsigned Very Long
    UV,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    pub fn to_str(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OV => "OV",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            SV => "SV",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
            UV => "UV",
        }
    }

    /// Retrieve a copy of this VR's byte representation.
    /// The function returns two alphabetic characters in upper case.
    pub fn to_bytes(self) -> [u8; 2] {
        let bytes = self.to_str().as_bytes();
        [bytes[0], bytes[1]]
    }

    /// Whether this VR uses the long explicit form on the wire:
    /// two reserved bytes followed by a 32-bit value length.
    /// Short-form VRs carry a 16-bit length directly after the VR code.
    pub fn is_long_form(self) -> bool {
        use VR::*;
        matches!(
            self,
            OB | OD | OF | OL | OV | OW | SQ | SV | UC | UN | UR | UT | UV
        )
    }

    /// The value category this representation decodes into.
    pub fn kind(self) -> ValueKind {
        use VR::*;
        match self {
            AE | AS | CS | DA | DT | LO | LT | PN | SH | ST | TM | UC | UI | UR | UT => {
                ValueKind::Strings
            }
            AT | IS | SL | SS | SV | UL | US | UV => ValueKind::Ints,
            DS | FD | FL | OD | OF => ValueKind::Floats,
            OB | OL | OV | OW | UN => ValueKind::Bytes,
            SQ => ValueKind::Items,
        }
    }

    /// The byte used to pad this VR's value to an even length:
    /// a space for text values, a NUL for UIDs and binary data.
    pub fn padding(self) -> u8 {
        use VR::*;
        match self {
            AE | AS | CS | DA | DS | DT | IS | LO | LT | PN | SH | ST | TM | UC | UR | UT => b' ',
            _ => b'\x00',
        }
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two UTF-8 encoded alphabetic characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OV" => Ok(OV),
            "OW" => Ok(OW),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "SV" => Ok(SV),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            "UV" => Ok(UV),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_str(*self))
    }
}

/// A data structure for a data element header, containing
/// a tag, value representation and specified length.
///
/// `raw_vr` holds the two VR bytes as they appear (or would appear) on the
/// wire, which may differ from the canonical `vr`: pixel data is often
/// written with "OB" although the dictionary says OW, and unrecognized
/// codes are downgraded to [`VR::UN`] while the original bytes are kept.
/// In implicit encoding `raw_vr` simply mirrors the resolved VR.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DataElementHeader {
    /// DICOM tag
    pub tag: Tag,
    /// Canonical value representation
    pub vr: VR,
    /// The VR bytes as present on the wire
    pub raw_vr: [u8; 2],
    /// Element value length
    pub len: Length,
}

impl DataElementHeader {
    /// Create a new data element header with the given properties.
    /// The raw VR is taken from the canonical one.
    #[inline]
    pub fn new<T: Into<Tag>>(tag: T, vr: VR, len: Length) -> DataElementHeader {
        DataElementHeader {
            tag: tag.into(),
            vr,
            raw_vr: vr.to_bytes(),
            len,
        }
    }

    /// Create a new data element header carrying a raw VR
    /// distinct from the canonical one.
    #[inline]
    pub fn new_with_raw_vr<T: Into<Tag>>(
        tag: T,
        vr: VR,
        raw_vr: [u8; 2],
        len: Length,
    ) -> DataElementHeader {
        DataElementHeader {
            tag: tag.into(),
            vr,
            raw_vr,
            len,
        }
    }

    /// Retrieve the element's tag.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Retrieve the element's value representation, which can be unknown.
    #[inline]
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// Retrieve the element's value length.
    #[inline]
    pub fn length(&self) -> Length {
        self.len
    }

    /// Check whether this is the header of an encapsulated pixel data element.
    #[inline]
    pub fn is_encapsulated_pixeldata(&self) -> bool {
        self.tag == crate::dictionary::tags::PIXEL_DATA && self.len.is_undefined()
    }
}

/// Data type for describing a sequence item data element.
/// If the element represents an item, it will also contain
/// the specified length.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SequenceItemHeader {
    /// The cursor contains an item.
    Item {
        /// the length of the item in bytes (can be 0xFFFFFFFF if undefined)
        len: Length,
    },
    /// The cursor read an item delimiter.
    /// The element ends here and should not be read any further.
    ItemDelimiter,
    /// The cursor read a sequence delimiter.
    /// The element ends here and should not be read any further.
    SequenceDelimiter,
}

impl SequenceItemHeader {
    /// Create a sequence item header using the element's raw properties.
    /// An error can be raised if the given properties do not relate to a
    /// sequence item, a sequence item delimiter or a sequence delimiter.
    pub fn new<T: Into<Tag>>(tag: T, len: Length) -> Result<SequenceItemHeader> {
        match tag.into() {
            Tag(0xFFFE, 0xE000) => Ok(SequenceItemHeader::Item { len }),
            Tag(0xFFFE, 0xE00D) => {
                // delimiters should not have a positive length
                if len.get() != Some(0) {
                    UnexpectedDelimiterLengthSnafu { len }.fail()
                } else {
                    Ok(SequenceItemHeader::ItemDelimiter)
                }
            }
            Tag(0xFFFE, 0xE0DD) => Ok(SequenceItemHeader::SequenceDelimiter),
            tag => UnexpectedTagSnafu { tag }.fail(),
        }
    }

    /// Retrieve the header's tag.
    pub fn tag(&self) -> Tag {
        match *self {
            SequenceItemHeader::Item { .. } => Tag(0xFFFE, 0xE000),
            SequenceItemHeader::ItemDelimiter => Tag(0xFFFE, 0xE00D),
            SequenceItemHeader::SequenceDelimiter => Tag(0xFFFE, 0xE0DD),
        }
    }

    /// Retrieve the item length, zero for delimiters.
    pub fn length(&self) -> Length {
        match *self {
            SequenceItemHeader::Item { len } => len,
            SequenceItemHeader::ItemDelimiter | SequenceItemHeader::SequenceDelimiter => Length(0),
        }
    }
}

/// A data type that represents and owns a DICOM data element:
/// a header together with its decoded value.
#[derive(Debug, PartialEq, Clone)]
pub struct DataElement {
    header: DataElementHeader,
    value: Value,
}

impl DataElement {
    /// Create a data element from the given parts.
    ///
    /// Sequence and encapsulated pixel data values default to an undefined
    /// length; other values leave the length at zero, to be recomputed by
    /// the writer. This method will not check whether the value
    /// representation is compatible with the given value.
    pub fn new<T>(tag: T, vr: VR, value: Value) -> Self
    where
        T: Into<Tag>,
    {
        let len = match &value {
            Value::Items(_) => Length::UNDEFINED,
            Value::PixelData(info) if info.is_encapsulated => Length::UNDEFINED,
            _ => Length(0),
        };
        DataElement {
            header: DataElementHeader::new(tag, vr, len),
            value,
        }
    }

    /// Create a data element whose raw VR differs from the canonical one.
    pub fn new_with_raw_vr<T>(tag: T, vr: VR, raw_vr: [u8; 2], value: Value) -> Self
    where
        T: Into<Tag>,
    {
        let mut e = DataElement::new(tag, vr, value);
        e.header.raw_vr = raw_vr;
        e
    }

    /// Create a data element with the canonical VR for its tag,
    /// as given by the standard dictionary.
    /// Unknown and private tags fall back to [`VR::UN`].
    pub fn new_inferred<T>(tag: T, value: Value) -> Self
    where
        T: Into<Tag>,
    {
        let tag = tag.into();
        let vr = StandardDataDictionary
            .by_tag(tag)
            .map(|entry| entry.vr)
            .unwrap_or(VR::UN);
        DataElement::new(tag, vr, value)
    }

    /// Create a data element from preexisting header and value parts.
    pub fn from_parts(header: DataElementHeader, value: Value) -> Self {
        DataElement { header, value }
    }

    /// Replace the element's value length, returning the updated element.
    /// Used to request undefined-length framing on write.
    pub fn with_length(mut self, len: Length) -> Self {
        self.header.len = len;
        self
    }

    /// Retrieve the element header.
    pub fn header(&self) -> &DataElementHeader {
        &self.header
    }

    /// Retrieve the element's tag.
    pub fn tag(&self) -> Tag {
        self.header.tag
    }

    /// Retrieve the canonical value representation.
    pub fn vr(&self) -> VR {
        self.header.vr
    }

    /// Retrieve the on-wire VR bytes.
    pub fn raw_vr(&self) -> [u8; 2] {
        self.header.raw_vr
    }

    /// Retrieve the element's value length.
    pub fn length(&self) -> Length {
        self.header.len
    }

    /// Retrieve the data value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Move the data value out of the element, discarding the header.
    pub fn into_value(self) -> Value {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::tags;

    #[test]
    fn tag_ordering_and_accessors() {
        let t = Tag::from((0x0010u16, 0x0020u16));
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
        assert!(Tag(0x0008, 0x0010) < Tag(0x0010, 0x0008));
        assert!(Tag(0x0010, 0x0008) < Tag(0x0010, 0x0010));
        assert!(Tag(0x0009, 0x0001).is_private());
        assert!(!Tag(0x0010, 0x0010).is_private());
        assert_eq!(format!("{}", Tag(0x7FE0, 0x0010)), "(7FE0,0010)");
    }

    #[test]
    fn length_undefined_semantics() {
        assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
        assert!(Length::UNDEFINED.is_undefined());
        assert!(Length(8).is_defined());
        assert_eq!(Length(8).get(), Some(8));
        assert_eq!(Length::UNDEFINED.get(), None);
        assert!(Length::UNDEFINED.inner_eq(Length::UNDEFINED));
        assert!(!(Length::UNDEFINED < Length(4)));
        assert!(!(Length::UNDEFINED > Length(4)));
    }

    #[test]
    fn vr_classification() {
        assert!(VR::OB.is_long_form());
        assert!(VR::SQ.is_long_form());
        assert!(VR::UN.is_long_form());
        assert!(!VR::US.is_long_form());
        assert!(!VR::UI.is_long_form());

        assert_eq!(VR::PN.kind(), ValueKind::Strings);
        assert_eq!(VR::IS.kind(), ValueKind::Ints);
        assert_eq!(VR::AT.kind(), ValueKind::Ints);
        assert_eq!(VR::DS.kind(), ValueKind::Floats);
        assert_eq!(VR::OD.kind(), ValueKind::Floats);
        assert_eq!(VR::OW.kind(), ValueKind::Bytes);
        assert_eq!(VR::SQ.kind(), ValueKind::Items);

        assert_eq!(VR::PN.padding(), b' ');
        assert_eq!(VR::IS.padding(), b' ');
        assert_eq!(VR::UI.padding(), 0x00);
        assert_eq!(VR::OB.padding(), 0x00);
    }

    #[test]
    fn vr_binary_roundtrip() {
        assert_eq!(VR::from_binary(*b"PN"), Some(VR::PN));
        assert_eq!(VR::from_binary(*b"zz"), None);
        assert_eq!(VR::OW.to_bytes(), *b"OW");
        assert_eq!("SQ".parse::<VR>(), Ok(VR::SQ));
    }

    #[test]
    fn sequence_item_headers() {
        let item = SequenceItemHeader::new(Tag(0xFFFE, 0xE000), Length(24)).unwrap();
        assert_eq!(item, SequenceItemHeader::Item { len: Length(24) });
        assert_eq!(item.tag(), Tag(0xFFFE, 0xE000));

        let delim = SequenceItemHeader::new(Tag(0xFFFE, 0xE00D), Length(0)).unwrap();
        assert_eq!(delim, SequenceItemHeader::ItemDelimiter);

        assert!(SequenceItemHeader::new(Tag(0xFFFE, 0xE00D), Length(2)).is_err());
        assert!(SequenceItemHeader::new(Tag(0x0010, 0x0010), Length(0)).is_err());
    }

    #[test]
    fn element_vr_inference() {
        let e = DataElement::new_inferred(tags::PATIENT_NAME, Value::strings(["Doe^John"]));
        assert_eq!(e.vr(), VR::PN);
        assert_eq!(e.raw_vr(), *b"PN");

        let private = DataElement::new_inferred(Tag(0x0019, 0x1027), Value::bytes([1, 2, 3, 4]));
        assert_eq!(private.vr(), VR::UN);
    }

    #[test]
    fn element_default_lengths() {
        let seq = DataElement::new(tags::ANATOMIC_REGION_SEQUENCE, VR::SQ, Value::Items(Default::default()));
        assert!(seq.length().is_undefined());

        let prim = DataElement::new(tags::ROWS, VR::US, Value::ints([128]));
        assert_eq!(prim.length().get(), Some(0));
    }
}
