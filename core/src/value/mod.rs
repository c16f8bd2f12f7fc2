//! Declaration and implementation of the element value union.
//!
//! A decoded element value is one of a small set of containers
//! ([`Value`]), chosen by the element's value representation. The numeric
//! containers are deliberately wide: integers of any VR width share one
//! `i64` container and floats share one `f64` container, with the concrete
//! on-wire width recovered from the VR at encoding time.

pub mod pixeldata;

use crate::header::{DataElement, Length};
use smallvec::SmallVec;
use snafu::Snafu;
use std::fmt;

pub use self::pixeldata::PixelDataInfo;

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// The category of an element value, as determined by its
/// value representation.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ValueKind {
    /// A list of decoded text values.
    Strings,
    /// A list of integers, of any supported width.
    Ints,
    /// A list of floating point numbers.
    Floats,
    /// Raw binary data.
    Bytes,
    /// A list of sequence items.
    Items,
    /// Pixel data, native or encapsulated.
    PixelData,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueKind::Strings => "Strings",
            ValueKind::Ints => "Ints",
            ValueKind::Floats => "Floats",
            ValueKind::Bytes => "Bytes",
            ValueKind::Items => "Items",
            ValueKind::PixelData => "PixelData",
        };
        f.write_str(name)
    }
}

/// An error raised when retrieving a value under the wrong variant.
#[derive(Debug, Snafu)]
#[snafu(display("bad value cast: requested {} but value is {}", requested, got))]
pub struct CastValueError {
    /// The value kind requested by the caller.
    pub requested: ValueKind,
    /// The kind actually held by the value.
    pub got: ValueKind,
}

/// One item of a sequence value, owning its child elements.
///
/// The length is the item's on-wire byte length as parsed, which may be
/// undefined for delimited items. It is informational: the writer always
/// recomputes item lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// The item length as found on the wire.
    pub len: Length,
    /// The item's child elements, in stream order.
    pub elements: Vec<DataElement>,
}

impl Item {
    /// Create an item from its child elements, with an undefined length.
    pub fn new(elements: Vec<DataElement>) -> Self {
        Item {
            len: Length::UNDEFINED,
            elements,
        }
    }

    /// Create an item with the given on-wire length.
    pub fn new_with_length(len: Length, elements: Vec<DataElement>) -> Self {
        Item { len, elements }
    }
}

/// A tagged union over every payload a data element can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An ordered list of decoded strings, one per backslash-separated
    /// component on the wire. Used for every textual VR,
    /// with trailing padding removed.
    Strings(C<String>),

    /// A list of integers. Used for US, SS, UL, SL, UV, SV, IS,
    /// and AT (one entry per 16-bit tag half).
    Ints(C<i64>),

    /// A list of floating point numbers. Used for FL, FD, OF, OD and DS.
    Floats(C<f64>),

    /// Raw binary data. Used for OB, OW, OL, OV and UN.
    Bytes(C<u8>),

    /// A sequence of items, each owning child elements. Used for SQ
    /// and for unknown-VR elements with undefined length.
    Items(C<Item>),

    /// A pixel data payload, native or encapsulated.
    PixelData(PixelDataInfo),
}

impl Value {
    /// Create a string-list value.
    pub fn strings<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Value::Strings(values.into_iter().map(Into::into).collect())
    }

    /// Create an integer-list value.
    pub fn ints<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        Value::Ints(values.into_iter().collect())
    }

    /// Create a float-list value.
    pub fn floats<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Value::Floats(values.into_iter().collect())
    }

    /// Create a raw binary value.
    pub fn bytes<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        Value::Bytes(values.into_iter().collect())
    }

    /// Create a sequence value from its items.
    pub fn items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        Value::Items(items.into_iter().collect())
    }

    /// The category of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Strings(_) => ValueKind::Strings,
            Value::Ints(_) => ValueKind::Ints,
            Value::Floats(_) => ValueKind::Floats,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Items(_) => ValueKind::Items,
            Value::PixelData(_) => ValueKind::PixelData,
        }
    }

    /// Obtain the number of individual values in this container.
    pub fn multiplicity(&self) -> usize {
        match self {
            Value::Strings(c) => c.len(),
            Value::Ints(c) => c.len(),
            Value::Floats(c) => c.len(),
            Value::Bytes(c) => c.len(),
            Value::Items(c) => c.len(),
            Value::PixelData(info) => info.frames.len(),
        }
    }

    /// Get the string values, if this is a string-list value.
    pub fn strings_ref(&self) -> Result<&[String], CastValueError> {
        match self {
            Value::Strings(c) => Ok(c),
            other => Err(CastValueError {
                requested: ValueKind::Strings,
                got: other.kind(),
            }),
        }
    }

    /// Get the integer values, if this is an integer-list value.
    pub fn ints_ref(&self) -> Result<&[i64], CastValueError> {
        match self {
            Value::Ints(c) => Ok(c),
            other => Err(CastValueError {
                requested: ValueKind::Ints,
                got: other.kind(),
            }),
        }
    }

    /// Get the float values, if this is a float-list value.
    pub fn floats_ref(&self) -> Result<&[f64], CastValueError> {
        match self {
            Value::Floats(c) => Ok(c),
            other => Err(CastValueError {
                requested: ValueKind::Floats,
                got: other.kind(),
            }),
        }
    }

    /// Get the raw bytes, if this is a binary value.
    pub fn bytes_ref(&self) -> Result<&[u8], CastValueError> {
        match self {
            Value::Bytes(c) => Ok(c),
            other => Err(CastValueError {
                requested: ValueKind::Bytes,
                got: other.kind(),
            }),
        }
    }

    /// Get the sequence items, if this is a sequence value.
    pub fn items_ref(&self) -> Result<&[Item], CastValueError> {
        match self {
            Value::Items(c) => Ok(c),
            other => Err(CastValueError {
                requested: ValueKind::Items,
                got: other.kind(),
            }),
        }
    }

    /// Get the pixel data payload, if this is a pixel data value.
    pub fn pixel_data_ref(&self) -> Result<&PixelDataInfo, CastValueError> {
        match self {
            Value::PixelData(info) => Ok(info),
            other => Err(CastValueError {
                requested: ValueKind::PixelData,
                got: other.kind(),
            }),
        }
    }

    /// Get the first value as an integer, if this is an integer-list value.
    pub fn first_int(&self) -> Option<i64> {
        match self {
            Value::Ints(c) => c.first().copied(),
            _ => None,
        }
    }

    /// Get the first value as a string slice, if this is a string-list value.
    pub fn first_str(&self) -> Option<&str> {
        match self {
            Value::Strings(c) => c.first().map(String::as_str),
            _ => None,
        }
    }
}

impl From<PixelDataInfo> for Value {
    fn from(info: PixelDataInfo) -> Self {
        Value::PixelData(info)
    }
}
