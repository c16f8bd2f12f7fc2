#![deny(trivial_numeric_casts, unsafe_code)]
#![warn(missing_debug_implementations, unused_qualifications)]
//! Core data structures for handling DICOM data sets in memory.
//!
//! This crate hosts the element-level data model of the library:
//! attribute tags, value representations, element headers, the tagged
//! value union, and the standard attribute dictionary. It performs no I/O;
//! the `dcmio-encoding` and `dcmio-parser` crates build the actual codec
//! on top of these types.

pub mod dataset;
pub mod dictionary;
pub mod header;
pub mod value;

pub use dataset::Dataset;
pub use dictionary::{DataDictionary, DictionaryEntry, StandardDataDictionary};
pub use header::{DataElement, DataElementHeader, Length, SequenceItemHeader, Tag, VR};
pub use value::{Item, Value, ValueKind};
pub use value::pixeldata::{EncapsulatedFrame, Frame, NativeFrame, NativeSamples, PixelDataInfo};
