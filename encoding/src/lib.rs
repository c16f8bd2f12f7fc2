#![deny(trivial_numeric_casts, unsafe_code)]
#![warn(missing_debug_implementations, unused_qualifications)]
//! DICOM encoding and decoding primitives.
//!
//! This crate provides the stateless half of the codec: byte-order-aware
//! primitive readers and writers, data element header codecs for the
//! implicit and explicit VR disciplines, text padding and trimming rules,
//! and the transfer syntax registry. The byte order and VR discipline are
//! carried as a runtime [`Encoding`] value, because a DICOM parser must
//! switch both mid-stream once the transfer syntax becomes known.
//!
//! All APIs are based on synchronous I/O.

pub mod decode;
pub mod encode;
pub mod text;
pub mod transfer_syntax;

pub use byteordered::Endianness;
pub use decode::HeaderDecoder;
pub use encode::HeaderEncoder;
pub use transfer_syntax::{Encoding, TransferSyntax};
