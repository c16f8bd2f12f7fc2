#![deny(trivial_numeric_casts, unsafe_code)]
#![warn(missing_debug_implementations, unused_qualifications)]
//! A DICOM Part 10 stream parser and writer.
//!
//! This crate assembles the encoding primitives into the full file-format
//! codec: reading the 128-byte preamble and "DICM" magic code, parsing the
//! file meta group in Explicit VR Little Endian, switching the data set
//! encoding according to the Transfer Syntax UID found there, and then
//! streaming data elements in either direction, including sequence framing
//! and native or encapsulated pixel data.
//!
//! Parsing is element-by-element through [`Parser`], or in one go:
//!
//! ```no_run
//! use dcmio_parser::{parse_until_eof, ParseOptions};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("image.dcm")?;
//! let dataset = parse_until_eof(file, ParseOptions::default())?;
//! for element in &dataset {
//!     println!("{} {}", element.tag(), element.vr());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Writing mirrors this through [`Writer`] and [`write`], which recompute
//! value lengths, insert the file meta group length, and enforce canonical
//! value representations unless told otherwise.
//!
//! All APIs are based on synchronous I/O.

pub mod read;
pub mod stateful;
pub mod write;

pub use read::{parse, parse_until_eof, ParseOptions, Parser};
pub use stateful::decode::StatefulDecoder;
pub use stateful::encode::StatefulEncoder;
pub use write::{write, WriteOptions, Writer};
