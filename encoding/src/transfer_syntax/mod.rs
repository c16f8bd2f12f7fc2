//! Transfer syntax descriptors and the built-in registry.
//!
//! A transfer syntax UID selects the byte order and VR discipline of the
//! data set that follows the file meta group, and whether pixel data
//! appears encapsulated. This module resolves a UID into a static
//! [`TransferSyntax`] descriptor and exposes the runtime [`Encoding`]
//! configuration which the stateful layer threads through the stream.

use byteordered::Endianness;

/// UID string constants for the transfer syntaxes known to this registry.
pub mod uids {
    /// Implicit VR Little Endian: Default Transfer Syntax for DICOM
    pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
    /// Explicit VR Little Endian
    pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
    /// Deflated Explicit VR Little Endian
    pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";
    /// Explicit VR Big Endian (retired)
    pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";
    /// JPEG Baseline (Process 1)
    pub const JPEG_BASELINE: &str = "1.2.840.10008.1.2.4.50";
    /// JPEG Extended (Process 2 & 4)
    pub const JPEG_EXTENDED: &str = "1.2.840.10008.1.2.4.51";
    /// JPEG Lossless, Non-Hierarchical (Process 14)
    pub const JPEG_LOSSLESS_NON_HIERARCHICAL: &str = "1.2.840.10008.1.2.4.57";
    /// JPEG Lossless, Non-Hierarchical, First-Order Prediction (Process 14 SV1)
    pub const JPEG_LOSSLESS_SV1: &str = "1.2.840.10008.1.2.4.70";
    /// JPEG-LS Lossless
    pub const JPEG_LS_LOSSLESS: &str = "1.2.840.10008.1.2.4.80";
    /// JPEG-LS Lossy (Near-Lossless)
    pub const JPEG_LS_LOSSY: &str = "1.2.840.10008.1.2.4.81";
    /// JPEG 2000 (Lossless Only)
    pub const JPEG_2000_LOSSLESS: &str = "1.2.840.10008.1.2.4.90";
    /// JPEG 2000
    pub const JPEG_2000: &str = "1.2.840.10008.1.2.4.91";
    /// RLE Lossless
    pub const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";
}

/// The runtime encoding configuration of a data set stream:
/// byte order plus VR discipline. The parser and writer switch this value
/// at the byte boundary that follows the file meta group, and override it
/// per-recursion when a UN sequence forces implicit little-endian decoding
/// of its children.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// The byte order of multi-byte values.
    pub endianness: Endianness,
    /// Whether element headers omit the VR (implicit discipline).
    pub implicit_vr: bool,
}

impl Encoding {
    /// Implicit VR little endian, the default data set encoding.
    pub const IMPLICIT_LE: Encoding = Encoding {
        endianness: Endianness::Little,
        implicit_vr: true,
    };

    /// Explicit VR little endian, the file meta group encoding.
    pub const EXPLICIT_LE: Encoding = Encoding {
        endianness: Endianness::Little,
        implicit_vr: false,
    };

    /// Explicit VR big endian.
    pub const EXPLICIT_BE: Encoding = Encoding {
        endianness: Endianness::Big,
        implicit_vr: false,
    };

    /// Create an encoding configuration from its parts.
    pub fn new(endianness: Endianness, implicit_vr: bool) -> Self {
        Encoding {
            endianness,
            implicit_vr,
        }
    }
}

/// A static descriptor of one transfer syntax.
#[derive(Debug, PartialEq)]
pub struct TransferSyntax {
    /// The unique identifier of this transfer syntax.
    pub uid: &'static str,
    /// The transfer syntax name, as in the standard's registry.
    pub name: &'static str,
    /// The byte order of the data set.
    pub endianness: Endianness,
    /// Whether element headers omit the VR.
    pub implicit_vr: bool,
    /// Whether pixel data appears as an encapsulated fragment sequence.
    pub encapsulated: bool,
    /// Whether the data set stream is deflate-compressed.
    /// Deflated streams are recognized but not supported by this codec.
    pub deflated: bool,
}

impl TransferSyntax {
    /// The data set encoding configuration selected by this transfer syntax.
    pub fn encoding(&self) -> Encoding {
        Encoding {
            endianness: self.endianness,
            implicit_vr: self.implicit_vr,
        }
    }
}

macro_rules! ts {
    ($uid: expr, $name: literal, $endianness: ident, implicit: $implicit: literal, encapsulated: $encapsulated: literal, deflated: $deflated: literal) => {
        TransferSyntax {
            uid: $uid,
            name: $name,
            endianness: Endianness::$endianness,
            implicit_vr: $implicit,
            encapsulated: $encapsulated,
            deflated: $deflated,
        }
    };
    // encapsulated syntaxes carry their data set in Explicit VR LE
    ($uid: expr, $name: literal) => {
        ts!($uid, $name, Little, implicit: false, encapsulated: true, deflated: false)
    };
}

/// The built-in transfer syntax registry.
pub const REGISTRY: &[TransferSyntax] = &[
    ts!(uids::IMPLICIT_VR_LITTLE_ENDIAN, "Implicit VR Little Endian", Little, implicit: true, encapsulated: false, deflated: false),
    ts!(uids::EXPLICIT_VR_LITTLE_ENDIAN, "Explicit VR Little Endian", Little, implicit: false, encapsulated: false, deflated: false),
    ts!(uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN, "Deflated Explicit VR Little Endian", Little, implicit: false, encapsulated: false, deflated: true),
    ts!(uids::EXPLICIT_VR_BIG_ENDIAN, "Explicit VR Big Endian", Big, implicit: false, encapsulated: false, deflated: false),
    ts!(uids::JPEG_BASELINE, "JPEG Baseline (Process 1)"),
    ts!(uids::JPEG_EXTENDED, "JPEG Extended (Process 2 & 4)"),
    ts!(uids::JPEG_LOSSLESS_NON_HIERARCHICAL, "JPEG Lossless, Non-Hierarchical (Process 14)"),
    ts!(uids::JPEG_LOSSLESS_SV1, "JPEG Lossless, Non-Hierarchical, First-Order Prediction"),
    ts!(uids::JPEG_LS_LOSSLESS, "JPEG-LS Lossless"),
    ts!(uids::JPEG_LS_LOSSY, "JPEG-LS Lossy (Near-Lossless)"),
    ts!(uids::JPEG_2000_LOSSLESS, "JPEG 2000 (Lossless Only)"),
    ts!(uids::JPEG_2000, "JPEG 2000"),
    ts!(uids::RLE_LOSSLESS, "RLE Lossless"),
];

/// Look up a transfer syntax descriptor by UID.
///
/// Trailing NUL and space padding is removed from the given UID
/// before the lookup.
pub fn lookup(uid: &str) -> Option<&'static TransferSyntax> {
    let uid = uid.trim_end_matches(|c| c == '\0' || c == ' ');
    REGISTRY.iter().find(|ts| ts.uid == uid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_standard_syntaxes() {
        let ts = lookup(uids::IMPLICIT_VR_LITTLE_ENDIAN).unwrap();
        assert!(ts.implicit_vr);
        assert_eq!(ts.endianness, Endianness::Little);
        assert!(!ts.encapsulated);
        assert_eq!(ts.encoding(), Encoding::IMPLICIT_LE);

        let ts = lookup(uids::EXPLICIT_VR_BIG_ENDIAN).unwrap();
        assert!(!ts.implicit_vr);
        assert_eq!(ts.endianness, Endianness::Big);
        assert_eq!(ts.encoding(), Encoding::EXPLICIT_BE);
    }

    #[test]
    fn lookup_trims_padding() {
        let ts = lookup("1.2.840.10008.1.2.1\0").unwrap();
        assert_eq!(ts.uid, uids::EXPLICIT_VR_LITTLE_ENDIAN);
    }

    #[test]
    fn deflated_is_recognized_but_flagged() {
        let ts = lookup(uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN).unwrap();
        assert!(ts.deflated);
    }

    #[test]
    fn encapsulated_family_uses_explicit_le() {
        for uid in [uids::JPEG_BASELINE, uids::JPEG_2000, uids::RLE_LOSSLESS] {
            let ts = lookup(uid).unwrap();
            assert!(ts.encapsulated);
            assert_eq!(ts.encoding(), Encoding::EXPLICIT_LE);
        }
    }

    #[test]
    fn unknown_uid_misses() {
        assert!(lookup("1.2.3.4").is_none());
    }
}
