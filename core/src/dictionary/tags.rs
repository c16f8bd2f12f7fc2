//! Tag constants and the built-in attribute table.
//!
//! The table is intentionally limited to the attributes that this codec
//! itself interprets or that commonly appear around it; it is not a full
//! PS3.6 dump. Lookups that miss fall back to UN at the call sites.

use super::DictionaryEntry;
use crate::header::{Tag, VR};

/// File Meta Information Group Length (0002,0000)
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// File Meta Information Version (0002,0001)
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/// Media Storage SOP Class UID (0002,0002)
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// Media Storage SOP Instance UID (0002,0003)
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// Transfer Syntax UID (0002,0010)
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// Implementation Class UID (0002,0012)
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/// Implementation Version Name (0002,0013)
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);
/// Source Application Entity Title (0002,0016)
pub const SOURCE_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0016);

/// Specific Character Set (0008,0005)
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/// Image Type (0008,0008)
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
/// SOP Class UID (0008,0016)
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// SOP Instance UID (0008,0018)
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// Study Date (0008,0020)
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
/// Study Time (0008,0030)
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
/// Modality (0008,0060)
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
/// Anatomic Region Sequence (0008,2218)
pub const ANATOMIC_REGION_SEQUENCE: Tag = Tag(0x0008, 0x2218);

/// Patient's Name (0010,0010)
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/// Patient ID (0010,0020)
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/// Patient's Birth Date (0010,0030)
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);

/// Slice Thickness (0018,0050)
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);

/// Study Instance UID (0020,000D)
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/// Series Instance UID (0020,000E)
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
/// Instance Number (0020,0013)
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
/// Dimension Index Pointer (0020,9165)
pub const DIMENSION_INDEX_POINTER: Tag = Tag(0x0020, 0x9165);

/// Samples per Pixel (0028,0002)
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
/// Photometric Interpretation (0028,0004)
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
/// Number of Frames (0028,0008)
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
/// Rows (0028,0010)
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns (0028,0011)
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// Bits Allocated (0028,0100)
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// Bits Stored (0028,0101)
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
/// High Bit (0028,0102)
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
/// Pixel Representation (0028,0103)
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
/// Red Palette Color Lookup Table Data (0028,1201)
pub const RED_PALETTE_COLOR_LOOKUP_TABLE_DATA: Tag = Tag(0x0028, 0x1201);

/// Floating Point Value (0040,A161)
pub const FLOATING_POINT_VALUE: Tag = Tag(0x0040, 0xA161);

/// Add Other Sequence (0046,0102)
pub const ADD_OTHER_SEQUENCE: Tag = Tag(0x0046, 0x0102);

/// Selector SL Value (0072,0078)
pub const SELECTOR_SL_VALUE: Tag = Tag(0x0072, 0x0078);

/// Pixel Data (7FE0,0010)
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Item (FFFE,E000); a framing token, not a data element tag.
pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
/// Item Delimitation Item (FFFE,E00D)
pub const ITEM_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE00D);
/// Sequence Delimitation Item (FFFE,E0DD)
pub const SEQUENCE_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE0DD);

macro_rules! entry {
    ($tag: expr, $vr: ident, $alias: literal) => {
        DictionaryEntry {
            tag: $tag,
            vr: VR::$vr,
            alias: $alias,
        }
    };
}

/// The built-in attribute table.
pub const ENTRIES: &[DictionaryEntry] = &[
    entry!(FILE_META_INFORMATION_GROUP_LENGTH, UL, "FileMetaInformationGroupLength"),
    entry!(FILE_META_INFORMATION_VERSION, OB, "FileMetaInformationVersion"),
    entry!(MEDIA_STORAGE_SOP_CLASS_UID, UI, "MediaStorageSOPClassUID"),
    entry!(MEDIA_STORAGE_SOP_INSTANCE_UID, UI, "MediaStorageSOPInstanceUID"),
    entry!(TRANSFER_SYNTAX_UID, UI, "TransferSyntaxUID"),
    entry!(IMPLEMENTATION_CLASS_UID, UI, "ImplementationClassUID"),
    entry!(IMPLEMENTATION_VERSION_NAME, SH, "ImplementationVersionName"),
    entry!(SOURCE_APPLICATION_ENTITY_TITLE, AE, "SourceApplicationEntityTitle"),
    entry!(SPECIFIC_CHARACTER_SET, CS, "SpecificCharacterSet"),
    entry!(IMAGE_TYPE, CS, "ImageType"),
    entry!(SOP_CLASS_UID, UI, "SOPClassUID"),
    entry!(SOP_INSTANCE_UID, UI, "SOPInstanceUID"),
    entry!(STUDY_DATE, DA, "StudyDate"),
    entry!(STUDY_TIME, TM, "StudyTime"),
    entry!(MODALITY, CS, "Modality"),
    entry!(ANATOMIC_REGION_SEQUENCE, SQ, "AnatomicRegionSequence"),
    entry!(PATIENT_NAME, PN, "PatientName"),
    entry!(PATIENT_ID, LO, "PatientID"),
    entry!(PATIENT_BIRTH_DATE, DA, "PatientBirthDate"),
    entry!(SLICE_THICKNESS, DS, "SliceThickness"),
    entry!(STUDY_INSTANCE_UID, UI, "StudyInstanceUID"),
    entry!(SERIES_INSTANCE_UID, UI, "SeriesInstanceUID"),
    entry!(INSTANCE_NUMBER, IS, "InstanceNumber"),
    entry!(DIMENSION_INDEX_POINTER, AT, "DimensionIndexPointer"),
    entry!(SAMPLES_PER_PIXEL, US, "SamplesPerPixel"),
    entry!(PHOTOMETRIC_INTERPRETATION, CS, "PhotometricInterpretation"),
    entry!(NUMBER_OF_FRAMES, IS, "NumberOfFrames"),
    entry!(ROWS, US, "Rows"),
    entry!(COLUMNS, US, "Columns"),
    entry!(BITS_ALLOCATED, US, "BitsAllocated"),
    entry!(BITS_STORED, US, "BitsStored"),
    entry!(HIGH_BIT, US, "HighBit"),
    entry!(PIXEL_REPRESENTATION, US, "PixelRepresentation"),
    entry!(RED_PALETTE_COLOR_LOOKUP_TABLE_DATA, OW, "RedPaletteColorLookupTableData"),
    entry!(FLOATING_POINT_VALUE, FD, "FloatingPointValue"),
    entry!(ADD_OTHER_SEQUENCE, SQ, "AddOtherSequence"),
    entry!(SELECTOR_SL_VALUE, SL, "SelectorSLValue"),
    entry!(PIXEL_DATA, OW, "PixelData"),
];
