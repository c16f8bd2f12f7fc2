//! Write-then-parse consistency tests.
//!
//! Each case builds a data set, writes it out as a Part 10 stream, reads
//! it back in, and checks that the result is equivalent to the original.
//! Equivalence deliberately ignores value lengths (they are recomputed on
//! write) and the auto-inserted FileMetaInformationGroupLength element,
//! and compares elements as tag-sorted lists within each nesting level.

use dcmio_core::dictionary::tags;
use dcmio_core::value::pixeldata::{
    EncapsulatedFrame, Frame, NativeFrame, NativeSamples, PixelDataInfo,
};
use dcmio_core::{DataElement, Dataset, Item, Tag, Value, VR};
use dcmio_encoding::transfer_syntax::uids;
use dcmio_encoding::Endianness;
use dcmio_parser::{parse, parse_until_eof, read, write, ParseOptions, Parser, WriteOptions, Writer};

fn elem(tag: Tag, value: Value) -> DataElement {
    DataElement::new_inferred(tag, value)
}

fn sequence_of(tag: Tag, items: Vec<Vec<DataElement>>) -> DataElement {
    DataElement::new_inferred(
        tag,
        Value::items(items.into_iter().map(Item::new).collect::<Vec<_>>()),
    )
}

fn un_sequence_of(tag: Tag, items: Vec<Vec<DataElement>>) -> DataElement {
    DataElement::new(
        tag,
        VR::UN,
        Value::items(items.into_iter().map(Item::new).collect::<Vec<_>>()),
    )
}

fn meta_elements(transfer_syntax: &str) -> Vec<DataElement> {
    vec![
        elem(
            tags::MEDIA_STORAGE_SOP_CLASS_UID,
            Value::strings(["1.2.840.10008.5.1.4.1.1.1.2"]),
        ),
        elem(
            tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
            Value::strings(["1.2.3.4.5.6.7"]),
        ),
        elem(tags::TRANSFER_SYNTAX_UID, Value::strings([transfer_syntax])),
    ]
}

fn write_and_parse_back(
    dataset: &Dataset,
    write_options: WriteOptions,
    parse_options: ParseOptions,
) -> Dataset {
    let mut out = Vec::new();
    write(&mut out, dataset, write_options).expect("write should succeed");
    parse(&out[..], out.len() as u64, parse_options).expect("parse of written stream should succeed")
}

fn assert_element_equivalent(want: &DataElement, got: &DataElement) {
    assert_eq!(want.tag(), got.tag());
    assert_eq!(want.vr(), got.vr(), "VR differs on {}", want.tag());
    assert_eq!(
        want.raw_vr(),
        got.raw_vr(),
        "raw VR differs on {}",
        want.tag()
    );
    match (want.value(), got.value()) {
        (Value::Items(want_items), Value::Items(got_items)) => {
            assert_eq!(
                want_items.len(),
                got_items.len(),
                "item count differs on {}",
                want.tag()
            );
            for (want_item, got_item) in want_items.iter().zip(got_items) {
                assert_eq!(
                    want_item.elements.len(),
                    got_item.elements.len(),
                    "item element count differs on {}",
                    want.tag()
                );
                for (w, g) in want_item.elements.iter().zip(&got_item.elements) {
                    assert_element_equivalent(w, g);
                }
            }
        }
        (want_value, got_value) => {
            assert_eq!(want_value, got_value, "value differs on {}", want.tag())
        }
    }
}

fn assert_equivalent(want: &Dataset, got: &Dataset) {
    let filter = |ds: &Dataset| -> Vec<DataElement> {
        let mut elements: Vec<DataElement> = ds
            .iter()
            .filter(|e| e.tag() != tags::FILE_META_INFORMATION_GROUP_LENGTH)
            .cloned()
            .collect();
        elements.sort_by_key(|e| e.tag());
        elements
    };
    let want = filter(want);
    let got = filter(got);
    assert_eq!(want.len(), got.len(), "element count differs");
    for (w, g) in want.iter().zip(&got) {
        assert_element_equivalent(w, g);
    }
}

fn assert_roundtrip(dataset: &Dataset) {
    let back = write_and_parse_back(dataset, WriteOptions::default(), ParseOptions::default());
    assert_equivalent(dataset, &back);
}

#[test]
fn basic_types() {
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.extend(vec![
        elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])),
        elem(tags::ROWS, Value::ints([128])),
        elem(tags::FLOATING_POINT_VALUE, Value::floats([128.10])),
        elem(tags::DIMENSION_INDEX_POINTER, Value::ints([32, 36950])),
        elem(
            tags::RED_PALETTE_COLOR_LOOKUP_TABLE_DATA,
            Value::bytes([0x1, 0x2, 0x3, 0x4]),
        ),
        elem(tags::SELECTOR_SL_VALUE, Value::ints([-20])),
        // a private tag with an unknown VR
        DataElement::new(Tag(0x0019, 0x1027), VR::UN, Value::bytes([0x1, 0x2, 0x3, 0x4])),
    ]);
    assert_roundtrip(&Dataset::from_elements(elements));
}

#[test]
fn private_tag_with_explicit_vr() {
    let mut elements = meta_elements(uids::EXPLICIT_VR_LITTLE_ENDIAN);
    // an explicit transfer syntax is needed here, or the private
    // element would read back as UN
    elements.push(DataElement::new(
        Tag(0x0003, 0x0010),
        VR::ST,
        Value::strings(["some data"]),
    ));
    assert_roundtrip(&Dataset::from_elements(elements));
}

#[test]
fn sequence_with_two_items() {
    let item = || {
        vec![
            elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])),
            elem(tags::ROWS, Value::ints([100])),
        ]
    };
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])));
    elements.push(sequence_of(tags::ADD_OTHER_SEQUENCE, vec![item(), item()]));
    let dataset = Dataset::from_elements(elements);

    assert_roundtrip(&dataset);

    // the same roundtrip must hold without VR verification
    let back = write_and_parse_back(
        &dataset,
        WriteOptions::default().skip_vr_verification(),
        ParseOptions::default(),
    );
    assert_equivalent(&dataset, &back);
}

#[test]
fn nested_sequences() {
    let inner = sequence_of(
        tags::ANATOMIC_REGION_SEQUENCE,
        vec![vec![elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"]))]],
    );
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])));
    elements.push(sequence_of(
        tags::ADD_OTHER_SEQUENCE,
        vec![vec![
            elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])),
            inner,
        ]],
    ));
    let dataset = Dataset::from_elements(elements);

    assert_roundtrip(&dataset);

    let back = write_and_parse_back(
        &dataset,
        WriteOptions::default().skip_vr_verification(),
        ParseOptions::default(),
    );
    assert_equivalent(&dataset, &back);
}

#[test]
fn nested_unknown_sequences() {
    let nested = un_sequence_of(
        Tag(0x0019, 0x1029),
        vec![vec![elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"]))]],
    );
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])));
    elements.push(un_sequence_of(
        Tag(0x0019, 0x1027),
        vec![vec![
            DataElement::new(Tag(0x0019, 0x1028), VR::UN, Value::bytes([0x1, 0x2, 0x3, 0x4])),
            nested,
        ]],
    ));
    assert_roundtrip(&Dataset::from_elements(elements));
}

fn native_pixel_dataset(
    transfer_syntax: &str,
    rows: i64,
    cols: i64,
    bits: i64,
    frame_count: i64,
    samples_per_pixel: i64,
    frames: Vec<Frame>,
) -> Dataset {
    let mut elements = meta_elements(transfer_syntax);
    elements.extend(vec![
        elem(tags::ROWS, Value::ints([rows])),
        elem(tags::COLUMNS, Value::ints([cols])),
        elem(tags::BITS_ALLOCATED, Value::ints([bits])),
        elem(tags::NUMBER_OF_FRAMES, Value::ints([frame_count])),
        elem(tags::SAMPLES_PER_PIXEL, Value::ints([samples_per_pixel])),
        elem(
            tags::PIXEL_DATA,
            Value::PixelData(PixelDataInfo {
                is_encapsulated: false,
                frames,
                ..Default::default()
            }),
        ),
    ]);
    Dataset::from_elements(elements)
}

fn native_frame(rows: u16, cols: u16, samples_per_pixel: u16, data: NativeSamples) -> Frame {
    Frame::Native(NativeFrame {
        rows,
        cols,
        samples_per_pixel,
        data,
    })
}

#[test]
fn native_pixel_data_8bit() {
    let dataset = native_pixel_dataset(
        uids::IMPLICIT_VR_LITTLE_ENDIAN,
        2,
        2,
        8,
        1,
        1,
        vec![native_frame(2, 2, 1, NativeSamples::U8(vec![1, 2, 3, 4]))],
    );
    assert_roundtrip(&dataset);
}

#[test]
fn native_pixel_data_16bit() {
    let dataset = native_pixel_dataset(
        uids::IMPLICIT_VR_LITTLE_ENDIAN,
        2,
        2,
        16,
        1,
        1,
        vec![native_frame(2, 2, 1, NativeSamples::U16(vec![1, 2, 3, 4]))],
    );
    assert_roundtrip(&dataset);
}

#[test]
fn native_pixel_data_32bit_two_frames_two_samples() {
    let dataset = native_pixel_dataset(
        uids::IMPLICIT_VR_LITTLE_ENDIAN,
        2,
        2,
        32,
        2,
        2,
        vec![
            native_frame(2, 2, 2, NativeSamples::U32(vec![1, 1, 2, 2, 3, 3, 4, 4])),
            native_frame(2, 2, 2, NativeSamples::U32(vec![5, 1, 2, 2, 3, 3, 4, 5])),
        ],
    );
    assert_roundtrip(&dataset);
}

#[test]
fn native_pixel_data_big_endian() {
    let dataset = native_pixel_dataset(
        uids::EXPLICIT_VR_BIG_ENDIAN,
        2,
        2,
        32,
        2,
        2,
        vec![
            native_frame(2, 2, 2, NativeSamples::U32(vec![1, 1, 2, 2, 3, 3, 4, 4])),
            native_frame(2, 2, 2, NativeSamples::U32(vec![5, 1, 2, 2, 3, 3, 4, 5])),
        ],
    );
    assert_roundtrip(&dataset);
}

#[test]
fn native_pixel_data_odd_bytes() {
    // 1x3 8-bit: three pixel bytes, padded to four on the wire
    let dataset = native_pixel_dataset(
        uids::IMPLICIT_VR_LITTLE_ENDIAN,
        1,
        3,
        8,
        1,
        1,
        vec![native_frame(1, 3, 1, NativeSamples::U8(vec![1, 2, 3]))],
    );
    assert_roundtrip(&dataset);
}

#[test]
fn encapsulated_pixel_data_with_raw_ob() {
    let mut elements = meta_elements(uids::EXPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::BITS_ALLOCATED, Value::ints([8])));
    // encapsulated pixel data conventionally goes out as OB,
    // though the dictionary says OW
    elements.push(DataElement::new_with_raw_vr(
        tags::PIXEL_DATA,
        VR::OB,
        *b"OB",
        Value::PixelData(PixelDataInfo {
            is_encapsulated: true,
            frames: vec![Frame::Encapsulated(EncapsulatedFrame {
                data: vec![1, 2, 3, 4],
            })],
            ..Default::default()
        }),
    ));
    elements.push(elem(tags::FLOATING_POINT_VALUE, Value::floats([128.10])));
    elements.push(elem(tags::DIMENSION_INDEX_POINTER, Value::ints([32, 36950])));
    assert_roundtrip(&Dataset::from_elements(elements));
}

#[test]
fn encapsulated_pixel_data_multiframe() {
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::BITS_ALLOCATED, Value::ints([8])));
    elements.push(elem(
        tags::PIXEL_DATA,
        Value::PixelData(PixelDataInfo {
            is_encapsulated: true,
            frames: vec![
                Frame::Encapsulated(EncapsulatedFrame {
                    data: vec![1, 2, 3, 4],
                }),
                Frame::Encapsulated(EncapsulatedFrame {
                    data: vec![1, 2, 3, 8],
                }),
            ],
            ..Default::default()
        }),
    ));
    elements.push(elem(tags::FLOATING_POINT_VALUE, Value::floats([128.10])));
    assert_roundtrip(&Dataset::from_elements(elements));
}

#[test]
fn encapsulated_pixel_data_writes_delimited_stream() {
    let mut elements = meta_elements(uids::EXPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(
        tags::PIXEL_DATA,
        Value::PixelData(PixelDataInfo {
            is_encapsulated: true,
            frames: vec![Frame::Encapsulated(EncapsulatedFrame {
                data: vec![1, 2, 3, 4],
            })],
            ..Default::default()
        }),
    ));
    let mut out = Vec::new();
    write(&mut out, &Dataset::from_elements(elements), WriteOptions::default()).unwrap();

    // undefined length marker in the pixel data header
    let header_at = out
        .windows(4)
        .position(|w| w == [0xE0, 0x7F, 0x10, 0x00])
        .expect("pixel data tag present");
    assert_eq!(&out[header_at + 8..header_at + 12], &[0xFF, 0xFF, 0xFF, 0xFF]);
    // empty basic offset table item follows
    assert_eq!(
        &out[header_at + 12..header_at + 20],
        &[0xFE, 0xFF, 0x00, 0xE0, 0x00, 0x00, 0x00, 0x00]
    );
    // the stream ends with the sequence delimiter
    assert_eq!(
        &out[out.len() - 8..],
        &[0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn pixel_data_intentionally_unprocessed() {
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::BITS_ALLOCATED, Value::ints([8])));
    elements.push(elem(tags::FLOATING_POINT_VALUE, Value::floats([128.10])));
    elements.push(elem(tags::DIMENSION_INDEX_POINTER, Value::ints([32, 36950])));
    elements.push(elem(
        tags::PIXEL_DATA,
        Value::PixelData(PixelDataInfo {
            unprocessed_value_data: Some(vec![1, 2, 3, 4]),
            ..Default::default()
        }),
    ));
    let dataset = Dataset::from_elements(elements);
    let back = write_and_parse_back(
        &dataset,
        WriteOptions::default(),
        ParseOptions::default().skip_processing_pixel_data_value(),
    );
    assert_equivalent(&dataset, &back);
}

#[test]
fn native_pixel_data_intentionally_skipped() {
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::BITS_ALLOCATED, Value::ints([8])));
    elements.push(elem(tags::FLOATING_POINT_VALUE, Value::floats([128.10])));
    elements.push(elem(
        tags::PIXEL_DATA,
        Value::PixelData(PixelDataInfo {
            intentionally_skipped: true,
            ..Default::default()
        }),
    ));
    let dataset = Dataset::from_elements(elements);
    let back = write_and_parse_back(
        &dataset,
        WriteOptions::default(),
        ParseOptions::default().skip_pixel_data(),
    );
    assert_equivalent(&dataset, &back);
}

#[test]
fn encapsulated_pixel_data_intentionally_skipped() {
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::BITS_ALLOCATED, Value::ints([8])));
    elements.push(elem(tags::FLOATING_POINT_VALUE, Value::floats([128.10])));
    elements.push(elem(
        tags::PIXEL_DATA,
        Value::PixelData(PixelDataInfo {
            is_encapsulated: true,
            intentionally_skipped: true,
            ..Default::default()
        }),
    ));
    let dataset = Dataset::from_elements(elements);
    let back = write_and_parse_back(
        &dataset,
        WriteOptions::default(),
        ParseOptions::default().skip_pixel_data(),
    );
    assert_equivalent(&dataset, &back);
}

#[test]
fn missing_transfer_syntax_is_an_error() {
    let elements = vec![
        elem(
            tags::MEDIA_STORAGE_SOP_CLASS_UID,
            Value::strings(["1.2.840.10008.5.1.4.1.1.1.2"]),
        ),
        elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])),
        elem(tags::ROWS, Value::ints([128])),
    ];
    let err = write(
        Vec::new(),
        &Dataset::from_elements(elements),
        WriteOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        dcmio_parser::write::Error::ElementNotFound {
            tag: tags::TRANSFER_SYNTAX_UID,
            ..
        }
    ));
}

#[test]
fn missing_transfer_syntax_with_default_option() {
    let elements = vec![
        elem(
            tags::MEDIA_STORAGE_SOP_CLASS_UID,
            Value::strings(["1.2.840.10008.5.1.4.1.1.1.2"]),
        ),
        elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])),
        elem(tags::ROWS, Value::ints([128])),
        elem(tags::FLOATING_POINT_VALUE, Value::floats([128.10])),
    ];
    let dataset = Dataset::from_elements(elements);
    let back = write_and_parse_back(
        &dataset,
        WriteOptions::default().default_missing_transfer_syntax(),
        ParseOptions::default(),
    );

    // the implicit VR little endian element is inserted on write
    let mut want = dataset;
    want.push(elem(
        tags::TRANSFER_SYNTAX_UID,
        Value::strings([uids::IMPLICIT_VR_LITTLE_ENDIAN]),
    ));
    assert_equivalent(&want, &back);
}

#[test]
fn missing_transfer_syntax_with_override_option() {
    let elements = vec![
        elem(
            tags::MEDIA_STORAGE_SOP_CLASS_UID,
            Value::strings(["1.2.840.10008.5.1.4.1.1.1.2"]),
        ),
        elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])),
        elem(tags::ROWS, Value::ints([128])),
        elem(
            tags::RED_PALETTE_COLOR_LOOKUP_TABLE_DATA,
            Value::bytes([0x1, 0x2, 0x3, 0x4]),
        ),
    ];
    let dataset = Dataset::from_elements(elements);

    for uid in [
        uids::IMPLICIT_VR_LITTLE_ENDIAN,
        uids::EXPLICIT_VR_LITTLE_ENDIAN,
        uids::EXPLICIT_VR_BIG_ENDIAN,
    ] {
        let mut out = Vec::new();
        write(
            &mut out,
            &dataset,
            WriteOptions::default().override_missing_transfer_syntax(uid),
        )
        .unwrap();

        let back = parse_until_eof(&out[..], ParseOptions::default()).unwrap();
        let ts = back
            .find(tags::TRANSFER_SYNTAX_UID)
            .expect("written stream must carry the override transfer syntax");
        assert_eq!(ts.value().strings_ref().unwrap(), [uid.to_string()]);
    }
}

#[test]
fn deflated_transfer_syntax_is_rejected_on_write() {
    let mut elements = meta_elements(uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::BITS_ALLOCATED, Value::ints([8])));
    let err = write(
        Vec::new(),
        &Dataset::from_elements(elements),
        WriteOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        dcmio_parser::write::Error::DeflatedTransferSyntaxUnsupported { .. }
    ));
}

#[test]
fn write_element_and_parse_back_one_by_one() {
    let elements = vec![
        elem(
            tags::MEDIA_STORAGE_SOP_CLASS_UID,
            Value::strings(["1.2.840.10008.5.1.4.1.1.1.2"]),
        ),
        elem(
            tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
            Value::strings(["1.2.3.4.5.6.7"]),
        ),
        elem(
            tags::TRANSFER_SYNTAX_UID,
            Value::strings([uids::IMPLICIT_VR_LITTLE_ENDIAN]),
        ),
        elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])),
        elem(tags::ROWS, Value::ints([128])),
        elem(tags::FLOATING_POINT_VALUE, Value::floats([128.10])),
        elem(tags::DIMENSION_INDEX_POINTER, Value::ints([32, 36950])),
        elem(
            tags::RED_PALETTE_COLOR_LOOKUP_TABLE_DATA,
            Value::bytes([0x1, 0x2, 0x3, 0x4]),
        ),
    ];

    let mut writer = Writer::new(Vec::new());
    writer.set_transfer_syntax(Endianness::Little, true);
    for element in &elements {
        writer.write_element(element).expect("element should write");
    }
    let out = writer.into_inner();

    let mut parser = Parser::new(
        &out[..],
        Some(out.len() as u64),
        ParseOptions::default().skip_metadata_read_on_new_parser_init(),
    )
    .unwrap();

    for want in &elements {
        let got = parser
            .next_element()
            .expect("element should parse")
            .expect("element expected before end of stream");
        assert_element_equivalent(want, &got);
    }
    assert!(parser.next_element().unwrap().is_none());
}

#[test]
fn frames_are_delivered_through_the_channel() {
    let dataset = native_pixel_dataset(
        uids::IMPLICIT_VR_LITTLE_ENDIAN,
        2,
        2,
        8,
        1,
        1,
        vec![native_frame(2, 2, 1, NativeSamples::U8(vec![1, 2, 3, 4]))],
    );
    let mut out = Vec::new();
    write(&mut out, &dataset, WriteOptions::default()).unwrap();

    let (sender, receiver) = std::sync::mpsc::channel();
    let _ = parse(
        &out[..],
        out.len() as u64,
        ParseOptions::default().frame_sender(sender),
    )
    .unwrap();

    let frames: Vec<Frame> = receiver.try_iter().collect();
    assert_eq!(
        frames,
        vec![native_frame(2, 2, 1, NativeSamples::U8(vec![1, 2, 3, 4]))]
    );
}

#[test]
fn written_streams_are_byte_stable() {
    // writing, parsing and writing again must produce identical bytes
    let mut elements = meta_elements(uids::IMPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::PATIENT_NAME, Value::strings(["Bob", "Jones"])));
    elements.push(elem(tags::ROWS, Value::ints([128])));
    elements.push(sequence_of(
        tags::ADD_OTHER_SEQUENCE,
        vec![vec![elem(tags::ROWS, Value::ints([100]))]],
    ));
    let dataset = Dataset::from_elements(elements);

    let mut first = Vec::new();
    write(&mut first, &dataset, WriteOptions::default()).unwrap();

    let parsed = parse(&first[..], first.len() as u64, ParseOptions::default()).unwrap();
    let mut second = Vec::new();
    write(&mut second, &parsed, WriteOptions::default()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn every_emitted_value_length_is_even() {
    // an odd-sized text value and odd-sized pixel data force padding
    let mut elements = meta_elements(uids::EXPLICIT_VR_LITTLE_ENDIAN);
    elements.push(elem(tags::PATIENT_NAME, Value::strings(["Odd"])));
    let mut out = Vec::new();
    write(&mut out, &Dataset::from_elements(elements), WriteOptions::default()).unwrap();

    // walk the stream, checking each explicit length field
    let mut parser = Parser::new(&out[..], Some(out.len() as u64), ParseOptions::default()).unwrap();
    while let Some(element) = parser.next_element().unwrap() {
        let len = element.length().get().expect("lengths are defined here");
        assert_eq!(len % 2, 0, "odd length on {}", element.tag());
    }
    for element in parser.into_dataset().iter() {
        if let Some(len) = element.length().get() {
            assert_eq!(len % 2, 0, "odd length on {}", element.tag());
        }
    }
}

#[test]
fn unsupported_transfer_syntax_is_reported() {
    let mut elements = meta_elements("1.2.3.4.5");
    elements.push(elem(tags::ROWS, Value::ints([128])));
    let err = write(
        Vec::new(),
        &Dataset::from_elements(elements),
        WriteOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        dcmio_parser::write::Error::UnsupportedTransferSyntax { .. }
    ));
}

#[test]
fn parse_reports_unsupported_bits_allocated() {
    let dataset = native_pixel_dataset(
        uids::IMPLICIT_VR_LITTLE_ENDIAN,
        2,
        2,
        8,
        1,
        1,
        vec![native_frame(2, 2, 1, NativeSamples::U8(vec![1, 2, 3, 4]))],
    );
    let mut out = Vec::new();
    write(&mut out, &dataset, WriteOptions::default()).unwrap();

    // corrupt BitsAllocated to a width the slicer cannot handle:
    // (0028,0100) is followed by its u32 length and the u16 value 8
    let at = out
        .windows(4)
        .position(|w| w == [0x28, 0x00, 0x00, 0x01])
        .expect("bits allocated tag present");
    out[at + 8] = 12;

    let err = parse(&out[..], out.len() as u64, ParseOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        read::Error::UnsupportedBitsAllocated { bits: 12, .. }
    ));
}
