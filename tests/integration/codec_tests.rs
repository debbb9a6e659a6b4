//! Codec integration tests against externally defined byte layouts.
//!
//! Tests verify:
//! - TIFF PackBits and zlib streams from other writers decode
//! - Boundary bytes for integer, bit and floating rasters
//! - TIFF tag values map onto sample types and compressions

use raster_segments::compression::Compression;
use raster_segments::error::CodecError;
use raster_segments::format::{
    from_raster_data, to_raster_data, ByteOrder, RasterData, SampleType,
};
use raster_segments::segment::{Interleave, SegmentCollection, SegmentLayout};
use raster_segments::tile::TileAssembler;

fn single_segment(
    cols: usize,
    rows: usize,
    sample_type: SampleType,
    byte_order: ByteOrder,
    compression: Compression,
) -> SegmentCollection {
    let layout = SegmentLayout::tiled(cols, rows, cols, rows, 1, Interleave::Pixel).unwrap();
    SegmentCollection::new(layout, sample_type, byte_order, None, compression).unwrap()
}

// =============================================================================
// Foreign Streams
// =============================================================================

#[test]
fn test_packbits_reference_stream() {
    // Example from the TIFF 6.0 PackBits section
    let packed = [
        0xFE, 0xAA, 0x02, 0x80, 0x00, 0x2A, 0xFD, 0xAA, 0x03, 0x80, 0x00, 0x2A, 0x22, 0xF7, 0xAA,
    ];
    let expected = [
        0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0xAA, 0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0x22, 0xAA,
        0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
    ];

    let collection = single_segment(
        24,
        1,
        SampleType::UInt8,
        ByteOrder::BigEndian,
        Compression::PackBits,
    );
    let mut assembler = TileAssembler::full(&collection, 0).unwrap();
    assembler.add_segment(0, &packed).unwrap();

    assert_eq!(
        assembler.finish().to_raster_data(),
        RasterData::UInt8(expected.to_vec())
    );
}

#[test]
fn test_zlib_stream_decodes() {
    // zlib.compress(bytes([1, 2, 3, 4])) with default settings
    let stream = [
        0x78, 0x9C, 0x63, 0x64, 0x62, 0x66, 0x01, 0x00, 0x00, 0x18, 0x00, 0x0B,
    ];
    let collection = single_segment(
        2,
        2,
        SampleType::UInt8,
        ByteOrder::BigEndian,
        Compression::Deflate,
    );
    let mut assembler = TileAssembler::full(&collection, 0).unwrap();
    assembler.add_segment(0, &stream).unwrap();
    assert_eq!(
        assembler.finish().to_raster_data(),
        RasterData::UInt8(vec![1, 2, 3, 4])
    );
}

#[test]
fn test_little_endian_source_big_endian_boundary() {
    let collection = single_segment(
        2,
        1,
        SampleType::UInt16,
        ByteOrder::LittleEndian,
        Compression::None,
    );
    let mut assembler = TileAssembler::full(&collection, 0).unwrap();
    assembler.add_segment(0, &[0x34, 0x12, 0xCD, 0xAB]).unwrap();

    let bytes = assembler.finish().into_bytes().unwrap();
    assert_eq!(&bytes[..], &[0x12, 0x34, 0xAB, 0xCD]);
}

// =============================================================================
// Boundary Format
// =============================================================================

#[test]
fn test_int32_boundary_bytes() {
    let data = RasterData::Int32(vec![1, -1, 256, i32::MAX]);
    let bytes = from_raster_data(&data, 2, 2).unwrap();
    assert_eq!(
        &bytes[..],
        &[
            0x00, 0x00, 0x00, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x01, 0x00, 0x7F, 0xFF,
            0xFF, 0xFF,
        ]
    );
    assert_eq!(to_raster_data(&bytes, SampleType::Int32, 2, 2).unwrap(), data);
}

#[test]
fn test_bit_rows_padded() {
    // 10 columns need 2 bytes per row
    let mut row = vec![false; 10];
    row[0] = true;
    row[9] = true;
    let data = RasterData::Bit([row.clone(), row].concat());

    let bytes = from_raster_data(&data, 10, 2).unwrap();
    assert_eq!(&bytes[..], &[0x80, 0x40, 0x80, 0x40]);
    assert_eq!(to_raster_data(&bytes, SampleType::Bit, 10, 2).unwrap(), data);
}

#[test]
fn test_boundary_length_checked() {
    let result = to_raster_data(&[0u8; 7], SampleType::Float64, 1, 1);
    assert!(matches!(result, Err(CodecError::SizeMismatch { .. })));
}

// =============================================================================
// TIFF Tag Mapping
// =============================================================================

#[test]
fn test_tiff_tag_values() {
    assert_eq!(SampleType::from_tiff(1, 1).unwrap(), SampleType::Bit);
    assert_eq!(SampleType::from_tiff(16, 2).unwrap(), SampleType::Int16);
    assert_eq!(SampleType::from_tiff(64, 3).unwrap(), SampleType::Float64);
    assert!(SampleType::from_tiff(64, 2).is_err());

    assert_eq!(Compression::from_tiff_code(32946), Some(Compression::Deflate));
    assert_eq!(Compression::from_tiff_code(5), None);

    assert_eq!(ByteOrder::from_tiff_marker(0x4949), Some(ByteOrder::LittleEndian));
    assert_eq!(ByteOrder::from_tiff_marker(0x4D4D), Some(ByteOrder::BigEndian));
}
