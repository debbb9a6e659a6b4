//! Write → read pipeline integration tests.
//!
//! Tests verify:
//! - Every sample type survives segmenting, compression and reassembly
//! - Tiled edges, short final strips and both interleavings
//! - Windows fetch only the segments they touch
//! - NoData values read as missing and serialize back to their sentinel

use std::sync::Arc;

use bytes::Bytes;

use raster_segments::compression::Compression;
use raster_segments::error::{CodecError, TileError};
use raster_segments::format::{to_raster_data, ByteOrder, RasterData, SampleType, NODATA_INT};
use raster_segments::io::MemorySegmentSource;
use raster_segments::segment::{Interleave, PixelWindow, SegmentCollection, SegmentLayout};
use raster_segments::tile::{SegmentWriter, TileReader, TileRequest};

use super::test_utils::{band_data, window_of, TrackingSegmentSource, ALL_SAMPLE_TYPES};

fn encode(collection: &SegmentCollection, bands: &[RasterData]) -> Vec<Bytes> {
    SegmentWriter::new(collection)
        .write_segments(bands.to_vec())
        .unwrap()
}

fn build_bands(sample_type: SampleType, layout: &SegmentLayout) -> Vec<RasterData> {
    (0..layout.band_count)
        .map(|band| band_data(sample_type, layout.cols, layout.rows, band))
        .collect()
}

// =============================================================================
// Round Trips
// =============================================================================

#[tokio::test]
async fn test_all_types_tiled_both_interleaves() {
    let compressions = [Compression::None, Compression::Deflate, Compression::PackBits];

    for (i, &sample_type) in ALL_SAMPLE_TYPES.iter().enumerate() {
        for interleave in [Interleave::Pixel, Interleave::Band] {
            // 7x5 raster in 4x2 tiles: clipped right column and bottom row
            let layout = SegmentLayout::tiled(7, 5, 4, 2, 3, interleave).unwrap();
            let compression = compressions[i % compressions.len()];
            let collection = SegmentCollection::new(
                layout,
                sample_type,
                ByteOrder::LittleEndian,
                None,
                compression,
            )
            .unwrap();

            let bands = build_bands(sample_type, &layout);
            let segments = encode(&collection, &bands);
            assert_eq!(segments.len(), layout.segment_count());

            let reader =
                TileReader::new(MemorySegmentSource::new(segments, "mem://rt"), collection)
                    .unwrap();
            for (band, expected) in bands.iter().enumerate() {
                let tile = reader.read_tile(TileRequest::full(band)).await.unwrap();
                assert_eq!(
                    &tile.to_raster_data(),
                    expected,
                    "{:?} {:?} band {}",
                    sample_type,
                    interleave,
                    band
                );
            }
        }
    }
}

#[tokio::test]
async fn test_all_types_striped_short_last_strip() {
    for &sample_type in ALL_SAMPLE_TYPES.iter() {
        // 10 rows in strips of 4: the last strip stores 2 rows
        let layout = SegmentLayout::striped(9, 10, 4, 2, Interleave::Pixel).unwrap();
        let collection = SegmentCollection::new(
            layout,
            sample_type,
            ByteOrder::BigEndian,
            None,
            Compression::Deflate,
        )
        .unwrap();

        let bands = build_bands(sample_type, &layout);
        let segments = encode(&collection, &bands);
        assert_eq!(segments.len(), 3);

        let reader =
            TileReader::new(MemorySegmentSource::new(segments, "mem://strips"), collection)
                .unwrap();
        let tile = reader.read_tile(TileRequest::full(1)).await.unwrap();
        assert_eq!(tile.to_raster_data(), bands[1], "{:?}", sample_type);
    }
}

#[tokio::test]
async fn test_uncompressed_last_strip_is_short() {
    let layout = SegmentLayout::striped(3, 5, 2, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::UInt16,
        ByteOrder::BigEndian,
        None,
        Compression::None,
    )
    .unwrap();
    let segments = encode(&collection, &build_bands(SampleType::UInt16, &layout));

    // Full strips: 3 cols * 2 rows * 2 bytes; last strip: one row
    assert_eq!(segments[0].len(), 12);
    assert_eq!(segments[1].len(), 12);
    assert_eq!(segments[2].len(), 6);
}

// =============================================================================
// Windows
// =============================================================================

#[tokio::test]
async fn test_windows_match_cropped_band() {
    let layout = SegmentLayout::tiled(11, 9, 4, 4, 2, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::Int16,
        ByteOrder::LittleEndian,
        None,
        Compression::PackBits,
    )
    .unwrap();
    let bands = build_bands(SampleType::Int16, &layout);
    let reader = TileReader::new(
        MemorySegmentSource::new(encode(&collection, &bands), "mem://windows"),
        collection,
    )
    .unwrap();

    let windows = [
        PixelWindow::new(0, 0, 1, 1),
        PixelWindow::new(3, 3, 2, 2),
        PixelWindow::new(5, 2, 6, 7),
        PixelWindow::new(10, 8, 1, 1),
        PixelWindow::new(0, 4, 11, 1),
    ];
    for window in windows {
        let tile = reader
            .read_tile(TileRequest::window(1, window))
            .await
            .unwrap();
        assert_eq!(tile.cols(), window.cols);
        assert_eq!(tile.rows(), window.rows);
        assert_eq!(
            tile.to_raster_data(),
            window_of(&bands[1], layout.cols, &window),
            "{:?}",
            window
        );
    }
}

#[tokio::test]
async fn test_window_fetches_only_required_segments() {
    let layout = SegmentLayout::tiled(8, 8, 4, 4, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::UInt8,
        ByteOrder::BigEndian,
        None,
        Compression::Deflate,
    )
    .unwrap();
    let segments = encode(&collection, &build_bands(SampleType::UInt8, &layout));
    let reader =
        TileReader::new(TrackingSegmentSource::new(segments, "mem://tracking"), collection)
            .unwrap();

    reader
        .read_tile(TileRequest::window(0, PixelWindow::new(1, 5, 2, 2)))
        .await
        .unwrap();
    assert_eq!(reader.source().request_count(), 1);
    assert_eq!(reader.source().get_requests().await, vec![2]);
}

#[tokio::test]
async fn test_band_sequential_fetches_band_segments() {
    let layout = SegmentLayout::tiled(4, 4, 2, 2, 3, Interleave::Band).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::Float32,
        ByteOrder::LittleEndian,
        None,
        Compression::None,
    )
    .unwrap();
    let bands = build_bands(SampleType::Float32, &layout);
    let reader = TileReader::new(
        TrackingSegmentSource::new(encode(&collection, &bands), "mem://planar"),
        collection,
    )
    .unwrap();

    let tile = reader.read_tile(TileRequest::full(2)).await.unwrap();
    assert_eq!(tile.to_raster_data(), bands[2]);
    assert_eq!(reader.source().get_requests().await, vec![8, 9, 10, 11]);
}

#[tokio::test]
async fn test_concurrent_reads_share_reader() {
    let layout = SegmentLayout::tiled(16, 16, 8, 8, 2, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::Int32,
        ByteOrder::BigEndian,
        Some(-1.0),
        Compression::Deflate,
    )
    .unwrap();
    let bands = build_bands(SampleType::Int32, &layout);
    let reader = Arc::new(
        TileReader::new(
            MemorySegmentSource::new(encode(&collection, &bands), "mem://shared"),
            collection,
        )
        .unwrap(),
    );

    let mut handles = Vec::new();
    for band in 0..2 {
        for window in [PixelWindow::new(0, 0, 8, 8), PixelWindow::new(4, 4, 10, 9)] {
            let reader = Arc::clone(&reader);
            handles.push(tokio::spawn(async move {
                let tile = reader
                    .read_tile(TileRequest::window(band, window))
                    .await
                    .unwrap();
                (band, window, tile.to_raster_data())
            }));
        }
    }

    for handle in handles {
        let (band, window, data) = handle.await.unwrap();
        assert_eq!(data, window_of(&bands[band], layout.cols, &window));
    }
}

// =============================================================================
// NoData
// =============================================================================

#[tokio::test]
async fn test_user_defined_nodata_reads_as_missing() {
    let layout = SegmentLayout::tiled(3, 3, 2, 2, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::Int16,
        ByteOrder::LittleEndian,
        Some(-9999.0),
        Compression::Deflate,
    )
    .unwrap();
    let band = RasterData::Int16(vec![1, -9999, 3, 4, 5, -9999, 7, 8, 9]);
    let reader = TileReader::new(
        MemorySegmentSource::new(encode(&collection, &[band.clone()]), "mem://nodata"),
        collection,
    )
    .unwrap();

    let tile = reader.read_tile(TileRequest::full(0)).await.unwrap();
    assert_eq!(tile.get_int(0), 1);
    assert_eq!(tile.get_int(1), NODATA_INT);
    assert!(tile.get_double(5).is_nan());
    assert!(!tile.is_nodata(4));

    // The sentinel itself comes back out at the boundary
    let bytes = tile.into_bytes().unwrap();
    assert_eq!(to_raster_data(&bytes, SampleType::Int16, 3, 3).unwrap(), band);
}

#[tokio::test]
async fn test_float_nodata_reads_as_nan() {
    let layout = SegmentLayout::tiled(2, 2, 2, 2, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::Float32,
        ByteOrder::BigEndian,
        Some(-3.5),
        Compression::None,
    )
    .unwrap();
    let band = RasterData::Float32(vec![0.5, -3.5, 2.0, -3.5]);
    let reader = TileReader::new(
        MemorySegmentSource::new(encode(&collection, &[band.clone()]), "mem://float"),
        collection,
    )
    .unwrap();

    let tile = reader.read_tile(TileRequest::full(0)).await.unwrap();
    assert_eq!(tile.get_double(0), 0.5);
    assert!(tile.get_double(1).is_nan());
    assert_eq!(tile.get_int(3), NODATA_INT);
    assert_eq!(tile.to_raster_data(), band);
}

#[tokio::test]
async fn test_constant_zero_marks_zeros_missing() {
    let layout = SegmentLayout::tiled(4, 1, 4, 1, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::UInt8,
        ByteOrder::BigEndian,
        Some(0.0),
        Compression::None,
    )
    .unwrap();
    let band = RasterData::UInt8(vec![0, 1, 0, 2]);
    let reader = TileReader::new(
        MemorySegmentSource::new(encode(&collection, &[band]), "mem://zero"),
        collection,
    )
    .unwrap();

    let tile = reader.read_tile(TileRequest::full(0)).await.unwrap();
    assert!(tile.is_nodata(0));
    assert_eq!(tile.get_int(1), 1);
    assert!(tile.is_nodata(2));
    assert_eq!(tile.get_int(3), 2);
}

#[tokio::test]
async fn test_int32_min_survives_with_user_nodata() {
    let layout = SegmentLayout::tiled(3, 1, 2, 1, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::Int32,
        ByteOrder::LittleEndian,
        Some(-9999.0),
        Compression::Deflate,
    )
    .unwrap();
    let band = RasterData::Int32(vec![i32::MIN, 5, -9999]);
    let reader = TileReader::new(
        MemorySegmentSource::new(encode(&collection, &[band.clone()]), "mem://int32-min"),
        collection,
    )
    .unwrap();

    let tile = reader.read_tile(TileRequest::full(0)).await.unwrap();
    assert!(!tile.is_nodata(0));
    assert!(tile.is_nodata(2));
    assert_eq!(tile.to_raster_data(), band);
}

#[tokio::test]
async fn test_float_nan_survives_with_user_nodata() {
    let layout = SegmentLayout::tiled(2, 1, 2, 1, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::Float64,
        ByteOrder::BigEndian,
        Some(-9999.0),
        Compression::None,
    )
    .unwrap();
    let reader = TileReader::new(
        MemorySegmentSource::new(
            encode(&collection, &[RasterData::Float64(vec![f64::NAN, -9999.0])]),
            "mem://nan",
        ),
        collection,
    )
    .unwrap();

    let tile = reader.read_tile(TileRequest::full(0)).await.unwrap();
    assert!(!tile.is_nodata(0));
    assert!(tile.is_nodata(1));
    match tile.to_raster_data() {
        RasterData::Float64(values) => {
            assert!(values[0].is_nan());
            assert_eq!(values[1], -9999.0);
        }
        other => panic!("unexpected buffer {:?}", other),
    }
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_corrupt_deflate_segment_reports_index() {
    let layout = SegmentLayout::tiled(4, 2, 2, 2, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::UInt8,
        ByteOrder::BigEndian,
        None,
        Compression::Deflate,
    )
    .unwrap();
    let mut segments = encode(&collection, &build_bands(SampleType::UInt8, &layout));
    segments[1] = Bytes::from_static(b"definitely not zlib");

    let reader =
        TileReader::new(MemorySegmentSource::new(segments, "mem://corrupt"), collection).unwrap();
    let result = reader.read_tile(TileRequest::full(0)).await;
    assert!(matches!(
        result,
        Err(TileError::Segment {
            index: 1,
            source: CodecError::CorruptSegment(_) | CodecError::SizeMismatch { .. }
        })
    ));
}

#[tokio::test]
async fn test_window_outside_raster_rejected() {
    let layout = SegmentLayout::tiled(4, 4, 2, 2, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::UInt8,
        ByteOrder::BigEndian,
        None,
        Compression::None,
    )
    .unwrap();
    let segments = encode(&collection, &build_bands(SampleType::UInt8, &layout));
    let reader =
        TileReader::new(MemorySegmentSource::new(segments, "mem://bounds"), collection).unwrap();

    let result = reader
        .read_tile(TileRequest::window(0, PixelWindow::new(2, 2, 3, 1)))
        .await;
    assert!(matches!(result, Err(TileError::InvalidWindow(_))));
}

#[tokio::test]
async fn test_window_offset_overflow_rejected() {
    let layout = SegmentLayout::tiled(4, 4, 2, 2, 1, Interleave::Pixel).unwrap();
    let collection = SegmentCollection::new(
        layout,
        SampleType::UInt8,
        ByteOrder::BigEndian,
        None,
        Compression::None,
    )
    .unwrap();
    let segments = encode(&collection, &build_bands(SampleType::UInt8, &layout));
    let reader =
        TileReader::new(MemorySegmentSource::new(segments, "mem://overflow"), collection).unwrap();

    let result = reader
        .read_tile(TileRequest::window(0, PixelWindow::new(usize::MAX, 0, 1, 1)))
        .await;
    assert!(matches!(result, Err(TileError::InvalidWindow(_))));
}
