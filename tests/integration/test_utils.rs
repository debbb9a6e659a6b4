//! Test utilities for integration tests.
//!
//! Mock segment sources with request tracking, deterministic band builders and
//! scratch-file helpers.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use raster_segments::error::IoError;
use raster_segments::format::{RasterData, SampleType};
use raster_segments::io::SegmentSource;
use raster_segments::segment::PixelWindow;

// =============================================================================
// Mock Segment Source with Request Tracking
// =============================================================================

/// An in-memory segment source that records which segments were fetched.
pub struct TrackingSegmentSource {
    segments: Vec<Bytes>,
    identifier: String,
    request_count: Arc<AtomicUsize>,
    requests: Arc<RwLock<Vec<usize>>>,
}

impl TrackingSegmentSource {
    pub fn new(segments: Vec<Bytes>, identifier: impl Into<String>) -> Self {
        Self {
            segments,
            identifier: identifier.into(),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub async fn get_requests(&self) -> Vec<usize> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl SegmentSource for TrackingSegmentSource {
    async fn read_segment(&self, index: usize) -> Result<Bytes, IoError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.write().await.push(index);

        self.segments
            .get(index)
            .cloned()
            .ok_or(IoError::SegmentOutOfRange {
                index,
                count: self.segments.len(),
            })
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// =============================================================================
// Raster Builders
// =============================================================================

pub const ALL_SAMPLE_TYPES: [SampleType; 8] = [
    SampleType::Bit,
    SampleType::Int8,
    SampleType::UInt8,
    SampleType::Int16,
    SampleType::UInt16,
    SampleType::Int32,
    SampleType::Float32,
    SampleType::Float64,
];

/// Deterministic, band-dependent sample values covering negatives and
/// fractions where the type has them.
pub fn band_data(sample_type: SampleType, cols: usize, rows: usize, band: usize) -> RasterData {
    let n = cols * rows;
    let b = band as i64;
    match sample_type {
        SampleType::Bit => RasterData::Bit((0..n).map(|i| (i + band) % 3 == 0).collect()),
        SampleType::Int8 => {
            RasterData::Int8((0..n).map(|i| (i as i64 * 7 - 50 + b) as i8).collect())
        }
        SampleType::UInt8 => RasterData::UInt8((0..n).map(|i| (i as i64 * 3 + b) as u8).collect()),
        SampleType::Int16 => {
            RasterData::Int16((0..n).map(|i| (i as i64 * 131 - 1000 + b) as i16).collect())
        }
        SampleType::UInt16 => {
            RasterData::UInt16((0..n).map(|i| (i as i64 * 257 + b) as u16).collect())
        }
        SampleType::Int32 => {
            RasterData::Int32((0..n).map(|i| (i as i64 * 100_003 - 7 + b) as i32).collect())
        }
        SampleType::Float32 => {
            RasterData::Float32((0..n).map(|i| i as f32 * 0.5 - 3.25 + band as f32).collect())
        }
        SampleType::Float64 => RasterData::Float64(
            (0..n)
                .map(|i| i as f64 * 0.125 - 1.0e6 + band as f64)
                .collect(),
        ),
    }
}

fn crop<T: Clone>(values: &[T], cols: usize, window: &PixelWindow) -> Vec<T> {
    let mut out = Vec::with_capacity(window.size());
    for row in window.row..window.row_end() {
        out.extend_from_slice(&values[row * cols + window.col..row * cols + window.col_end()]);
    }
    out
}

/// The part of a full-raster band inside `window`.
pub fn window_of(data: &RasterData, cols: usize, window: &PixelWindow) -> RasterData {
    match data {
        RasterData::Bit(v) => RasterData::Bit(crop(v, cols, window)),
        RasterData::Int8(v) => RasterData::Int8(crop(v, cols, window)),
        RasterData::UInt8(v) => RasterData::UInt8(crop(v, cols, window)),
        RasterData::Int16(v) => RasterData::Int16(crop(v, cols, window)),
        RasterData::UInt16(v) => RasterData::UInt16(crop(v, cols, window)),
        RasterData::Int32(v) => RasterData::Int32(crop(v, cols, window)),
        RasterData::Float32(v) => RasterData::Float32(crop(v, cols, window)),
        RasterData::Float64(v) => RasterData::Float64(crop(v, cols, window)),
    }
}

// =============================================================================
// Scratch Files
// =============================================================================

/// A path under the system temp directory unique to this process and `name`.
pub fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "raster-segments-it-{}-{}",
        std::process::id(),
        name
    ))
}
