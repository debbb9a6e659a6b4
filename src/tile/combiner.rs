//! Segment combiner.
//!
//! Collects samples from one or more decoded segments into a single tile
//! buffer. The combiner knows nothing about geometry: callers hand it a linear
//! target offset for every sample, and it only guards that the offset lies
//! inside the tile. Mapping source positions to targets (and clipping edge
//! segments) is the job of [`TileAssembler`](super::TileAssembler).

use bytes::Bytes;

use crate::error::CodecError;
use crate::format::{RasterData, SampleType, STORAGE_BYTE_ORDER};
use crate::segment::{filled_segment, DecodedSegment, NoDataPolicy, SegmentValues};

// =============================================================================
// SegmentCombiner
// =============================================================================

/// Builds one [`CombinedTile`] for a single (tile, band) request.
///
/// The buffer starts with every sample set to NoData (zero when the layer has
/// no NoData value), so pixels no segment covers read as missing.
pub struct SegmentCombiner {
    buffer: DecodedSegment,
    cols: usize,
    rows: usize,
}

impl SegmentCombiner {
    pub fn new(
        sample_type: SampleType,
        policy: NoDataPolicy,
        cols: usize,
        rows: usize,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            buffer: filled_segment(sample_type, cols, rows, policy)?,
            cols,
            rows,
        })
    }

    /// Number of samples in the target tile.
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn check(&self, target: usize) -> Result<(), CodecError> {
        if target >= self.len() {
            return Err(CodecError::OutOfBounds {
                index: target,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Place an integer sample at `target`.
    pub fn set(&mut self, target: usize, value: i32) -> Result<(), CodecError> {
        self.check(target)?;
        self.buffer.set_from_int(target, value);
        Ok(())
    }

    /// Place a floating sample at `target`.
    pub fn set_double(&mut self, target: usize, value: f64) -> Result<(), CodecError> {
        self.check(target)?;
        self.buffer.set_from_double(target, value);
        Ok(())
    }

    /// Place sample `source_index` of `source` at `target`.
    pub fn copy_from(
        &mut self,
        target: usize,
        source: &dyn SegmentValues,
        source_index: usize,
    ) -> Result<(), CodecError> {
        self.check(target)?;
        self.buffer.copy_sample(target, source, source_index);
        Ok(())
    }

    /// Stop accepting samples.
    pub fn finish(self) -> CombinedTile {
        CombinedTile {
            buffer: self.buffer,
            cols: self.cols,
            rows: self.rows,
        }
    }

    /// Serialize the tile for the storage boundary.
    pub fn get_bytes(self) -> Result<Bytes, CodecError> {
        self.finish().into_bytes()
    }
}

// =============================================================================
// CombinedTile
// =============================================================================

/// A fully assembled tile for one band.
pub struct CombinedTile {
    buffer: DecodedSegment,
    cols: usize,
    rows: usize,
}

impl CombinedTile {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn sample_type(&self) -> SampleType {
        self.buffer.sample_type()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn get_int(&self, index: usize) -> i32 {
        self.buffer.get_int(index)
    }

    pub fn get_double(&self, index: usize) -> f64 {
        self.buffer.get_double(index)
    }

    pub fn is_nodata(&self, index: usize) -> bool {
        self.buffer.is_nodata(index)
    }

    /// Stored samples, NoData sentinels included.
    pub fn to_raster_data(&self) -> RasterData {
        self.buffer.to_raster_data()
    }

    /// Serialize in the sample type's native width, big-endian.
    pub fn into_bytes(self) -> Result<Bytes, CodecError> {
        Ok(Bytes::from(self.buffer.encode(STORAGE_BYTE_ORDER)?))
    }
}

impl std::fmt::Debug for CombinedTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedTile")
            .field("sample_type", &self.sample_type())
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .finish()
    }
}
