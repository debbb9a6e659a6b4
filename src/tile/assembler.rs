//! Layout walker: drives the combiner for one (tile, band) request.
//!
//! For every segment overlapping the requested window, only pixels inside both
//! the segment's clipped extent and the window are visited. Each one maps to
//!
//! ```text
//! source = (local_row * stored_cols + local_col) * samples_per_pixel + band_slot
//! target = (row - window.row) * window.cols + (col - window.col)
//! ```
//!
//! so padding in edge tiles is never read and no target offset can fall
//! outside the tile.

use crate::error::{CodecError, TileError};
use crate::segment::{Interleave, PixelWindow, SegmentCollection, SegmentValues};

use super::combiner::{CombinedTile, SegmentCombiner};

/// Assembles one band of one window from the segments of a layer.
pub struct TileAssembler<'a> {
    collection: &'a SegmentCollection,
    band: usize,
    window: PixelWindow,
    combiner: SegmentCombiner,
}

impl<'a> TileAssembler<'a> {
    /// Start assembling `window` of `band`.
    ///
    /// # Errors
    ///
    /// - `InvalidBand` if the layout has no such band
    /// - `InvalidWindow` if the window is empty or reaches past the raster
    pub fn new(
        collection: &'a SegmentCollection,
        band: usize,
        window: PixelWindow,
    ) -> Result<Self, TileError> {
        let layout = collection.layout();

        if band >= layout.band_count {
            return Err(TileError::InvalidBand {
                band,
                band_count: layout.band_count,
            });
        }

        if window.is_empty() {
            return Err(TileError::InvalidWindow(format!(
                "window {}x{} is empty",
                window.cols, window.rows
            )));
        }

        if window.col.checked_add(window.cols).is_none()
            || window.row.checked_add(window.rows).is_none()
        {
            return Err(TileError::InvalidWindow(format!(
                "window at ({}, {}) of {}x{} overflows pixel coordinates",
                window.col, window.row, window.cols, window.rows
            )));
        }

        if !layout.full_window().contains(&window) {
            return Err(TileError::InvalidWindow(format!(
                "window at ({}, {}) of {}x{} exceeds raster of {}x{}",
                window.col, window.row, window.cols, window.rows, layout.cols, layout.rows
            )));
        }

        let combiner = SegmentCombiner::new(
            collection.sample_type(),
            collection.policy(),
            window.cols,
            window.rows,
        )?;

        Ok(Self {
            collection,
            band,
            window,
            combiner,
        })
    }

    /// Assemble the whole raster for `band`.
    pub fn full(collection: &'a SegmentCollection, band: usize) -> Result<Self, TileError> {
        let window = collection.layout().full_window();
        Self::new(collection, band, window)
    }

    pub fn band(&self) -> usize {
        self.band
    }

    pub fn window(&self) -> PixelWindow {
        self.window
    }

    /// Segment indices this tile needs, in ascending order.
    pub fn required_segments(&self) -> Vec<usize> {
        self.collection
            .layout()
            .segments_in_window(self.band, &self.window)
    }

    /// Decompress segment `index` and copy its overlap into the tile.
    pub fn add_segment(&mut self, index: usize, compressed: &[u8]) -> Result<(), TileError> {
        let segment = self
            .collection
            .decompress_segment(index, compressed)
            .map_err(|source| TileError::Segment { index, source })?;
        self.add_decoded(index, segment.as_ref())
    }

    /// Copy the overlap of an already decoded segment `index` into the tile.
    pub fn add_decoded(
        &mut self,
        index: usize,
        segment: &dyn SegmentValues,
    ) -> Result<(), TileError> {
        let layout = self.collection.layout();

        if index >= layout.segment_count() {
            return Err(TileError::Segment {
                index,
                source: CodecError::OutOfBounds {
                    index,
                    len: layout.segment_count(),
                },
            });
        }

        let band_slot = match layout.interleave {
            Interleave::Pixel => self.band,
            Interleave::Band => {
                let segment_band = layout.segment_band(index);
                if segment_band != self.band {
                    return Err(TileError::InvalidBand {
                        band: segment_band,
                        band_count: layout.band_count,
                    });
                }
                0
            }
        };

        let (sample_cols, sample_rows) = layout.stored_sample_dimensions(index);
        if segment.cols() != sample_cols || segment.rows() != sample_rows {
            return Err(TileError::Segment {
                index,
                source: CodecError::SizeMismatch {
                    context: "decoded segment",
                    expected: sample_cols * sample_rows,
                    actual: segment.len(),
                },
            });
        }

        let extent = layout.pixel_extent(index);
        let Some(overlap) = extent.intersect(&self.window) else {
            return Ok(());
        };

        let (stored_cols, _) = layout.stored_dimensions(index);
        let samples_per_pixel = layout.samples_per_pixel();

        for row in overlap.row..overlap.row_end() {
            let local_row = row - extent.row;
            let target_row = row - self.window.row;
            for col in overlap.col..overlap.col_end() {
                let pixel = local_row * stored_cols + (col - extent.col);
                let source_index = pixel * samples_per_pixel + band_slot;
                let target = target_row * self.window.cols + (col - self.window.col);
                self.combiner
                    .copy_from(target, segment, source_index)
                    .map_err(|source| TileError::Segment { index, source })?;
            }
        }

        Ok(())
    }

    pub fn finish(self) -> CombinedTile {
        self.combiner.finish()
    }
}
