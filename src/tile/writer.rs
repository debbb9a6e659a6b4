//! Write path: whole-band rasters to compressed segments.
//!
//! The inverse of [`TileAssembler`](super::TileAssembler). Each band is cut
//! along the layout's segment grid, pixel-interleaved layouts have their bands
//! woven together, and each segment is compressed. Pixels outside the raster
//! (padding of edge tiles) are written as NoData, or zero when the layer has
//! no NoData value.

use bytes::Bytes;
use tracing::debug;

use crate::error::{CodecError, TileError};
use crate::format::RasterData;
use crate::segment::{segment_from_raster_data, DecodedSegment, Interleave, SegmentCollection};

/// Encodes full-raster bands into the stored segments of one layer.
pub struct SegmentWriter<'a> {
    collection: &'a SegmentCollection,
}

impl<'a> SegmentWriter<'a> {
    pub fn new(collection: &'a SegmentCollection) -> Self {
        Self { collection }
    }

    /// Turn one buffer per band into compressed segments, in index order.
    ///
    /// # Errors
    ///
    /// - `InvalidBand` if the number of buffers differs from the band count
    /// - `Codec` if a buffer has the wrong sample type or length
    /// - `Segment` if encoding or compressing a segment fails
    pub fn write_segments(&self, bands: Vec<RasterData>) -> Result<Vec<Bytes>, TileError> {
        let layout = self.collection.layout();

        if bands.len() != layout.band_count {
            return Err(TileError::InvalidBand {
                band: bands.len(),
                band_count: layout.band_count,
            });
        }

        let bands = bands
            .into_iter()
            .map(|data| {
                if data.sample_type() != self.collection.sample_type() {
                    return Err(CodecError::UnsupportedSampleType(format!(
                        "band holds {:?}, layer is {:?}",
                        data.sample_type(),
                        self.collection.sample_type()
                    )));
                }
                segment_from_raster_data(data, layout.cols, layout.rows, self.collection.policy())
            })
            .collect::<Result<Vec<DecodedSegment>, _>>()?;

        let mut segments = Vec::with_capacity(layout.segment_count());
        for index in 0..layout.segment_count() {
            let segment = self.write_segment(index, &bands)?;
            debug!(segment = index, bytes = segment.len(), "Encoded segment");
            segments.push(segment);
        }

        Ok(segments)
    }

    fn write_segment(&self, index: usize, bands: &[DecodedSegment]) -> Result<Bytes, TileError> {
        let layout = self.collection.layout();
        let wrap = |source| TileError::Segment { index, source };

        let mut segment = self.collection.new_segment(index).map_err(wrap)?;
        let extent = layout.pixel_extent(index);
        let (stored_cols, _) = layout.stored_dimensions(index);
        let samples_per_pixel = layout.samples_per_pixel();

        // (band buffer, sample slot inside the segment)
        let slots: Vec<(usize, usize)> = match layout.interleave {
            Interleave::Pixel => (0..layout.band_count).map(|band| (band, band)).collect(),
            Interleave::Band => vec![(layout.segment_band(index), 0)],
        };

        for row in extent.row..extent.row_end() {
            let local_row = row - extent.row;
            for col in extent.col..extent.col_end() {
                let pixel = local_row * stored_cols + (col - extent.col);
                let source_index = row * layout.cols + col;
                for &(band, slot) in &slots {
                    segment.copy_sample(
                        pixel * samples_per_pixel + slot,
                        bands[band].as_ref(),
                        source_index,
                    );
                }
            }
        }

        let compressed = self
            .collection
            .compress_segment(index, segment.as_ref())
            .map_err(wrap)?;
        Ok(Bytes::from(compressed))
    }
}
