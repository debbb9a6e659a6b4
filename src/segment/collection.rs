//! Segment collection: decoder selection for one raster layer.
//!
//! A collection is built once per layer. It classifies the layer's declared
//! NoData value, checks that the classification is meaningful for the sample
//! type, and from then on turns compressed segments into typed segments (and
//! back) without re-examining either.

use std::fmt;
use std::sync::Arc;

use crate::compression::{Compression, Compressor, Decompressor};
use crate::error::CodecError;
use crate::format::{ByteOrder, SampleType};

use super::decoder::{decode_segment, filled_segment, DecodedSegment, SegmentValues};
use super::layout::SegmentLayout;
use super::nodata::NoDataPolicy;

/// Decodes and encodes the segments of one layer.
#[derive(Clone)]
pub struct SegmentCollection {
    layout: SegmentLayout,
    sample_type: SampleType,
    byte_order: ByteOrder,
    policy: NoDataPolicy,
    compression: Option<Compression>,
    decompressor: Arc<dyn Decompressor>,
    compressor: Arc<dyn Compressor>,
}

impl fmt::Debug for SegmentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentCollection")
            .field("layout", &self.layout)
            .field("sample_type", &self.sample_type)
            .field("byte_order", &self.byte_order)
            .field("policy", &self.policy)
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}

impl SegmentCollection {
    /// Create a collection using one of the built-in compression schemes.
    ///
    /// # Errors
    ///
    /// - `SizeMismatch` if the layout has a zero dimension
    /// - `UnsupportedSampleType` if `declared_nodata` has no meaning for
    ///   `sample_type`
    pub fn new(
        layout: SegmentLayout,
        sample_type: SampleType,
        byte_order: ByteOrder,
        declared_nodata: Option<f64>,
        compression: Compression,
    ) -> Result<Self, CodecError> {
        let mut collection = Self::with_codecs(
            layout,
            sample_type,
            byte_order,
            declared_nodata,
            compression.decompressor(),
            compression.compressor(),
        )?;
        collection.compression = Some(compression);
        Ok(collection)
    }

    /// Create a collection around caller-supplied compression codecs.
    pub fn with_codecs(
        layout: SegmentLayout,
        sample_type: SampleType,
        byte_order: ByteOrder,
        declared_nodata: Option<f64>,
        decompressor: Arc<dyn Decompressor>,
        compressor: Arc<dyn Compressor>,
    ) -> Result<Self, CodecError> {
        layout.validate()?;
        let policy = NoDataPolicy::from_declared(declared_nodata);
        policy.validate_for(sample_type)?;

        Ok(Self {
            layout,
            sample_type,
            byte_order,
            policy,
            compression: None,
            decompressor,
            compressor,
        })
    }

    pub fn layout(&self) -> &SegmentLayout {
        &self.layout
    }

    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn policy(&self) -> NoDataPolicy {
        self.policy
    }

    /// The built-in scheme this collection was created with, `None` for
    /// caller-supplied codecs.
    pub fn compression(&self) -> Option<Compression> {
        self.compression
    }

    fn check_index(&self, index: usize) -> Result<(), CodecError> {
        let count = self.layout.segment_count();
        if index >= count {
            return Err(CodecError::OutOfBounds { index, len: count });
        }
        Ok(())
    }

    /// Decompress and decode the segment stored at `index`.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if `index` is not a segment of this layout
    /// - `CorruptSegment` from the decompressor
    /// - `SizeMismatch` if the decompressed length does not match the
    ///   segment's stored dimensions
    pub fn decompress_segment(
        &self,
        index: usize,
        compressed: &[u8],
    ) -> Result<DecodedSegment, CodecError> {
        self.check_index(index)?;
        let raw = self.decompressor.decompress(compressed, index)?;
        let (cols, rows) = self.layout.stored_sample_dimensions(index);
        decode_segment(
            self.sample_type,
            &raw,
            self.byte_order,
            cols,
            rows,
            self.policy,
        )
    }

    /// A segment for `index` with every sample set to NoData (zero without a
    /// policy), ready to be filled by the write path.
    pub fn new_segment(&self, index: usize) -> Result<DecodedSegment, CodecError> {
        self.check_index(index)?;
        let (cols, rows) = self.layout.stored_sample_dimensions(index);
        filled_segment(self.sample_type, cols, rows, self.policy)
    }

    /// Encode and compress `segment` as the segment stored at `index`.
    pub fn compress_segment(
        &self,
        index: usize,
        segment: &dyn SegmentValues,
    ) -> Result<Vec<u8>, CodecError> {
        self.check_index(index)?;

        if segment.sample_type() != self.sample_type {
            return Err(CodecError::UnsupportedSampleType(format!(
                "segment holds {:?}, layer is {:?}",
                segment.sample_type(),
                self.sample_type
            )));
        }

        let (cols, rows) = self.layout.stored_sample_dimensions(index);
        if segment.len() != cols * rows {
            return Err(CodecError::SizeMismatch {
                context: "segment compress",
                expected: cols * rows,
                actual: segment.len(),
            });
        }

        let raw = segment.encode(self.byte_order)?;
        self.compressor.compress(&raw)
    }
}
