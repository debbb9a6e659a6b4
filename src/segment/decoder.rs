//! Typed segment decoder.
//!
//! [`Segment`] is one generic buffer parameterized by the [`Sample`] capability
//! table, with its NoData [`Sentinel`] resolved at construction. Accessors then
//! only check an `Option` on each call; there is no per-call match on the
//! sample type or the policy kind.
//!
//! [`SegmentValues`] is the type-erased view handed out by the collection and
//! consumed by the combiner and layout walker.

use std::any::Any;

use crate::error::CodecError;
use crate::format::{dispatch_sample_type, ByteOrder, RasterData, Sample, SampleType};

use super::nodata::{NoDataPolicy, Sentinel};

// =============================================================================
// SegmentValues
// =============================================================================

/// Uniform integer/floating access to a typed segment.
///
/// Indices are row-major sample positions. Accessors panic on an index past
/// [`len`](SegmentValues::len), as slice indexing does.
pub trait SegmentValues: Send + Sync {
    fn sample_type(&self) -> SampleType;

    /// Samples per row (pixels times interleaved bands).
    fn cols(&self) -> usize;

    fn rows(&self) -> usize;

    fn len(&self) -> usize {
        self.cols() * self.rows()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_int(&self, index: usize) -> i32;

    fn get_double(&self, index: usize) -> f64;

    fn set_from_int(&mut self, index: usize, value: i32);

    fn set_from_double(&mut self, index: usize, value: f64);

    /// Whether the stored sample is the NoData pattern.
    fn is_nodata(&self, index: usize) -> bool;

    /// Encode every sample in `order`.
    fn encode(&self, order: ByteOrder) -> Result<Vec<u8>, CodecError>;

    /// Copy the stored samples out as a typed buffer, sentinel patterns included.
    fn to_raster_data(&self) -> RasterData;

    /// Copy sample `source_index` of `source` into `index`.
    ///
    /// Between segments of the same layer the stored pattern is copied as-is,
    /// so values that collide with the in-memory markers (`i32::MIN`, a
    /// genuine NaN) survive. Otherwise the sample goes through the accessors.
    fn copy_sample(&mut self, index: usize, source: &dyn SegmentValues, source_index: usize);

    fn as_any(&self) -> &dyn Any;
}

/// Move one sample through the NoData-substituting accessors.
#[inline]
fn transfer_through_accessors(
    target: &mut dyn SegmentValues,
    index: usize,
    source: &dyn SegmentValues,
    source_index: usize,
) {
    if source.sample_type().is_floating() {
        target.set_from_double(index, source.get_double(source_index));
    } else {
        target.set_from_int(index, source.get_int(source_index));
    }
}

/// A decoded segment of any sample type.
pub type DecodedSegment = Box<dyn SegmentValues>;

// =============================================================================
// Segment
// =============================================================================

/// Fixed-size buffer of one sample type with NoData substitution on access.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<T: Sample> {
    values: Vec<T>,
    cols: usize,
    rows: usize,
    sentinel: Option<Sentinel<T>>,
}

impl<T: Sample> Segment<T> {
    /// Decode raw (decompressed) bytes of a `cols` x `rows` segment.
    pub fn decode(
        bytes: &[u8],
        order: ByteOrder,
        cols: usize,
        rows: usize,
        policy: NoDataPolicy,
    ) -> Result<Self, CodecError> {
        let sentinel = policy.sentinel::<T>()?;
        let values = T::decode_all(bytes, order, cols, rows)?;
        Ok(Self {
            values,
            cols,
            rows,
            sentinel,
        })
    }

    /// Wrap existing values.
    pub fn from_values(
        values: Vec<T>,
        cols: usize,
        rows: usize,
        policy: NoDataPolicy,
    ) -> Result<Self, CodecError> {
        if values.len() != cols * rows {
            return Err(CodecError::SizeMismatch {
                context: "segment values",
                expected: cols * rows,
                actual: values.len(),
            });
        }
        let sentinel = policy.sentinel::<T>()?;
        Ok(Self {
            values,
            cols,
            rows,
            sentinel,
        })
    }

    /// A segment where every sample reads as NoData (or zero without a policy).
    pub fn filled(cols: usize, rows: usize, policy: NoDataPolicy) -> Result<Self, CodecError> {
        let sentinel = policy.sentinel::<T>()?;
        let fill = sentinel.map_or_else(T::zero, |s| s.pattern());
        Ok(Self {
            values: vec![fill; cols * rows],
            cols,
            rows,
            sentinel,
        })
    }

    pub fn sentinel(&self) -> Option<Sentinel<T>> {
        self.sentinel
    }

    /// Stored samples, sentinel patterns included.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    fn shares_sentinel(&self, other: &Segment<T>) -> bool {
        match (&self.sentinel, &other.sentinel) {
            (None, None) => true,
            (Some(a), Some(b)) => a.pattern().same_pattern(b.pattern()),
            _ => false,
        }
    }
}

impl<T: Sample> SegmentValues for Segment<T> {
    fn sample_type(&self) -> SampleType {
        T::SAMPLE_TYPE
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn get_int(&self, index: usize) -> i32 {
        let raw = self.values[index];
        match &self.sentinel {
            Some(sentinel) => sentinel.read_int(raw),
            None => raw.to_int(),
        }
    }

    #[inline]
    fn get_double(&self, index: usize) -> f64 {
        let raw = self.values[index];
        match &self.sentinel {
            Some(sentinel) => sentinel.read_double(raw),
            None => raw.to_double(),
        }
    }

    #[inline]
    fn set_from_int(&mut self, index: usize, value: i32) {
        self.values[index] = match &self.sentinel {
            Some(sentinel) => sentinel.write_int(value),
            None => T::from_int(value),
        };
    }

    #[inline]
    fn set_from_double(&mut self, index: usize, value: f64) {
        self.values[index] = match &self.sentinel {
            Some(sentinel) => sentinel.write_double(value),
            None => T::from_double(value),
        };
    }

    #[inline]
    fn is_nodata(&self, index: usize) -> bool {
        self.sentinel
            .as_ref()
            .is_some_and(|sentinel| sentinel.matches(self.values[index]))
    }

    fn encode(&self, order: ByteOrder) -> Result<Vec<u8>, CodecError> {
        T::encode_all(&self.values, order, self.cols, self.rows)
    }

    fn to_raster_data(&self) -> RasterData {
        T::into_raster_data(self.values.clone())
    }

    #[inline]
    fn copy_sample(&mut self, index: usize, source: &dyn SegmentValues, source_index: usize) {
        match source.as_any().downcast_ref::<Segment<T>>() {
            Some(typed) if self.shares_sentinel(typed) => {
                self.values[index] = typed.values[source_index];
            }
            _ => transfer_through_accessors(self, index, source, source_index),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Type-erased constructors
// =============================================================================

/// Decode raw bytes into a segment of the given sample type.
pub fn decode_segment(
    sample_type: SampleType,
    bytes: &[u8],
    order: ByteOrder,
    cols: usize,
    rows: usize,
    policy: NoDataPolicy,
) -> Result<DecodedSegment, CodecError> {
    dispatch_sample_type!(sample_type, T => {
        let segment = Segment::<T>::decode(bytes, order, cols, rows, policy)?;
        Ok(Box::new(segment) as DecodedSegment)
    })
}

/// Allocate a segment whose samples all read as NoData (zero without a policy).
pub fn filled_segment(
    sample_type: SampleType,
    cols: usize,
    rows: usize,
    policy: NoDataPolicy,
) -> Result<DecodedSegment, CodecError> {
    dispatch_sample_type!(sample_type, T => {
        let segment = Segment::<T>::filled(cols, rows, policy)?;
        Ok(Box::new(segment) as DecodedSegment)
    })
}

/// View a typed buffer through the NoData policy of its layer.
pub fn segment_from_raster_data(
    data: RasterData,
    cols: usize,
    rows: usize,
    policy: NoDataPolicy,
) -> Result<DecodedSegment, CodecError> {
    fn wrap<T: Sample>(
        data: RasterData,
        cols: usize,
        rows: usize,
        policy: NoDataPolicy,
    ) -> Result<DecodedSegment, CodecError> {
        let values = T::values_of(&data)
            .map(<[T]>::to_vec)
            .ok_or_else(|| {
                CodecError::UnsupportedSampleType(format!(
                    "buffer holds {:?}, expected {:?}",
                    data.sample_type(),
                    T::SAMPLE_TYPE
                ))
            })?;
        Ok(Box::new(Segment::<T>::from_values(values, cols, rows, policy)?) as DecodedSegment)
    }

    dispatch_sample_type!(data.sample_type(), T => wrap::<T>(data, cols, rows, policy))
}

// =============================================================================
// Tests
// =============================================================================
