//! Conversion between typed pixel buffers and storage-boundary bytes.
//!
//! The storage layer persists tiles as flat byte arrays. Bit rasters go
//! through the bit-pack codec; every other type is written at its native
//! width in [`STORAGE_BYTE_ORDER`], so a `cols` x `rows` tile is always exactly
//! `cols * rows * byte_width` bytes.

use bytes::Bytes;

use crate::error::CodecError;

use super::byte_order::STORAGE_BYTE_ORDER;
use super::sample::{dispatch_sample_type, Sample, SampleType};

// =============================================================================
// RasterData
// =============================================================================

/// A typed, row-major pixel buffer for one band.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterData {
    Bit(Vec<bool>),
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl RasterData {
    pub fn sample_type(&self) -> SampleType {
        match self {
            RasterData::Bit(_) => SampleType::Bit,
            RasterData::Int8(_) => SampleType::Int8,
            RasterData::UInt8(_) => SampleType::UInt8,
            RasterData::Int16(_) => SampleType::Int16,
            RasterData::UInt16(_) => SampleType::UInt16,
            RasterData::Int32(_) => SampleType::Int32,
            RasterData::Float32(_) => SampleType::Float32,
            RasterData::Float64(_) => SampleType::Float64,
        }
    }

    /// Number of samples in the buffer.
    pub fn len(&self) -> usize {
        match self {
            RasterData::Bit(v) => v.len(),
            RasterData::Int8(v) => v.len(),
            RasterData::UInt8(v) => v.len(),
            RasterData::Int16(v) => v.len(),
            RasterData::UInt16(v) => v.len(),
            RasterData::Int32(v) => v.len(),
            RasterData::Float32(v) => v.len(),
            RasterData::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A buffer of `len` zero samples.
    pub fn zeroed(sample_type: SampleType, len: usize) -> Self {
        dispatch_sample_type!(sample_type, T => T::into_raster_data(vec![T::zero(); len]))
    }
}

// =============================================================================
// Boundary Codec
// =============================================================================

/// Serialize a `cols` x `rows` typed buffer for the storage boundary.
///
/// # Errors
///
/// `SizeMismatch` if the buffer does not hold exactly `cols * rows` samples.
pub fn from_raster_data(data: &RasterData, cols: usize, rows: usize) -> Result<Bytes, CodecError> {
    fn encode<T: Sample>(data: &RasterData, cols: usize, rows: usize) -> Result<Bytes, CodecError> {
        let values = T::values_of(data).ok_or_else(|| {
            CodecError::UnsupportedSampleType(format!(
                "buffer holds {:?}, expected {:?}",
                data.sample_type(),
                T::SAMPLE_TYPE
            ))
        })?;
        let bytes = T::encode_all(values, STORAGE_BYTE_ORDER, cols, rows)?;
        Ok(Bytes::from(bytes))
    }

    dispatch_sample_type!(data.sample_type(), T => encode::<T>(data, cols, rows))
}

/// Deserialize storage-boundary bytes into a typed buffer.
///
/// # Errors
///
/// `SizeMismatch` if `bytes` is not exactly the encoded size of a `cols` x
/// `rows` raster of `sample_type`.
pub fn to_raster_data(
    bytes: &[u8],
    sample_type: SampleType,
    cols: usize,
    rows: usize,
) -> Result<RasterData, CodecError> {
    dispatch_sample_type!(sample_type, T => {
        let values = T::decode_all(bytes, STORAGE_BYTE_ORDER, cols, rows)?;
        Ok(T::into_raster_data(values))
    })
}

// =============================================================================
// Tests
// =============================================================================
