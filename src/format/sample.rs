//! Sample types and their per-type capability table.
//!
//! [`SampleType`] is the runtime tag a layer declares. [`Sample`] is the
//! compile-time side: one implementation per Rust element type, carrying raw
//! read/write, numeric coercion and bit-pattern comparison. Generic code is
//! written once against `Sample` and monomorphized per type, so picking a
//! sample type happens once at construction rather than on every access.
//!
//! # Coercion rules
//!
//! - Narrowing from `f64` truncates toward zero, then wraps to the target width.
//! - Narrowing from `i32` wraps to the target width.
//! - Widening sign-extends signed types and zero-extends unsigned ones.
//! - Floating NaN has no integer value and reads as [`NODATA_INT`].
//! - Bit samples keep only the lowest bit of an integer.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

use super::bitpack;
use super::byte_order::ByteOrder;
use super::writable::RasterData;

/// Integer marker for "no data" returned by integer accessors.
pub const NODATA_INT: i32 = i32::MIN;

/// Floating marker for "no data" returned by floating accessors.
pub const NODATA_DOUBLE: f64 = f64::NAN;

/// Check whether an integer read is the NoData marker.
#[inline]
pub fn is_nodata_int(value: i32) -> bool {
    value == NODATA_INT
}

/// Check whether a floating read is the NoData marker.
#[inline]
pub fn is_nodata_double(value: f64) -> bool {
    value.is_nan()
}

// =============================================================================
// SampleType
// =============================================================================

/// Representation of one raster sample.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    /// 1-bit, packed MSB-first
    #[value(name = "bit")]
    Bit,
    #[value(name = "int8")]
    Int8,
    #[value(name = "uint8")]
    UInt8,
    #[value(name = "int16")]
    Int16,
    #[value(name = "uint16")]
    UInt16,
    #[value(name = "int32")]
    Int32,
    #[value(name = "float32")]
    Float32,
    #[value(name = "float64")]
    Float64,
}

/// TIFF SampleFormat tag values.
const SAMPLE_FORMAT_UNSIGNED: u16 = 1;
const SAMPLE_FORMAT_SIGNED: u16 = 2;
const SAMPLE_FORMAT_FLOAT: u16 = 3;

impl SampleType {
    /// Width of one sample in bits.
    #[inline]
    pub const fn bits(self) -> usize {
        match self {
            SampleType::Bit => 1,
            SampleType::Int8 | SampleType::UInt8 => 8,
            SampleType::Int16 | SampleType::UInt16 => 16,
            SampleType::Int32 | SampleType::Float32 => 32,
            SampleType::Float64 => 64,
        }
    }

    /// Width of one sample in whole bytes.
    ///
    /// Bit samples report 1 here; their packed size depends on the row width,
    /// see [`bitpack::packed_len`].
    #[inline]
    pub const fn byte_width(self) -> usize {
        match self {
            SampleType::Bit => 1,
            other => other.bits() / 8,
        }
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            SampleType::Int8
                | SampleType::Int16
                | SampleType::Int32
                | SampleType::Float32
                | SampleType::Float64
        )
    }

    #[inline]
    pub const fn is_floating(self) -> bool {
        matches!(self, SampleType::Float32 | SampleType::Float64)
    }

    /// Number of bytes a `cols` x `rows` block of this type occupies on disk.
    pub fn encoded_len(self, cols: usize, rows: usize) -> usize {
        match self {
            SampleType::Bit => bitpack::packed_len(cols, rows),
            other => cols * rows * other.byte_width(),
        }
    }

    /// Map TIFF BitsPerSample / SampleFormat to a sample type.
    ///
    /// # Errors
    ///
    /// `UnsupportedSampleType` for any combination not listed on the enum.
    pub fn from_tiff(bits_per_sample: u16, sample_format: u16) -> Result<Self, CodecError> {
        match (bits_per_sample, sample_format) {
            (1, SAMPLE_FORMAT_UNSIGNED) => Ok(SampleType::Bit),
            (8, SAMPLE_FORMAT_SIGNED) => Ok(SampleType::Int8),
            (8, SAMPLE_FORMAT_UNSIGNED) => Ok(SampleType::UInt8),
            (16, SAMPLE_FORMAT_SIGNED) => Ok(SampleType::Int16),
            (16, SAMPLE_FORMAT_UNSIGNED) => Ok(SampleType::UInt16),
            (32, SAMPLE_FORMAT_SIGNED) => Ok(SampleType::Int32),
            (32, SAMPLE_FORMAT_FLOAT) => Ok(SampleType::Float32),
            (64, SAMPLE_FORMAT_FLOAT) => Ok(SampleType::Float64),
            _ => Err(CodecError::UnsupportedSampleType(format!(
                "bits per sample {} with sample format {}",
                bits_per_sample, sample_format
            ))),
        }
    }
}

// =============================================================================
// Sample capability table
// =============================================================================

/// Per-type capabilities used by every generic segment operation.
pub trait Sample: Copy + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    const SAMPLE_TYPE: SampleType;

    /// The type's natural zero bit pattern.
    fn zero() -> Self;

    fn from_int(value: i32) -> Self;

    fn from_double(value: f64) -> Self;

    fn to_int(self) -> i32;

    fn to_double(self) -> f64;

    /// Whether `value` can be stored in this type without wrapping.
    fn is_representable(value: f64) -> bool;

    /// Bit-pattern equality; unlike `==`, NaN matches NaN.
    #[inline]
    fn same_pattern(self, other: Self) -> bool {
        self == other
    }

    /// Decode a `cols` x `rows` block of raw bytes.
    fn decode_all(
        bytes: &[u8],
        order: ByteOrder,
        cols: usize,
        rows: usize,
    ) -> Result<Vec<Self>, CodecError>;

    /// Encode a `cols` x `rows` block into raw bytes.
    fn encode_all(
        values: &[Self],
        order: ByteOrder,
        cols: usize,
        rows: usize,
    ) -> Result<Vec<u8>, CodecError>;

    fn into_raster_data(values: Vec<Self>) -> RasterData;

    /// Borrow the values of `data` if it holds this type.
    fn values_of(data: &RasterData) -> Option<&[Self]>;
}

fn decode_fixed<T, const N: usize>(
    bytes: &[u8],
    order: ByteOrder,
    count: usize,
    le: fn([u8; N]) -> T,
    be: fn([u8; N]) -> T,
) -> Result<Vec<T>, CodecError> {
    if bytes.len() != count * N {
        return Err(CodecError::SizeMismatch {
            context: "sample decode",
            expected: count * N,
            actual: bytes.len(),
        });
    }

    let convert = match order {
        ByteOrder::LittleEndian => le,
        ByteOrder::BigEndian => be,
    };

    Ok(bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut raw = [0u8; N];
            raw.copy_from_slice(chunk);
            convert(raw)
        })
        .collect())
}

fn encode_fixed<T: Copy, const N: usize>(
    values: &[T],
    order: ByteOrder,
    count: usize,
    le: fn(T) -> [u8; N],
    be: fn(T) -> [u8; N],
) -> Result<Vec<u8>, CodecError> {
    if values.len() != count {
        return Err(CodecError::SizeMismatch {
            context: "sample encode",
            expected: count,
            actual: values.len(),
        });
    }

    let convert = match order {
        ByteOrder::LittleEndian => le,
        ByteOrder::BigEndian => be,
    };

    let mut out = Vec::with_capacity(values.len() * N);
    for &value in values {
        out.extend_from_slice(&convert(value));
    }
    Ok(out)
}

macro_rules! impl_integer_sample {
    ($ty:ty, $variant:ident, $width:literal) => {
        impl Sample for $ty {
            const SAMPLE_TYPE: SampleType = SampleType::$variant;

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn from_int(value: i32) -> Self {
                value as $ty
            }

            #[inline]
            fn from_double(value: f64) -> Self {
                value as i64 as $ty
            }

            #[inline]
            fn to_int(self) -> i32 {
                self as i32
            }

            #[inline]
            fn to_double(self) -> f64 {
                self as f64
            }

            fn is_representable(value: f64) -> bool {
                value.is_finite() && value >= <$ty>::MIN as f64 && value <= <$ty>::MAX as f64
            }

            fn decode_all(
                bytes: &[u8],
                order: ByteOrder,
                cols: usize,
                rows: usize,
            ) -> Result<Vec<Self>, CodecError> {
                decode_fixed::<$ty, $width>(
                    bytes,
                    order,
                    cols * rows,
                    <$ty>::from_le_bytes,
                    <$ty>::from_be_bytes,
                )
            }

            fn encode_all(
                values: &[Self],
                order: ByteOrder,
                cols: usize,
                rows: usize,
            ) -> Result<Vec<u8>, CodecError> {
                encode_fixed::<$ty, $width>(
                    values,
                    order,
                    cols * rows,
                    <$ty>::to_le_bytes,
                    <$ty>::to_be_bytes,
                )
            }

            fn into_raster_data(values: Vec<Self>) -> RasterData {
                RasterData::$variant(values)
            }

            fn values_of(data: &RasterData) -> Option<&[Self]> {
                match data {
                    RasterData::$variant(values) => Some(values),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! impl_float_sample {
    ($ty:ty, $variant:ident, $width:literal) => {
        impl Sample for $ty {
            const SAMPLE_TYPE: SampleType = SampleType::$variant;

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn from_int(value: i32) -> Self {
                value as $ty
            }

            #[inline]
            fn from_double(value: f64) -> Self {
                value as $ty
            }

            #[inline]
            fn to_int(self) -> i32 {
                if self.is_nan() {
                    NODATA_INT
                } else {
                    self as i32
                }
            }

            #[inline]
            fn to_double(self) -> f64 {
                self as f64
            }

            fn is_representable(value: f64) -> bool {
                !value.is_finite() || value.abs() <= <$ty>::MAX as f64
            }

            #[inline]
            fn same_pattern(self, other: Self) -> bool {
                self == other || (self.is_nan() && other.is_nan())
            }

            fn decode_all(
                bytes: &[u8],
                order: ByteOrder,
                cols: usize,
                rows: usize,
            ) -> Result<Vec<Self>, CodecError> {
                decode_fixed::<$ty, $width>(
                    bytes,
                    order,
                    cols * rows,
                    <$ty>::from_le_bytes,
                    <$ty>::from_be_bytes,
                )
            }

            fn encode_all(
                values: &[Self],
                order: ByteOrder,
                cols: usize,
                rows: usize,
            ) -> Result<Vec<u8>, CodecError> {
                encode_fixed::<$ty, $width>(
                    values,
                    order,
                    cols * rows,
                    <$ty>::to_le_bytes,
                    <$ty>::to_be_bytes,
                )
            }

            fn into_raster_data(values: Vec<Self>) -> RasterData {
                RasterData::$variant(values)
            }

            fn values_of(data: &RasterData) -> Option<&[Self]> {
                match data {
                    RasterData::$variant(values) => Some(values),
                    _ => None,
                }
            }
        }
    };
}

impl_integer_sample!(i8, Int8, 1);
impl_integer_sample!(u8, UInt8, 1);
impl_integer_sample!(i16, Int16, 2);
impl_integer_sample!(u16, UInt16, 2);
impl_integer_sample!(i32, Int32, 4);
impl_float_sample!(f32, Float32, 4);
impl_float_sample!(f64, Float64, 8);

// Byte order is irrelevant for packed bits.
impl Sample for bool {
    const SAMPLE_TYPE: SampleType = SampleType::Bit;

    #[inline]
    fn zero() -> Self {
        false
    }

    #[inline]
    fn from_int(value: i32) -> Self {
        value & 1 == 1
    }

    #[inline]
    fn from_double(value: f64) -> Self {
        Self::from_int(value as i64 as i32)
    }

    #[inline]
    fn to_int(self) -> i32 {
        self as i32
    }

    #[inline]
    fn to_double(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn is_representable(value: f64) -> bool {
        value == 0.0 || value == 1.0
    }

    fn decode_all(
        bytes: &[u8],
        _order: ByteOrder,
        cols: usize,
        rows: usize,
    ) -> Result<Vec<Self>, CodecError> {
        bitpack::unpack(bytes, cols, rows)
    }

    fn encode_all(
        values: &[Self],
        _order: ByteOrder,
        cols: usize,
        rows: usize,
    ) -> Result<Vec<u8>, CodecError> {
        bitpack::pack(values, cols, rows)
    }

    fn into_raster_data(values: Vec<Self>) -> RasterData {
        RasterData::Bit(values)
    }

    fn values_of(data: &RasterData) -> Option<&[Self]> {
        match data {
            RasterData::Bit(values) => Some(values),
            _ => None,
        }
    }
}

/// Run `$body` with `$t` bound to the Rust element type of `$sample_type`.
///
/// ```ignore
/// let len = dispatch_sample_type!(sample_type, T => std::mem::size_of::<T>());
/// ```
macro_rules! dispatch_sample_type {
    ($sample_type:expr, $t:ident => $body:expr) => {
        match $sample_type {
            $crate::format::SampleType::Bit => {
                type $t = bool;
                $body
            }
            $crate::format::SampleType::Int8 => {
                type $t = i8;
                $body
            }
            $crate::format::SampleType::UInt8 => {
                type $t = u8;
                $body
            }
            $crate::format::SampleType::Int16 => {
                type $t = i16;
                $body
            }
            $crate::format::SampleType::UInt16 => {
                type $t = u16;
                $body
            }
            $crate::format::SampleType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::format::SampleType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::format::SampleType::Float64 => {
                type $t = f64;
                $body
            }
        }
    };
}

pub(crate) use dispatch_sample_type;

// =============================================================================
// Tests
// =============================================================================
