//! NoData conventions.
//!
//! A layer declares at most one NoData value. That declaration is classified
//! once into a [`NoDataPolicy`], and each typed segment resolves the policy into
//! a [`Sentinel`]: the reserved bit pattern for its sample type. Reads that hit
//! the pattern report [`NODATA_INT`] / [`NODATA_DOUBLE`]; writes of those
//! markers store the pattern.
//!
//! `ConstantZero` reserves the type's zero pattern, which makes a genuine zero
//! sample indistinguishable from a missing one. That is the convention as
//! declared by the data, and it is kept as-is.

use crate::error::CodecError;
use crate::format::{
    is_nodata_double, is_nodata_int, Sample, SampleType, NODATA_DOUBLE, NODATA_INT,
};

// =============================================================================
// NoDataPolicy
// =============================================================================

/// How a layer marks missing samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NoDataPolicy {
    /// No sentinel; every bit pattern is data
    #[default]
    None,

    /// The sample type's zero pattern means NoData
    ConstantZero,

    /// The declared value, cast to the sample type, means NoData
    UserDefined(f64),
}

impl NoDataPolicy {
    /// Classify a layer's declared NoData value.
    pub fn from_declared(declared: Option<f64>) -> Self {
        match declared {
            None => NoDataPolicy::None,
            Some(value) if value == 0.0 => NoDataPolicy::ConstantZero,
            Some(value) => NoDataPolicy::UserDefined(value),
        }
    }

    /// The value this policy was declared with, if any.
    pub fn declared_value(&self) -> Option<f64> {
        match self {
            NoDataPolicy::None => None,
            NoDataPolicy::ConstantZero => Some(0.0),
            NoDataPolicy::UserDefined(value) => Some(*value),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, NoDataPolicy::None)
    }

    /// Resolve the policy into a sentinel for sample type `T`.
    ///
    /// # Errors
    ///
    /// `UnsupportedSampleType` when the policy has no meaning for `T`: any
    /// NoData on a bit layer, or a declared value `T` cannot hold.
    pub fn sentinel<T: Sample>(&self) -> Result<Option<Sentinel<T>>, CodecError> {
        if T::SAMPLE_TYPE == SampleType::Bit && !self.is_none() {
            return Err(CodecError::UnsupportedSampleType(
                "bit rasters cannot carry a NoData value".to_string(),
            ));
        }

        match *self {
            NoDataPolicy::None => Ok(None),
            NoDataPolicy::ConstantZero => Ok(Some(Sentinel::new(T::zero()))),
            NoDataPolicy::UserDefined(value) => {
                if !T::is_representable(value) {
                    return Err(CodecError::UnsupportedSampleType(format!(
                        "NoData value {} is not representable as {:?}",
                        value,
                        T::SAMPLE_TYPE
                    )));
                }
                Ok(Some(Sentinel::new(T::from_double(value))))
            }
        }
    }

    /// Check up front that this policy can be applied to `sample_type`.
    pub fn validate_for(&self, sample_type: SampleType) -> Result<(), CodecError> {
        crate::format::dispatch_sample_type!(sample_type, T => self.sentinel::<T>().map(|_| ()))
    }
}

// =============================================================================
// Sentinel
// =============================================================================

/// The reserved bit pattern of one sample type, with its substitution rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentinel<T: Sample> {
    pattern: T,
}

impl<T: Sample> Sentinel<T> {
    pub fn new(pattern: T) -> Self {
        Self { pattern }
    }

    #[inline]
    pub fn pattern(&self) -> T {
        self.pattern
    }

    /// Whether a stored sample is the reserved pattern.
    #[inline]
    pub fn matches(&self, raw: T) -> bool {
        raw.same_pattern(self.pattern)
    }

    /// Integer read of a stored sample, substituting the NoData marker.
    #[inline]
    pub fn read_int(&self, raw: T) -> i32 {
        if self.matches(raw) {
            NODATA_INT
        } else {
            raw.to_int()
        }
    }

    /// Floating read of a stored sample, substituting the NoData marker.
    #[inline]
    pub fn read_double(&self, raw: T) -> f64 {
        if self.matches(raw) {
            NODATA_DOUBLE
        } else {
            raw.to_double()
        }
    }

    /// Stored form of an integer write, mapping the marker to the pattern.
    #[inline]
    pub fn write_int(&self, value: i32) -> T {
        if is_nodata_int(value) {
            self.pattern
        } else {
            T::from_int(value)
        }
    }

    /// Stored form of a floating write, mapping NaN to the pattern.
    #[inline]
    pub fn write_double(&self, value: f64) -> T {
        if is_nodata_double(value) {
            self.pattern
        } else {
            T::from_double(value)
        }
    }
}
