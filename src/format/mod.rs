//! Sample representation and storage-boundary formats.
//!
//! # Key Concepts
//!
//! - **Sample type**: bit width, signedness and integer-vs-floating of one raster
//!   value. Fixes how many bytes a block of pixels occupies.
//!
//! - **Byte order**: source segments keep the byte order of the file they came
//!   from; serialized tiles are always big-endian.
//!
//! - **Bit rasters**: packed MSB-first, each row padded to a whole byte.

pub mod bitpack;
mod byte_order;
mod sample;
mod writable;

pub use byte_order::{ByteOrder, STORAGE_BYTE_ORDER};
pub(crate) use sample::dispatch_sample_type;
pub use sample::{
    is_nodata_double, is_nodata_int, Sample, SampleType, NODATA_DOUBLE, NODATA_INT,
};
pub use writable::{from_raster_data, to_raster_data, RasterData};
