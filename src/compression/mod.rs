//! Compression boundary for stored segments.
//!
//! The codec treats compression as opaque: a [`Decompressor`] turns the bytes of
//! one stored segment into raw sample bytes, a [`Compressor`] does the reverse.
//! Both are pure and deterministic, so a failure is always a
//! [`CodecError::CorruptSegment`] and never worth retrying.

mod deflate;
mod packbits;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

pub use deflate::DeflateCodec;
pub use packbits::PackBitsCodec;

// =============================================================================
// Boundary Traits
// =============================================================================

/// Turns one compressed segment into raw sample bytes.
pub trait Decompressor: Send + Sync {
    /// Decompress the segment stored at `segment_index`.
    ///
    /// The index is informational (error messages, per-segment tables); the
    /// output depends only on `compressed`.
    fn decompress(&self, compressed: &[u8], segment_index: usize) -> Result<Vec<u8>, CodecError>;
}

/// Turns raw sample bytes into one compressed segment.
pub trait Compressor: Send + Sync {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// Identity codec for uncompressed segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompression;

impl Decompressor for NoCompression {
    fn decompress(&self, compressed: &[u8], _segment_index: usize) -> Result<Vec<u8>, CodecError> {
        Ok(compressed.to_vec())
    }
}

impl Compressor for NoCompression {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(raw.to_vec())
    }
}

// =============================================================================
// Compression Values
// =============================================================================

/// Compression schemes this crate can read and write.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Stored as-is (TIFF code 1)
    #[default]
    None,

    /// zlib/deflate (TIFF codes 8 and 32946)
    Deflate,

    /// PackBits run-length encoding (TIFF code 32773)
    #[value(name = "packbits")]
    PackBits,
}

impl Compression {
    /// Create a Compression from its TIFF Compression tag value.
    ///
    /// Returns `None` for schemes without a codec here (LZW, JPEG, ...).
    pub fn from_tiff_code(value: u16) -> Option<Self> {
        match value {
            1 => Some(Compression::None),
            8 | 32946 => Some(Compression::Deflate),
            32773 => Some(Compression::PackBits),
            _ => None,
        }
    }

    /// The TIFF Compression tag value written for this scheme.
    pub const fn tiff_code(self) -> u16 {
        match self {
            Compression::None => 1,
            Compression::Deflate => 8,
            Compression::PackBits => 32773,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Compression::None => "None",
            Compression::Deflate => "Deflate",
            Compression::PackBits => "PackBits",
        }
    }

    pub fn decompressor(self) -> Arc<dyn Decompressor> {
        match self {
            Compression::None => Arc::new(NoCompression),
            Compression::Deflate => Arc::new(DeflateCodec::default()),
            Compression::PackBits => Arc::new(PackBitsCodec),
        }
    }

    pub fn compressor(self) -> Arc<dyn Compressor> {
        match self {
            Compression::None => Arc::new(NoCompression),
            Compression::Deflate => Arc::new(DeflateCodec::default()),
            Compression::PackBits => Arc::new(PackBitsCodec),
        }
    }
}
