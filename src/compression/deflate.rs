//! Deflate (zlib) segment codec.
//!
//! TIFF Deflate segments are zlib streams (2-byte header + adler32 trailer).
//! Some writers emit bare deflate streams instead, so decompression falls back
//! to raw deflate when the zlib header is missing.

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;

use crate::error::CodecError;

use super::{Compressor, Decompressor};

/// Default zlib compression level (0-9).
pub const DEFAULT_DEFLATE_LEVEL: u32 = 6;

#[derive(Debug, Clone, Copy)]
pub struct DeflateCodec {
    level: u32,
}

impl DeflateCodec {
    /// Create a codec writing at `level` (clamped to 0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::with_level(DEFAULT_DEFLATE_LEVEL)
    }
}

impl Decompressor for DeflateCodec {
    fn decompress(&self, compressed: &[u8], segment_index: usize) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        if ZlibDecoder::new(compressed).read_to_end(&mut out).is_ok() {
            return Ok(out);
        }

        out.clear();
        DeflateDecoder::new(compressed)
            .read_to_end(&mut out)
            .map_err(|e| {
                CodecError::CorruptSegment(format!("deflate segment {}: {}", segment_index, e))
            })?;
        Ok(out)
    }
}

impl Compressor for DeflateCodec {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::new(self.level));
        encoder
            .write_all(raw)
            .map_err(|e| CodecError::CorruptSegment(format!("deflate: {}", e)))?;
        encoder
            .finish()
            .map_err(|e| CodecError::CorruptSegment(format!("deflate: {}", e)))
    }
}
