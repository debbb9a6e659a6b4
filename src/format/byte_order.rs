//! Byte order of stored samples.
//!
//! Source segments are encoded in whatever byte order the raster file declares
//! (TIFF's `II` / `MM` marker). Everything crossing the storage boundary uses
//! [`STORAGE_BYTE_ORDER`] regardless of where it came from.

use serde::{Deserialize, Serialize};

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    #[value(name = "little")]
    #[serde(rename = "little")]
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    #[value(name = "big")]
    #[serde(rename = "big")]
    BigEndian,
}

/// Byte order used for serialized tiles at the storage boundary.
pub const STORAGE_BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;

impl ByteOrder {
    /// Interpret a TIFF byte order marker (`0x4949` or `0x4D4D`).
    pub fn from_tiff_marker(marker: u16) -> Option<Self> {
        match marker {
            0x4949 => Some(ByteOrder::LittleEndian),
            0x4D4D => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        STORAGE_BYTE_ORDER
    }
}
