//! Bit-pack codec for 1-bit rasters.
//!
//! Layout on disk is MSB-first within each byte, row-major, and every row
//! starts on a fresh byte:
//!
//! ```text
//! cols = 10, rows = 2
//!
//! row 0: [b0 b1 b2 b3 b4 b5 b6 b7] [b8 b9 0  0  0  0  0  0 ]
//! row 1: [b0 b1 b2 b3 b4 b5 b6 b7] [b8 b9 0  0  0  0  0  0 ]
//! ```
//!
//! Padding bits are written as zero and ignored on read.

use crate::error::CodecError;

/// Number of bytes one packed row of `cols` bits occupies.
#[inline]
pub fn row_bytes(cols: usize) -> usize {
    cols.div_ceil(8)
}

/// Total packed size of a `cols` x `rows` bit raster.
#[inline]
pub fn packed_len(cols: usize, rows: usize) -> usize {
    row_bytes(cols) * rows
}

/// Pack a row-major bit sequence into padded MSB-first bytes.
///
/// # Errors
///
/// `SizeMismatch` if `bits.len() != cols * rows`.
pub fn pack(bits: &[bool], cols: usize, rows: usize) -> Result<Vec<u8>, CodecError> {
    if bits.len() != cols * rows {
        return Err(CodecError::SizeMismatch {
            context: "bit pack",
            expected: cols * rows,
            actual: bits.len(),
        });
    }

    let stride = row_bytes(cols);
    let mut out = vec![0u8; stride * rows];

    if cols == 0 {
        return Ok(out);
    }

    for (row, row_bits) in bits.chunks_exact(cols).enumerate() {
        let row_out = &mut out[row * stride..(row + 1) * stride];
        for (col, &bit) in row_bits.iter().enumerate() {
            if bit {
                row_out[col / 8] |= 0x80 >> (col % 8);
            }
        }
    }

    Ok(out)
}

/// Unpack padded MSB-first bytes into a row-major bit sequence.
///
/// # Errors
///
/// `SizeMismatch` if `bytes.len()` is not exactly the packed size of a
/// `cols` x `rows` raster.
pub fn unpack(bytes: &[u8], cols: usize, rows: usize) -> Result<Vec<bool>, CodecError> {
    let expected = packed_len(cols, rows);
    if bytes.len() != expected {
        return Err(CodecError::SizeMismatch {
            context: "bit unpack",
            expected,
            actual: bytes.len(),
        });
    }

    let stride = row_bytes(cols);
    let mut bits = Vec::with_capacity(cols * rows);

    for row in 0..rows {
        let row_in = &bytes[row * stride..(row + 1) * stride];
        for col in 0..cols {
            bits.push(row_in[col / 8] & (0x80 >> (col % 8)) != 0);
        }
    }

    Ok(bits)
}
