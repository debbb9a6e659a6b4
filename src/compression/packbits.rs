//! PackBits run-length codec.
//!
//! Each run starts with a signed header byte:
//! - `0..=127`: copy the next `header + 1` bytes literally
//! - `-127..=-1`: repeat the next byte `1 - header` times
//! - `-128`: no-op

use crate::error::CodecError;

use super::{Compressor, Decompressor};

/// Longest literal or replicate run a single header can describe.
const MAX_RUN: usize = 128;

#[derive(Debug, Clone, Copy, Default)]
pub struct PackBitsCodec;

impl Decompressor for PackBitsCodec {
    fn decompress(&self, compressed: &[u8], segment_index: usize) -> Result<Vec<u8>, CodecError> {
        let mut output = Vec::with_capacity(compressed.len() * 2);
        let mut pos = 0;

        while pos < compressed.len() {
            let header = compressed[pos] as i8;
            pos += 1;

            match header {
                -128 => continue,

                0..=127 => {
                    let count = header as usize + 1;
                    if pos + count > compressed.len() {
                        return Err(CodecError::CorruptSegment(format!(
                            "packbits segment {}: literal run of {} overruns input",
                            segment_index, count
                        )));
                    }
                    output.extend_from_slice(&compressed[pos..pos + count]);
                    pos += count;
                }

                -127..=-1 => {
                    let Some(&byte) = compressed.get(pos) else {
                        return Err(CodecError::CorruptSegment(format!(
                            "packbits segment {}: missing replicate byte",
                            segment_index
                        )));
                    };
                    pos += 1;
                    let count = (1 - header as isize) as usize;
                    output.resize(output.len() + count, byte);
                }
            }
        }

        Ok(output)
    }
}

impl Compressor for PackBitsCodec {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(raw.len() + raw.len() / MAX_RUN + 1);
        let mut literal_start = 0;
        let mut pos = 0;

        while pos < raw.len() {
            let run = raw[pos..]
                .iter()
                .take(MAX_RUN)
                .take_while(|&&b| b == raw[pos])
                .count();

            // Runs of 3+ pay for their header; shorter ones stay literal
            if run >= 3 {
                flush_literals(&mut out, &raw[literal_start..pos]);
                out.push((1 - run as isize) as i8 as u8);
                out.push(raw[pos]);
                pos += run;
                literal_start = pos;
            } else {
                pos += run;
            }
        }
        flush_literals(&mut out, &raw[literal_start..]);

        Ok(out)
    }
}

fn flush_literals(out: &mut Vec<u8>, literals: &[u8]) {
    for chunk in literals.chunks(MAX_RUN) {
        out.push((chunk.len() - 1) as u8);
        out.extend_from_slice(chunk);
    }
}
