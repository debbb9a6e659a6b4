//! Configuration management for the raster segment tool.
//!
//! Command-line arguments are parsed with clap; every option can also be set
//! through an environment variable with the `RSEG_` prefix.
//!
//! # Commands
//!
//! - `encode`: split band rasters into compressed segments plus a manifest
//! - `decode`: assemble one band (optionally a window) back out of them
//!
//! # Environment Variables
//!
//! - `RSEG_SAMPLE_TYPE` - Sample type of the input bands
//! - `RSEG_TILE_COLS` / `RSEG_TILE_ROWS` - Tile size (default: 256)
//! - `RSEG_ROWS_PER_STRIP` - Use strips of this many rows instead of tiles
//! - `RSEG_INTERLEAVE` - `pixel` or `band` (default: pixel)
//! - `RSEG_BYTE_ORDER` - `big` or `little` (default: big)
//! - `RSEG_COMPRESSION` - `none`, `deflate` or `packbits` (default: deflate)
//! - `RSEG_NODATA` - Declared NoData value
//! - `RSEG_BAND` - Band to decode (default: 0)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::compression::Compression;
use crate::format::{ByteOrder, SampleType};
use crate::segment::{Interleave, PixelWindow, SegmentLayout};

// =============================================================================
// Default Values
// =============================================================================

/// Default tile edge length in pixels.
pub const DEFAULT_SEGMENT_SIZE: usize = 256;

/// Default compression for written segments.
pub const DEFAULT_COMPRESSION: &str = "deflate";

/// Default byte order for written segments.
pub const DEFAULT_BYTE_ORDER: &str = "big";

/// Default band interleaving.
pub const DEFAULT_INTERLEAVE: &str = "pixel";

/// Extension appended to the segment file to name its manifest.
pub const MANIFEST_EXTENSION: &str = "json";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Raster segment codec: split rasters into compressed segments and back.
#[derive(Parser, Debug, Clone)]
#[command(name = "raster-segments")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split band rasters into segments and write a segment file plus manifest.
    Encode(EncodeConfig),

    /// Assemble one band of a segment file into a raster.
    Decode(DecodeConfig),
}

// =============================================================================
// Encode
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct EncodeConfig {
    /// Band rasters, one file per band, each `cols * rows` big-endian samples.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Segment file to write.
    #[arg(short, long, env = "RSEG_OUTPUT")]
    pub output: PathBuf,

    /// Manifest file to write (default: `<output>.json`).
    #[arg(long, env = "RSEG_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Raster width in pixels.
    #[arg(long, env = "RSEG_COLS")]
    pub cols: usize,

    /// Raster height in pixels.
    #[arg(long, env = "RSEG_ROWS")]
    pub rows: usize,

    /// Sample type of the input bands.
    #[arg(long, value_enum, env = "RSEG_SAMPLE_TYPE")]
    pub sample_type: SampleType,

    // =========================================================================
    // Layout
    // =========================================================================
    /// Tile width in pixels.
    #[arg(long, default_value_t = DEFAULT_SEGMENT_SIZE, env = "RSEG_TILE_COLS")]
    pub tile_cols: usize,

    /// Tile height in pixels.
    #[arg(long, default_value_t = DEFAULT_SEGMENT_SIZE, env = "RSEG_TILE_ROWS")]
    pub tile_rows: usize,

    /// Write full-width strips of this many rows instead of tiles.
    #[arg(long, env = "RSEG_ROWS_PER_STRIP")]
    pub rows_per_strip: Option<usize>,

    /// How bands share segments.
    #[arg(long, value_enum, default_value = DEFAULT_INTERLEAVE, env = "RSEG_INTERLEAVE")]
    pub interleave: Interleave,

    // =========================================================================
    // Encoding
    // =========================================================================
    /// Byte order of samples inside segments.
    #[arg(long, value_enum, default_value = DEFAULT_BYTE_ORDER, env = "RSEG_BYTE_ORDER")]
    pub byte_order: ByteOrder,

    /// Segment compression.
    #[arg(long, value_enum, default_value = DEFAULT_COMPRESSION, env = "RSEG_COMPRESSION")]
    pub compression: Compression,

    /// Declared NoData value (0 means "zero is missing").
    #[arg(long, allow_negative_numbers = true, env = "RSEG_NODATA")]
    pub nodata: Option<f64>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl EncodeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.inputs.is_empty() {
            return Err("At least one band raster is required".to_string());
        }

        if self.cols == 0 || self.rows == 0 {
            return Err("cols and rows must be greater than 0".to_string());
        }

        if self.tile_cols == 0 || self.tile_rows == 0 {
            return Err("tile_cols and tile_rows must be greater than 0".to_string());
        }

        if self.rows_per_strip == Some(0) {
            return Err("rows_per_strip must be greater than 0".to_string());
        }

        if self.sample_type == SampleType::Bit && self.nodata.is_some() {
            return Err("Bit rasters cannot declare a NoData value".to_string());
        }

        Ok(())
    }

    /// Build the segment layout (call validate() first).
    pub fn layout(&self) -> Result<SegmentLayout, String> {
        let bands = self.inputs.len();
        let layout = match self.rows_per_strip {
            Some(rows_per_strip) => {
                SegmentLayout::striped(self.cols, self.rows, rows_per_strip, bands, self.interleave)
            }
            None => SegmentLayout::tiled(
                self.cols,
                self.rows,
                self.tile_cols,
                self.tile_rows,
                bands,
                self.interleave,
            ),
        };
        layout.map_err(|e| e.to_string())
    }

    /// Get the manifest path, defaulting to `<output>.json`.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest.clone().unwrap_or_else(|| {
            let mut path = self.output.clone().into_os_string();
            path.push(".");
            path.push(MANIFEST_EXTENSION);
            PathBuf::from(path)
        })
    }
}

// =============================================================================
// Decode
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct DecodeConfig {
    /// Manifest describing the segment file.
    pub manifest: PathBuf,

    /// Segment file (default: the manifest path without `.json`).
    #[arg(long, env = "RSEG_SEGMENTS")]
    pub segments: Option<PathBuf>,

    /// Raster file to write (big-endian samples).
    #[arg(short, long, env = "RSEG_OUTPUT")]
    pub output: PathBuf,

    /// Band to decode (0-based).
    #[arg(short, long, default_value_t = 0, env = "RSEG_BAND")]
    pub band: usize,

    /// Pixel window as `col,row,cols,rows` (default: the whole raster).
    #[arg(long, value_delimiter = ',', env = "RSEG_WINDOW")]
    pub window: Option<Vec<usize>>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl DecodeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref window) = self.window {
            if window.len() != 4 {
                return Err(format!(
                    "window must be col,row,cols,rows (got {} values)",
                    window.len()
                ));
            }
            if window[2] == 0 || window[3] == 0 {
                return Err("window cols and rows must be greater than 0".to_string());
            }
        }

        if self.segments.is_none()
            && self.manifest.extension().and_then(|e| e.to_str()) != Some(MANIFEST_EXTENSION)
        {
            return Err(
                "Cannot derive the segment file from the manifest name. Set --segments or RSEG_SEGMENTS"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Get the segment file path (call validate() first).
    pub fn segments_path(&self) -> PathBuf {
        self.segments
            .clone()
            .unwrap_or_else(|| self.manifest.with_extension(""))
    }

    /// Get the requested window, `None` for the whole raster.
    pub fn pixel_window(&self) -> Option<PixelWindow> {
        match self.window.as_deref() {
            Some(&[col, row, cols, rows]) => Some(PixelWindow::new(col, row, cols, rows)),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
