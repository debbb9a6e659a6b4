//! # Raster Segments
//!
//! Decoding and encoding of the stored segments (tiles or strips) of a raster
//! layer, and assembly of single-band tiles from them.
//!
//! A raster file stores its pixels as segments: fixed-size blocks, possibly
//! compressed, possibly holding several bands interleaved per pixel. This crate
//! turns those segments into typed sample buffers with a consistent view of
//! missing data, and back again.
//!
//! ## Features
//!
//! - **Eight sample types**: bit, 8/16-bit signed and unsigned, int32, float32, float64
//! - **NoData substitution**: a layer's declared NoData value reads as one
//!   in-memory marker (`i32::MIN` / `NaN`) regardless of sample type
//! - **Compression**: none, deflate and PackBits, behind a pluggable trait
//! - **Layouts**: tiles or strips, pixel- or band-interleaved, clipped edges
//!
//! ## Architecture
//!
//! - [`mod@format`] - Sample types, byte order, bit packing and the raster boundary codec
//! - [`compression`] - Segment (de)compression codecs
//! - [`segment`] - Typed segments, NoData policy, layout geometry, per-layer collection
//! - [`tile`] - Combiner, assembler, async reader and segment writer
//! - [`io`] - Segment sources and the JSON manifest
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust
//! use raster_segments::{
//!     ByteOrder, Compression, Interleave, RasterData, SampleType, SegmentCollection,
//!     SegmentLayout, SegmentWriter, TileAssembler,
//! };
//!
//! // 3x3 raster in 2x2 tiles, one int16 band, -1 marks missing pixels
//! let layout = SegmentLayout::tiled(3, 3, 2, 2, 1, Interleave::Pixel).unwrap();
//! let collection = SegmentCollection::new(
//!     layout,
//!     SampleType::Int16,
//!     ByteOrder::LittleEndian,
//!     Some(-1.0),
//!     Compression::Deflate,
//! )
//! .unwrap();
//!
//! let band = RasterData::Int16(vec![1, 2, 3, 4, -1, 6, 7, 8, 9]);
//! let segments = SegmentWriter::new(&collection)
//!     .write_segments(vec![band.clone()])
//!     .unwrap();
//!
//! let mut assembler = TileAssembler::full(&collection, 0).unwrap();
//! for index in assembler.required_segments() {
//!     assembler.add_segment(index, &segments[index]).unwrap();
//! }
//! let tile = assembler.finish();
//!
//! assert!(tile.is_nodata(4));
//! assert_eq!(tile.to_raster_data(), band);
//! ```

pub mod compression;
pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod segment;
pub mod tile;

// Re-export commonly used types
pub use compression::{Compression, Compressor, Decompressor};
pub use config::{Cli, Command, DecodeConfig, EncodeConfig};
pub use error::{CodecError, IoError, TileError};
pub use format::{
    from_raster_data, to_raster_data, ByteOrder, RasterData, Sample, SampleType, NODATA_DOUBLE,
    NODATA_INT, STORAGE_BYTE_ORDER,
};
pub use io::{FileSegmentSource, MemorySegmentSource, SegmentManifest, SegmentSource};
pub use segment::{
    DecodedSegment, Interleave, NoDataPolicy, PixelWindow, Segment, SegmentCollection,
    SegmentLayout, SegmentOrganization, SegmentValues, Sentinel,
};
pub use tile::{
    CombinedTile, SegmentCombiner, SegmentWriter, TileAssembler, TileReader, TileRequest,
};
