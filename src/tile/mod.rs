//! Tile layer.
//!
//! Assembles single-band tiles from the segments of a layer, and produces
//! those segments from whole-band rasters on the way in.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               TileReader                │
//! │   (fetches via SegmentSource, async)    │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              TileAssembler              │
//! │  (segment grid → window, clipping,      │
//! │   de-interleaving one band)             │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            SegmentCombiner              │
//! │  (NoData-initialised tile buffer)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`SegmentCombiner`] / [`CombinedTile`]: one tile buffer and its result
//! - [`TileAssembler`]: maps segment samples to tile offsets
//! - [`TileReader`] / [`TileRequest`]: async read pipeline over a source
//! - [`SegmentWriter`]: whole-band rasters to compressed segments

mod assembler;
mod combiner;
mod reader;
mod writer;

pub use assembler::TileAssembler;
pub use combiner::{CombinedTile, SegmentCombiner};
pub use reader::{TileReader, TileRequest};
pub use writer::SegmentWriter;
