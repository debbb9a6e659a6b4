//! Async tile reader.
//!
//! Pairs a [`SegmentSource`] with the [`SegmentCollection`] describing its
//! layer:
//!
//! ```text
//! TileRequest ──► required_segments() ──► SegmentSource::read_segment()
//!                                                 │
//!                                                 ▼
//!                 CombinedTile ◄── TileAssembler::add_segment()
//! ```

use bytes::Bytes;
use tracing::debug;

use crate::error::TileError;
use crate::io::SegmentSource;
use crate::segment::{PixelWindow, SegmentCollection};

use super::assembler::TileAssembler;
use super::combiner::CombinedTile;

// =============================================================================
// Tile Request
// =============================================================================

/// A request for one band of a raster window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRequest {
    /// Band index (0-based)
    pub band: usize,

    /// Pixel window to assemble; `None` means the whole raster
    pub window: Option<PixelWindow>,
}

impl TileRequest {
    /// Request the whole raster for `band`.
    pub fn full(band: usize) -> Self {
        Self { band, window: None }
    }

    pub fn window(band: usize, window: PixelWindow) -> Self {
        Self {
            band,
            window: Some(window),
        }
    }
}

// =============================================================================
// Tile Reader
// =============================================================================

/// Reads tiles from one layer's stored segments.
///
/// # Type Parameters
///
/// * `S` - Where the compressed segments come from (file, memory, ...)
pub struct TileReader<S: SegmentSource> {
    source: S,
    collection: SegmentCollection,
}

impl<S: SegmentSource> TileReader<S> {
    /// Create a reader.
    ///
    /// # Errors
    ///
    /// Returns `Manifest` if the source does not serve exactly the number of
    /// segments the layout defines.
    pub fn new(source: S, collection: SegmentCollection) -> Result<Self, TileError> {
        let expected = collection.layout().segment_count();
        if source.segment_count() != expected {
            return Err(TileError::Manifest(format!(
                "{} serves {} segments, layout needs {}",
                source.identifier(),
                source.segment_count(),
                expected
            )));
        }
        Ok(Self { source, collection })
    }

    pub fn collection(&self) -> &SegmentCollection {
        &self.collection
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch, decode and assemble one tile.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The band or window is invalid for the layout
    /// - A segment cannot be fetched
    /// - A segment is corrupt or has the wrong size (reported with its index)
    pub async fn read_tile(&self, request: TileRequest) -> Result<CombinedTile, TileError> {
        let window = request
            .window
            .unwrap_or_else(|| self.collection.layout().full_window());
        let mut assembler = TileAssembler::new(&self.collection, request.band, window)?;

        for index in assembler.required_segments() {
            let compressed = self.source.read_segment(index).await?;
            debug!(
                source = self.source.identifier(),
                segment = index,
                bytes = compressed.len(),
                "Fetched segment"
            );
            assembler.add_segment(index, &compressed)?;
        }

        Ok(assembler.finish())
    }

    /// Read one tile and serialize it for the storage boundary.
    pub async fn read_tile_bytes(&self, request: TileRequest) -> Result<Bytes, TileError> {
        Ok(self.read_tile(request).await?.into_bytes()?)
    }
}
