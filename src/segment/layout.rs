//! Segment grid geometry.
//!
//! A raster of `cols` x `rows` pixels is cut into a grid of segments of nominal
//! size `segment_cols` x `segment_rows`:
//!
//! ```text
//!          segment_cols
//!         ┌────────┬────────┬────┐ ┐
//!         │   0    │   1    │ 2  │ │ segment_rows
//!         ├────────┼────────┼────┤ ┘
//!         │   3    │   4    │ 5  │
//!         └────────┴────────┴────┘
//!                              ▲
//!               edge segments are clipped to the raster
//! ```
//!
//! Tiled layouts store every segment at nominal size (edges are padded).
//! Striped layouts span the full width and the last strip stores only the
//! rows that exist. Band-sequential layouts repeat the whole grid once per
//! band; pixel-interleaved layouts store all bands of a pixel side by side.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// How multiple bands share segments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Interleave {
    /// Bands of one pixel are adjacent (TIFF PlanarConfiguration 1)
    #[default]
    Pixel,
    /// Each band has its own segments (TIFF PlanarConfiguration 2)
    Band,
}

/// Whether segments are tiles or strips.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SegmentOrganization {
    #[default]
    Tiled,
    Striped,
}

// =============================================================================
// PixelWindow
// =============================================================================

/// A rectangle of pixels, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelWindow {
    pub col: usize,
    pub row: usize,
    pub cols: usize,
    pub rows: usize,
}

impl PixelWindow {
    pub fn new(col: usize, row: usize, cols: usize, rows: usize) -> Self {
        Self {
            col,
            row,
            cols,
            rows,
        }
    }

    #[inline]
    pub fn col_end(&self) -> usize {
        self.col + self.cols
    }

    #[inline]
    pub fn row_end(&self) -> usize {
        self.row + self.rows
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Overlap of two windows, `None` if they do not touch.
    pub fn intersect(&self, other: &PixelWindow) -> Option<PixelWindow> {
        let col = self.col.max(other.col);
        let row = self.row.max(other.row);
        let col_end = self.col_end().min(other.col_end());
        let row_end = self.row_end().min(other.row_end());

        if col >= col_end || row >= row_end {
            return None;
        }
        Some(PixelWindow::new(col, row, col_end - col, row_end - row))
    }

    /// Whether `other` lies entirely inside this window.
    pub fn contains(&self, other: &PixelWindow) -> bool {
        other.col >= self.col
            && other.row >= self.row
            && other.col_end() <= self.col_end()
            && other.row_end() <= self.row_end()
    }
}

// =============================================================================
// SegmentLayout
// =============================================================================

/// Segment grid of one raster layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentLayout {
    /// Raster width in pixels
    pub cols: usize,
    /// Raster height in pixels
    pub rows: usize,
    /// Nominal segment width in pixels
    pub segment_cols: usize,
    /// Nominal segment height in pixels
    pub segment_rows: usize,
    pub band_count: usize,
    pub interleave: Interleave,
    pub organization: SegmentOrganization,
}

impl SegmentLayout {
    /// Create a tiled layout.
    pub fn tiled(
        cols: usize,
        rows: usize,
        tile_cols: usize,
        tile_rows: usize,
        band_count: usize,
        interleave: Interleave,
    ) -> Result<Self, CodecError> {
        let layout = Self {
            cols,
            rows,
            segment_cols: tile_cols,
            segment_rows: tile_rows,
            band_count,
            interleave,
            organization: SegmentOrganization::Tiled,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Create a striped layout; strips always span the full raster width.
    pub fn striped(
        cols: usize,
        rows: usize,
        rows_per_strip: usize,
        band_count: usize,
        interleave: Interleave,
    ) -> Result<Self, CodecError> {
        let layout = Self {
            cols,
            rows,
            segment_cols: cols,
            segment_rows: rows_per_strip,
            band_count,
            interleave,
            organization: SegmentOrganization::Striped,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Check the layout is internally consistent.
    ///
    /// Needed after deserializing, since fields are public.
    pub fn validate(&self) -> Result<(), CodecError> {
        let dims = [
            ("cols", self.cols),
            ("rows", self.rows),
            ("segment_cols", self.segment_cols),
            ("segment_rows", self.segment_rows),
            ("band_count", self.band_count),
        ];
        for (name, value) in dims {
            if value == 0 {
                return Err(CodecError::SizeMismatch {
                    context: name,
                    expected: 1,
                    actual: 0,
                });
            }
        }

        if self.organization == SegmentOrganization::Striped && self.segment_cols != self.cols {
            return Err(CodecError::SizeMismatch {
                context: "strip width",
                expected: self.cols,
                actual: self.segment_cols,
            });
        }

        Ok(())
    }

    /// Segments across one row of the grid.
    #[inline]
    pub fn layout_cols(&self) -> usize {
        self.cols.div_ceil(self.segment_cols)
    }

    /// Segments down one column of the grid.
    #[inline]
    pub fn layout_rows(&self) -> usize {
        self.rows.div_ceil(self.segment_rows)
    }

    #[inline]
    pub fn segments_per_band(&self) -> usize {
        self.layout_cols() * self.layout_rows()
    }

    /// Total number of stored segments.
    pub fn segment_count(&self) -> usize {
        match self.interleave {
            Interleave::Pixel => self.segments_per_band(),
            Interleave::Band => self.segments_per_band() * self.band_count,
        }
    }

    /// Samples stored per pixel inside one segment.
    #[inline]
    pub fn samples_per_pixel(&self) -> usize {
        match self.interleave {
            Interleave::Pixel => self.band_count,
            Interleave::Band => 1,
        }
    }

    /// Index of the segment at grid position (`seg_col`, `seg_row`) holding `band`.
    pub fn segment_index(&self, band: usize, seg_col: usize, seg_row: usize) -> usize {
        let grid_index = seg_row * self.layout_cols() + seg_col;
        match self.interleave {
            Interleave::Pixel => grid_index,
            Interleave::Band => band * self.segments_per_band() + grid_index,
        }
    }

    /// Grid position (`seg_col`, `seg_row`) of a segment index.
    pub fn grid_position(&self, index: usize) -> (usize, usize) {
        let grid_index = index % self.segments_per_band();
        (grid_index % self.layout_cols(), grid_index / self.layout_cols())
    }

    /// The band stored in a band-sequential segment; 0 for pixel-interleaved.
    pub fn segment_band(&self, index: usize) -> usize {
        match self.interleave {
            Interleave::Pixel => 0,
            Interleave::Band => index / self.segments_per_band(),
        }
    }

    /// Pixel dimensions a segment is stored with.
    ///
    /// Tiles are always nominal size. The last strip holds only the rows left.
    pub fn stored_dimensions(&self, index: usize) -> (usize, usize) {
        match self.organization {
            SegmentOrganization::Tiled => (self.segment_cols, self.segment_rows),
            SegmentOrganization::Striped => {
                let extent = self.pixel_extent(index);
                (self.segment_cols, extent.rows)
            }
        }
    }

    /// Samples per row and rows of the stored segment, bands included.
    pub fn stored_sample_dimensions(&self, index: usize) -> (usize, usize) {
        let (cols, rows) = self.stored_dimensions(index);
        (cols * self.samples_per_pixel(), rows)
    }

    /// The raster pixels a segment covers, clipped to the raster.
    pub fn pixel_extent(&self, index: usize) -> PixelWindow {
        let (seg_col, seg_row) = self.grid_position(index);
        let col = seg_col * self.segment_cols;
        let row = seg_row * self.segment_rows;
        PixelWindow::new(
            col,
            row,
            self.segment_cols.min(self.cols - col),
            self.segment_rows.min(self.rows - row),
        )
    }

    /// The whole raster as a window.
    pub fn full_window(&self) -> PixelWindow {
        PixelWindow::new(0, 0, self.cols, self.rows)
    }

    /// Segment indices holding `band` that intersect `window`, ascending.
    pub fn segments_in_window(&self, band: usize, window: &PixelWindow) -> Vec<usize> {
        if window.is_empty() {
            return Vec::new();
        }

        let first_col = window.col / self.segment_cols;
        let first_row = window.row / self.segment_rows;
        let last_col = ((window.col_end() - 1) / self.segment_cols).min(self.layout_cols() - 1);
        let last_row = ((window.row_end() - 1) / self.segment_rows).min(self.layout_rows() - 1);

        let mut indices = Vec::new();
        for seg_row in first_row..=last_row {
            for seg_col in first_col..=last_col {
                indices.push(self.segment_index(band, seg_col, seg_row));
            }
        }
        indices
    }
}
