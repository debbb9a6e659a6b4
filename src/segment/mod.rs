//! Segment layer.
//!
//! Turns the stored, possibly compressed segments of a layer into typed
//! buffers with NoData substitution applied:
//!
//! ```text
//! compressed bytes ──► Decompressor ──► raw bytes ──► Segment<T> (+ Sentinel<T>)
//!                      └────────────── SegmentCollection ─────────────┘
//! ```
//!
//! # Components
//!
//! - [`NoDataPolicy`] / [`Sentinel`]: the layer's missing-data convention
//! - [`Segment`] / [`SegmentValues`]: typed buffer and its type-erased view
//! - [`SegmentLayout`]: segment grid geometry and interleaving
//! - [`SegmentCollection`]: per-layer decoder selection and (de)compression

mod collection;
mod decoder;
mod layout;
mod nodata;

pub use collection::SegmentCollection;
pub use decoder::{
    decode_segment, filled_segment, segment_from_raster_data, DecodedSegment, Segment,
    SegmentValues,
};
pub use layout::{Interleave, PixelWindow, SegmentLayout, SegmentOrganization};
pub use nodata::{NoDataPolicy, Sentinel};
