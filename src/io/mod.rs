//! Segment I/O.
//!
//! - [`SegmentSource`]: async access to stored segments by index
//! - [`FileSegmentSource`]: segments located in a local file by offset tables
//! - [`MemorySegmentSource`]: segments already in memory
//! - [`SegmentManifest`]: JSON description of a segment file

mod file_source;
mod manifest;
mod source;

pub use file_source::FileSegmentSource;
pub use manifest::SegmentManifest;
pub use source::{MemorySegmentSource, SegmentSource};
