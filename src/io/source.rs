use async_trait::async_trait;
use bytes::Bytes;

use crate::error::IoError;

/// Trait for fetching stored (compressed) segments by index.
///
/// This is the only asynchronous seam in the crate: decoding and assembly are
/// synchronous, fetching is not. Implementations must be thread-safe so one
/// source can serve concurrent tile requests.
#[async_trait]
pub trait SegmentSource: Send + Sync {
    /// Fetch the stored bytes of segment `index`.
    async fn read_segment(&self, index: usize) -> Result<Bytes, IoError>;

    /// Number of segments this source can serve.
    fn segment_count(&self) -> usize;

    /// Get a unique identifier for this source (for logging).
    fn identifier(&self) -> &str;
}

// =============================================================================
// MemorySegmentSource
// =============================================================================

/// Segments held in memory, e.g. straight out of [`SegmentWriter`](crate::tile::SegmentWriter).
#[derive(Debug, Clone)]
pub struct MemorySegmentSource {
    segments: Vec<Bytes>,
    identifier: String,
}

impl MemorySegmentSource {
    pub fn new(segments: Vec<Bytes>, identifier: impl Into<String>) -> Self {
        Self {
            segments,
            identifier: identifier.into(),
        }
    }
}

#[async_trait]
impl SegmentSource for MemorySegmentSource {
    async fn read_segment(&self, index: usize) -> Result<Bytes, IoError> {
        self.segments
            .get(index)
            .cloned()
            .ok_or(IoError::SegmentOutOfRange {
                index,
                count: self.segments.len(),
            })
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
