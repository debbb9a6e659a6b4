use thiserror::Error;

/// Errors raised by the segment codec itself.
///
/// Every variant is deterministic: the same input always fails the same way,
/// so none of them are worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Buffer length inconsistent with the declared dimensions and sample type
    #[error("Size mismatch in {context}: expected {expected}, got {actual}")]
    SizeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Decompression or decoding found malformed bytes
    #[error("Corrupt segment: {0}")]
    CorruptSegment(String),

    /// Sample type and NoData combination that has no defined meaning
    #[error("Unsupported sample type: {0}")]
    UnsupportedSampleType(String),

    /// Write past the end of a combined tile
    #[error("Index {index} out of bounds for tile of {len} samples")]
    OutOfBounds { index: usize, len: usize },
}

/// I/O errors that can occur when fetching compressed segments
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Backing file or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Segment index is not covered by the source's offset table
    #[error("Segment {index} out of range: source has {count} segments")]
    SegmentOutOfRange { index: usize, count: usize },

    /// Underlying read failed
    #[error("Read error: {0}")]
    Read(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => IoError::NotFound(err.to_string()),
            _ => IoError::Read(err.to_string()),
        }
    }
}

/// Errors from the tile read/write pipeline.
///
/// This is where failures pick up context (which segment, which band).
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// I/O error while fetching a segment
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Codec failure attributed to a specific segment
    #[error("Segment {index}: {source}")]
    Segment {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// Codec failure not tied to a single segment
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Requested band does not exist in the layout
    #[error("Invalid band {band}: layout has {band_count} bands")]
    InvalidBand { band: usize, band_count: usize },

    /// Requested window is empty or extends past the raster
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Segment manifest is unreadable or inconsistent
    #[error("Invalid manifest: {0}")]
    Manifest(String),
}
