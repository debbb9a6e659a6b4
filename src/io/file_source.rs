use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::SegmentSource;
use crate::error::IoError;

/// File-backed implementation of SegmentSource.
///
/// Segments are located through offset / byte-count tables, the same shape as
/// TIFF TileOffsets/TileByteCounts. The file size is checked once on creation
/// so every table entry is known to be readable.
#[derive(Debug, Clone)]
pub struct FileSegmentSource {
    path: PathBuf,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
    size: u64,
    identifier: String,
}

impl FileSegmentSource {
    /// Open a segment file.
    ///
    /// Returns an error if the file is missing, the tables differ in length,
    /// or any segment extends past the end of the file.
    pub async fn open(
        path: impl AsRef<Path>,
        offsets: Vec<u64>,
        byte_counts: Vec<u64>,
    ) -> Result<Self, IoError> {
        let path = path.as_ref().to_path_buf();
        let identifier = format!("file://{}", path.display());

        if offsets.len() != byte_counts.len() {
            return Err(IoError::Read(format!(
                "{}: {} offsets but {} byte counts",
                identifier,
                offsets.len(),
                byte_counts.len()
            )));
        }

        let size = tokio::fs::metadata(&path).await?.len();

        for (index, (&offset, &count)) in offsets.iter().zip(&byte_counts).enumerate() {
            if offset.saturating_add(count) > size {
                return Err(IoError::Read(format!(
                    "{}: segment {} ({} bytes at offset {}) exceeds file size {}",
                    identifier, index, count, offset, size
                )));
            }
        }

        Ok(Self {
            path,
            offsets,
            byte_counts,
            size,
            identifier,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the backing file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

#[async_trait]
impl SegmentSource for FileSegmentSource {
    async fn read_segment(&self, index: usize) -> Result<Bytes, IoError> {
        let (Some(&offset), Some(&count)) = (self.offsets.get(index), self.byte_counts.get(index))
        else {
            return Err(IoError::SegmentOutOfRange {
                index,
                count: self.offsets.len(),
            });
        };

        // Handle zero-length segments
        if count == 0 {
            return Ok(Bytes::new());
        }

        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(offset)).await?;

        let mut buf = vec![0u8; count as usize];
        file.read_exact(&mut buf).await?;

        Ok(Bytes::from(buf))
    }

    fn segment_count(&self) -> usize {
        self.offsets.len()
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
