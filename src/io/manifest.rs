//! JSON sidecar describing a segment file.
//!
//! The manifest carries everything a reader needs to decode the segments:
//! sample type, byte order, compression, declared NoData value, the segment
//! layout and the offset / byte-count tables locating each segment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compression::Compression;
use crate::error::TileError;
use crate::format::{ByteOrder, SampleType};
use crate::segment::{SegmentCollection, SegmentLayout};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentManifest {
    pub sample_type: SampleType,
    #[serde(default)]
    pub byte_order: ByteOrder,
    #[serde(default)]
    pub compression: Compression,
    /// Declared NoData value. JSON has no NaN, so a NaN value is written as
    /// `null` and reads back as "no NoData".
    #[serde(default)]
    pub nodata: Option<f64>,
    pub layout: SegmentLayout,
    pub offsets: Vec<u64>,
    pub byte_counts: Vec<u64>,
}

impl SegmentManifest {
    /// Build a manifest for segments written back to back from offset 0.
    ///
    /// NoData and compression come from `collection`, so the manifest always
    /// names the codec that encoded the segments.
    ///
    /// # Errors
    ///
    /// `Manifest` if the collection uses caller-supplied codecs, which have no
    /// manifest name.
    pub fn from_segments<B: AsRef<[u8]>>(
        collection: &SegmentCollection,
        segments: &[B],
    ) -> Result<Self, TileError> {
        let compression = collection.compression().ok_or_else(|| {
            TileError::Manifest("custom compression codecs cannot be recorded".to_string())
        })?;

        let mut offsets = Vec::with_capacity(segments.len());
        let mut byte_counts = Vec::with_capacity(segments.len());
        let mut offset = 0u64;
        for segment in segments {
            let len = segment.as_ref().len() as u64;
            offsets.push(offset);
            byte_counts.push(len);
            offset += len;
        }

        Ok(Self {
            sample_type: collection.sample_type(),
            byte_order: collection.byte_order(),
            compression,
            nodata: collection.policy().declared_value(),
            layout: *collection.layout(),
            offsets,
            byte_counts,
        })
    }

    /// Check the tables against the layout.
    pub fn validate(&self) -> Result<(), TileError> {
        self.layout
            .validate()
            .map_err(|e| TileError::Manifest(format!("layout: {}", e)))?;

        let expected = self.layout.segment_count();
        if self.offsets.len() != expected || self.byte_counts.len() != expected {
            return Err(TileError::Manifest(format!(
                "layout has {} segments, manifest lists {} offsets and {} byte counts",
                expected,
                self.offsets.len(),
                self.byte_counts.len()
            )));
        }

        Ok(())
    }

    /// Build the segment collection this manifest describes.
    pub fn collection(&self) -> Result<SegmentCollection, TileError> {
        self.validate()?;
        Ok(SegmentCollection::new(
            self.layout,
            self.sample_type,
            self.byte_order,
            self.nodata,
            self.compression,
        )?)
    }

    pub fn to_json(&self) -> Result<String, TileError> {
        serde_json::to_string_pretty(self).map_err(|e| TileError::Manifest(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, TileError> {
        let manifest: Self =
            serde_json::from_str(json).map_err(|e| TileError::Manifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and validate a manifest file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TileError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TileError::Manifest(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), TileError> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_json()?)
            .await
            .map_err(|e| TileError::Manifest(format!("{}: {}", path.display(), e)))
    }
}
