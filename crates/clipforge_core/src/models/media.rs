//! Source video metadata and rendered artifact handles.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::geometry::{Dimensions, Rect};

/// Metadata for one source video, probed by the external media engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub duration_ms: i64,
    /// Camera-feed rectangle in source pixel coordinates, if the capture
    /// layout embeds one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_region: Option<Rect>,
}

impl SourceMetadata {
    /// Create metadata without a camera region.
    pub fn new(width: u32, height: u32, duration_ms: i64) -> Self {
        Self {
            width,
            height,
            duration_ms,
            camera_region: None,
        }
    }

    /// Attach a camera region.
    pub fn with_camera_region(mut self, region: Rect) -> Self {
        self.camera_region = Some(region);
        self
    }

    /// Frame dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Handle to a rendered artifact, passed to the upload layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHandle {
    /// Path to the rendered file.
    pub path: PathBuf,
    /// Artifact duration in milliseconds.
    pub duration_ms: i64,
    /// RFC 3339 timestamp of render completion.
    pub rendered_at: String,
}

impl ArtifactHandle {
    /// Create a handle stamped with the current time.
    pub fn new(path: PathBuf, duration_ms: i64) -> Self {
        Self {
            path,
            duration_ms,
            rendered_at: chrono::Local::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_dimensions() {
        let meta = SourceMetadata::new(1920, 1080, 60_000);
        assert_eq!(meta.dimensions(), Dimensions::new(1920, 1080));
        assert!(meta.camera_region.is_none());
    }

    #[test]
    fn artifact_serializes() {
        let handle = ArtifactHandle::new(PathBuf::from("/out/clip.mp4"), 45_000);
        let json = serde_json::to_string(&handle).unwrap();
        assert!(json.contains("\"duration_ms\":45000"));
    }
}
