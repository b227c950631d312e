//! Error types shared by every part of the clipper.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = CropperError> = std::result::Result<T, E>;

/// Everything that can go wrong while browsing and clipping.
///
/// Only the startup variants are fatal; the session logs the rest and
/// carries on.
#[derive(Debug, Error)]
pub enum CropperError {
    #[error("cannot read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no supported images found in {}", .0.display())]
    NoSupportedImages(PathBuf),

    #[error("none of the images in {} could be decoded", .0.display())]
    NoDecodableImages(PathBuf),

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("zoom factor {0} is not a positive finite number")]
    ZoomOutOfRange(f32),

    #[error("crop region at ({x}, {y}) is empty after clamping to the image")]
    EmptyRegion { x: u32, y: u32 },

    #[error("failed to save {}: {reason}", .path.display())]
    Save { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CropperError {
    pub(crate) fn save(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CropperError::Save {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
