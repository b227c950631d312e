//! Session configuration, fixed at startup.

use std::fmt;

use image::ImageFormat;

use crate::error::{CropperError, Result};

/// Default output width of a clipped image, in pixels.
pub const DEFAULT_CROP_WIDTH: u32 = 536;
/// Default output height of a clipped image, in pixels.
pub const DEFAULT_CROP_HEIGHT: u32 = 240;

/// Zoom multiplier applied per mouse wheel notch.
pub const ZOOM_STEP: f32 = 1.1;
/// Smallest allowed zoom; keeps the display image from collapsing.
pub const MIN_ZOOM: f32 = 0.05;
/// Largest allowed zoom; bounds the size of the display image.
pub const MAX_ZOOM: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Bmp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Bmp => "bmp",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpg => ImageFormat::Jpeg,
            OutputFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Size and encoding of every clipped image written during a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropConfig {
    pub crop_width: u32,
    pub crop_height: u32,
    pub output_format: OutputFormat,
}

impl CropConfig {
    pub fn new(crop_width: u32, crop_height: u32, output_format: OutputFormat) -> Result<Self> {
        if crop_width == 0 || crop_height == 0 {
            return Err(CropperError::InvalidConfig(format!(
                "crop size must be positive, got {}x{}",
                crop_width, crop_height
            )));
        }
        Ok(Self {
            crop_width,
            crop_height,
            output_format,
        })
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            crop_width: DEFAULT_CROP_WIDTH,
            crop_height: DEFAULT_CROP_HEIGHT,
            output_format: OutputFormat::default(),
        }
    }
}
