//! The image currently on screen: the decoded original and its zoomed copy.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use image::imageops::FilterType;
use log::{debug, trace};

use crate::config::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::error::{CropperError, Result};
use crate::mapper::Bounds;

pub fn load(path: &Path) -> Result<DynamicImage> {
    let started = Instant::now();
    let image = image::open(path).map_err(|source| CropperError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded {} ({}x{}) in {:.2} seconds",
        path.display(),
        image.width(),
        image.height(),
        started.elapsed().as_secs_f32()
    );
    Ok(image)
}

/// The original is only ever read; the display copy is rebuilt from it
/// whenever the image or the zoom changes.
pub struct ViewState {
    source_name: String,
    original: DynamicImage,
    display: DynamicImage,
    zoom: f32,
    max_display_side: u32,
}

impl ViewState {
    pub fn new(source_name: impl Into<String>, original: DynamicImage, zoom: f32) -> Self {
        let zoom = clamp_zoom(zoom, zoom_limit(&original, u32::MAX));
        let display = render(&original, zoom);
        Self {
            source_name: source_name.into(),
            original,
            display,
            zoom,
            max_display_side: u32::MAX,
        }
    }

    /// Caps the display image's longest side, e.g. at the GPU texture limit.
    /// The zoom is lowered if the current image would exceed it.
    pub fn set_max_display_side(&mut self, side: u32) {
        self.max_display_side = side.max(1);
        let zoom = clamp_zoom(self.zoom, self.zoom_limit());
        if zoom != self.zoom {
            self.zoom = zoom;
            self.refresh();
        }
    }

    /// Swaps in a newly decoded image, keeping the current zoom unless the
    /// new image is too large to display at it.
    pub fn replace(&mut self, source_name: impl Into<String>, original: DynamicImage) {
        self.source_name = source_name.into();
        self.original = original;
        self.zoom = clamp_zoom(self.zoom, self.zoom_limit());
        self.refresh();
    }

    pub fn set_zoom(&mut self, factor: f32) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CropperError::ZoomOutOfRange(factor));
        }
        let clamped = clamp_zoom(factor, self.zoom_limit());
        if clamped != factor {
            debug!("Zoom {} clamped to {}", factor, clamped);
        }
        if clamped != self.zoom {
            self.zoom = clamped;
            self.refresh();
        }
        Ok(())
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        self.set_zoom(self.zoom * ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        self.set_zoom(self.zoom / ZOOM_STEP)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn original(&self) -> &DynamicImage {
        &self.original
    }

    pub fn display(&self) -> &DynamicImage {
        &self.display
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.original.width(), self.original.height())
    }

    fn zoom_limit(&self) -> f32 {
        zoom_limit(&self.original, self.max_display_side)
    }

    fn refresh(&mut self) {
        let started = Instant::now();
        self.display = render(&self.original, self.zoom);
        trace!(
            "Rendered display image {}x{} in {:?}",
            self.display.width(),
            self.display.height(),
            started.elapsed()
        );
    }
}

fn zoom_limit(original: &DynamicImage, max_side: u32) -> f32 {
    let longest = original.width().max(original.height()).max(1);
    MAX_ZOOM.min(max_side as f32 / longest as f32)
}

/// The display limit wins over `MIN_ZOOM` for very large images.
fn clamp_zoom(factor: f32, limit: f32) -> f32 {
    factor.max(MIN_ZOOM).min(limit)
}

/// Scales `original` by `zoom`, fitted inside the `(w * zoom, h * zoom)` box.
fn render(original: &DynamicImage, zoom: f32) -> DynamicImage {
    let width = ((original.width() as f32 * zoom) as u32).max(1);
    let height = ((original.height() as f32 * zoom) as u32).max(1);
    if (width, height) == (original.width(), original.height()) {
        return original.clone();
    }
    original.resize(width, height, FilterType::Lanczos3)
}
