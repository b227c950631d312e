//! Turning a click on the canvas into a fixed-size image on disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use image::DynamicImage;
use image::imageops::FilterType;
use log::debug;

use crate::config::{CropConfig, OutputFormat};
use crate::error::{CropperError, Result};
use crate::mapper::{self, Bounds, Point};
use crate::view::ViewState;

/// Format of the timestamp embedded in output file names.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// A region of the original image, edges inclusive-exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRegion {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRegion {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Maps the crop footprint anchored at `anchor` (canvas space) into the
/// original image.
///
/// Each corner is clamped on its own, so near the right and bottom edges
/// the region shrinks instead of shifting inward, and past the edge it
/// collapses to zero area.
pub fn region_for(anchor: Point, zoom: f32, config: &CropConfig, bounds: Bounds) -> CropRegion {
    let start = mapper::to_original(anchor, zoom);
    let end = start.offset(
        mapper::scale_length(config.crop_width, zoom),
        mapper::scale_length(config.crop_height, zoom),
    );

    let start = mapper::clamp(start, bounds);
    let end = mapper::clamp(end, bounds);
    CropRegion {
        left: start.x as u32,
        top: start.y as u32,
        right: end.x as u32,
        bottom: end.y as u32,
    }
}

/// Cuts `region` out of `original` and stretches it to the configured size.
pub fn extract(
    original: &DynamicImage,
    region: CropRegion,
    config: &CropConfig,
) -> Result<DynamicImage> {
    if region.is_empty() {
        return Err(CropperError::EmptyRegion {
            x: region.left,
            y: region.top,
        });
    }
    let cropped = original.crop_imm(region.left, region.top, region.width(), region.height());
    Ok(cropped.resize_exact(config.crop_width, config.crop_height, FilterType::Lanczos3))
}

/// `cropped_<stem>_<timestamp>.<ext>`
pub fn output_file_name<Tz>(
    source_name: &str,
    taken_at: &DateTime<Tz>,
    format: OutputFormat,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source_name);
    format!(
        "cropped_{}_{}.{}",
        stem,
        taken_at.format(TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Writes `image` to `path` via a temporary sibling so readers never see a
/// partially written file. An existing file at `path` is replaced.
pub fn save(image: &DynamicImage, path: &Path, format: OutputFormat) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CropperError::save(path, "output path has no file name"))?;
    let temp_path = path.with_file_name(format!(".{}.part", file_name));

    let written = write_image(image, &temp_path, format)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| CropperError::save(path, e)));
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_image(image: &DynamicImage, temp_path: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(temp_path).map_err(|e| CropperError::save(temp_path, e))?;
    let mut writer = BufWriter::new(file);
    let encoded = match format {
        // The JPEG encoder has no alpha channel.
        OutputFormat::Jpg => DynamicImage::ImageRgb8(image.to_rgb8())
            .write_to(&mut writer, format.image_format()),
        OutputFormat::Png | OutputFormat::Bmp => image.write_to(&mut writer, format.image_format()),
    };
    encoded.map_err(|e| CropperError::save(temp_path, e))?;
    writer.flush().map_err(|e| CropperError::save(temp_path, e))
}

/// Crops the footprint at `anchor` from the view's original image and
/// saves it into `output_dir`. Returns the path written.
pub fn crop_and_save<Tz>(
    anchor: Point,
    view: &ViewState,
    config: &CropConfig,
    output_dir: &Path,
    taken_at: &DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let region = region_for(anchor, view.zoom(), config, view.bounds());
    debug!("Crop at {:?} (zoom {:.3}) covers {:?}", anchor, view.zoom(), region);

    let clipped = extract(view.original(), region, config)?;
    let path = output_dir.join(output_file_name(
        view.source_name(),
        taken_at,
        config.output_format,
    ));
    save(&clipped, &path, config.output_format)?;
    Ok(path)
}
