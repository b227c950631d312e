//! Conversions between canvas space and original-image space.
//!
//! Canvas space is the zoomed image as drawn on screen; original-image space
//! is the decoded bitmap's own pixel grid. A canvas point `p` maps to
//! `trunc(p / zoom)` in the original, so a footprint of `n` canvas pixels
//! covers `trunc(n / zoom)` original pixels. The preview drawn on the canvas
//! and the region cut from the original are computed with the same
//! functions and must never disagree.

/// A pixel position. Canvas positions may be negative when the pointer
/// leaves the image; original positions are clamped before use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Width and height of an image in original-image space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

pub fn to_original(point: Point, zoom: f32) -> Point {
    Point::new(
        (point.x as f32 / zoom) as i32,
        (point.y as f32 / zoom) as i32,
    )
}

pub fn to_canvas(point: Point, zoom: f32) -> Point {
    Point::new(
        (point.x as f32 * zoom) as i32,
        (point.y as f32 * zoom) as i32,
    )
}

/// Number of original pixels covered by `len` canvas pixels.
pub fn scale_length(len: u32, zoom: f32) -> i32 {
    (len as f32 / zoom) as i32
}

pub fn clamp(point: Point, bounds: Bounds) -> Point {
    let max_x = i32::try_from(bounds.width).unwrap_or(i32::MAX);
    let max_y = i32::try_from(bounds.height).unwrap_or(i32::MAX);
    Point::new(point.x.clamp(0, max_x), point.y.clamp(0, max_y))
}
