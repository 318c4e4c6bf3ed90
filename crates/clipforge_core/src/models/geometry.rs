//! Frame geometry primitives.
//!
//! All rectangles are in source pixel coordinates with the origin at the
//! top-left. Dimensions are kept even where codecs require it.

use serde::{Deserialize, Serialize};

/// Width and height of a frame in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width-over-height ratio.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Whether either side is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Full-frame rectangle for the given dimensions.
    pub fn full_frame(dims: Dimensions) -> Self {
        Self::new(0, 0, dims.width, dims.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Width-over-height ratio.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Area of intersection with another rectangle, in pixels.
    pub fn intersection_area(&self, other: &Rect) -> u64 {
        let w = self.right().min(other.right()).saturating_sub(self.x.max(other.x));
        let h = self
            .bottom()
            .min(other.bottom())
            .saturating_sub(self.y.max(other.y));
        u64::from(w) * u64::from(h)
    }

    /// Whether this rectangle overlaps another (shared area, not just a
    /// touching edge).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection_area(other) > 0
    }

    /// Whether this rectangle lies fully inside the given frame.
    pub fn fits_within(&self, dims: Dimensions) -> bool {
        self.right() <= dims.width && self.bottom() <= dims.height
    }
}

/// Target aspect ratio, e.g. 9:16 for vertical short-form video.
///
/// Components come from configuration and may be invalid there; the layout
/// planner rejects non-positive components with `InvalidLayoutRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub w: i32,
    pub h: i32,
}

impl AspectRatio {
    /// Create a new aspect ratio.
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Whether either component is zero or negative.
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Width-over-height ratio. Only meaningful for non-degenerate ratios.
    pub fn ratio(&self) -> f64 {
        f64::from(self.w) / f64::from(self.h)
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.w, self.h)
    }
}

/// Round down to the nearest even value.
///
/// Video codecs require even plane dimensions; computed crop sizes go
/// through this before landing in a plan.
pub fn even_floor(value: u32) -> u32 {
    value & !1
}
