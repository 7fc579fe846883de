//! Geometric primitives for page-space coordinates.
//!
//! Everything in this module uses a top-left coordinate origin: `t < b` and
//! `l < r` for a non-degenerate rectangle, with y growing downward.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub l: f32,
    /// Top edge.
    pub t: f32,
    /// Right edge.
    pub r: f32,
    /// Bottom edge.
    pub b: f32,
}

impl Rect {
    /// Creates a rectangle from its edges.
    pub fn new(l: f32, t: f32, r: f32, b: f32) -> Self {
        Self { l, t, r, b }
    }

    /// Creates a rectangle anchored at the origin covering `width` x `height`.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Width of the rectangle. Zero for degenerate rectangles.
    pub fn width(&self) -> f32 {
        (self.r - self.l).max(0.0)
    }

    /// Height of the rectangle. Zero for degenerate rectangles.
    pub fn height(&self) -> f32 {
        (self.b - self.t).max(0.0)
    }

    /// Area of the rectangle.
    ///
    /// A rectangle with `l == r` or `t == b` has zero area; such regions
    /// never reach the recognition backend.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Returns true if the two rectangles overlap.
    ///
    /// Touching edges do not count as an overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.l < other.r && other.l < self.r && self.t < other.b && other.t < self.b
    }

    /// Clips this rectangle to `bounds`.
    pub fn clip_to(&self, bounds: &Rect) -> Rect {
        Rect {
            l: self.l.max(bounds.l),
            t: self.t.max(bounds.t),
            r: self.r.min(bounds.r),
            b: self.b.min(bounds.b),
        }
    }

    /// Maps a bounding box from a rendered region crop back into page space.
    ///
    /// `local` is `[x0, y0, x1, y1]` in pixels of a crop that was rendered at
    /// `scale` times page resolution with its origin at `region`'s top-left
    /// corner. The result divides out the upscale and translates by the
    /// region origin:
    ///
    /// ```text
    /// (x0/scale + region.l, y0/scale + region.t,
    ///  x1/scale + region.l, y1/scale + region.t)
    /// ```
    pub fn from_ocr_frame(local: [f32; 4], scale: u32, region: &Rect) -> Rect {
        let scale = scale as f32;
        Rect {
            l: local[0] / scale + region.l,
            t: local[1] / scale + region.t,
            r: local[2] / scale + region.l,
            b: local[3] / scale + region.t,
        }
    }
}
