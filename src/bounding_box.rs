//! Axis-aligned bounding boxes and the pixel ranges they cover.
//!
//! A [`BoundingBox`] bounds the rasterization search space of one shape:
//! the rasterizer only tests the pixels yielded by [`BoundingBox::pixels`].

use crate::basics::{ifloor, Point};
use crate::error::{Error, Result};
use crate::trans_affine::TransAffine;

/// Axis-aligned rectangle with `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a box from two opposite corners in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Smallest box enclosing every point, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bbox = Self::new(first.x, first.y, first.x, first.y);
        for p in points {
            if p.x < bbox.min_x {
                bbox.min_x = p.x;
            }
            if p.y < bbox.min_y {
                bbox.min_y = p.y;
            }
            if p.x > bbox.max_x {
                bbox.max_x = p.x;
            }
            if p.y > bbox.max_y {
                bbox.max_y = p.y;
            }
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// The four corners, counter-clockwise from `(min_x, min_y)`.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Closed-interval containment test.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Replace the box with the axis-aligned bounds of its four transformed
    /// corners.
    ///
    /// A rotated or sheared box is no longer axis-aligned, so the corners are
    /// re-fitted rather than stored. On failure the box is left unchanged.
    pub fn transform(&mut self, m: &TransAffine) -> Result<()> {
        let fitted = Self::from_points(self.corners().map(|c| m.apply(c)))
            .filter(|b| b.is_finite())
            .ok_or_else(|| {
                Error::DegenerateGeometry(format!(
                    "bounding box {self:?} is not finite after transform"
                ))
            })?;
        *self = fitted;
        Ok(())
    }

    /// Integer pixel coordinates covered by the box.
    ///
    /// Spans `floor(min)..=floor(max)` on both axes, so boundary pixels at
    /// both ends are included. The iterator is fresh on every call.
    pub fn pixels(&self) -> Pixels {
        Pixels::new(
            ifloor(self.min_x),
            ifloor(self.min_y),
            ifloor(self.max_x),
            ifloor(self.max_y),
        )
    }
}

// ============================================================================
// Pixels
// ============================================================================

/// Iterator over an inclusive integer rectangle, column by column
/// (x outer, y inner).
#[derive(Debug, Clone)]
pub struct Pixels {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x: i64,
    y: i64,
}

impl Pixels {
    /// Inclusive range `x1..=x2` by `y1..=y2`. Empty if either range is.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            x: x1 as i64,
            y: y1 as i64,
        }
    }

    /// Restrict the range to the pixels of a `width` x `height` canvas.
    pub fn clip(self, width: u32, height: u32) -> Self {
        let max_x = (width as i64 - 1).min(i32::MAX as i64) as i32;
        let max_y = (height as i64 - 1).min(i32::MAX as i64) as i32;
        Self::new(
            self.x1.max(0),
            self.y1.max(0),
            self.x2.min(max_x),
            self.y2.min(max_y),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    /// Total number of pixels in the range, regardless of iteration progress.
    pub fn count_total(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let w = (self.x2 as i64 - self.x1 as i64 + 1) as u64;
        let h = (self.y2 as i64 - self.y1 as i64 + 1) as u64;
        w * h
    }
}

impl Iterator for Pixels {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.is_empty() || self.x > self.x2 as i64 {
            return None;
        }
        let item = (self.x as i32, self.y as i32);
        self.y += 1;
        if self.y > self.y2 as i64 {
            self.y = self.y1 as i64;
            self.x += 1;
        }
        Some(item)
    }
}

// ============================================================================
// Tests
// ============================================================================
