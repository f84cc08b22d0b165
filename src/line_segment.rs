//! Directed line segments and the orientation predicate.

use crate::basics::{Point, Vector};
use crate::bounding_box::BoundingBox;
use crate::math::cross_product;

/// Which side of a directed segment a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Collinear,
    Right,
}

/// A directed segment from `start` to `end`.
///
/// Swapping the endpoints flips the sign of [`LineSegment::orient`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// `start - end`.
    #[inline]
    pub fn vector(&self) -> Vector {
        self.start - self.end
    }

    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    /// Segment with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Side of the infinite directed line through the segment that `p` is on.
    ///
    /// Exact zero cross product counts as collinear; there is no epsilon.
    #[inline]
    pub fn orient(&self, p: Point) -> Side {
        let cp = cross_product(self.start.x, self.start.y, self.end.x, self.end.y, p.x, p.y);
        if cp < 0.0 {
            Side::Left
        } else if cp > 0.0 {
            Side::Right
        } else {
            Side::Collinear
        }
    }

    /// Axis-aligned rectangle spanned by the two endpoints.
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.start.x, self.start.y, self.end.x, self.end.y)
    }

    /// `p` lies on the closed segment.
    #[inline]
    pub fn touches(&self, p: Point) -> bool {
        self.orient(p) == Side::Collinear && self.bounds().contains(p)
    }
}
