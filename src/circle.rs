//! Closed disk primitive.
//!
//! A circle under a non-uniform scale or shear becomes an ellipse, which the
//! center/radius pair cannot describe. Instead of changing its geometry, a
//! transformed circle keeps its canonical center and radius and remembers
//! the inverse of every transform applied to it. Query points are pulled
//! back through that inverse before the distance test. Only the bounding box
//! is moved forward into world space.

use crate::basics::Point;
use crate::bounding_box::BoundingBox;
use crate::error::{Error, Result};
use crate::math::calc_distance;
use crate::primitive::{point_from_coords, Geometry, ShapeKind, ShapeRecord};
use crate::trans_affine::TransAffine;

/// Closed disk `‖p - center‖ <= radius`, optionally seen through a chain of
/// affine transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
    bbox: BoundingBox,
    pull_back: Option<TransAffine>,
}

impl Circle {
    /// Create a circle. The radius must be finite and non-negative.
    pub fn new(center: Point, radius: f64) -> Result<Self> {
        if !center.is_finite() {
            return Err(Error::invalid_shape(
                ShapeKind::Circle.as_str(),
                format!("center {center:?} is not finite"),
            ));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::invalid_shape(
                ShapeKind::Circle.as_str(),
                format!("radius must be a non-negative number, got {radius}"),
            ));
        }
        let bbox = BoundingBox::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        );
        if !bbox.is_finite() {
            return Err(Error::DegenerateGeometry(format!(
                "circle at {center:?} with radius {radius} overflows its bounding box"
            )));
        }
        Ok(Self {
            center,
            radius,
            bbox,
            pull_back: None,
        })
    }

    /// Build from a record carrying `center` and `radius`.
    pub fn from_parameters(record: &ShapeRecord) -> Result<Self> {
        let kind = ShapeKind::Circle.as_str();
        let center = record
            .center
            .as_deref()
            .ok_or_else(|| Error::invalid_shape(kind, "missing center"))?;
        let center = point_from_coords(ShapeKind::Circle, "center", center)?;
        let radius = record
            .radius
            .ok_or_else(|| Error::invalid_shape(kind, "missing radius"))?;
        Self::new(center, radius)
    }

    /// Center in the circle's own (untransformed) space.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Radius in the circle's own (untransformed) space.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Transform mapping world points back into the circle's own space.
    pub fn pull_back(&self) -> Option<&TransAffine> {
        self.pull_back.as_ref()
    }
}

impl Geometry for Circle {
    #[inline]
    fn contains(&self, p: Point) -> bool {
        let q = match &self.pull_back {
            Some(m) => m.apply(p),
            None => p,
        };
        calc_distance(q.x, q.y, self.center.x, self.center.y) <= self.radius
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Move the bounding box forward and prepend `m⁻¹` to the pull-back
    /// chain, so the most recent transform is undone first.
    fn transform(&mut self, m: &TransAffine) -> Result<()> {
        let inv = m.inverted()?;
        let mut bbox = self.bbox;
        bbox.transform(m)?;

        self.pull_back = Some(match self.pull_back {
            Some(prev) => inv * prev,
            None => inv,
        });
        self.bbox = bbox;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
