//! Primitives: colored shapes that can be tested for point containment.
//!
//! The set of shapes is closed ([`Shape`]), and every variant implements the
//! [`Geometry`] capability trait. A [`Primitive`] pairs a shape with the
//! color the rasterizer paints it in.

use std::fmt;
use std::str::FromStr;

use crate::basics::Point;
use crate::bounding_box::BoundingBox;
use crate::circle::Circle;
use crate::color::Rgb8;
use crate::error::{Error, Result};
use crate::polygon::{ConvexPolygon, Polygon};
use crate::trans_affine::TransAffine;

// ============================================================================
// Geometry trait
// ============================================================================

/// Capabilities shared by every shape.
pub trait Geometry {
    /// Whether `p` lies inside the shape or on its boundary.
    fn contains(&self, p: Point) -> bool;

    /// Axis-aligned box enclosing the whole shape in world space.
    fn bounding_box(&self) -> &BoundingBox;

    /// Apply an affine transform to the shape.
    ///
    /// On error the shape is left exactly as it was.
    fn transform(&mut self, m: &TransAffine) -> Result<()>;
}

// ============================================================================
// ShapeKind
// ============================================================================

/// Discriminant of [`Shape`], as named in scene descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Polygon,
    ConvexPolygon,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::ConvexPolygon => "triangle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    /// Accepts `circle`, `polygon`, and `triangle` / `convex_polygon` for
    /// convex polygons (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(ShapeKind::Circle),
            "polygon" => Ok(ShapeKind::Polygon),
            "triangle" | "convex_polygon" | "convexpolygon" => Ok(ShapeKind::ConvexPolygon),
            _ => Err(Error::invalid_shape(
                s,
                "unknown shape kind (expected circle, polygon or triangle)",
            )),
        }
    }
}

// ============================================================================
// ShapeRecord
// ============================================================================

/// Construction parameters for one primitive, as produced by a scene loader.
///
/// Which fields are required depends on `shape`: circles need `center` and
/// `radius`, polygons need `vertices`. `xform` is a row-major 3x3 affine
/// matrix applied after construction.
///
/// Coordinates are kept as plain number lists so that a point with the wrong
/// number of components is reported by the shape that needs it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "scene", derive(serde::Deserialize))]
pub struct ShapeRecord {
    pub shape: String,
    pub color: Option<Rgb8>,
    pub center: Option<Vec<f64>>,
    #[cfg_attr(
        feature = "scene",
        serde(default, deserialize_with = "crate::scene::lenient_number")
    )]
    pub radius: Option<f64>,
    pub vertices: Option<Vec<Vec<f64>>>,
    pub xform: Option<Vec<Vec<f64>>>,
}

impl ShapeRecord {
    pub fn circle(center: [f64; 2], radius: f64, color: Rgb8) -> Self {
        Self {
            shape: ShapeKind::Circle.as_str().to_string(),
            color: Some(color),
            center: Some(center.to_vec()),
            radius: Some(radius),
            ..Default::default()
        }
    }

    pub fn polygon(kind: ShapeKind, vertices: &[[f64; 2]], color: Rgb8) -> Self {
        Self {
            shape: kind.as_str().to_string(),
            color: Some(color),
            vertices: Some(vertices.iter().map(|v| v.to_vec()).collect()),
            ..Default::default()
        }
    }

    pub fn with_xform(mut self, xform: [[f64; 3]; 3]) -> Self {
        self.xform = Some(xform.iter().map(|row| row.to_vec()).collect());
        self
    }
}

/// Read a `[x, y]` coordinate pair for a `kind` shape.
pub(crate) fn point_from_coords(kind: ShapeKind, what: &str, coords: &[f64]) -> Result<Point> {
    match *coords {
        [x, y] => Ok(Point::new(x, y)),
        _ => Err(Error::invalid_shape(
            kind.as_str(),
            format!("{what} needs 2 coordinates, got {}", coords.len()),
        )),
    }
}

/// Read a row-major 3x3 matrix.
fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<[[f64; 3]; 3]> {
    let mut m = [[0.0; 3]; 3];
    if rows.len() != 3 {
        return Err(Error::InvalidTransform(format!(
            "expected 3 rows, got {}",
            rows.len()
        )));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != 3 {
            return Err(Error::InvalidTransform(format!(
                "row {i} has {} entries, expected 3",
                row.len()
            )));
        }
        m[i].copy_from_slice(row);
    }
    Ok(m)
}

// ============================================================================
// Shape
// ============================================================================

/// Closed set of supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
    ConvexPolygon(ConvexPolygon),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::ConvexPolygon(_) => ShapeKind::ConvexPolygon,
        }
    }

    /// Build the shape named by `record.shape` from its parameters.
    pub fn from_parameters(record: &ShapeRecord) -> Result<Self> {
        Ok(match record.shape.parse::<ShapeKind>()? {
            ShapeKind::Circle => Shape::Circle(Circle::from_parameters(record)?),
            ShapeKind::Polygon => Shape::Polygon(Polygon::from_parameters(record)?),
            ShapeKind::ConvexPolygon => {
                Shape::ConvexPolygon(ConvexPolygon::from_parameters(record)?)
            }
        })
    }
}

impl Geometry for Shape {
    #[inline]
    fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Circle(c) => c.contains(p),
            Shape::Polygon(poly) => poly.contains(p),
            Shape::ConvexPolygon(poly) => poly.contains(p),
        }
    }

    fn bounding_box(&self) -> &BoundingBox {
        match self {
            Shape::Circle(c) => c.bounding_box(),
            Shape::Polygon(poly) => poly.bounding_box(),
            Shape::ConvexPolygon(poly) => poly.bounding_box(),
        }
    }

    fn transform(&mut self, m: &TransAffine) -> Result<()> {
        match self {
            Shape::Circle(c) => c.transform(m),
            Shape::Polygon(poly) => poly.transform(m),
            Shape::ConvexPolygon(poly) => poly.transform(m),
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Shape::Polygon(p)
    }
}

impl From<ConvexPolygon> for Shape {
    fn from(p: ConvexPolygon) -> Self {
        Shape::ConvexPolygon(p)
    }
}

// ============================================================================
// Primitive
// ============================================================================

/// A shape together with its fill color.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub color: Rgb8,
}

impl Primitive {
    pub fn new(shape: impl Into<Shape>, color: Rgb8) -> Self {
        Self {
            shape: shape.into(),
            color,
        }
    }

    /// Build a primitive from a scene record: construct the shape, attach
    /// its color, then apply `xform` when present.
    pub fn from_record(record: &ShapeRecord) -> Result<Self> {
        let mut shape = Shape::from_parameters(record)?;
        let color = record
            .color
            .ok_or_else(|| Error::invalid_shape(shape.kind().as_str(), "missing color"))?;
        if let Some(xform) = &record.xform {
            let m = matrix_from_rows(xform)?;
            shape.transform(&TransAffine::from_matrix(&m)?)?;
        }
        Ok(Self { shape, color })
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
}

impl Geometry for Primitive {
    #[inline]
    fn contains(&self, p: Point) -> bool {
        self.shape.contains(p)
    }

    fn bounding_box(&self) -> &BoundingBox {
        self.shape.bounding_box()
    }

    fn transform(&mut self, m: &TransAffine) -> Result<()> {
        self.shape.transform(m)
    }
}

// ============================================================================
// Tests
// ============================================================================
