//! Polygon primitives.
//!
//! [`Polygon`] handles arbitrary simple (possibly non-convex) polygons with
//! the winding-number rule. [`ConvexPolygon`] assumes its vertices are in
//! convex position and uses a cheaper same-side test; convexity is the
//! caller's promise and is not enforced.
//!
//! Both reject zero-length edges at construction, so every edge has a
//! well-defined orientation.

use crate::basics::Point;
use crate::bounding_box::BoundingBox;
use crate::error::{Error, Result};
use crate::line_segment::{LineSegment, Side};
use crate::primitive::{point_from_coords, Geometry, ShapeKind, ShapeRecord};
use crate::trans_affine::TransAffine;

// ============================================================================
// Vertex validation
// ============================================================================

fn check_vertices(kind: ShapeKind, vertices: &[Point]) -> Result<()> {
    if vertices.len() < 3 {
        return Err(Error::invalid_shape(
            kind.as_str(),
            format!("needs at least 3 vertices, got {}", vertices.len()),
        ));
    }
    if let Some(p) = vertices.iter().find(|p| !p.is_finite()) {
        return Err(Error::invalid_shape(
            kind.as_str(),
            format!("vertex {p:?} is not finite"),
        ));
    }
    check_edges(vertices)
}

fn check_edges(vertices: &[Point]) -> Result<()> {
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if a == b {
            return Err(Error::DegenerateGeometry(format!(
                "zero-length edge between vertices {i} and {} at {a:?}",
                (i + 1) % n
            )));
        }
    }
    Ok(())
}

fn vertices_from_record(kind: ShapeKind, record: &ShapeRecord) -> Result<Vec<Point>> {
    let vertices = record
        .vertices
        .as_ref()
        .ok_or_else(|| Error::invalid_shape(kind.as_str(), "missing vertices"))?;
    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| point_from_coords(kind, &format!("vertex {i}"), v))
        .collect()
}

// ============================================================================
// Edges
// ============================================================================

/// Iterator over the closed edge cycle of a vertex list: `v0→v1`, ...,
/// `v(n-1)→v0`.
#[derive(Debug, Clone)]
pub struct Edges<'a> {
    vertices: &'a [Point],
    index: usize,
}

impl<'a> Edges<'a> {
    fn new(vertices: &'a [Point]) -> Self {
        Self { vertices, index: 0 }
    }
}

impl Iterator for Edges<'_> {
    type Item = LineSegment;

    #[inline]
    fn next(&mut self) -> Option<LineSegment> {
        let n = self.vertices.len();
        if self.index >= n {
            return None;
        }
        let start = self.vertices[self.index];
        let end = self.vertices[(self.index + 1) % n];
        self.index += 1;
        Some(LineSegment::new(start, end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vertices.len() - self.index.min(self.vertices.len());
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Edges<'_> {}

// ============================================================================
// Polygon
// ============================================================================

/// General polygon, closed implicitly from the last vertex back to the
/// first. Vertex order defines the winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    bbox: BoundingBox,
}

impl Polygon {
    /// Create a polygon from at least 3 finite vertices with no two
    /// consecutive vertices equal.
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        Self::with_kind(ShapeKind::Polygon, vertices)
    }

    fn with_kind(kind: ShapeKind, vertices: Vec<Point>) -> Result<Self> {
        check_vertices(kind, &vertices)?;
        let bbox = BoundingBox::from_points(vertices.iter().copied()).ok_or_else(|| {
            Error::invalid_shape(kind.as_str(), "needs at least 3 vertices, got 0")
        })?;
        Ok(Self { vertices, bbox })
    }

    /// Build from a record carrying `vertices`.
    pub fn from_parameters(record: &ShapeRecord) -> Result<Self> {
        Self::new(vertices_from_record(ShapeKind::Polygon, record)?)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// The edge cycle, starting at the first vertex. Fresh on every call.
    pub fn edges(&self) -> Edges<'_> {
        Edges::new(&self.vertices)
    }

    /// Whether the vertices actually form a convex polygon: every turn has
    /// the same direction and the boundary winds around exactly once.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        let mut sign = 0.0_f64;
        let mut total_turn = 0.0_f64;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let u = b - a;
            let v = c - b;
            let cross = u.cross(v);
            if cross != 0.0 {
                if sign != 0.0 && cross.signum() != sign {
                    return false;
                }
                sign = cross.signum();
            }
            total_turn += cross.atan2(u.dot(v));
        }
        (total_turn.abs() - std::f64::consts::TAU).abs() < 1e-6
    }

    /// Winding number of the boundary around `p`, or `None` if `p` lies on
    /// the boundary.
    pub fn winding_number(&self, p: Point) -> Option<i32> {
        let mut winding = 0;
        for edge in self.edges() {
            let side = edge.orient(p);
            if side == Side::Collinear && edge.bounds().contains(p) {
                return None;
            }
            if edge.start.y <= p.y {
                // Upward crossing with p strictly left.
                if edge.end.y > p.y && side == Side::Left {
                    winding += 1;
                }
            } else if edge.end.y <= p.y && side == Side::Right {
                // Downward crossing with p strictly right.
                winding -= 1;
            }
        }
        Some(winding)
    }
}

impl Geometry for Polygon {
    /// Non-zero winding rule; boundary points are inside.
    #[inline]
    fn contains(&self, p: Point) -> bool {
        match self.winding_number(p) {
            Some(w) => w != 0,
            None => true,
        }
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Move the bounding box, then every vertex.
    ///
    /// A transform that collapses two consecutive vertices onto each other
    /// is rejected with [`Error::DegenerateGeometry`].
    fn transform(&mut self, m: &TransAffine) -> Result<()> {
        let mut bbox = self.bbox;
        bbox.transform(m)?;

        let vertices: Vec<Point> = self.vertices.iter().map(|&v| m.apply(v)).collect();
        if let Some(p) = vertices.iter().find(|p| !p.is_finite()) {
            return Err(Error::DegenerateGeometry(format!(
                "vertex {p:?} is not finite after transform"
            )));
        }
        check_edges(&vertices)?;

        self.bbox = bbox;
        self.vertices = vertices;
        Ok(())
    }
}

// ============================================================================
// ConvexPolygon
// ============================================================================

/// Polygon whose vertices are in convex position and consistently wound.
///
/// Containment is a same-side test against every edge, with early exit.
/// Results are unspecified when the vertices are not actually convex.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    polygon: Polygon,
}

impl ConvexPolygon {
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        Ok(Self {
            polygon: Polygon::with_kind(ShapeKind::ConvexPolygon, vertices)?,
        })
    }

    /// Build from a record carrying `vertices`.
    pub fn from_parameters(record: &ShapeRecord) -> Result<Self> {
        let shape = Self::new(vertices_from_record(ShapeKind::ConvexPolygon, record)?)?;
        if !shape.polygon.is_convex() {
            log::warn!(
                "{} with vertices {:?} is not convex; containment may be wrong",
                ShapeKind::ConvexPolygon,
                shape.vertices()
            );
        }
        Ok(shape)
    }

    pub fn vertices(&self) -> &[Point] {
        self.polygon.vertices()
    }

    pub fn edges(&self) -> Edges<'_> {
        self.polygon.edges()
    }

    /// The same vertices seen as a general polygon.
    pub fn as_polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn into_polygon(self) -> Polygon {
        self.polygon
    }
}

impl Geometry for ConvexPolygon {
    /// `p` is inside when it lies on the same side of every edge.
    ///
    /// The first edge that is not collinear with `p` fixes the reference
    /// side. An edge collinear with `p` accepts it when `p` is within the
    /// edge's bounds and otherwise does not take part in the vote.
    fn contains(&self, p: Point) -> bool {
        let mut reference = None;
        for edge in self.edges() {
            match edge.orient(p) {
                Side::Collinear => {
                    if edge.bounds().contains(p) {
                        return true;
                    }
                }
                side => match reference {
                    None => reference = Some(side),
                    Some(r) if r != side => return false,
                    Some(_) => {}
                },
            }
        }
        reference.is_some()
    }

    fn bounding_box(&self) -> &BoundingBox {
        self.polygon.bounding_box()
    }

    fn transform(&mut self, m: &TransAffine) -> Result<()> {
        self.polygon.transform(m)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f64, f64)]) -> Vec<Point> {
        v.iter().copied().map(Point::from).collect()
    }

    fn l_shape() -> Polygon {
        // 4x4 square with the top-right 3x3 block removed.
        Polygon::new(pts(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (1.0, 1.0),
            (1.0, 4.0),
            (0.0, 4.0),
        ]))
        .unwrap()
    }

    #[test]
    fn test_edges_wrap_around() {
        let tri = Polygon::new(pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)])).unwrap();
        let edges: Vec<_> = tri.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(tri.edges().len(), 3);
        assert_eq!(edges[2].start, Point::new(0.0, 1.0));
        assert_eq!(edges[2].end, Point::new(0.0, 0.0));
        // Restartable.
        assert_eq!(tri.edges().count(), 3);
    }

    #[test]
    fn test_too_few_vertices() {
        let err = Polygon::new(pts(&[(0.0, 0.0), (1.0, 0.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));
        assert!(matches!(
            Polygon::from_parameters(&ShapeRecord {
                shape: "polygon".into(),
                ..Default::default()
            }),
            Err(Error::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_vertex_with_wrong_arity() {
        let record = ShapeRecord {
            shape: "polygon".into(),
            vertices: Some(vec![vec![0.0, 0.0], vec![1.0, 0.0, 5.0], vec![0.0, 1.0]]),
            ..Default::default()
        };
        let err = Polygon::from_parameters(&record).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid polygon shape: vertex 1 needs 2 coordinates, got 3"
        );
        assert!(matches!(
            ConvexPolygon::from_parameters(&record),
            Err(Error::InvalidShape { ref kind, .. }) if kind == "triangle"
        ));
    }

    #[test]
    fn test_extreme_vertices_keep_finite_bbox() {
        let mut p = Polygon::new(pts(&[(-1e308, 0.0), (1e308, 0.0), (0.0, 1e308)])).unwrap();
        assert!(p.bounding_box().is_finite());
        p.transform(&TransAffine::new()).unwrap();
        assert_eq!(*p.bounding_box(), BoundingBox::new(-1e308, 0.0, 1e308, 1e308));
    }

    #[test]
    fn test_non_finite_vertex() {
        let err = Polygon::new(pts(&[(0.0, 0.0), (f64::NAN, 0.0), (0.0, 1.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));
    }

    #[test]
    fn test_zero_length_edge_is_degenerate() {
        let err = Polygon::new(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 1.0)]))
            .unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));

        // Closing edge last -> first.
        let err = ConvexPolygon::new(pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
    }

    #[test]
    fn test_bounding_box() {
        let p = l_shape();
        assert_eq!(*p.bounding_box(), BoundingBox::new(0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn test_winding_contains_l_shape() {
        let p = l_shape();
        assert!(p.contains(Point::new(0.5, 0.5)));
        assert!(p.contains(Point::new(3.5, 0.5)));
        assert!(p.contains(Point::new(0.5, 3.5)));
        // Concave notch.
        assert!(!p.contains(Point::new(2.5, 2.5)));
        assert!(!p.contains(Point::new(3.5, 3.5)));
        assert!(!p.contains(Point::new(5.0, 0.5)));
    }

    #[test]
    fn test_half_plane_test_fails_on_l_shape() {
        let l = l_shape();
        assert!(!l.is_convex());
        let naive = ConvexPolygon::new(l.vertices().to_vec()).unwrap();
        // The lower arm is inside the L but right of the reflex edge at x = 1.
        let arm = Point::new(3.5, 0.5);
        assert!(l.contains(arm));
        assert!(!naive.contains(arm));
    }

    #[test]
    fn test_collinear_vertex_lists_agree() {
        let lists: [&[(f64, f64)]; 3] = [
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            &[(0.0, 0.0), (2.0, 0.0), (1.0, 0.0)],
            &[(0.0, 0.0), (1.0, 1.0), (3.0, 3.0)],
        ];
        for list in lists {
            let general = Polygon::new(pts(list)).unwrap();
            let convex = ConvexPolygon::new(pts(list)).unwrap();
            for xi in -2..=8 {
                for yi in -2..=8 {
                    let p = Point::new(xi as f64 * 0.5, yi as f64 * 0.5);
                    assert_eq!(
                        general.contains(p),
                        convex.contains(p),
                        "{list:?} at {p:?}"
                    );
                }
            }
        }

        // Covered only by the second edge, not the first.
        let flat = ConvexPolygon::new(pts(lists[0])).unwrap();
        assert!(flat.contains(Point::new(1.5, 0.0)));
        let sloped = ConvexPolygon::new(pts(lists[2])).unwrap();
        assert!(sloped.contains(Point::new(1.5, 1.5)));
        assert!(!sloped.contains(Point::new(3.5, 3.5)));
    }

    #[test]
    fn test_collinear_midpoint_vertex_boundary() {
        let v = pts(&[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let general = Polygon::new(v.clone()).unwrap();
        let convex = ConvexPolygon::new(v).unwrap();
        for p in [Point::new(3.0, 0.0), Point::new(1.0, 0.0), Point::new(5.0, 0.0)] {
            assert_eq!(general.contains(p), convex.contains(p), "at {p:?}");
        }
        assert!(convex.contains(Point::new(3.0, 0.0)));
        assert!(!convex.contains(Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_boundary_points_are_inside() {
        let p = l_shape();
        assert!(p.contains(Point::new(2.0, 0.0)));
        assert!(p.contains(Point::new(2.0, 1.0)));
        assert!(p.contains(Point::new(1.0, 2.5)));
        assert!(p.contains(Point::new(4.0, 1.0)));
        assert_eq!(p.winding_number(Point::new(2.0, 1.0)), None);
    }

    #[test]
    fn test_winding_sign_follows_orientation() {
        let ccw = Polygon::new(pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])).unwrap();
        let mut rev = ccw.vertices().to_vec();
        rev.reverse();
        let cw = Polygon::new(rev).unwrap();
        let p = Point::new(1.0, 1.0);
        assert_eq!(ccw.winding_number(p), Some(1));
        assert_eq!(cw.winding_number(p), Some(-1));
        assert!(ccw.contains(p) && cw.contains(p));
    }

    #[test]
    fn test_vertex_on_ray_not_double_counted() {
        // Diamond: the horizontal ray from the center passes through the
        // vertices at (0, 1) and (2, 1).
        let d = Polygon::new(pts(&[(1.0, 0.0), (2.0, 1.0), (1.0, 2.0), (0.0, 1.0)])).unwrap();
        assert_eq!(d.winding_number(Point::new(1.0, 1.0)), Some(1));
        assert_eq!(d.winding_number(Point::new(-1.0, 1.0)), Some(0));
        assert_eq!(d.winding_number(Point::new(3.0, 1.0)), Some(0));
    }

    #[test]
    fn test_self_overlapping_nonzero() {
        // Boundary that goes around the unit square twice.
        let twice = Polygon::new(pts(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.5),
            (0.5, 0.0),
            (1.0, 0.5),
            (0.5, 1.0),
            (0.0, 0.6),
        ]))
        .unwrap();
        assert_eq!(twice.winding_number(Point::new(0.5, 0.5)), Some(2));
        assert!(twice.contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_convex_triangle() {
        let t = ConvexPolygon::new(pts(&[(50.0, 50.0), (100.0, 50.0), (100.0, 100.0)])).unwrap();
        assert!(t.contains(Point::new(90.5, 60.5)));
        assert!(!t.contains(Point::new(51.5, 99.5)));
        // On an edge and at a vertex.
        assert!(t.contains(Point::new(75.0, 50.0)));
        assert!(t.contains(Point::new(100.0, 100.0)));
        assert!(t.contains(Point::new(75.0, 75.0)));
        // Collinear with the first edge but beyond it.
        assert!(!t.contains(Point::new(120.0, 50.0)));
    }

    #[test]
    fn test_convex_either_winding() {
        let ccw = ConvexPolygon::new(pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]))
            .unwrap();
        let cw = ConvexPolygon::new(pts(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]))
            .unwrap();
        for p in [Point::new(2.0, 2.0), Point::new(0.1, 3.9)] {
            assert!(ccw.contains(p));
            assert!(cw.contains(p));
        }
        for p in [Point::new(-0.1, 2.0), Point::new(2.0, 4.5)] {
            assert!(!ccw.contains(p));
            assert!(!cw.contains(p));
        }
    }

    #[test]
    fn test_is_convex() {
        let sq = Polygon::new(pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])).unwrap();
        assert!(sq.is_convex());
        // Collinear midpoint vertex is still convex.
        let sq5 = Polygon::new(pts(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
        ]))
        .unwrap();
        assert!(sq5.is_convex());
        // Pentagram turns consistently but winds twice.
        let star = Polygon::new(pts(&[
            (0.0, 3.0),
            (1.76, -2.43),
            (-2.85, 0.93),
            (2.85, 0.93),
            (-1.76, -2.43),
        ]))
        .unwrap();
        assert!(!star.is_convex());
    }

    #[test]
    fn test_transform_moves_vertices_and_box() {
        let mut p = l_shape();
        p.transform(&TransAffine::new_translation(10.0, 20.0)).unwrap();
        assert_eq!(p.vertices()[0], Point::new(10.0, 20.0));
        assert_eq!(*p.bounding_box(), BoundingBox::new(10.0, 20.0, 14.0, 24.0));
        assert!(p.contains(Point::new(10.5, 23.5)));
        assert!(!p.contains(Point::new(12.5, 22.5)));
    }

    #[test]
    fn test_transform_collapsing_edge_rejected() {
        let mut p = Polygon::new(pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])).unwrap();
        let before = p.clone();
        // Projecting onto the X axis merges (0,0) with (0,1).
        let err = p.transform(&TransAffine::new_scaling(1.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
        assert_eq!(p, before);
    }

    #[test]
    fn test_convex_transform() {
        let mut t = ConvexPolygon::new(pts(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)])).unwrap();
        t.transform(&TransAffine::new_scaling(-1.0, 1.0)).unwrap();
        assert!(t.contains(Point::new(-0.5, 0.5)));
        assert!(!t.contains(Point::new(0.5, 0.5)));
        assert_eq!(*t.bounding_box(), BoundingBox::new(-2.0, 0.0, 0.0, 2.0));
    }

    #[test]
    fn test_convex_from_parameters() {
        let record = ShapeRecord::polygon(
            ShapeKind::ConvexPolygon,
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            crate::color::Rgb8::RED,
        );
        let t = ConvexPolygon::from_parameters(&record).unwrap();
        assert_eq!(t.vertices().len(), 3);
        assert_eq!(t.as_polygon().vertices(), t.vertices());
    }
}
