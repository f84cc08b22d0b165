//! Affine transformation matrix.
//!
//! 2D affine transformations (rotation, scaling, translation, shear)
//! stored as the top two rows of a 3x3 homogeneous matrix.

use crate::basics::{is_equal_eps, Point};
use crate::error::{Error, Result};

/// Epsilon for affine matrix comparisons.
pub const AFFINE_EPSILON: f64 = 1e-14;

/// 2D affine transformation matrix.
///
/// Stores six components: `[sx, shy, shx, sy, tx, ty]` representing the
/// matrix:
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// Transform: `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`, i.e. the
/// first two components of `M · [x, y, 1]`.
///
/// Products read left to right: `a * b` applies `a` first, then `b`.
#[derive(Debug, Clone, Copy)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub fn new() -> Self {
        Self {
            sx: 1.0,
            shy: 0.0,
            shx: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Custom matrix from six components.
    pub fn new_custom(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    /// Construct from a row-major 3x3 homogeneous matrix.
    ///
    /// The bottom row must be exactly `[0, 0, 1]` and every coefficient
    /// finite; anything else is not an affine map.
    pub fn from_matrix(m: &[[f64; 3]; 3]) -> Result<Self> {
        if m.iter().flatten().any(|v| !v.is_finite()) {
            return Err(Error::InvalidTransform(format!(
                "matrix has non-finite coefficients: {m:?}"
            )));
        }
        if m[2] != [0.0, 0.0, 1.0] {
            return Err(Error::InvalidTransform(format!(
                "bottom row must be [0, 0, 1], got {:?}",
                m[2]
            )));
        }
        Ok(Self::new_custom(
            m[0][0], m[1][0], m[0][1], m[1][1], m[0][2], m[1][2],
        ))
    }

    /// Row-major 3x3 homogeneous form.
    pub fn to_matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.sx, self.shx, self.tx],
            [self.shy, self.sy, self.ty],
            [0.0, 0.0, 1.0],
        ]
    }

    // ====================================================================
    // Named constructors
    // ====================================================================

    /// Rotation matrix (counter-clockwise, radians).
    pub fn new_rotation(a: f64) -> Self {
        let (sa, ca) = a.sin_cos();
        Self::new_custom(ca, sa, -sa, ca, 0.0, 0.0)
    }

    /// Non-uniform scaling matrix.
    pub fn new_scaling(x: f64, y: f64) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Uniform scaling matrix.
    pub fn new_scaling_uniform(s: f64) -> Self {
        Self::new_custom(s, 0.0, 0.0, s, 0.0, 0.0)
    }

    /// Translation matrix.
    pub fn new_translation(x: f64, y: f64) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Rotation by `a` radians about `center` instead of the origin.
    pub fn new_rotation_about(center: Point, a: f64) -> Self {
        Self::new_translation(-center.x, -center.y)
            * Self::new_rotation(a)
            * Self::new_translation(center.x, center.y)
    }

    // ====================================================================
    // Operations (mutate self)
    // ====================================================================

    /// Post-multiply: `self = self * m` (apply `self`, then `m`).
    pub fn multiply(&mut self, m: &TransAffine) -> &mut Self {
        let t0 = self.sx * m.sx + self.shy * m.shx;
        let t2 = self.shx * m.sx + self.sy * m.shx;
        let t4 = self.tx * m.sx + self.ty * m.shx + m.tx;
        self.shy = self.sx * m.shy + self.shy * m.sy;
        self.sy = self.shx * m.shy + self.sy * m.sy;
        self.ty = self.tx * m.shy + self.ty * m.sy + m.ty;
        self.sx = t0;
        self.shx = t2;
        self.tx = t4;
        self
    }

    /// The inverse matrix.
    ///
    /// Fails with [`Error::DegenerateGeometry`] when the linear part is
    /// singular, since such a map collapses the plane and cannot be undone.
    pub fn inverted(&self) -> Result<TransAffine> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(Error::DegenerateGeometry(format!(
                "transform is not invertible (determinant {det})"
            )));
        }
        let d = 1.0 / det;
        let sx = self.sy * d;
        let sy = self.sx * d;
        let shy = -self.shy * d;
        let shx = -self.shx * d;
        let tx = -self.tx * sx - self.ty * shx;
        let ty = -self.tx * shy - self.ty * sy;
        let inv = Self::new_custom(sx, shy, shx, sy, tx, ty);
        if !inv.is_finite() {
            return Err(Error::DegenerateGeometry(format!(
                "inverse of {self:?} overflows"
            )));
        }
        Ok(inv)
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    /// Image of `p` under this transform.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.sx + p.y * self.shx + self.tx,
            p.x * self.shy + p.y * self.sy + self.ty,
        )
    }

    // ====================================================================
    // Auxiliary
    // ====================================================================

    /// Determinant of the 2x2 portion.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// All six coefficients are finite.
    pub fn is_finite(&self) -> bool {
        [self.sx, self.shy, self.shx, self.sy, self.tx, self.ty]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Check if this is an identity matrix.
    pub fn is_identity(&self, epsilon: f64) -> bool {
        is_equal_eps(self.sx, 1.0, epsilon)
            && is_equal_eps(self.shy, 0.0, epsilon)
            && is_equal_eps(self.shx, 0.0, epsilon)
            && is_equal_eps(self.sy, 1.0, epsilon)
            && is_equal_eps(self.tx, 0.0, epsilon)
            && is_equal_eps(self.ty, 0.0, epsilon)
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TransAffine {
    fn eq(&self, other: &Self) -> bool {
        self.to_matrix()
            .iter()
            .flatten()
            .zip(other.to_matrix().iter().flatten())
            .all(|(&a, &b)| is_equal_eps(a, b, AFFINE_EPSILON))
    }
}

impl std::ops::Mul for TransAffine {
    type Output = TransAffine;
    fn mul(self, rhs: TransAffine) -> TransAffine {
        let mut result = self;
        result.multiply(&rhs);
        result
    }
}

impl std::ops::MulAssign for TransAffine {
    fn mul_assign(&mut self, rhs: TransAffine) {
        self.multiply(&rhs);
    }
}

// ============================================================================
// Tests
// ============================================================================
