//! Geometric math utilities: cross products and distances.

/// Cross product of vectors (x2-x1, y2-y1) and (x-x2, y-y2).
///
/// The sign tells which side of the directed line (x1,y1)→(x2,y2) the point
/// (x,y) is on: negative means left, positive means right, zero collinear.
#[inline]
pub fn cross_product(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    (x - x2) * (y2 - y1) - (y - y2) * (x2 - x1)
}

/// Euclidean distance between two points.
#[inline]
pub fn calc_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}
