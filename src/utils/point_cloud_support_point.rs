use crate::math::{Point, Real, Vector};

/// Computes the index of the support point of a cloud of points, and its dot product with `dir`.
///
/// Returns `(0, -Real::MAX)` if `points` is empty.
#[inline]
pub fn point_cloud_support_point_id(dir: &Vector<Real>, points: &[Point<Real>]) -> (usize, Real) {
    let mut best_pt = 0;
    let mut best_dot = -Real::MAX;

    for (i, p) in points.iter().enumerate() {
        let dot = p.coords.dot(dir);

        if dot > best_dot {
            best_dot = dot;
            best_pt = i;
        }
    }

    (best_pt, best_dot)
}
