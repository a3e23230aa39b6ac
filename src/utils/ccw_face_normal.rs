use crate::math::{Point, Real, UnitVector, Vector, DEFAULT_EPSILON};

/// Computes the normal of a counter-clock-wise triangle.
///
/// Returns `None` if the triangle is degenerate.
#[inline]
pub fn ccw_face_normal(pts: [&Point<Real>; 3]) -> Option<UnitVector<Real>> {
    let ab = pts[1] - pts[0];
    let ac = pts[2] - pts[0];
    let res = ab.cross(&ac);

    UnitVector::try_new(res, DEFAULT_EPSILON)
}

/// Computes the normal of a planar counter-clock-wise polygon using Newell's method.
///
/// Returns `None` if the polygon is degenerate.
pub fn ccw_polygon_normal(pts: &[Point<Real>]) -> Option<UnitVector<Real>> {
    let mut res = Vector::zeros();
    let mut prev = pts.last()?;

    for pt in pts {
        res += prev.coords.cross(&pt.coords);
        prev = pt;
    }

    UnitVector::try_new(res, DEFAULT_EPSILON)
}
