//! Projection of the origin on segments and triangles, with the Voronoï region it falls into.

use crate::math::{Point, Real};

/// The feature of a triangle the projection of the origin lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TriangleLocation {
    /// The projection is the `i`-th vertex.
    OnVertex(usize),
    /// The projection lies inside of the edge joining the vertices `i < j`.
    OnEdge(usize, usize),
    /// The projection lies inside of the triangle.
    OnFace,
}

/// The projection of the origin on a triangle.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TriangleProjection {
    pub point: Point<Real>,
    pub bcoords: [Real; 3],
    pub location: TriangleLocation,
}

/// Projects the origin on the segment `[a, b]`.
///
/// Returns the projection and the parameter `t` such that the projection is `a + (b - a) * t`.
pub(crate) fn project_origin_on_segment(a: &Point<Real>, b: &Point<Real>) -> (Point<Real>, Real) {
    let ab = b - a;
    let sq_len = ab.norm_squared();

    if sq_len == 0.0 {
        return (*a, 0.0);
    }

    let t = (-a.coords.dot(&ab) / sq_len).clamp(0.0, 1.0);
    (a + ab * t, t)
}

fn edge_projection(a: &Point<Real>, b: &Point<Real>, i: usize, j: usize) -> TriangleProjection {
    let (point, t) = project_origin_on_segment(a, b);
    let mut bcoords = [0.0; 3];
    let location = if t <= 0.0 {
        bcoords[i] = 1.0;
        TriangleLocation::OnVertex(i)
    } else if t >= 1.0 {
        bcoords[j] = 1.0;
        TriangleLocation::OnVertex(j)
    } else {
        bcoords[i] = 1.0 - t;
        bcoords[j] = t;
        TriangleLocation::OnEdge(i, j)
    };

    TriangleProjection {
        point,
        bcoords,
        location,
    }
}

fn vertex_projection(pt: &Point<Real>, i: usize) -> TriangleProjection {
    let mut bcoords = [0.0; 3];
    bcoords[i] = 1.0;
    TriangleProjection {
        point: *pt,
        bcoords,
        location: TriangleLocation::OnVertex(i),
    }
}

/// Projects the origin on the triangle `(a, b, c)`.
///
/// Degenerate triangles are handled by projecting on their closest edge.
pub(crate) fn project_origin_on_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
) -> TriangleProjection {
    // Voronoï region tests from "Real-Time Collision Detection", Ericson, 5.1.5.
    let ab = b - a;
    let ac = c - a;

    let d1 = -ab.dot(&a.coords);
    let d2 = -ac.dot(&a.coords);
    if d1 <= 0.0 && d2 <= 0.0 {
        return vertex_projection(a, 0);
    }

    let d3 = -ab.dot(&b.coords);
    let d4 = -ac.dot(&b.coords);
    if d3 >= 0.0 && d4 <= d3 {
        return vertex_projection(b, 1);
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return edge_projection(a, b, 0, 1);
    }

    let d5 = -ab.dot(&c.coords);
    let d6 = -ac.dot(&c.coords);
    if d6 >= 0.0 && d5 <= d6 {
        return vertex_projection(c, 2);
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return edge_projection(a, c, 0, 2);
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return edge_projection(b, c, 1, 2);
    }

    let total = va + vb + vc;
    if total <= 0.0 || !total.is_finite() {
        // Flat triangle: keep the best of its three edges.
        let candidates = [
            edge_projection(a, b, 0, 1),
            edge_projection(a, c, 0, 2),
            edge_projection(b, c, 1, 2),
        ];
        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.point.coords.norm_squared() < best.point.coords.norm_squared() {
                best = *candidate;
            }
        }
        return best;
    }

    let v = vb / total;
    let w = vc / total;
    TriangleProjection {
        point: a + ab * v + ac * w,
        bcoords: [1.0 - v - w, v, w],
        location: TriangleLocation::OnFace,
    }
}

#[cfg(test)]
mod test {
    use super::{project_origin_on_segment, project_origin_on_triangle, TriangleLocation};
    use crate::math::Point;

    #[test]
    fn segment_projection() {
        let (pt, t) = project_origin_on_segment(&Point::new(-1.0, 1.0, 0.0), &Point::new(1.0, 1.0, 0.0));
        assert_relative_eq!(pt, Point::new(0.0, 1.0, 0.0));
        assert_relative_eq!(t, 0.5);

        let (pt, t) = project_origin_on_segment(&Point::new(1.0, 1.0, 0.0), &Point::new(2.0, 1.0, 0.0));
        assert_eq!(pt, Point::new(1.0, 1.0, 0.0));
        assert_eq!(t, 0.0);
    }

    #[test]
    fn triangle_regions() {
        let a = Point::new(-1.0, -1.0, 1.0);
        let b = Point::new(1.0, -1.0, 1.0);
        let c = Point::new(0.0, 1.0, 1.0);
        let proj = project_origin_on_triangle(&a, &b, &c);
        assert_eq!(proj.location, TriangleLocation::OnFace);
        assert_relative_eq!(proj.point, Point::new(0.0, 0.0, 1.0), epsilon = 1.0e-6);
        let sum: crate::math::Real = proj.bcoords.iter().sum();
        assert_relative_eq!(sum, 1.0);

        let shifted = |p: Point<crate::math::Real>| Point::new(p.x + 3.0, p.y, p.z);
        let proj = project_origin_on_triangle(&shifted(a), &shifted(b), &shifted(c));
        assert_eq!(proj.location, TriangleLocation::OnVertex(0));

        let a = Point::new(-1.0, 1.0, 0.0);
        let b = Point::new(1.0, 1.0, 0.0);
        let c = Point::new(0.0, 3.0, 0.0);
        let proj = project_origin_on_triangle(&a, &b, &c);
        assert_eq!(proj.location, TriangleLocation::OnEdge(0, 1));
        assert_relative_eq!(proj.point, Point::new(0.0, 1.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn flat_triangle_projection() {
        let a = Point::new(1.0, -1.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(1.0, 1.0, 0.0);
        let proj = project_origin_on_triangle(&a, &b, &c);
        assert!(proj.point.iter().all(|x| x.is_finite()));
        assert_relative_eq!(proj.point, Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-6);
    }
}
