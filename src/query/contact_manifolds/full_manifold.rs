//! Full contact manifold generation, used when the cached contacts cannot be trusted.

use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::contact_manifolds::ContactPoint;
use crate::shape::{ConvexShape, PolygonalFeature, SupportMap};
use crate::utils::{self, WBasis};
#[cfg(not(feature = "std"))]
use na::ComplexField; // for .abs()
use na::{Point2, Unit};
use num::Bounded;
use smallvec::SmallVec;

/// The contacts produced by a full manifold generation, before reduction.
pub type ManifoldCandidates = SmallVec<[ContactPoint; 16]>;

// An edge-edge axis must beat the best face axis by this much to be selected.
const EDGE_AXIS_TOLERANCE: Real = 1.0e-4;
// Two candidates closer than this (squared) on the first shape are merged.
const DUPLICATE_SQ_DIST: Real = 1.0e-10;
// Relative distance below which a point is considered to lie on a polygon edge.
const POINT_ON_EDGE_TOLERANCE: Real = 1.0e-5;

/// The separation of the two shapes along `axis`, expressed in the local-space of the first
/// shape and pointing from the first shape toward the second one.
///
/// Negative when the projections of the shapes on `axis` overlap.
#[inline]
pub fn separation_along_axis(
    pos12: &Isometry<Real>,
    shape1: &ConvexShape,
    shape2: &ConvexShape,
    axis: &Vector<Real>,
) -> Real {
    let pt1 = shape1.local_support_point(axis).point;
    let pt2 = shape2.support_point(pos12, &-axis).point;
    (pt2 - pt1).dot(axis)
}

/// Finds the separating axis test axis with the largest separation.
///
/// The face normals of both shapes are tested first, then the cross products of every pair of
/// edges. Returns the axis, pointing from the first shape toward the second one, in the
/// local-space of the first shape, together with the separation along that axis.
pub fn sat_best_axis(
    pos12: &Isometry<Real>,
    shape1: &ConvexShape,
    shape2: &ConvexShape,
) -> (UnitVector<Real>, Real) {
    let mut best_axis = Vector::x_axis();
    let mut best_sep = -Real::max_value();

    let mut test_axis = |axis: &Vector<Real>, tolerance: Real| {
        for candidate in [*axis, -*axis] {
            let sep = separation_along_axis(pos12, shape1, shape2, &candidate);
            if sep > best_sep + tolerance {
                best_sep = sep;
                best_axis = Unit::new_unchecked(candidate);
            }
        }
    };

    for n1 in shape1.face_normals() {
        test_axis(&n1, 0.0);
    }

    for n2 in shape2.face_normals() {
        test_axis(&(pos12 * n2), 0.0);
    }

    let edges1 = shape1.edge_directions();
    let edges2 = shape2.edge_directions();

    for e1 in &edges1 {
        for e2 in &edges2 {
            let e2_1 = pos12 * e2;
            let cross = e1.cross(&e2_1);
            let sq_norm = cross.norm_squared();

            if sq_norm <= 1.0e-6 * e1.norm_squared() * e2_1.norm_squared() {
                // Parallel edges: already covered by the face normals.
                continue;
            }

            test_axis(&cross.normalize(), EDGE_AXIS_TOLERANCE);
        }
    }

    (best_axis, best_sep)
}

#[inline]
fn project(basis: &[Vector<Real>; 2], pt: &Point<Real>) -> Point2<Real> {
    Point2::new(pt.coords.dot(&basis[0]), pt.coords.dot(&basis[1]))
}

// Is `pt` inside of the convex polygon `poly`, regardless of its winding?
fn point_in_polygon2d(pt: &Point2<Real>, poly: &[Point2<Real>]) -> bool {
    let mut sign = 0.0;

    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        let edge = b - a;
        let new_sign = edge.perp(&(pt - a));

        if new_sign.abs() <= POINT_ON_EDGE_TOLERANCE * edge.norm_squared() {
            continue;
        }

        if sign == 0.0 {
            sign = new_sign;
        } else if sign * new_sign < 0.0 {
            return false;
        }
    }

    true
}

/// Compute the barycentric coordinates of the intersection between the two given lines.
/// Returns `None` if the lines are parallel.
fn intersect_lines2d(edge1: [Point2<Real>; 2], edge2: [Point2<Real>; 2]) -> Option<(Real, Real)> {
    let dir1 = edge1[1] - edge1[0];
    let dir2 = edge2[1] - edge2[0];
    let denom = dir1.perp(&dir2);

    if denom.abs() <= crate::math::DEFAULT_EPSILON * dir1.norm() * dir2.norm() {
        return None;
    }

    let r = edge2[0] - edge1[0];
    Some((r.perp(&dir2) / denom, r.perp(&dir1) / denom))
}

fn push_candidate(candidates: &mut ManifoldCandidates, contact: ContactPoint) {
    if contact.is_valid()
        && !candidates
            .iter()
            .any(|c| (c.local_p1 - contact.local_p1).norm_squared() <= DUPLICATE_SQ_DIST)
    {
        candidates.push(contact);
    }
}

/// Computes the contacts between two faces by clipping them against each other.
///
/// `face1` is in the local-space of the first shape and `face2_1` is the face of the second
/// shape expressed in that same space. Only contacts separated by at most `contact_distance`
/// along `sep_axis1` are kept.
pub fn clip_polygons(
    pos12: &Isometry<Real>,
    face1: &PolygonalFeature,
    face2_1: &PolygonalFeature,
    sep_axis1: &UnitVector<Real>,
    contact_distance: Real,
    candidates: &mut ManifoldCandidates,
) {
    // Project the faces to a 2D plane for contact clipping.
    // The plane they are projected onto has normal sep_axis1
    // and contains the origin of the first shape.
    let basis = sep_axis1.orthonormal_basis();
    let projected_face1: SmallVec<[Point2<Real>; 8]> =
        face1.vertices.iter().map(|pt| project(&basis, pt)).collect();
    let projected_face2: SmallVec<[Point2<Real>; 8]> = face2_1
        .vertices
        .iter()
        .map(|pt| project(&basis, pt))
        .collect();

    let mut push = |local_p1: Point<Real>, local_p2_1: Point<Real>, dist: Real| {
        if dist <= contact_distance {
            push_candidate(
                candidates,
                ContactPoint::new(
                    local_p1,
                    pos12.inverse_transform_point(&local_p2_1),
                    *sep_axis1,
                    -dist,
                ),
            );
        }
    };

    // Vertices of the first face inside of the projection of the second face.
    let denom2 = face2_1.normal.dot(sep_axis1);
    if face2_1.num_vertices() > 2 && !relative_eq!(denom2, 0.0) {
        for (pt1, v1) in projected_face1.iter().zip(face1.vertices.iter()) {
            if point_in_polygon2d(pt1, &projected_face2) {
                let dist = (face2_1.vertices[0] - v1).dot(&face2_1.normal) / denom2;
                push(*v1, v1 + **sep_axis1 * dist, dist);
            }
        }
    }

    // Vertices of the second face inside of the projection of the first face.
    let denom1 = face1.normal.dot(sep_axis1);
    if face1.num_vertices() > 2 && !relative_eq!(denom1, 0.0) {
        for (pt2, v2) in projected_face2.iter().zip(face2_1.vertices.iter()) {
            if point_in_polygon2d(pt2, &projected_face1) {
                let dist = (v2 - face1.vertices[0]).dot(&face1.normal) / denom1;
                push(v2 - **sep_axis1 * dist, *v2, dist);
            }
        }
    }

    // Intersections between the edges of both faces.
    let n1 = projected_face1.len();
    let n2 = projected_face2.len();

    for j in 0..n2 {
        let projected_edge2 = [projected_face2[j], projected_face2[(j + 1) % n2]];

        for i in 0..n1 {
            let projected_edge1 = [projected_face1[i], projected_face1[(i + 1) % n1]];

            if let Some((s, t)) = intersect_lines2d(projected_edge1, projected_edge2) {
                if s > 0.0 && s < 1.0 && t > 0.0 && t < 1.0 {
                    let edge1 = face1.edge(i);
                    let edge2 = face2_1.edge(j);
                    let local_p1 = edge1.0 + (edge1.1 - edge1.0) * s;
                    let local_p2_1 = edge2.0 + (edge2.1 - edge2.0) * t;
                    let dist = (local_p2_1 - local_p1).dot(sep_axis1);
                    push(local_p1, local_p2_1, dist);
                }
            }
        }
    }
}

// The closest pair of edges of both faces, as a single contact.
fn closest_edges_contact(
    pos12: &Isometry<Real>,
    face1: &PolygonalFeature,
    face2_1: &PolygonalFeature,
    sep_axis1: &UnitVector<Real>,
    contact_distance: Real,
) -> Option<ContactPoint> {
    let mut best: Option<(Real, Point<Real>, Point<Real>)> = None;

    for i in 0..face1.num_vertices() {
        let edge1 = face1.edge(i);

        for j in 0..face2_1.num_vertices() {
            let edge2 = face2_1.edge(j);
            let (p1, p2) =
                utils::closest_points_segment_segment(&edge1.0, &edge1.1, &edge2.0, &edge2.1);
            let sq_dist = (p2 - p1).norm_squared();

            if best.map(|b| sq_dist < b.0).unwrap_or(true) {
                best = Some((sq_dist, p1, p2));
            }
        }
    }

    let (_, p1, p2_1) = best?;
    let dist = (p2_1 - p1).dot(sep_axis1);

    if dist > contact_distance {
        return None;
    }

    Some(ContactPoint::new(
        p1,
        pos12.inverse_transform_point(&p2_1),
        *sep_axis1,
        -dist,
    ))
}

/// Generates the contacts between two shapes from scratch.
///
/// If `overlap_test` is `true`, or if no `fallback` contact is given, the contact normal is the
/// axis found by [`sat_best_axis`], and `None` is returned if the shapes are separated by more
/// than `contact_distance` along it. Otherwise the normal of `fallback` is used.
///
/// The faces of both shapes most aligned with the normal are then clipped against each other.
/// If that yields nothing, the closest points of their edges are used, then `fallback` itself.
pub fn generate_full_manifold(
    pos12: &Isometry<Real>,
    shape1: &ConvexShape,
    shape2: &ConvexShape,
    overlap_test: bool,
    fallback: Option<&ContactPoint>,
    contact_distance: Real,
) -> Option<(UnitVector<Real>, ManifoldCandidates)> {
    let sep_axis1 = match fallback {
        Some(pt) if !overlap_test => pt.local_n1,
        _ => {
            let (axis, sep) = sat_best_axis(pos12, shape1, shape2);
            if sep > contact_distance {
                log::trace!("The separating axis test found a separation of {}.", sep);
                return None;
            }
            axis
        }
    };

    let face1 = shape1.support_polygon(&sep_axis1);
    let mut face2_1 = shape2.support_polygon(&pos12.inverse_transform_vector(&-*sep_axis1));
    face2_1.transform_by(pos12);

    let mut candidates = ManifoldCandidates::new();
    clip_polygons(
        pos12,
        &face1,
        &face2_1,
        &sep_axis1,
        contact_distance,
        &mut candidates,
    );

    if candidates.is_empty() {
        if let Some(contact) =
            closest_edges_contact(pos12, &face1, &face2_1, &sep_axis1, contact_distance)
        {
            push_candidate(&mut candidates, contact);
        }
    }

    if candidates.is_empty() {
        if let Some(pt) = fallback {
            push_candidate(&mut candidates, *pt);
        }
    }

    Some((sep_axis1, candidates))
}

#[cfg(test)]
mod test {
    use super::{generate_full_manifold, sat_best_axis};
    use crate::math::{Isometry, Real, Translation, Vector};
    use crate::shape::{ConvexHull, ConvexShape, Cuboid, ScaledConvexHull};
    use na::UnitQuaternion;

    #[test]
    fn sat_prefers_face_axes() {
        let c1 = ConvexShape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        let c2 = ConvexShape::from(Cuboid::new(Vector::new(0.5, 0.5, 0.5)));
        let pos12 = Isometry::translation(1.4, 0.2, 0.0);

        let (axis, sep) = sat_best_axis(&pos12, &c1, &c2);
        assert_relative_eq!(*axis, Vector::x(), epsilon = 1.0e-6);
        assert_relative_eq!(sep, -0.1, epsilon = 1.0e-6);
    }

    #[test]
    fn sat_finds_edge_axes() {
        let c1 = ConvexShape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        let c2 = ConvexShape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        // The second box exposes one of its edges to the edge of the first box at (0, 1, 1).
        let angle = core::f32::consts::FRAC_PI_4 as Real;
        let rot = UnitQuaternion::from_axis_angle(&Vector::x_axis(), angle)
            * UnitQuaternion::from_axis_angle(&Vector::z_axis(), angle);
        let gap = 0.1;
        let shift = 2.0 + gap / (2.0 as Real).sqrt();
        let pos12 = Isometry::from_parts(Translation::new(0.0, shift, shift), rot);

        let (axis, sep) = sat_best_axis(&pos12, &c1, &c2);
        let expected = Vector::new(0.0, 1.0, 1.0).normalize();
        assert_relative_eq!(*axis, expected, epsilon = 1.0e-4);
        assert_relative_eq!(sep, gap, epsilon = 1.0e-4);
    }

    #[test]
    fn face_face_clipping() {
        let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
        let c1 = ConvexShape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        let c2 = ConvexShape::from(ScaledConvexHull::unscaled(&hull));
        let pos12 = Isometry::translation(0.0, 1.45, 0.0);

        let (normal, candidates) =
            generate_full_manifold(&pos12, &c1, &c2, true, None, 0.0).unwrap();
        assert_relative_eq!(*normal, Vector::y(), epsilon = 1.0e-6);
        assert_eq!(candidates.len(), 4);

        for pt in &candidates {
            assert_relative_eq!(pt.penetration, 0.05, epsilon = 1.0e-5);
            assert_relative_eq!(pt.local_p1.y, 1.0, epsilon = 1.0e-5);
            assert_relative_eq!(pt.local_p2.y, -0.5, epsilon = 1.0e-5);
        }
    }

    #[test]
    fn separated_shapes_have_no_manifold() {
        let c1 = ConvexShape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        let c2 = ConvexShape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        let pos12 = Isometry::translation(2.5, 0.0, 0.0);

        assert!(generate_full_manifold(&pos12, &c1, &c2, true, None, 0.1).is_none());
        assert!(generate_full_manifold(&pos12, &c1, &c2, true, None, 0.6).is_some());
    }
}
