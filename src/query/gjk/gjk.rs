//! The Gilbert-Johnson-Keerthi algorithm, run on margin-shrunk shapes.
//!
//! The shapes given to [`penetration_gjk`] are the cores of the actual shapes: each full shape
//! is its core inflated by its margin. This lets GJK report a full-shape contact whenever the
//! cores are disjoint, and leaves the (more expensive) EPA to the deep penetration cases.

use na::{ComplexField, Unit};

use crate::math::{Isometry, Point, Real, UnitVector, Vector, DIM};
use crate::query::gjk::{CsoPoint, VoronoiSimplex};
use crate::shape::SupportMap;

/// The maximum number of GJK iterations.
pub const GJK_MAX_ITERATIONS: usize = 100;

/// The outcome of [`penetration_gjk`], without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GjkStatus {
    /// The shapes are farther apart than the contact distance.
    NonIntersect,
    /// The shapes are within the contact distance and their cores are disjoint.
    Contact,
    /// The cores overlap: the penetration must be resolved by EPA.
    Penetrating,
    /// The algorithm did not converge, or could not tell whether the full shapes touch.
    Degenerate,
}

/// Results of the GJK algorithm.
///
/// All points and vectors are expressed in the local-space of the first shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GjkResult {
    /// The shapes are farther apart than the contact distance.
    NonIntersect,
    /// The closest points of both full shapes.
    Contact {
        /// The closest point on the first shape.
        point1: Point<Real>,
        /// The closest point on the second shape.
        point2: Point<Real>,
        /// The unit direction from the first shape toward the second shape.
        normal1: UnitVector<Real>,
        /// The penetration depth of the full shapes. Negative if they are separated.
        penetration: Real,
    },
    /// The cores are overlapping.
    Penetrating,
    /// The algorithm did not converge, or could not tell whether the full shapes touch.
    Degenerate,
}

impl GjkResult {
    /// The status of this result.
    pub fn status(&self) -> GjkStatus {
        match self {
            GjkResult::NonIntersect => GjkStatus::NonIntersect,
            GjkResult::Contact { .. } => GjkStatus::Contact,
            GjkResult::Penetrating => GjkStatus::Penetrating,
            GjkResult::Degenerate => GjkStatus::Degenerate,
        }
    }
}

/// The vertex ids of the last GJK simplex, used to warm-start the next GJK run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WarmStart {
    ids1: [u8; 4],
    ids2: [u8; 4],
    len: u8,
}

impl WarmStart {
    /// An empty warm-start: the next GJK will start from the shape centers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Is this warm-start empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of stored vertex pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Forgets the stored vertex ids.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// The stored vertex id pairs.
    pub fn ids(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..self.len()).map(move |i| (self.ids1[i], self.ids2[i]))
    }

    /// Records the vertex ids of every point of `simplex`.
    pub fn store(&mut self, simplex: &VoronoiSimplex) {
        let points = simplex.points();
        for (i, pt) in points.iter().enumerate() {
            self.ids1[i] = pt.vid1;
            self.ids2[i] = pt.vid2;
        }
        self.len = points.len() as u8;
    }
}

/// The absolute tolerance used by the GJK algorithm.
pub fn eps_tol() -> Real {
    let _eps = crate::math::DEFAULT_EPSILON;
    _eps * 10.0
}

/// Initializes `simplex` from the warm-start, or from the direction joining the shape centers.
fn init_simplex<G1, G2>(
    pos12: &Isometry<Real>,
    g1: &G1,
    g2: &G2,
    warm_start: &WarmStart,
    simplex: &mut VoronoiSimplex,
) where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let mut ids = warm_start.ids();

    if let Some((vid1, vid2)) = ids.next() {
        simplex.reset(CsoPoint::from_vertex_ids(pos12, g1, g2, vid1, vid2));
        for (vid1, vid2) in ids {
            let _ = simplex.add_point(CsoPoint::from_vertex_ids(pos12, g1, g2, vid1, vid2));
        }
    } else {
        let dir = pos12 * g2.local_center() - g1.local_center();
        let dir = if dir.norm_squared() > eps_tol() {
            dir
        } else {
            Vector::x()
        };
        simplex.reset(CsoPoint::from_shapes(pos12, g1, g2, &dir));
    }
}

/// Computes the barycentric combination of the points of the (possibly previous) simplex.
fn result(simplex: &VoronoiSimplex, prev: bool) -> (Point<Real>, Point<Real>) {
    let mut res = (Point::origin(), Point::origin());
    if prev {
        for i in 0..simplex.prev_dimension() + 1 {
            let coord = simplex.prev_proj_coord(i);
            let point = simplex.prev_point(i);
            res.0 += point.orig1.coords * coord;
            res.1 += point.orig2.coords * coord;
        }

        res
    } else {
        for i in 0..simplex.dimension() + 1 {
            let coord = simplex.proj_coord(i);
            let point = simplex.point(i);
            res.0 += point.orig1.coords * coord;
            res.1 += point.orig2.coords * coord;
        }

        res
    }
}

/// A lower bound of the distance between the full shapes, given the distance `core_dist`
/// separating the support planes of their cores along the unit vector `dir`.
pub fn full_separation_bound<G1, G2>(
    pos12: &Isometry<Real>,
    g1: &G1,
    g2: &G2,
    dir: &Vector<Real>,
    core_dist: Real,
) -> Real
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let local_dir2 = pos12.inverse_transform_vector(&-dir);
    core_dist - g1.local_support_inflation(dir) - g2.local_support_inflation(&local_dir2)
}

// Turns the closest points of the cores into the closest points of the full shapes.
//
// The margins only approximate the full shapes: a vertex can lie farther than its margin from
// its core. The shapes are reported as disjoint only if the exact support planes of the full
// shapes are more than `contact_distance` apart.
fn contact_result<G1, G2>(
    pos12: &Isometry<Real>,
    g1: &G1,
    g2: &G2,
    core_points: (Point<Real>, Point<Real>),
    normal1: UnitVector<Real>,
    margin1: Real,
    margin2: Real,
    contact_distance: Real,
) -> GjkResult
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let core_dist = (core_points.1 - core_points.0).dot(&normal1);
    let separation = core_dist - margin1 - margin2;

    if !separation.is_finite() {
        return GjkResult::Degenerate;
    }

    if separation > contact_distance {
        let support = CsoPoint::from_shapes(pos12, g1, g2, &normal1);
        let core_gap = -normal1.dot(&support.point.coords);

        if full_separation_bound(pos12, g1, g2, &normal1, core_gap) > contact_distance {
            return GjkResult::NonIntersect;
        }

        log::debug!(
            "GJK cannot tell whether the shapes touch (margin separation: {}).",
            separation
        );
        return GjkResult::Degenerate;
    }

    GjkResult::Contact {
        point1: core_points.0 + *normal1 * margin1,
        point2: core_points.1 - *normal1 * margin2,
        normal1,
        penetration: -separation,
    }
}

/// Computes the contact between two shapes from the closest points of their cores.
///
/// `g1` and `g2` are the cores of the shapes (typically [`ShrunkPrimitive`](crate::shape::ShrunkPrimitive)),
/// and `margin1`, `margin2` the margins by which they must be inflated to obtain the actual shapes.
/// `pos12` is the position of the second shape relative to the first one.
///
/// The search starts from the vertices recorded in `warm_start`, which is overwritten with the
/// vertices of the final simplex. That simplex is also left in `simplex` for EPA to start from.
pub fn penetration_gjk<G1, G2>(
    pos12: &Isometry<Real>,
    g1: &G1,
    g2: &G2,
    margin1: Real,
    margin2: Real,
    contact_distance: Real,
    warm_start: &mut WarmStart,
    simplex: &mut VoronoiSimplex,
) -> GjkResult
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let _eps_tol: Real = eps_tol();
    let _eps_rel: Real = ComplexField::sqrt(_eps_tol);
    let sum_margins = margin1 + margin2;

    init_simplex(pos12, g1, g2, warm_start, simplex);
    let mut proj = simplex.project_origin_and_reduce();

    let mut max_bound = Real::MAX;
    let mut old_dir = Vector::x_axis();
    let mut niter = 0;

    let res = loop {
        if !proj.coords.iter().all(|x| x.is_finite()) {
            break GjkResult::Degenerate;
        }

        let old_max_bound = max_bound;
        let dir;

        if let Some((new_dir, dist)) = Unit::try_new_and_get(-proj.coords, _eps_tol) {
            dir = new_dir;
            max_bound = dist;
        } else {
            // The origin is on the simplex.
            break GjkResult::Penetrating;
        }

        if max_bound >= old_max_bound {
            // Upper bounds inconsistencies: keep the previous result.
            break contact_result(
                pos12,
                g1,
                g2,
                result(simplex, true),
                old_dir,
                margin1,
                margin2,
                contact_distance,
            );
        }

        let cso_point = CsoPoint::from_shapes(pos12, g1, g2, &dir);
        let min_bound = -dir.dot(&cso_point.point.coords);

        if !min_bound.is_finite() {
            break GjkResult::Degenerate;
        }

        // `margin_delta` only accounts for the support vertices: confirm with the exact supports.
        if min_bound - sum_margins - cso_point.margin_delta > contact_distance
            && full_separation_bound(pos12, g1, g2, &dir, min_bound) > contact_distance
        {
            break GjkResult::NonIntersect;
        }

        if max_bound - min_bound <= _eps_rel * max_bound || !simplex.add_point(cso_point) {
            // The distance found has a good enough precision.
            break contact_result(
                pos12,
                g1,
                g2,
                result(simplex, false),
                dir,
                margin1,
                margin2,
                contact_distance,
            );
        }

        old_dir = dir;
        proj = simplex.project_origin_and_reduce();

        if simplex.dimension() == DIM {
            if min_bound >= _eps_tol {
                break contact_result(
                    pos12,
                    g1,
                    g2,
                    result(simplex, true),
                    old_dir,
                    margin1,
                    margin2,
                    contact_distance,
                );
            } else {
                break GjkResult::Penetrating; // Point inside of the cso.
            }
        }

        niter += 1;
        if niter == GJK_MAX_ITERATIONS {
            break GjkResult::Degenerate;
        }
    };

    warm_start.store(simplex);

    if res == GjkResult::Degenerate {
        log::debug!("GJK did not converge after {} iterations.", niter);
    }

    res
}
