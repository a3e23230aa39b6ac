use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::{SupportMap, SupportPoint};
use std::ops::Sub;

/// A point of a Configuration-Space Obstacle.
///
/// A Configuration-Space Obstacle (CSO) is the result of the
/// Minkowski Difference of two solids. In other words, each of its
/// points correspond to the difference of two point, each belonging
/// to a different solid.
///
/// Both original points are expressed in the local-space of the first solid, and the vertex
/// ids they were derived from are kept so the point can be rebuilt on other versions (shrunk or
/// not) of the same shapes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CsoPoint {
    /// The point on the CSO. This is equal to `self.orig1 - self.orig2`.
    pub point: Point<Real>,
    /// The original point on the first shape used to compute `self.point`.
    pub orig1: Point<Real>,
    /// The original point on the second shape used to compute `self.point`.
    pub orig2: Point<Real>,
    /// The vertex of the first shape `self.orig1` was derived from.
    pub vid1: u8,
    /// The vertex of the second shape `self.orig2` was derived from.
    pub vid2: u8,
    /// The sum of the margin deltas of both support points.
    pub margin_delta: Real,
}

impl CsoPoint {
    /// Initializes a CSO point from two support points expressed in the same space.
    pub fn new(sp1: SupportPoint, sp2: SupportPoint) -> Self {
        CsoPoint {
            point: Point::from(sp1.point - sp2.point),
            orig1: sp1.point,
            orig2: sp2.point,
            vid1: sp1.vid,
            vid2: sp2.vid,
            margin_delta: sp1.margin_delta + sp2.margin_delta,
        }
    }

    /// CSO point where all components are set to zero.
    pub fn origin() -> Self {
        let zero = SupportPoint::new(Point::origin(), 0);
        CsoPoint::new(zero, zero)
    }

    /// Computes the support point of the CSO of `g1` and `g2` toward the direction `dir`.
    pub fn from_shapes<G1, G2>(pos12: &Isometry<Real>, g1: &G1, g2: &G2, dir: &Vector<Real>) -> Self
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let sp1 = g1.local_support_point(dir);
        let sp2 = g2.support_point(pos12, &-*dir);

        CsoPoint::new(sp1, sp2)
    }

    /// Rebuilds the CSO point made of the vertex `vid1` of `g1` and the vertex `vid2` of `g2`.
    pub fn from_vertex_ids<G1, G2>(
        pos12: &Isometry<Real>,
        g1: &G1,
        g2: &G2,
        vid1: u8,
        vid2: u8,
    ) -> Self
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let sp1 = SupportPoint::new(g1.local_vertex(vid1), vid1);
        let sp2 = SupportPoint::new(pos12 * g2.local_vertex(vid2), vid2);

        CsoPoint::new(sp1, sp2)
    }
}

impl Sub<CsoPoint> for CsoPoint {
    type Output = Vector<Real>;

    #[inline]
    fn sub(self, rhs: CsoPoint) -> Vector<Real> {
        self.point - rhs.point
    }
}
