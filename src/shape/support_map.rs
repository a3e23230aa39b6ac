//! Traits for support mapping based shapes.

use crate::math::{Isometry, Point, Real, Vector};

/// The result of a support-mapping query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SupportPoint {
    /// The extreme point of the shape along the queried direction.
    pub point: Point<Real>,
    /// Index of the shape vertex this point was derived from.
    ///
    /// Feeding it back to [`SupportMap::local_vertex`] yields `self.point` again (in local-space).
    pub vid: u8,
    /// How far past the margin the unshrunk vertex lies from `self.point`.
    ///
    /// Zero for shapes that are not margin-shrunk.
    pub margin_delta: Real,
}

impl SupportPoint {
    /// A support point with a zero margin delta.
    #[inline]
    pub fn new(point: Point<Real>, vid: u8) -> Self {
        Self {
            point,
            vid,
            margin_delta: 0.0,
        }
    }

    /// Applies `pos` to `self.point`.
    #[inline]
    pub fn transformed(mut self, pos: &Isometry<Real>) -> Self {
        self.point = pos * self.point;
        self
    }
}

/// Traits of convex shapes representable by a support mapping function.
///
/// Every support point is tagged with the index of the vertex it was derived from
/// so that the GJK and EPA algorithms can be warm-started from a previous simplex.
pub trait SupportMap {
    /// Evaluates the support function of this shape.
    ///
    /// A support function is a function associating a vector to the shape point which maximizes
    /// their dot product.
    fn local_support_point(&self, dir: &Vector<Real>) -> SupportPoint;

    /// Evaluates the support function of this shape transformed by `transform`.
    fn support_point(&self, transform: &Isometry<Real>, dir: &Vector<Real>) -> SupportPoint {
        let local_dir = transform.inverse_transform_vector(dir);
        self.local_support_point(&local_dir).transformed(transform)
    }

    /// The point a support query returns when it selects the vertex `vid`.
    fn local_vertex(&self, vid: u8) -> Point<Real>;

    /// A point strictly inside of this shape, used to seed the search direction.
    fn local_center(&self) -> Point<Real>;

    /// How far the support plane of the actual shape lies past the support plane of this one
    /// along the unit vector `dir`.
    ///
    /// Zero, unless this shape is the core of a larger one.
    fn local_support_inflation(&self, _dir: &Vector<Real>) -> Real {
        0.0
    }
}
