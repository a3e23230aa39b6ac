use crate::math::{Isometry, Point, Real, UnitVector};

/// A single contact point cached by a [`PersistentContactManifold`](super::PersistentContactManifold).
///
/// Both points are stored in the local-space of their respective shapes so that the contact can be
/// re-projected when the shapes move.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPoint {
    /// The contact point on the first shape, in the local-space of the first shape.
    pub local_p1: Point<Real>,
    /// The contact point on the second shape, in the local-space of the second shape.
    pub local_p2: Point<Real>,
    /// The contact normal, pointing from the first shape toward the second shape, in the
    /// local-space of the first shape.
    pub local_n1: UnitVector<Real>,
    /// The penetration depth along `local_n1`.
    ///
    /// Positive if the shapes overlap, negative if they are separated.
    pub penetration: Real,
}

impl ContactPoint {
    /// Creates a new contact point.
    #[inline]
    pub fn new(
        local_p1: Point<Real>,
        local_p2: Point<Real>,
        local_n1: UnitVector<Real>,
        penetration: Real,
    ) -> Self {
        Self {
            local_p1,
            local_p2,
            local_n1,
            penetration,
        }
    }

    /// The signed separation of this contact along its normal once the second shape is at `pos12`
    /// relative to the first shape.
    #[inline]
    pub fn separation(&self, pos12: &Isometry<Real>) -> Real {
        (pos12 * self.local_p2 - self.local_p1).dot(&self.local_n1)
    }

    /// Are all the values of this contact finite, with a unit normal?
    pub fn is_valid(&self) -> bool {
        self.local_p1.iter().all(|x| x.is_finite())
            && self.local_p2.iter().all(|x| x.is_finite())
            && self.penetration.is_finite()
            && relative_eq!(self.local_n1.norm_squared(), 1.0, epsilon = 1.0e-3)
    }
}
