//! Miscellaneous utilities.

use crate::math::{Point, Real, Vector};

/// Trait to copy the sign of each component of one scalar/vector to another.
pub trait WSign<Rhs>: Sized {
    /// Copy the sign of each component of `self` to the corresponding component of `to`.
    fn copy_sign_to(self, to: Rhs) -> Rhs;
}

impl WSign<Real> for Real {
    fn copy_sign_to(self, to: Self) -> Self {
        let minus_zero: Real = -0.0;
        let signbit = minus_zero.to_bits();
        Real::from_bits((signbit & self.to_bits()) | ((!signbit) & to.to_bits()))
    }
}

/// Trait to compute the orthonormal basis of a vector.
pub trait WBasis: Sized {
    /// The type of the array of orthonormal vectors.
    type Basis;
    /// Computes the vectors which, when combined with `self`, form an orthonormal basis.
    fn orthonormal_basis(self) -> Self::Basis;
}

impl WBasis for Vector<Real> {
    type Basis = [Vector<Real>; 2];
    // Robust and branchless implementation from Pixar:
    // https://graphics.pixar.com/library/OrthonormalB/paper.pdf
    fn orthonormal_basis(self) -> [Vector<Real>; 2] {
        let sign = self.z.copy_sign_to(1.0);
        let a = -1.0 / (sign + self.z);
        let b = self.x * self.y * a;

        [
            Vector::new(1.0 + sign * self.x * self.x * a, sign * b, -sign * self.x),
            Vector::new(b, sign + self.y * self.y * a, -self.y),
        ]
    }
}

/// Bit mask of the non-negative components of `dir`: bit `i` is set if `dir[i] >= 0`.
///
/// This is the vertex index of the box corner selected by a support query along `dir`.
#[inline]
pub fn sign_mask(dir: &Vector<Real>) -> u8 {
    (dir.x >= 0.0) as u8 | (((dir.y >= 0.0) as u8) << 1) | (((dir.z >= 0.0) as u8) << 2)
}

/// The corner of the box with the given half-extents identified by `mask` (see [`sign_mask`]).
#[inline]
pub fn box_corner(half_extents: &Vector<Real>, mask: u8) -> Point<Real> {
    let pick = |bit: u8, val: Real| if mask & bit != 0 { val } else { -val };
    Point::new(
        pick(1, half_extents.x),
        pick(2, half_extents.y),
        pick(4, half_extents.z),
    )
}
