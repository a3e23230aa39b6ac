use crate::math::{Matrix, Real, Rotation, Vector};

/// Errors raised when building a [`MeshScale`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum MeshScaleError {
    /// Some scale component is zero, negative, or not finite.
    #[error("Mesh scale components must be positive and finite, got {0:?}.")]
    NonPositiveScale([Real; 3]),
}

/// A non-uniform scaling applied to a mesh along the axes of an arbitrary rotation.
///
/// The vertex `v` of the unscaled mesh ends up at `rotation⁻¹ * diag(scale) * rotation * v` in
/// shape-space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct MeshScale {
    scale: Vector<Real>,
    rotation: Rotation<Real>,
}

impl Default for MeshScale {
    fn default() -> Self {
        Self::identity()
    }
}

impl MeshScale {
    /// The identity scaling.
    pub fn identity() -> Self {
        Self {
            scale: Vector::repeat(1.0),
            rotation: Rotation::identity(),
        }
    }

    /// A scaling by `scale` along the axes of `rotation`.
    pub fn new(scale: Vector<Real>, rotation: Rotation<Real>) -> Result<Self, MeshScaleError> {
        if scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(MeshScaleError::NonPositiveScale(scale.into()));
        }

        Ok(Self { scale, rotation })
    }

    /// A scaling by `scale` along the coordinate axes.
    pub fn from_scale(scale: Vector<Real>) -> Result<Self, MeshScaleError> {
        Self::new(scale, Rotation::identity())
    }

    /// The scaling factors.
    #[inline]
    pub fn scale(&self) -> &Vector<Real> {
        &self.scale
    }

    /// The orientation of the scaling axes.
    #[inline]
    pub fn rotation(&self) -> &Rotation<Real> {
        &self.rotation
    }

    /// Is this scaling the identity?
    #[inline]
    pub fn is_identity(&self) -> bool {
        relative_eq!(self.scale, Vector::repeat(1.0))
    }

    /// The matrix mapping unscaled vertices to shape-space.
    pub fn vertex_to_shape(&self) -> Matrix<Real> {
        let rot = self.rotation.to_rotation_matrix().into_inner();
        rot.transpose() * Matrix::from_diagonal(&self.scale) * rot
    }

    /// The matrix mapping shape-space points back to unscaled vertices.
    pub fn shape_to_vertex(&self) -> Matrix<Real> {
        let rot = self.rotation.to_rotation_matrix().into_inner();
        rot.transpose() * Matrix::from_diagonal(&self.scale.map(|s| 1.0 / s)) * rot
    }
}
