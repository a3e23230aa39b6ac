use crate::math::{Isometry, Point, Real, UnitVector};
use smallvec::SmallVec;

/// A planar convex face of a polyhedral shape, in the local-space of that shape.
///
/// The vertices are ordered counter-clockwise when seen from the tip of `normal`.
#[derive(Debug, Clone)]
pub struct PolygonalFeature {
    /// The vertices of this face.
    pub vertices: SmallVec<[Point<Real>; 8]>,
    /// The outward normal of this face.
    pub normal: UnitVector<Real>,
    /// Index of this face on its shape.
    pub fid: u8,
}

impl PolygonalFeature {
    /// The number of vertices of this face.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Transforms in-place every vertex and the normal of this face.
    pub fn transform_by(&mut self, pos: &Isometry<Real>) {
        for pt in &mut self.vertices {
            *pt = pos * *pt;
        }
        self.normal = pos * self.normal;
    }

    /// The `i`-th edge of this face, from vertex `i` to vertex `i + 1`.
    #[inline]
    pub fn edge(&self, i: usize) -> (Point<Real>, Point<Real>) {
        let n = self.vertices.len();
        (self.vertices[i], self.vertices[(i + 1) % n])
    }
}
