//! Support mapping based Cuboid shape.

use crate::math::{Point, Real, UnitVector, Vector, DIM};
use crate::shape::{PolygonalFeature, SupportMap, SupportPoint};
use crate::utils;
use smallvec::SmallVec;

/// Shape of a box.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Cuboid {
    /// The half-extents of the cuboid.
    pub half_extents: Vector<Real>,
}

// NOTE: format of the cuboid feature ids:
//
// vertex id: the i-th bit of `id` is set to 1 iff. the i-th component of the vertex is positive.
// face id: if `id` lies in [0, 2] it indicates the axis (x, y, z) corresponding to the face normal.
//          If `id` lies in [3, 5] then the negative axis (-x, -y, -z) is given by `id - 3`.
impl Cuboid {
    /// Creates a new box from its half-extents. Half-extents are the box half-width along each
    /// axis. Each half-extent must be positive.
    #[inline]
    pub fn new(half_extents: Vector<Real>) -> Cuboid {
        Cuboid { half_extents }
    }

    /// The number of faces of a cuboid.
    pub const NUM_FACES: usize = 6;

    /// The smallest half-extent of this cuboid.
    #[inline]
    pub fn min_half_extent(&self) -> Real {
        self.half_extents.min()
    }

    /// The half-extents of this cuboid after moving each face inward by `margin`.
    #[inline]
    pub fn shrunk_half_extents(&self, margin: Real) -> Vector<Real> {
        self.half_extents
            .map(|e| if margin > 0.0 { (e - margin).max(0.0) } else { e })
    }

    /// The outward normal of the face `fid`.
    #[inline]
    pub fn face_normal(&self, fid: u8) -> UnitVector<Real> {
        let i = fid as usize % DIM;
        let sign = if (fid as usize) < DIM { 1.0 } else { -1.0 };
        UnitVector::new_unchecked(Vector::ith(i, sign))
    }

    /// The face `fid` of this cuboid.
    pub fn polygon(&self, fid: u8) -> PolygonalFeature {
        let i1 = fid as usize % DIM;
        let i2 = (i1 + 1) % DIM;
        let i3 = (i1 + 2) % DIM;
        let sign = if (fid as usize) < DIM { 1.0 } else { -1.0 };

        // Counter-clockwise in the (i2, i3) plane when seen from `+axis i1`.
        let mut quad: [(Real, Real); 4] = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];
        if sign < 0.0 {
            quad.reverse();
        }

        let vertices: SmallVec<_> = quad
            .iter()
            .map(|(s2, s3)| {
                let mut pt = Point::origin();
                pt[i1] = sign * self.half_extents[i1];
                pt[i2] = s2 * self.half_extents[i2];
                pt[i3] = s3 * self.half_extents[i3];
                pt
            })
            .collect();

        PolygonalFeature {
            vertices,
            normal: self.face_normal(fid),
            fid,
        }
    }

    /// The face of this cuboid with the normal most aligned with `local_dir`.
    pub fn support_polygon(&self, local_dir: &Vector<Real>) -> PolygonalFeature {
        let iamax = local_dir.iamax();
        let fid = if local_dir[iamax] >= 0.0 {
            iamax
        } else {
            iamax + DIM
        };
        self.polygon(fid as u8)
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> SupportPoint {
        let vid = utils::sign_mask(dir);
        SupportPoint::new(utils::box_corner(&self.half_extents, vid), vid)
    }

    #[inline]
    fn local_vertex(&self, vid: u8) -> Point<Real> {
        utils::box_corner(&self.half_extents, vid)
    }

    #[inline]
    fn local_center(&self) -> Point<Real> {
        Point::origin()
    }
}
