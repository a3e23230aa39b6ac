use crate::math::{Matrix, Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::shape::{ConvexHull, MeshScale, PolygonalFeature, SupportMap, SupportPoint};
use crate::utils;
#[cfg(not(feature = "std"))]
use na::ComplexField; // for .abs()

// Below this value, the three planes adjacent to a vertex are considered nearly parallel.
const SHRINK_DENOMINATOR_EPS: Real = 1.0e-3;

/// A borrowed [`ConvexHull`] viewed through a [`MeshScale`].
///
/// Every query on this type is expressed in the scaled shape-space.
#[derive(Copy, Clone, Debug)]
pub struct ScaledConvexHull<'a> {
    hull: &'a ConvexHull,
    scale: MeshScale,
    vertex_to_shape: Matrix<Real>,
    shape_to_vertex: Matrix<Real>,
    identity_scale: bool,
    internal_extent: Real,
    max_margin: Real,
}

impl<'a> ScaledConvexHull<'a> {
    /// Views `hull` scaled by `scale`.
    pub fn new(hull: &'a ConvexHull, scale: MeshScale) -> Self {
        let mut result = Self {
            hull,
            scale,
            vertex_to_shape: scale.vertex_to_shape(),
            shape_to_vertex: scale.shape_to_vertex(),
            identity_scale: scale.is_identity(),
            internal_extent: 0.0,
            max_margin: Real::MAX,
        };

        let com = result.center_of_mass();
        result.internal_extent = (0..hull.polygons().len())
            .map(|i| {
                let (normal, offset) = result.polygon_plane(i);
                offset - normal.dot(&com.coords)
            })
            .fold(Real::MAX, Real::min)
            .max(0.0);

        result
    }

    /// Limits the distance between a vertex and its shrunk counterpart to `max_margin`.
    ///
    /// Sharp vertices, or vertices flattened by a non-uniform scale, are otherwise moved much
    /// farther than the margin by [`Self::shrunk_vertex`].
    pub fn with_max_margin(mut self, max_margin: Real) -> Self {
        self.max_margin = max_margin;
        self
    }

    /// The largest distance between a vertex and its shrunk counterpart.
    #[inline]
    pub fn max_margin(&self) -> Real {
        self.max_margin
    }

    /// Views `hull` without any scaling.
    pub fn unscaled(hull: &'a ConvexHull) -> Self {
        Self::new(hull, MeshScale::identity())
    }

    /// The underlying unscaled convex hull.
    #[inline]
    pub fn hull(&self) -> &'a ConvexHull {
        self.hull
    }

    /// The scaling applied to the hull.
    #[inline]
    pub fn scale(&self) -> &MeshScale {
        &self.scale
    }

    /// The number of vertices of this hull.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.hull.points().len()
    }

    /// The number of polygons of this hull.
    #[inline]
    pub fn num_polygons(&self) -> usize {
        self.hull.polygons().len()
    }

    /// The `vid`-th vertex, in shape-space.
    #[inline]
    pub fn vertex(&self, vid: usize) -> Point<Real> {
        let pt = self.hull.points()[vid];
        if self.identity_scale {
            pt
        } else {
            Point::from(self.vertex_to_shape * pt.coords)
        }
    }

    /// The center of mass of the scaled hull.
    #[inline]
    pub fn center_of_mass(&self) -> Point<Real> {
        let com = self.hull.center_of_mass();
        if self.identity_scale {
            com
        } else {
            Point::from(self.vertex_to_shape * com.coords)
        }
    }

    /// The smallest distance from the center of mass to a polygon plane.
    #[inline]
    pub fn internal_extent(&self) -> Real {
        self.internal_extent
    }

    /// The outward unit normal and the offset of the plane of the `i`-th polygon, in shape-space.
    pub fn polygon_plane(&self, i: usize) -> (UnitVector<Real>, Real) {
        let poly = &self.hull.polygons()[i];
        if self.identity_scale {
            return (poly.normal, poly.offset);
        }

        // Normals are transformed by the inverse-transpose of the vertex transform.
        let normal = UnitVector::new_normalize(self.shape_to_vertex.tr_mul(&poly.normal));
        let first = self.hull.polygon_vertices(i)[0] as usize;
        let offset = normal.dot(&self.vertex(first).coords);
        (normal, offset)
    }

    /// The `i`-th polygon, in shape-space.
    pub fn polygon(&self, i: usize) -> PolygonalFeature {
        let (normal, _) = self.polygon_plane(i);
        PolygonalFeature {
            vertices: self
                .hull
                .polygon_vertices(i)
                .iter()
                .map(|vid| self.vertex(*vid as usize))
                .collect(),
            normal,
            fid: i as u8,
        }
    }

    /// The polygon whose normal is the most aligned with `local_dir`.
    pub fn support_polygon(&self, local_dir: &Vector<Real>) -> PolygonalFeature {
        let mut best = 0;
        let mut best_dot = -Real::MAX;

        for i in 0..self.num_polygons() {
            let dot = self.polygon_plane(i).0.dot(local_dir);
            if dot > best_dot {
                best_dot = dot;
                best = i;
            }
        }

        self.polygon(best)
    }

    /// The index of the vertex maximizing its dot product with `dir`.
    pub fn support_vertex_id(&self, dir: &Vector<Real>) -> usize {
        if self.identity_scale {
            utils::point_cloud_support_point_id(dir, self.hull.points()).0
        } else {
            let vertex_dir = self.vertex_to_shape.tr_mul(dir);
            utils::point_cloud_support_point_id(&vertex_dir, self.hull.points()).0
        }
    }

    /// The vertex `vid` moved inward so that it lies at a distance `margin` from each of its
    /// three supporting planes.
    ///
    /// The displacement never exceeds `self.max_margin()` (or `margin` if it is larger).
    /// Returns the moved vertex and the amount by which its displacement exceeds `margin`.
    pub fn shrunk_vertex(&self, vid: usize, margin: Real) -> (Point<Real>, Real) {
        let raw = self.vertex(vid);
        if margin <= 0.0 {
            return (raw, 0.0);
        }

        let [i0, i1, i2] = self.hull.vertex_polygons(vid);
        let (n0, d0) = self.polygon_plane(i0 as usize);
        let (n1, d1) = self.polygon_plane(i1 as usize);
        let (n2, d2) = self.polygon_plane(i2 as usize);

        let n12 = n1.cross(&n2);
        let n20 = n2.cross(&n0);
        let n01 = n0.cross(&n1);
        let denom = n0.dot(&n12);

        let mut core = if denom.abs() > SHRINK_DENOMINATOR_EPS {
            Point::from((n12 * (d0 - margin) + n20 * (d1 - margin) + n01 * (d2 - margin)) / denom)
        } else {
            log::debug!(
                "Nearly parallel planes at hull vertex {}, shrinking along the averaged normal.",
                vid
            );
            match (n0.into_inner() + n1.into_inner() + n2.into_inner())
                .try_normalize(DEFAULT_EPSILON)
            {
                Some(dir) => raw - dir * margin,
                None => raw,
            }
        };

        let max_shift = self.max_margin.max(margin);
        let shift = core - raw;
        let shift_len = shift.norm();
        if shift_len > max_shift {
            core = raw + shift * (max_shift / shift_len);
        }

        // Never push the vertex past the center of mass.
        let com = self.center_of_mass();
        let to_com = com - raw;
        let com_dist = to_com.norm();
        if (core - raw).norm() > com_dist {
            core = if com_dist > margin {
                raw + to_com * (margin / com_dist)
            } else {
                com
            };
        }

        (core, (core - raw).norm() - margin)
    }
}

impl<'a> SupportMap for ScaledConvexHull<'a> {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> SupportPoint {
        let vid = self.support_vertex_id(dir);
        SupportPoint::new(self.vertex(vid), vid as u8)
    }

    #[inline]
    fn local_vertex(&self, vid: u8) -> Point<Real> {
        self.vertex(vid as usize)
    }

    #[inline]
    fn local_center(&self) -> Point<Real> {
        self.center_of_mass()
    }
}
