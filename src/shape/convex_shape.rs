use crate::math::{Point, Real, Vector};
use crate::query::contact_manifolds::PcmConfig;
use crate::shape::{Cuboid, PolygonalFeature, ScaledConvexHull, SupportMap, SupportPoint};
use crate::utils;
use smallvec::SmallVec;

/// A convex shape supported by the persistent contact manifold generators.
#[derive(Copy, Clone, Debug)]
pub enum ConvexShape<'a> {
    /// A box.
    Cuboid(Cuboid),
    /// A convex polyhedron, possibly with a non-uniform scale.
    ConvexHull(ScaledConvexHull<'a>),
}

impl<'a> From<Cuboid> for ConvexShape<'a> {
    fn from(cuboid: Cuboid) -> Self {
        ConvexShape::Cuboid(cuboid)
    }
}

impl<'a> From<ScaledConvexHull<'a>> for ConvexShape<'a> {
    fn from(hull: ScaledConvexHull<'a>) -> Self {
        ConvexShape::ConvexHull(hull)
    }
}

impl<'a> ConvexShape<'a> {
    /// The margin by which this shape is shrunk before running GJK on it.
    ///
    /// It is a fraction of the shape's thickness, capped by a fraction of `tolerance_length`.
    pub fn pcm_margin(&self, tolerance_length: Real, config: &PcmConfig) -> Real {
        let cap = tolerance_length * config.tolerance_margin_ratio;
        let margin = match self {
            ConvexShape::Cuboid(c) => c.min_half_extent() * config.box_margin_ratio,
            ConvexShape::ConvexHull(h) => h.internal_extent() * config.hull_margin_ratio,
        };
        margin.min(cap).max(0.0)
    }

    /// The number of polygonal faces of this shape.
    #[inline]
    pub fn num_polygons(&self) -> usize {
        match self {
            ConvexShape::Cuboid(_) => Cuboid::NUM_FACES,
            ConvexShape::ConvexHull(h) => h.num_polygons(),
        }
    }

    /// The `i`-th polygonal face of this shape, in local-space.
    #[inline]
    pub fn polygon(&self, i: usize) -> PolygonalFeature {
        match self {
            ConvexShape::Cuboid(c) => c.polygon(i as u8),
            ConvexShape::ConvexHull(h) => h.polygon(i),
        }
    }

    /// The face with the normal most aligned with `local_dir`.
    #[inline]
    pub fn support_polygon(&self, local_dir: &Vector<Real>) -> PolygonalFeature {
        match self {
            ConvexShape::Cuboid(c) => c.support_polygon(local_dir),
            ConvexShape::ConvexHull(h) => h.support_polygon(local_dir),
        }
    }

    /// The outward normal of every face, in local-space.
    pub fn face_normals(&self) -> SmallVec<[Vector<Real>; 16]> {
        match self {
            ConvexShape::Cuboid(c) => (0..Cuboid::NUM_FACES as u8)
                .map(|fid| c.face_normal(fid).into_inner())
                .collect(),
            ConvexShape::ConvexHull(h) => (0..h.num_polygons())
                .map(|i| h.polygon_plane(i).0.into_inner())
                .collect(),
        }
    }

    /// The direction of every edge of this shape, in local-space.
    ///
    /// Each edge is reported once, even though it is shared by two faces.
    pub fn edge_directions(&self) -> SmallVec<[Vector<Real>; 16]> {
        match self {
            ConvexShape::Cuboid(_) => (0..3).map(|i| Vector::ith(i, 1.0)).collect(),
            ConvexShape::ConvexHull(h) => {
                let hull = h.hull();
                let mut seen: SmallVec<[(u8, u8); 32]> = SmallVec::new();
                let mut dirs = SmallVec::new();

                for i in 0..h.num_polygons() {
                    let vids = hull.polygon_vertices(i);
                    for j in 0..vids.len() {
                        let a = vids[j];
                        let b = vids[(j + 1) % vids.len()];
                        let key = (a.min(b), a.max(b));

                        if !seen.contains(&key) {
                            seen.push(key);
                            dirs.push(h.vertex(b as usize) - h.vertex(a as usize));
                        }
                    }
                }

                dirs
            }
        }
    }
}

impl<'a> SupportMap for ConvexShape<'a> {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> SupportPoint {
        match self {
            ConvexShape::Cuboid(c) => c.local_support_point(dir),
            ConvexShape::ConvexHull(h) => h.local_support_point(dir),
        }
    }

    #[inline]
    fn local_vertex(&self, vid: u8) -> Point<Real> {
        match self {
            ConvexShape::Cuboid(c) => c.local_vertex(vid),
            ConvexShape::ConvexHull(h) => h.local_vertex(vid),
        }
    }

    #[inline]
    fn local_center(&self) -> Point<Real> {
        match self {
            ConvexShape::Cuboid(c) => c.local_center(),
            ConvexShape::ConvexHull(h) => h.local_center(),
        }
    }
}

/// A convex shape together with the margin used by the contact generators.
///
/// Its support function is the one of the full, unshrunk, shape.
#[derive(Copy, Clone, Debug)]
pub struct ConvexPrimitive<'a> {
    /// The geometry.
    pub shape: ConvexShape<'a>,
    /// The margin by which `self.shrunk()` is shrunk.
    pub margin: Real,
}

impl<'a> ConvexPrimitive<'a> {
    /// Builds a primitive with an explicit margin.
    #[inline]
    pub fn new(shape: impl Into<ConvexShape<'a>>, margin: Real) -> Self {
        Self {
            shape: shape.into(),
            margin,
        }
    }

    /// Builds a primitive with the margin computed by [`ConvexShape::pcm_margin`].
    ///
    /// The vertices of a convex hull are never moved by more than
    /// [`PcmConfig::hull_max_margin_ratio`] times that margin when shrunk.
    pub fn with_pcm_margin(
        shape: impl Into<ConvexShape<'a>>,
        tolerance_length: Real,
        config: &PcmConfig,
    ) -> Self {
        let mut shape = shape.into();
        let margin = shape.pcm_margin(tolerance_length, config);

        if let ConvexShape::ConvexHull(h) = &mut shape {
            *h = h.with_max_margin(margin * config.hull_max_margin_ratio);
        }

        Self { shape, margin }
    }

    /// The core of this shape, shrunk by its margin.
    #[inline]
    pub fn shrunk(&self) -> ShrunkPrimitive<'a> {
        ShrunkPrimitive(*self)
    }
}

impl<'a> SupportMap for ConvexPrimitive<'a> {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> SupportPoint {
        self.shape.local_support_point(dir)
    }

    #[inline]
    fn local_vertex(&self, vid: u8) -> Point<Real> {
        self.shape.local_vertex(vid)
    }

    #[inline]
    fn local_center(&self) -> Point<Real> {
        self.shape.local_center()
    }
}

/// A [`ConvexPrimitive`] shrunk inward by its margin.
///
/// Each support point carries the `margin_delta` of its vertex: the distance between the raw
/// vertex and its shrunk counterpart, minus the margin.
#[derive(Copy, Clone, Debug)]
pub struct ShrunkPrimitive<'a>(pub ConvexPrimitive<'a>);

impl<'a> ShrunkPrimitive<'a> {
    fn shrunk_vertex(&self, vid: u8) -> SupportPoint {
        let margin = self.0.margin;

        match &self.0.shape {
            ConvexShape::Cuboid(c) => {
                let core = utils::box_corner(&c.shrunk_half_extents(margin), vid);
                let margin_delta = if margin > 0.0 {
                    (utils::box_corner(&c.half_extents, vid) - core).norm() - margin
                } else {
                    0.0
                };

                SupportPoint {
                    point: core,
                    vid,
                    margin_delta,
                }
            }
            ConvexShape::ConvexHull(h) => {
                let (point, margin_delta) = h.shrunk_vertex(vid as usize, margin);
                SupportPoint {
                    point,
                    vid,
                    margin_delta,
                }
            }
        }
    }
}

impl<'a> SupportMap for ShrunkPrimitive<'a> {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> SupportPoint {
        let vid = match &self.0.shape {
            ConvexShape::Cuboid(_) => utils::sign_mask(dir),
            ConvexShape::ConvexHull(h) => h.support_vertex_id(dir) as u8,
        };
        self.shrunk_vertex(vid)
    }

    #[inline]
    fn local_vertex(&self, vid: u8) -> Point<Real> {
        self.shrunk_vertex(vid).point
    }

    #[inline]
    fn local_center(&self) -> Point<Real> {
        self.0.shape.local_center()
    }

    fn local_support_inflation(&self, dir: &Vector<Real>) -> Real {
        let full = self.0.local_support_point(dir).point;
        let core = self.local_support_point(dir).point;
        (full - core).dot(dir).max(0.0)
    }
}

#[cfg(test)]
mod test {
    use super::{ConvexPrimitive, ConvexShape};
    use crate::math::{Point, Real, Vector};
    use crate::query::contact_manifolds::PcmConfig;
    use crate::shape::{ConvexHull, Cuboid, ScaledConvexHull, SupportMap};

    fn random_dir(rng: &mut oorandom::Rand32) -> Vector<Real> {
        Vector::new(
            rng.rand_float() as Real - 0.5,
            rng.rand_float() as Real - 0.5,
            rng.rand_float() as Real - 0.5,
        )
    }

    #[test]
    fn zero_margin_support_is_unshrunk() {
        let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.7, 0.3)).unwrap();
        let shapes = [
            ConvexShape::from(Cuboid::new(Vector::new(1.0, 2.0, 0.5))),
            ConvexShape::from(ScaledConvexHull::unscaled(&hull)),
        ];
        let mut rng = oorandom::Rand32::new(0);

        for shape in shapes {
            let primitive = ConvexPrimitive::new(shape, 0.0);
            let shrunk = primitive.shrunk();

            for _ in 0..50 {
                let dir = random_dir(&mut rng);
                let full = primitive.local_support_point(&dir);
                let core = shrunk.local_support_point(&dir);
                assert_eq!(full.point, core.point);
                assert_eq!(full.vid, core.vid);
                assert_eq!(core.margin_delta, 0.0);
            }
        }
    }

    #[test]
    fn shrunk_cuboid_support() {
        let primitive = ConvexPrimitive::new(Cuboid::new(Vector::new(1.0, 1.0, 1.0)), 0.1);
        let sp = primitive
            .shrunk()
            .local_support_point(&Vector::new(1.0, -1.0, 1.0));
        assert_relative_eq!(sp.point, Point::new(0.9, -0.9, 0.9));
        assert_relative_eq!(sp.margin_delta, (3.0 as Real).sqrt() * 0.1 - 0.1, epsilon = 1.0e-6);
    }

    #[test]
    fn pcm_margin_caps_hull_shrinking() {
        let hull = ConvexHull::cuboid(&Vector::new(1.0, 1.0, 1.0)).unwrap();
        let config = PcmConfig::default();
        let primitive =
            ConvexPrimitive::with_pcm_margin(ScaledConvexHull::unscaled(&hull), 1.0, &config);

        match primitive.shape {
            ConvexShape::ConvexHull(h) => assert_relative_eq!(
                h.max_margin(),
                primitive.margin * config.hull_max_margin_ratio
            ),
            ConvexShape::Cuboid(_) => unreachable!(),
        }
    }

    #[test]
    fn cuboid_support_inflation() {
        let primitive = ConvexPrimitive::new(Cuboid::new(Vector::new(1.0, 2.0, 0.5)), 0.1);
        let shrunk = primitive.shrunk();

        assert_relative_eq!(shrunk.local_support_inflation(&-Vector::y()), 0.1, epsilon = 1.0e-6);
        let diagonal = Vector::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(
            shrunk.local_support_inflation(&diagonal),
            0.1 * (2.0 as Real).sqrt(),
            epsilon = 1.0e-6
        );
        assert_eq!(primitive.local_support_inflation(&diagonal), 0.0);
    }

    #[test]
    fn degenerate_vertex_fan_stays_finite() {
        // The apex of a very flat pyramid: its three incident planes are nearly parallel.
        let points = vec![
            Point::new(-1.0, -1.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(-1.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0e-4),
        ];
        let hull = ConvexHull::new(
            points,
            [
                &[0, 3, 2, 1][..],
                &[0, 1, 4],
                &[1, 2, 4],
                &[2, 3, 4],
                &[3, 0, 4],
            ],
        )
        .unwrap();
        let primitive = ConvexPrimitive::new(ScaledConvexHull::unscaled(&hull), 0.01);
        let sp = primitive
            .shrunk()
            .local_support_point(&Vector::new(0.0, 0.0, 1.0));

        assert_eq!(sp.vid, 4);
        assert!(sp.point.iter().all(|x| x.is_finite()));
        assert!(sp.margin_delta.is_finite());
        // The core vertex never moves past the center of mass.
        assert!(sp.point.z <= 1.0e-4 && sp.point.z >= hull.center_of_mass().z - 1.0e-6);
    }

    #[test]
    fn pcm_margins() {
        let config = PcmConfig::default();
        let cuboid = ConvexShape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        assert_relative_eq!(cuboid.pcm_margin(1.0, &config), 0.1);
        assert_relative_eq!(cuboid.pcm_margin(100.0, &config), 0.15);

        let hull = ConvexHull::cuboid(&Vector::new(0.2, 0.2, 0.2)).unwrap();
        let hull = ConvexShape::from(ScaledConvexHull::unscaled(&hull));
        assert_relative_eq!(hull.pcm_margin(1.0, &config), 0.05, epsilon = 1.0e-6);
    }

    #[test]
    fn hull_edges_are_unique() {
        let hull = ConvexHull::cuboid(&Vector::new(1.0, 1.0, 1.0)).unwrap();
        let shape = ConvexShape::from(ScaledConvexHull::unscaled(&hull));
        assert_eq!(shape.edge_directions().len(), 12);
        assert_eq!(shape.face_normals().len(), 6);
    }
}
