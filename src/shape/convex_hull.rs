use crate::math::{Point, Real, UnitVector, Vector};
use crate::utils;
use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use na::ComplexField; // for .abs()
use smallvec::SmallVec;

/// The maximum number of vertices of a [`ConvexHull`].
///
/// Vertex indices are stored as `u8` so that warm-start data stays compact.
pub const MAX_HULL_VERTICES: usize = 255;

/// The maximum number of polygons of a [`ConvexHull`].
pub const MAX_HULL_POLYGONS: usize = 255;

/// Errors that can occur while assembling a [`ConvexHull`] from its topology.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConvexHullError {
    /// Fewer than four vertices were given.
    #[error("A convex hull needs at least 4 vertices, got {0}.")]
    TooFewVertices(usize),
    /// More than [`MAX_HULL_VERTICES`] vertices were given.
    #[error("A convex hull can have at most 255 vertices, got {0}.")]
    TooManyVertices(usize),
    /// Fewer than four polygons, or more than [`MAX_HULL_POLYGONS`], were given.
    #[error("Invalid number of polygons: {0}.")]
    InvalidPolygonCount(usize),
    /// A polygon references a vertex that does not exist.
    #[error("Polygon {polygon} references the vertex {vertex} which does not exist.")]
    VertexOutOfBounds {
        /// The offending polygon.
        polygon: usize,
        /// The out-of-bounds vertex index.
        vertex: u32,
    },
    /// A polygon has fewer than three vertices, repeats a vertex, or has a zero area.
    #[error("Polygon {0} is degenerate.")]
    DegeneratePolygon(usize),
    /// The vertices of a polygon do not lie on a common plane.
    #[error("The vertices of polygon {0} are not coplanar.")]
    NonPlanarPolygon(usize),
    /// Some vertex lies outside of the plane of a polygon.
    #[error("Vertex {vertex} lies outside of the plane of polygon {polygon}.")]
    NotConvex {
        /// The polygon whose plane is violated.
        polygon: usize,
        /// The vertex lying outside.
        vertex: usize,
    },
    /// A vertex is shared by fewer than three polygons.
    #[error("Vertex {0} is adjacent to fewer than three polygons.")]
    MissingIncidentPolygons(usize),
    /// The hull has a zero or negative volume (e.g. polygons with clockwise winding).
    #[error("The convex hull has a zero or negative volume.")]
    ZeroVolume,
}

/// A face of a [`ConvexHull`], together with its supporting plane.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct HullPolygon {
    /// The outward unit normal of this polygon.
    pub normal: UnitVector<Real>,
    /// Signed distance from the origin to the polygon's plane: `normal.dot(pt) == offset` for
    /// every point `pt` of the plane.
    pub offset: Real,
    first_vertex: u16,
    num_vertices: u8,
}

/// An immutable convex polyhedron, with the adjacency data needed by the contact generators.
///
/// This does not compute a convex hull from a point cloud: the polygons must already describe a
/// closed convex polyhedron, each given as a counter-clockwise (seen from outside) loop of vertex
/// indices.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct ConvexHull {
    points: Vec<Point<Real>>,
    polygons: Vec<HullPolygon>,
    vertex_refs: Vec<u8>,
    vertex_polygons: Vec<[u8; 3]>,
    center_of_mass: Point<Real>,
}

impl ConvexHull {
    /// Assembles a convex hull from its vertices and its polygons.
    ///
    /// Each polygon is a counter-clockwise loop of indices into `points`. The polygon planes, the
    /// three polygons used to shrink each vertex, and the center of mass are derived here.
    pub fn new<P: AsRef<[u32]>>(
        points: Vec<Point<Real>>,
        polygons: impl IntoIterator<Item = P>,
    ) -> Result<Self, ConvexHullError> {
        if points.len() < 4 {
            return Err(ConvexHullError::TooFewVertices(points.len()));
        }
        if points.len() > MAX_HULL_VERTICES {
            return Err(ConvexHullError::TooManyVertices(points.len()));
        }

        let diameter = points
            .iter()
            .map(|pt| (pt - points[0]).norm())
            .fold(0.0, Real::max);
        let tolerance = diameter * 1.0e-3;

        let mut hull_polygons = Vec::new();
        let mut vertex_refs = Vec::new();
        let mut incident: Vec<SmallVec<[u8; 6]>> = alloc::vec![SmallVec::new(); points.len()];

        for (ipoly, poly) in polygons.into_iter().enumerate() {
            let poly = poly.as_ref();

            if ipoly >= MAX_HULL_POLYGONS {
                return Err(ConvexHullError::InvalidPolygonCount(ipoly + 1));
            }
            if poly.len() < 3 || poly.len() > points.len() {
                return Err(ConvexHullError::DegeneratePolygon(ipoly));
            }

            let mut loop_pts: SmallVec<[Point<Real>; 8]> = SmallVec::new();
            for (i, &vid) in poly.iter().enumerate() {
                if poly[..i].contains(&vid) {
                    return Err(ConvexHullError::DegeneratePolygon(ipoly));
                }
                let pt = points
                    .get(vid as usize)
                    .ok_or(ConvexHullError::VertexOutOfBounds {
                        polygon: ipoly,
                        vertex: vid,
                    })?;
                loop_pts.push(*pt);
            }

            let normal = utils::ccw_polygon_normal(&loop_pts)
                .ok_or(ConvexHullError::DegeneratePolygon(ipoly))?;
            let offset = loop_pts.iter().map(|pt| normal.dot(&pt.coords)).sum::<Real>()
                / loop_pts.len() as Real;

            if loop_pts
                .iter()
                .any(|pt| (normal.dot(&pt.coords) - offset).abs() > tolerance)
            {
                return Err(ConvexHullError::NonPlanarPolygon(ipoly));
            }

            if let Some(vertex) = points
                .iter()
                .position(|pt| normal.dot(&pt.coords) - offset > tolerance)
            {
                return Err(ConvexHullError::NotConvex {
                    polygon: ipoly,
                    vertex,
                });
            }

            // Both fit: the loop has distinct vertices, and there are at most `MAX_HULL_VERTICES`.
            let first_vertex = u16::try_from(vertex_refs.len())
                .map_err(|_| ConvexHullError::InvalidPolygonCount(ipoly + 1))?;
            let num_vertices =
                u8::try_from(poly.len()).map_err(|_| ConvexHullError::DegeneratePolygon(ipoly))?;

            hull_polygons.push(HullPolygon {
                normal,
                offset,
                first_vertex,
                num_vertices,
            });

            for &vid in poly {
                vertex_refs.push(vid as u8);
                incident[vid as usize].push(ipoly as u8);
            }
        }

        if hull_polygons.len() < 4 {
            return Err(ConvexHullError::InvalidPolygonCount(hull_polygons.len()));
        }

        let mut vertex_polygons = Vec::with_capacity(points.len());
        for (vid, faces) in incident.iter().enumerate() {
            if faces.len() < 3 {
                return Err(ConvexHullError::MissingIncidentPolygons(vid));
            }
            vertex_polygons.push(best_plane_triple(&hull_polygons, faces));
        }

        let center_of_mass = center_of_mass(&points, &hull_polygons, &vertex_refs)
            .ok_or(ConvexHullError::ZeroVolume)?;

        Ok(Self {
            points,
            polygons: hull_polygons,
            vertex_refs,
            vertex_polygons,
            center_of_mass,
        })
    }

    /// The convex hull of a box with the given half-extents.
    ///
    /// Fails if any half-extent is not positive.
    pub fn cuboid(half_extents: &Vector<Real>) -> Result<Self, ConvexHullError> {
        let points = (0..8u8).map(|vid| utils::box_corner(half_extents, vid)).collect();
        // Vertex ids follow `utils::box_corner`: bit `i` set means positive along axis `i`.
        let polygons = [
            [1, 3, 7, 5], // +x
            [0, 4, 6, 2], // -x
            [2, 6, 7, 3], // +y
            [0, 1, 5, 4], // -y
            [4, 5, 7, 6], // +z
            [0, 2, 3, 1], // -z
        ];

        Self::new(points, polygons)
    }

    /// The vertices of this convex hull.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The polygons of this convex hull.
    #[inline]
    pub fn polygons(&self) -> &[HullPolygon] {
        &self.polygons
    }

    /// The counter-clockwise vertex loop of the `i`-th polygon.
    #[inline]
    pub fn polygon_vertices(&self, i: usize) -> &[u8] {
        let poly = &self.polygons[i];
        let first = poly.first_vertex as usize;
        &self.vertex_refs[first..first + poly.num_vertices as usize]
    }

    /// The three polygons used to compute the shrunk position of the vertex `vid`.
    #[inline]
    pub fn vertex_polygons(&self, vid: usize) -> [u8; 3] {
        self.vertex_polygons[vid]
    }

    /// The center of mass of this convex hull, assuming a uniform density.
    #[inline]
    pub fn center_of_mass(&self) -> Point<Real> {
        self.center_of_mass
    }
}

// Among the polygons adjacent to a vertex, pick the three whose normals are the most linearly
// independent so that the triple-plane intersection stays well-conditioned.
fn best_plane_triple(polygons: &[HullPolygon], faces: &[u8]) -> [u8; 3] {
    let mut best = [faces[0], faces[1], faces[2]];
    let mut best_det = -1.0;

    for i in 0..faces.len() {
        for j in i + 1..faces.len() {
            for k in j + 1..faces.len() {
                let n0 = polygons[faces[i] as usize].normal;
                let n1 = polygons[faces[j] as usize].normal;
                let n2 = polygons[faces[k] as usize].normal;
                let det = n0.dot(&n1.cross(&n2)).abs();

                if det > best_det {
                    best_det = det;
                    best = [faces[i], faces[j], faces[k]];
                }
            }
        }
    }

    best
}

fn center_of_mass(
    points: &[Point<Real>],
    polygons: &[HullPolygon],
    vertex_refs: &[u8],
) -> Option<Point<Real>> {
    let reference = Point::from(
        points.iter().fold(Vector::zeros(), |acc, pt| acc + pt.coords) / points.len() as Real,
    );

    let mut res = Vector::zeros();
    let mut vol = 0.0;

    for poly in polygons {
        let first = poly.first_vertex as usize;
        let ids = &vertex_refs[first..first + poly.num_vertices as usize];
        let p0 = points[ids[0] as usize];

        for w in ids[1..].windows(2) {
            let p1 = points[w[0] as usize];
            let p2 = points[w[1] as usize];

            let volume = (p0 - reference).dot(&(p1 - reference).cross(&(p2 - reference))) / 6.0;
            let center = (reference.coords + p0.coords + p1.coords + p2.coords) / 4.0;

            res += center * volume;
            vol += volume;
        }
    }

    if vol <= crate::math::DEFAULT_EPSILON {
        None
    } else {
        Some(Point::from(res / vol))
    }
}
