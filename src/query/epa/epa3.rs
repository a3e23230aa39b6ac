//! Three-dimensional penetration depth queries using the Expanding Polytope Algorithm.

use crate::math::{Isometry, Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::query::gjk::origin_projection::{self, TriangleLocation};
use crate::query::gjk::{self, CsoPoint, VoronoiSimplex};
use crate::shape::SupportMap;
use crate::utils;
use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;
use na::{self, Unit};
#[cfg(not(feature = "std"))]
use na::ComplexField; // for .abs()

/// The maximum number of EPA expansions.
pub const EPA_MAX_ITERATIONS: usize = 100;

/// The outcome of an EPA query, without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EpaStatus {
    /// The penetration was computed.
    Contact,
    /// The initial polytope does not enclose the origin, or could not be built.
    Fail,
    /// The polytope could not be refined further.
    Degenerate,
}

/// Results of the EPA algorithm.
///
/// All points and vectors are expressed in the local-space of the first shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EpaResult {
    /// The penetration of the two shapes.
    Contact {
        /// The deepest point of the first shape inside of the second shape.
        point1: Point<Real>,
        /// The deepest point of the second shape inside of the first shape.
        point2: Point<Real>,
        /// The unit direction along which the second shape must move to stop overlapping.
        normal1: UnitVector<Real>,
        /// The penetration depth.
        depth: Real,
    },
    /// The initial polytope does not enclose the origin, or could not be built.
    Fail,
    /// The polytope could not be refined further.
    Degenerate,
}

impl EpaResult {
    /// The status of this result.
    pub fn status(&self) -> EpaStatus {
        match self {
            EpaResult::Contact { .. } => EpaStatus::Contact,
            EpaResult::Fail => EpaStatus::Fail,
            EpaResult::Degenerate => EpaStatus::Degenerate,
        }
    }
}

#[derive(Copy, Clone, PartialEq)]
struct FaceId {
    id: usize,
    neg_dist: Real,
}

impl FaceId {
    fn new(id: usize, neg_dist: Real) -> Option<Self> {
        if neg_dist > gjk::eps_tol() {
            None
        } else {
            Some(FaceId { id, neg_dist })
        }
    }
}

impl Eq for FaceId {}

impl PartialOrd for FaceId {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FaceId {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        if self.neg_dist < other.neg_dist {
            Ordering::Less
        } else if self.neg_dist > other.neg_dist {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

#[derive(Clone, Debug)]
struct Face {
    pts: [usize; 3],
    adj: [usize; 3],
    normal: Unit<Vector<Real>>,
    bcoords: [Real; 3],
    deleted: bool,
}

impl Face {
    fn new_with_proj(
        vertices: &[CsoPoint],
        bcoords: [Real; 3],
        pts: [usize; 3],
        adj: [usize; 3],
    ) -> Self {
        // Degenerate faces get a zero normal.
        let normal = utils::ccw_face_normal([
            &vertices[pts[0]].point,
            &vertices[pts[1]].point,
            &vertices[pts[2]].point,
        ])
        .unwrap_or_else(|| Unit::new_unchecked(na::zero()));

        Face {
            pts,
            bcoords,
            adj,
            normal,
            deleted: false,
        }
    }

    fn new(vertices: &[CsoPoint], pts: [usize; 3], adj: [usize; 3]) -> (Self, bool) {
        let proj = origin_projection::project_origin_on_triangle(
            &vertices[pts[0]].point,
            &vertices[pts[1]].point,
            &vertices[pts[2]].point,
        );

        let proj_inside = match proj.location {
            TriangleLocation::OnFace => true,
            TriangleLocation::OnVertex(_) | TriangleLocation::OnEdge(..) => {
                let eps_tol = DEFAULT_EPSILON * 100.0;
                proj.point.coords.norm_squared() <= eps_tol * eps_tol
            }
        };

        (
            Self::new_with_proj(vertices, proj.bcoords, pts, adj),
            proj_inside,
        )
    }

    fn closest_points(&self, vertices: &[CsoPoint]) -> (Point<Real>, Point<Real>) {
        (
            vertices[self.pts[0]].orig1 * self.bcoords[0]
                + vertices[self.pts[1]].orig1.coords * self.bcoords[1]
                + vertices[self.pts[2]].orig1.coords * self.bcoords[2],
            vertices[self.pts[0]].orig2 * self.bcoords[0]
                + vertices[self.pts[1]].orig2.coords * self.bcoords[1]
                + vertices[self.pts[2]].orig2.coords * self.bcoords[2],
        )
    }

    fn next_ccw_pt_id(&self, id: usize) -> usize {
        if self.pts[0] == id {
            1
        } else if self.pts[1] == id {
            2
        } else {
            if self.pts[2] != id {
                log::debug!(
                    "Hit unexpected state in EPA: found index {}, expected: {}.",
                    self.pts[2],
                    id
                );
            }

            0
        }
    }

    fn can_be_seen_by(&self, vertices: &[CsoPoint], point: usize, opp_pt_id: usize) -> bool {
        let p0 = &vertices[self.pts[opp_pt_id]].point;
        let p1 = &vertices[self.pts[(opp_pt_id + 1) % 3]].point;
        let p2 = &vertices[self.pts[(opp_pt_id + 2) % 3]].point;
        let pt = &vertices[point].point;

        // NOTE: degenerate faces have a zero normal, so the dot product is zero and they are
        // reported as visible.
        (*pt - *p0).dot(&self.normal) >= -gjk::eps_tol() || is_affinely_dependent(p1, p2, pt)
    }
}

fn is_affinely_dependent(a: &Point<Real>, b: &Point<Real>, c: &Point<Real>) -> bool {
    let ab = b - a;
    let ac = c - a;
    let max_sq_len = ab.norm_squared().max(ac.norm_squared());
    ab.cross(&ac).norm_squared() <= DEFAULT_EPSILON * max_sq_len
}

struct SilhouetteEdge {
    face_id: usize,
    opp_pt_id: usize,
}

impl SilhouetteEdge {
    fn new(face_id: usize, opp_pt_id: usize) -> Self {
        SilhouetteEdge { face_id, opp_pt_id }
    }
}

/// The Expanding Polytope Algorithm in 3D.
///
/// It is seeded with the terminal simplex of [`penetration_gjk`](crate::query::gjk::penetration_gjk),
/// whose vertices are rebuilt on the full (unshrunk) shapes from their vertex ids.
///
/// The `EPA` structure can be reused across multiple queries to avoid allocations.
#[derive(Default)]
pub struct EPA {
    vertices: Vec<CsoPoint>,
    faces: Vec<Face>,
    silhouette: Vec<SilhouetteEdge>,
    heap: BinaryHeap<FaceId>,
}

impl EPA {
    /// Creates a new instance of the 3D Expanding Polytope Algorithm.
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.heap.clear();
        self.silhouette.clear();
    }

    fn face_result(&self, face: &Face) -> EpaResult {
        if face.normal.norm_squared() < 0.5 {
            log::debug!("EPA ended on a degenerate face.");
            return EpaResult::Degenerate;
        }

        let (point1, point2) = face.closest_points(&self.vertices);
        let depth = (point1 - point2).dot(&face.normal);

        if !depth.is_finite() {
            return EpaResult::Degenerate;
        }

        EpaResult::Contact {
            point1,
            point2,
            normal1: face.normal,
            depth: depth.max(0.0),
        }
    }

    /// Computes the penetration of two overlapping shapes.
    ///
    /// The points of `simplex` are rebuilt on `g1` and `g2` from their vertex ids, so `simplex`
    /// may have been computed on shrunk versions of these shapes.
    pub fn penetration<G1, G2>(
        &mut self,
        pos12: &Isometry<Real>,
        g1: &G1,
        g2: &G2,
        simplex: &VoronoiSimplex,
    ) -> EpaResult
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let _eps = DEFAULT_EPSILON;
        let _eps_tol = _eps * 100.0;

        self.reset();

        /*
         * Initialization.
         */
        for pt in simplex.points() {
            self.vertices.push(CsoPoint::from_vertex_ids(
                pos12, g1, g2, pt.vid1, pt.vid2,
            ));
        }

        if simplex.dimension() == 0 {
            log::debug!("EPA cannot start from a single point.");
            return EpaResult::Fail;
        } else if simplex.dimension() == 3 {
            let dp1 = self.vertices[1] - self.vertices[0];
            let dp2 = self.vertices[2] - self.vertices[0];
            let dp3 = self.vertices[3] - self.vertices[0];

            if dp1.cross(&dp2).dot(&dp3) > 0.0 {
                self.vertices.swap(1, 2)
            }

            let pts = [[0, 1, 2], [1, 3, 2], [0, 2, 3], [0, 3, 1]];
            let adj = [[3, 1, 2], [3, 2, 0], [0, 1, 3], [2, 1, 0]];
            let mut any_inside = false;

            for i in 0..4 {
                let (face, proj_inside) = Face::new(&self.vertices, pts[i], adj[i]);
                self.faces.push(face);

                if proj_inside {
                    let dist = self.faces[i].normal.dot(&self.vertices[pts[i][0]].point.coords);
                    match FaceId::new(i, -dist) {
                        Some(face_id) => self.heap.push(face_id),
                        None => return EpaResult::Fail,
                    }
                    any_inside = true;
                }
            }

            if !any_inside {
                log::debug!("EPA failed to project the origin on the initial simplex.");
                return EpaResult::Fail;
            }
        } else {
            if simplex.dimension() == 1 {
                let dpt = self.vertices[1] - self.vertices[0];

                Vector::orthonormal_subspace_basis(&[dpt], |dir| {
                    self.vertices.push(CsoPoint::from_shapes(pos12, g1, g2, dir));
                    false
                });
            }

            let (face1, _) = Face::new(&self.vertices, [0, 1, 2], [1, 1, 1]);
            let (face2, _) = Face::new(&self.vertices, [0, 2, 1], [0, 0, 0]);
            self.faces.push(face1);
            self.faces.push(face2);

            self.heap.push(FaceId { id: 0, neg_dist: 0.0 });
            self.heap.push(FaceId { id: 1, neg_dist: 0.0 });
        }

        let mut niter = 0;
        let mut max_dist = Real::MAX;
        let mut best_face_id = match self.heap.peek() {
            Some(face_id) => *face_id,
            None => return EpaResult::Degenerate,
        };
        let mut old_dist = 0.0;

        /*
         * Run the expansion.
         */
        while let Some(face_id) = self.heap.pop() {
            // Create new faces.
            let face = self.faces[face_id.id].clone();

            if face.deleted {
                continue;
            }

            let cso_point = CsoPoint::from_shapes(pos12, g1, g2, &face.normal);
            let support_point_id = self.vertices.len();
            self.vertices.push(cso_point);

            let candidate_max_dist = cso_point.point.coords.dot(&face.normal);

            if candidate_max_dist < max_dist {
                best_face_id = face_id;
                max_dist = candidate_max_dist;
            }

            let curr_dist = -face_id.neg_dist;

            if max_dist - curr_dist < _eps_tol ||
                // Accept the intersection as the algorithm is stuck and no new points will be found
                // This happens because of numerical stability issue
                ((curr_dist - old_dist).abs() < _eps && candidate_max_dist < max_dist)
            {
                return self.face_result(&self.faces[best_face_id.id]);
            }

            old_dist = curr_dist;

            self.faces[face_id.id].deleted = true;

            for k in 0..3 {
                let adj_opp_pt_id = self.faces[face.adj[k]].next_ccw_pt_id(face.pts[k]);
                self.compute_silhouette(support_point_id, face.adj[k], adj_opp_pt_id);
            }

            let first_new_face_id = self.faces.len();

            if self.silhouette.is_empty() {
                log::debug!("EPA failed to extract a silhouette.");
                return EpaResult::Degenerate;
            }

            for edge in &self.silhouette {
                if !self.faces[edge.face_id].deleted {
                    let new_face_id = self.faces.len();

                    let face_adj = &mut self.faces[edge.face_id];
                    let pt_id1 = face_adj.pts[(edge.opp_pt_id + 2) % 3];
                    let pt_id2 = face_adj.pts[(edge.opp_pt_id + 1) % 3];

                    let pts = [pt_id1, pt_id2, support_point_id];
                    let adj = [edge.face_id, new_face_id + 1, new_face_id - 1];
                    let new_face = Face::new(&self.vertices, pts, adj);

                    face_adj.adj[(edge.opp_pt_id + 1) % 3] = new_face_id;

                    self.faces.push(new_face.0);

                    if new_face.1 {
                        let pt = self.vertices[self.faces[new_face_id].pts[0]].point.coords;
                        let dist = self.faces[new_face_id].normal.dot(&pt);
                        if dist < curr_dist {
                            // Numerical errors: the polytope is no longer convex.
                            return self.face_result(&face);
                        }

                        match FaceId::new(new_face_id, -dist) {
                            Some(new_face_id) => self.heap.push(new_face_id),
                            None => return EpaResult::Degenerate,
                        }
                    }
                }
            }

            if first_new_face_id == self.faces.len() {
                // All the edges from the silhouette belonged to deleted faces.
                log::debug!("EPA silhouette only contains deleted faces.");
                return EpaResult::Degenerate;
            }

            let last_face_id = self.faces.len() - 1;
            self.faces[first_new_face_id].adj[2] = last_face_id;
            self.faces[last_face_id].adj[1] = first_new_face_id;

            self.silhouette.clear();

            niter += 1;
            if niter > EPA_MAX_ITERATIONS {
                // Our algorithm didn't converge to the precision we wanted,
                // but the best face is probably close enough.
                break;
            }
        }

        self.face_result(&self.faces[best_face_id.id])
    }

    fn compute_silhouette(&mut self, point: usize, id: usize, opp_pt_id: usize) {
        if !self.faces[id].deleted {
            if !self.faces[id].can_be_seen_by(&self.vertices, point, opp_pt_id) {
                self.silhouette.push(SilhouetteEdge::new(id, opp_pt_id));
            } else {
                self.faces[id].deleted = true;

                let adj_pt_id1 = (opp_pt_id + 2) % 3;
                let adj_pt_id2 = opp_pt_id;

                let adj1 = self.faces[id].adj[adj_pt_id1];
                let adj2 = self.faces[id].adj[adj_pt_id2];

                let adj_opp_pt_id1 =
                    self.faces[adj1].next_ccw_pt_id(self.faces[id].pts[adj_pt_id1]);
                let adj_opp_pt_id2 =
                    self.faces[adj2].next_ccw_pt_id(self.faces[id].pts[adj_pt_id2]);

                self.compute_silhouette(point, adj1, adj_opp_pt_id1);
                self.compute_silhouette(point, adj2, adj_opp_pt_id2);
            }
        }
    }
}
