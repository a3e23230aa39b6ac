use crate::math::{Point, Real};
use crate::query::gjk::origin_projection::{
    self, TriangleLocation, TriangleProjection,
};
use crate::query::gjk::{self, CsoPoint};

/// A simplex of dimension up to 3 using Voronoï regions for computing point projections.
#[derive(Clone, Debug)]
pub struct VoronoiSimplex {
    prev_vertices: [usize; 4],
    prev_dim: usize,
    prev_proj: [Real; 4],

    vertices: [CsoPoint; 4],
    proj: [Real; 4],
    dim: usize,
}

impl Default for VoronoiSimplex {
    fn default() -> Self {
        Self::new()
    }
}

impl VoronoiSimplex {
    /// Creates a new empty simplex.
    pub fn new() -> VoronoiSimplex {
        VoronoiSimplex {
            prev_vertices: [0, 1, 2, 3],
            prev_proj: [0.0; 4],
            prev_dim: 0,
            vertices: [CsoPoint::origin(); 4],
            proj: [0.0; 4],
            dim: 0,
        }
    }

    /// Swap two vertices of this simplex.
    pub fn swap(&mut self, i1: usize, i2: usize) {
        self.vertices.swap(i1, i2);

        // Keep `prev_vertices` pointing to the same vertices.
        for id in &mut self.prev_vertices {
            if *id == i1 {
                *id = i2;
            } else if *id == i2 {
                *id = i1;
            }
        }
    }

    /// Resets this simplex to a single point.
    pub fn reset(&mut self, pt: CsoPoint) {
        self.prev_dim = 0;
        self.prev_vertices = [0, 1, 2, 3];
        self.prev_proj = [1.0, 0.0, 0.0, 0.0];
        self.dim = 0;
        self.proj = [1.0, 0.0, 0.0, 0.0];
        self.vertices[0] = pt;
    }

    /// Add a point to this simplex.
    ///
    /// Returns `false` if the point is too close to an existing vertex, or if the simplex is full.
    pub fn add_point(&mut self, pt: CsoPoint) -> bool {
        if self.dim == 3 {
            return false;
        }

        self.prev_dim = self.dim;
        self.prev_proj = self.proj;
        self.prev_vertices = [0, 1, 2, 3];

        for i in 0..self.dim + 1 {
            if (self.vertices[i].point - pt.point).norm_squared() < gjk::eps_tol() {
                return false;
            }
        }

        self.dim += 1;
        self.vertices[self.dim] = pt;
        true
    }

    /// Retrieves the barycentric coordinate associated to the `i`-th by the last call to `project_origin_and_reduce`.
    pub fn proj_coord(&self, i: usize) -> Real {
        assert!(i <= self.dim, "Index out of bounds.");
        self.proj[i]
    }

    /// The i-th point of this simplex.
    pub fn point(&self, i: usize) -> &CsoPoint {
        assert!(i <= self.dim, "Index out of bounds.");
        &self.vertices[i]
    }

    /// Retrieves the barycentric coordinate associated to the `i`-th before the last call to `project_origin_and_reduce`.
    pub fn prev_proj_coord(&self, i: usize) -> Real {
        assert!(i <= self.prev_dim, "Index out of bounds.");
        self.prev_proj[i]
    }

    /// The i-th point of the simplex before the last call to `project_origin_and_reduce`.
    pub fn prev_point(&self, i: usize) -> &CsoPoint {
        assert!(i <= self.prev_dim, "Index out of bounds.");
        &self.vertices[self.prev_vertices[i]]
    }

    // Moves the vertices `ids` (sorted in increasing order) to the first slots of the simplex
    // and drops the others.
    fn keep(&mut self, ids: &[usize], coords: &[Real]) {
        for (k, id) in ids.iter().enumerate() {
            if k != *id {
                self.swap(k, *id);
            }
        }

        self.dim = ids.len() - 1;
        self.proj = [0.0; 4];
        self.proj[..coords.len()].copy_from_slice(coords);
    }

    fn keep_triangle_feature(&mut self, ids: [usize; 3], proj: &TriangleProjection) {
        match proj.location {
            TriangleLocation::OnVertex(i) => self.keep(&[ids[i]], &[1.0]),
            TriangleLocation::OnEdge(i, j) => {
                let (a, b) = (ids[i], ids[j]);
                if a < b {
                    self.keep(&[a, b], &[proj.bcoords[i], proj.bcoords[j]])
                } else {
                    self.keep(&[b, a], &[proj.bcoords[j], proj.bcoords[i]])
                }
            }
            TriangleLocation::OnFace => {
                let mut sorted = [(ids[0], 0), (ids[1], 1), (ids[2], 2)];
                sorted.sort_unstable_by_key(|e| e.0);
                self.keep(
                    &[sorted[0].0, sorted[1].0, sorted[2].0],
                    &[
                        proj.bcoords[sorted[0].1],
                        proj.bcoords[sorted[1].1],
                        proj.bcoords[sorted[2].1],
                    ],
                )
            }
        }
    }

    /// Projects the origin on the boundary of this simplex and reduces `self` the smallest subsimplex containing the origin.
    ///
    /// Returns the result of the projection or `Point::origin()` if the origin lies inside of the simplex.
    /// The state of the simplex before projection is saved, and can be retrieved using the methods prefixed
    /// by `prev_`.
    pub fn project_origin_and_reduce(&mut self) -> Point<Real> {
        match self.dim {
            0 => {
                self.proj[0] = 1.0;
                self.vertices[0].point
            }
            1 => {
                let (proj, t) = origin_projection::project_origin_on_segment(
                    &self.vertices[0].point,
                    &self.vertices[1].point,
                );

                if t <= 0.0 {
                    self.keep(&[0], &[1.0]);
                } else if t >= 1.0 {
                    self.keep(&[1], &[1.0]);
                } else {
                    self.proj[0] = 1.0 - t;
                    self.proj[1] = t;
                }

                proj
            }
            2 => {
                let proj = origin_projection::project_origin_on_triangle(
                    &self.vertices[0].point,
                    &self.vertices[1].point,
                    &self.vertices[2].point,
                );
                self.keep_triangle_feature([0, 1, 2], &proj);
                proj.point
            }
            _ => self.project_origin_and_reduce_tetrahedron(),
        }
    }

    fn project_origin_and_reduce_tetrahedron(&mut self) -> Point<Real> {
        // Each face, with the index of the opposite vertex.
        const FACES: [([usize; 3], usize); 4] =
            [([0, 1, 2], 3), ([0, 1, 3], 2), ([0, 2, 3], 1), ([1, 2, 3], 0)];

        let mut best: Option<([usize; 3], TriangleProjection)> = None;
        let mut best_sq_dist = Real::MAX;

        for (ids, opp) in FACES {
            let a = self.vertices[ids[0]].point;
            let b = self.vertices[ids[1]].point;
            let c = self.vertices[ids[2]].point;
            let d = self.vertices[opp].point;
            let normal = (b - a).cross(&(c - a));
            let sign_origin = -normal.dot(&a.coords);
            let sign_opp = normal.dot(&(d - a));

            // The origin and the opposite vertex are on the same side of this face.
            if sign_origin * sign_opp > 0.0 {
                continue;
            }

            let proj = origin_projection::project_origin_on_triangle(&a, &b, &c);
            let sq_dist = proj.point.coords.norm_squared();

            if sq_dist < best_sq_dist {
                best_sq_dist = sq_dist;
                best = Some((ids, proj));
            }
        }

        match best {
            Some((ids, proj)) => {
                self.keep_triangle_feature(ids, &proj);
                proj.point
            }
            None => Point::origin(), // The origin is inside of the tetrahedron.
        }
    }

    /// The dimension of the smallest subspace that can contain this simplex.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// The dimension of the simplex before the last call to `project_origin_and_reduce`.
    pub fn prev_dimension(&self) -> usize {
        self.prev_dim
    }

    /// The vertices of this simplex.
    pub fn points(&self) -> &[CsoPoint] {
        &self.vertices[..self.dim + 1]
    }
}
