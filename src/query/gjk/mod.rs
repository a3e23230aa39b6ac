//! The GJK algorithm for distance computation.

pub use self::cso_point::CsoPoint;
pub use self::gjk::*;
pub use self::voronoi_simplex3::VoronoiSimplex;

mod cso_point;
mod gjk;
pub(crate) mod origin_projection;
mod voronoi_simplex3;
