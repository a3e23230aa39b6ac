//! Shapes supported by pcm3d.

pub use self::convex_hull::{
    ConvexHull, ConvexHullError, HullPolygon, MAX_HULL_POLYGONS, MAX_HULL_VERTICES,
};
pub use self::convex_shape::{ConvexPrimitive, ConvexShape, ShrunkPrimitive};
pub use self::cuboid::Cuboid;
pub use self::mesh_scale::{MeshScale, MeshScaleError};
pub use self::polygonal_feature::PolygonalFeature;
pub use self::scaled_convex_hull::ScaledConvexHull;
#[doc(inline)]
pub use self::support_map::{SupportMap, SupportPoint};

mod convex_hull;
mod convex_shape;
mod cuboid;
mod mesh_scale;
mod polygonal_feature;
mod scaled_convex_hull;
mod support_map;
