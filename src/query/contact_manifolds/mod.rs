//! Persistent contact manifolds between convex shapes.
//!
//! A [`PersistentContactManifold`] caches up to [`MAX_MANIFOLD_POINTS`] contacts between two
//! shapes, each point being stored in the local-space of both shapes. At each step, the cached
//! points are re-projected with the new relative position of the shapes. They are only recomputed
//! (with GJK, then EPA for deep penetrations) when the shapes moved too much relative to the
//! position recorded at the last recomputation, or when a contact broke.
//!
//! GJK runs on the shapes shrunk by a margin, so that most contacts are found without resorting
//! to EPA. When the new contact normal disagrees with the cached one, the whole manifold is
//! regenerated by polygon clipping.
//!
//! # Basic Usage
//!
//! ```rust
//! # #[cfg(all(feature = "dim3", feature = "f32"))] {
//! use pcm3d::math::{Isometry, Vector};
//! use pcm3d::query::contact_manifolds::{
//!     contact_manifold_cuboid_cuboid, ContactBuffer, ContactParams, PcmConfig,
//!     PersistentContactManifold,
//! };
//! use pcm3d::shape::Cuboid;
//!
//! let ground = Cuboid::new(Vector::new(5.0, 0.5, 5.0));
//! let cube = Cuboid::new(Vector::new(0.5, 0.5, 0.5));
//! let pos1 = Isometry::identity();
//! let pos2 = Isometry::translation(0.0, 0.99, 0.0);
//!
//! let params = ContactParams::default().with_contact_distance(0.01);
//! let config = PcmConfig::default();
//! let mut manifold = PersistentContactManifold::new();
//! let mut buffer = ContactBuffer::new();
//!
//! let touching = contact_manifold_cuboid_cuboid(
//!     &pos1, &ground, &pos2, &cube, &params, &config, &mut manifold, &mut buffer,
//! );
//! assert!(touching);
//!
//! for contact in buffer.contacts() {
//!     println!("{:?} along {:?}", contact.point, contact.normal);
//! }
//! # }
//! ```

pub use self::batch::{compute_contact_pairs, ContactPair};
pub use self::contact_buffer::{Contact, ContactBuffer, MAX_BUFFERED_CONTACTS};
pub use self::contact_manifolds_convex_convex::{
    contact_manifold_convex_convex, contact_manifold_convex_hull_convex_hull,
    contact_manifold_cuboid_convex_hull, contact_manifold_cuboid_cuboid,
};
pub use self::contact_point::ContactPoint;
pub use self::contact_reduction::reduce_contacts;
pub use self::full_manifold::{
    clip_polygons, generate_full_manifold, sat_best_axis, separation_along_axis,
    ManifoldCandidates,
};
pub use self::pcm_config::{ContactParams, PcmConfig};
pub use self::persistent_manifold::{
    ManifoldStats, ManifoldUpdate, PersistentContactManifold, MAX_MANIFOLD_POINTS,
};

mod batch;
mod contact_buffer;
mod contact_manifolds_convex_convex;
mod contact_point;
mod contact_reduction;
mod full_manifold;
mod pcm_config;
mod persistent_manifold;
