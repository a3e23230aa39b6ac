//! Narrow-phase queries between convex shapes.
//!
//! * [`gjk`] computes the closest points between margin-shrunk shapes.
//! * [`epa`] computes the penetration depth when the shrunk shapes overlap.
//! * [`contact_manifolds`] combines both into persistent contact manifolds.

pub mod contact_manifolds;
pub mod epa;
pub mod gjk;
