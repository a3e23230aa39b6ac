use crate::math::{Isometry, Real};
use crate::query::contact_manifolds::{
    ContactBuffer, ContactParams, ManifoldUpdate, PcmConfig, PersistentContactManifold,
};
use crate::shape::{ConvexPrimitive, ConvexShape, Cuboid, ScaledConvexHull};

/// Computes the contacts between two convex shapes, reusing the contacts cached in `manifold`
/// whenever possible.
///
/// `pos1` and `pos2` are the world-space positions of the shapes. The contacts are appended to
/// `buffer` in world-space, with normals pointing from `shape1` toward `shape2`.
/// Returns `true` if at least one contact was written.
pub fn contact_manifold_convex_convex(
    pos1: &Isometry<Real>,
    shape1: &ConvexShape,
    pos2: &Isometry<Real>,
    shape2: &ConvexShape,
    params: &ContactParams,
    config: &PcmConfig,
    manifold: &mut PersistentContactManifold,
    buffer: &mut ContactBuffer,
) -> bool {
    debug_assert!(
        relative_eq!(pos1.rotation.norm(), 1.0, epsilon = 1.0e-4)
            && relative_eq!(pos2.rotation.norm(), 1.0, epsilon = 1.0e-4)
    );

    let pos12 = pos1.inv_mul(pos2);
    let prim1 = ConvexPrimitive::with_pcm_margin(*shape1, params.tolerance_length, config);
    let prim2 = ConvexPrimitive::with_pcm_margin(*shape2, params.tolerance_length, config);

    let normal1 = match manifold.update(&pos12, &prim1, &prim2, params, config) {
        ManifoldUpdate::NoContact => return false,
        ManifoldUpdate::Reused { normal1 } | ManifoldUpdate::Merged { normal1 } => normal1,
        ManifoldUpdate::NeedsFullRegeneration {
            overlap_test,
            fallback,
        } => {
            match manifold.regenerate(
                &pos12,
                shape1,
                shape2,
                overlap_test,
                fallback.as_ref(),
                params.contact_distance,
            ) {
                Some(normal1) => normal1,
                None => return false,
            }
        }
    };

    manifold.emit(pos1, pos2, &normal1, params.contact_distance, buffer) > 0
}

/// Computes the contacts between a box and a convex hull.
pub fn contact_manifold_cuboid_convex_hull(
    pos1: &Isometry<Real>,
    cuboid1: &Cuboid,
    pos2: &Isometry<Real>,
    hull2: &ScaledConvexHull,
    params: &ContactParams,
    config: &PcmConfig,
    manifold: &mut PersistentContactManifold,
    buffer: &mut ContactBuffer,
) -> bool {
    contact_manifold_convex_convex(
        pos1,
        &ConvexShape::Cuboid(*cuboid1),
        pos2,
        &ConvexShape::ConvexHull(*hull2),
        params,
        config,
        manifold,
        buffer,
    )
}

/// Computes the contacts between two convex hulls.
pub fn contact_manifold_convex_hull_convex_hull(
    pos1: &Isometry<Real>,
    hull1: &ScaledConvexHull,
    pos2: &Isometry<Real>,
    hull2: &ScaledConvexHull,
    params: &ContactParams,
    config: &PcmConfig,
    manifold: &mut PersistentContactManifold,
    buffer: &mut ContactBuffer,
) -> bool {
    contact_manifold_convex_convex(
        pos1,
        &ConvexShape::ConvexHull(*hull1),
        pos2,
        &ConvexShape::ConvexHull(*hull2),
        params,
        config,
        manifold,
        buffer,
    )
}

/// Computes the contacts between two boxes.
pub fn contact_manifold_cuboid_cuboid(
    pos1: &Isometry<Real>,
    cuboid1: &Cuboid,
    pos2: &Isometry<Real>,
    cuboid2: &Cuboid,
    params: &ContactParams,
    config: &PcmConfig,
    manifold: &mut PersistentContactManifold,
    buffer: &mut ContactBuffer,
) -> bool {
    contact_manifold_convex_convex(
        pos1,
        &ConvexShape::Cuboid(*cuboid1),
        pos2,
        &ConvexShape::Cuboid(*cuboid2),
        params,
        config,
        manifold,
        buffer,
    )
}
