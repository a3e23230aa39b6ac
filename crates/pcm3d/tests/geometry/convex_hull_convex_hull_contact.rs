use approx::assert_relative_eq;
use pcm3d::math::{Isometry, Vector};
use pcm3d::query::contact_manifolds::{
    contact_manifold_convex_hull_convex_hull, ContactBuffer, ContactParams, PcmConfig,
    PersistentContactManifold,
};
use pcm3d::shape::{ConvexHull, MeshScale, ScaledConvexHull};

#[test]
fn stacked_hulls_face_contact() {
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull1 = ScaledConvexHull::unscaled(&hull);
    let hull2 = ScaledConvexHull::unscaled(&hull);

    let pos1 = Isometry::identity();
    let pos2 = Isometry::new(Vector::new(0.0, 0.98, 0.0), Vector::y() * 0.3);
    let params = ContactParams::default().with_contact_distance(0.01);
    let config = PcmConfig::default().with_regenerate_on_new_contact(true);
    let mut manifold = PersistentContactManifold::new();
    let mut buffer = ContactBuffer::new();

    assert!(contact_manifold_convex_hull_convex_hull(
        &pos1,
        &hull1,
        &pos2,
        &hull2,
        &params,
        &config,
        &mut manifold,
        &mut buffer,
    ));

    assert_eq!(manifold.len(), 4);
    assert_eq!(buffer.len(), 4);
    for contact in buffer.contacts() {
        assert_relative_eq!(*contact.normal, Vector::y(), epsilon = 1.0e-4);
        assert_relative_eq!(contact.penetration, 0.02, epsilon = 1.0e-4);
    }
}

#[test]
fn scaled_hull_contact() {
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull1 = ScaledConvexHull::unscaled(&hull);
    // A 2 x 1 x 1 box made of the unit cube.
    let scale = MeshScale::from_scale(Vector::new(2.0, 1.0, 1.0)).unwrap();
    let hull2 = ScaledConvexHull::new(&hull, scale);

    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(1.45, 0.0, 0.0);
    let params = ContactParams::default().with_contact_distance(0.01);
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();
    let mut buffer = ContactBuffer::new();

    assert!(contact_manifold_convex_hull_convex_hull(
        &pos1,
        &hull1,
        &pos2,
        &hull2,
        &params,
        &config,
        &mut manifold,
        &mut buffer,
    ));

    let contact = buffer.contacts()[0];
    assert_relative_eq!(*contact.normal, Vector::x(), epsilon = 1.0e-4);
    assert_relative_eq!(contact.penetration, 0.05, epsilon = 1.0e-4);
    assert_relative_eq!(contact.point.x, 0.45, epsilon = 1.0e-4);
}
