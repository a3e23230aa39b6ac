use approx::assert_relative_eq;
use pcm3d::math::{Isometry, Vector};
use pcm3d::query::contact_manifolds::{
    contact_manifold_cuboid_cuboid, ContactBuffer, ContactParams, PcmConfig,
    PersistentContactManifold,
};
use pcm3d::shape::Cuboid;

#[test]
fn box_resting_on_ground() {
    let ground = Cuboid::new(Vector::new(5.0, 0.5, 5.0));
    let cube = Cuboid::new(Vector::new(0.5, 0.5, 0.5));
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(0.0, 0.99, 0.0);
    let params = ContactParams::default().with_contact_distance(0.01);
    let config = PcmConfig::default().with_regenerate_on_new_contact(true);
    let mut manifold = PersistentContactManifold::new();

    for step in 0..3 {
        let mut buffer = ContactBuffer::new();
        assert!(contact_manifold_cuboid_cuboid(
            &pos1,
            &ground,
            &pos2,
            &cube,
            &params,
            &config,
            &mut manifold,
            &mut buffer,
        ));

        assert_eq!(buffer.len(), 4, "Unexpected contact count at step {}", step);
        for contact in buffer.contacts() {
            assert_relative_eq!(*contact.normal, Vector::y(), epsilon = 1.0e-4);
            assert_relative_eq!(contact.penetration, 0.01, epsilon = 1.0e-4);
            assert_relative_eq!(contact.point.y, 0.49, epsilon = 1.0e-4);
            assert_relative_eq!(contact.point.x.abs(), 0.5, epsilon = 1.0e-4);
            assert_relative_eq!(contact.point.z.abs(), 0.5, epsilon = 1.0e-4);
        }
    }

    // Only the first step computed anything.
    assert_eq!(manifold.stats().gjk_calls, 1);
    assert_eq!(manifold.stats().full_regenerations, 1);
    assert_eq!(manifold.stats().reused, 2);
}

#[test]
fn deep_box_penetration_uses_epa() {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(1.5, 0.0, 0.0);
    let params = ContactParams::default();
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();
    let mut buffer = ContactBuffer::new();

    assert!(contact_manifold_cuboid_cuboid(
        &pos1,
        &cuboid,
        &pos2,
        &cuboid,
        &params,
        &config,
        &mut manifold,
        &mut buffer,
    ));

    assert_eq!(manifold.stats().epa_calls, 1);
    assert_eq!(buffer.len(), 1);
    let contact = buffer.contacts()[0];
    assert_relative_eq!(contact.penetration, 0.5, epsilon = 1.0e-3);
    assert_relative_eq!(*contact.normal, Vector::x(), epsilon = 1.0e-3);
    assert_relative_eq!(contact.point.x, 0.5, epsilon = 1.0e-3);
}
