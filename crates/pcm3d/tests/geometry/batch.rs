use pcm3d::math::{Isometry, Vector};
use pcm3d::query::contact_manifolds::{
    compute_contact_pairs, contact_manifold_convex_convex, ContactBuffer, ContactPair,
    ContactParams, PcmConfig, PersistentContactManifold,
};
use pcm3d::shape::{ConvexHull, Cuboid, ScaledConvexHull};

#[test]
fn batch_matches_single_calls() {
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull = ScaledConvexHull::unscaled(&hull);
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let params = ContactParams::default().with_contact_distance(0.01);
    let config = PcmConfig::default().with_regenerate_on_new_contact(true);

    let mut pairs = vec![
        ContactPair::new(
            Isometry::identity(),
            cuboid,
            Isometry::translation(1.45, 0.0, 0.0),
            hull,
        ),
        ContactPair::new(
            Isometry::translation(10.0, 0.0, 0.0),
            hull,
            Isometry::new(Vector::new(10.0, 0.97, 0.0), Vector::y() * 0.4),
            hull,
        ),
        ContactPair::new(
            Isometry::identity(),
            cuboid,
            Isometry::translation(0.0, 5.0, 0.0),
            cuboid,
        ),
    ];

    for _ in 0..2 {
        assert_eq!(compute_contact_pairs(&mut pairs, &params, &config), 2);
    }

    for pair in &pairs {
        let mut manifold = PersistentContactManifold::new();
        let mut buffer = ContactBuffer::new();
        let mut has_contacts = false;

        for _ in 0..2 {
            buffer.clear();
            has_contacts = contact_manifold_convex_convex(
                &pair.pos1,
                &pair.shape1,
                &pair.pos2,
                &pair.shape2,
                &params,
                &config,
                &mut manifold,
                &mut buffer,
            );
        }

        assert_eq!(has_contacts, pair.has_contacts);
        assert_eq!(buffer.contacts(), pair.buffer.contacts());
        assert_eq!(manifold.points(), pair.manifold.points());
    }
}
