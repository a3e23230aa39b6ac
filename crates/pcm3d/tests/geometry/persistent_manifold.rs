use approx::assert_relative_eq;
use pcm3d::math::{Isometry, Point, Real, Vector};
use pcm3d::query::contact_manifolds::{
    contact_manifold_cuboid_convex_hull, ContactBuffer, ContactParams, ContactPoint, PcmConfig,
    PersistentContactManifold,
};
use pcm3d::shape::{ConvexHull, ConvexPrimitive, Cuboid, ScaledConvexHull};

#[test]
fn static_pair_does_not_recompute() {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull = ScaledConvexHull::unscaled(&hull);

    let pos1 = Isometry::translation(-3.0, 2.0, 1.0);
    let pos2 = pos1 * Isometry::translation(1.45, 0.2, 0.0);
    let params = ContactParams::default().with_contact_distance(0.01);
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();

    let mut first = ContactBuffer::new();
    assert!(contact_manifold_cuboid_convex_hull(
        &pos1,
        &cuboid,
        &pos2,
        &hull,
        &params,
        &config,
        &mut manifold,
        &mut first,
    ));
    let stats = *manifold.stats();
    assert_eq!(stats.gjk_calls, 1);

    let mut second = ContactBuffer::new();
    assert!(contact_manifold_cuboid_convex_hull(
        &pos1,
        &cuboid,
        &pos2,
        &hull,
        &params,
        &config,
        &mut manifold,
        &mut second,
    ));
    assert_eq!(manifold.stats().gjk_calls, stats.gjk_calls);
    assert_eq!(manifold.stats().epa_calls, stats.epa_calls);
    assert_eq!(manifold.stats().reused, stats.reused + 1);
    assert_eq!(first.len(), second.len());
    for (c1, c2) in first.contacts().iter().zip(second.contacts()) {
        assert_relative_eq!(c1.point, c2.point, epsilon = 1.0e-5);
        assert_relative_eq!(*c1.normal, *c2.normal, epsilon = 1.0e-5);
        assert_relative_eq!(c1.penetration, c2.penetration, epsilon = 1.0e-5);
    }
}

#[test]
fn static_separated_pair_does_not_recompute() {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull = ScaledConvexHull::unscaled(&hull);

    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(3.0, 0.0, 0.0);
    let params = ContactParams::default();
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();

    for _ in 0..3 {
        let mut buffer = ContactBuffer::new();
        assert!(!contact_manifold_cuboid_convex_hull(
            &pos1,
            &cuboid,
            &pos2,
            &hull,
            &params,
            &config,
            &mut manifold,
            &mut buffer,
        ));
    }

    assert_eq!(manifold.stats().gjk_calls, 1);
    assert_eq!(manifold.stats().reused, 2);
}

#[test]
fn refresh_after_rotation() {
    let ground = Cuboid::new(Vector::new(2.0, 0.5, 2.0));
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull = ScaledConvexHull::unscaled(&hull);
    let config = PcmConfig::default();
    let params = ContactParams::default().with_contact_distance(0.01);
    let prim1 = ConvexPrimitive::with_pcm_margin(ground, params.tolerance_length, &config);
    let prim2 = ConvexPrimitive::with_pcm_margin(hull, params.tolerance_length, &config);
    let min_margin = prim1.margin.min(prim2.margin);
    let threshold = min_margin * config.project_breaking_ratio;
    assert!(threshold > 0.03);

    // The hull rests on the ground, touching it along its bottom edge at z = 0.5.
    let pos12 = Isometry::translation(0.0, 1.0, 0.0);
    let n1 = Vector::y_axis();
    let mut manifold = PersistentContactManifold::new();
    manifold.set_relative_transform(&pos12);
    manifold.add_batch_manifold_contacts(&[
        ContactPoint::new(
            Point::new(0.5, 0.5, 0.5),
            Point::new(0.5, -0.5, 0.5),
            n1,
            0.0,
        ),
        ContactPoint::new(
            Point::new(-0.5, 0.5, 0.5),
            Point::new(-0.5, -0.5, 0.5),
            n1,
            0.0,
        ),
    ]);
    assert_eq!(manifold.len(), 2);

    // Rolling the hull slightly around its center keeps both ends of the edge.
    let mut small = manifold.clone();
    let pos12_small = pos12 * Isometry::rotation(Vector::z() * 0.01);
    assert!(!small.refresh(&pos12_small, params.contact_distance, threshold));
    assert_eq!(small.len(), 2);
    for pt in small.points() {
        assert!(pt.penetration.abs() < params.contact_distance);
    }

    // Rolling it further lifts the +x end past the contact distance, while the -x end sinks
    // without drifting past the threshold.
    let mut large = manifold.clone();
    let pos12_large = pos12 * Isometry::rotation(Vector::z() * 0.05);
    assert!(large.refresh(&pos12_large, params.contact_distance, threshold));
    assert_eq!(large.len(), 1);
    let kept = large.points()[0];
    assert_relative_eq!(kept.local_p1, Point::new(-0.5, 0.5, 0.5));
    let angle: Real = 0.05;
    let expected = 0.5 * angle.sin() - 0.5 * (1.0 - angle.cos());
    assert_relative_eq!(kept.penetration, expected, epsilon = 1.0e-4);

    // A rotation large enough to break the projection invalidates the relative position snapshot.
    let pos12_rolled = pos12 * Isometry::rotation(Vector::z() * 0.5);
    assert!(manifold.invalidate(&pos12_rolled, min_margin, &config));
    assert!(!manifold.invalidate(&pos12, min_margin, &config));
}

#[test]
fn manifold_never_exceeds_four_points() {
    let ground = Cuboid::new(Vector::new(5.0, 0.5, 5.0));
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull = ScaledConvexHull::unscaled(&hull);
    let params = ContactParams::default().with_contact_distance(0.02);
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();
    let mut rng = oorandom::Rand32::new(1234);
    let pos1 = Isometry::identity();

    // Rock the hull on the ground so that contacts keep being added and removed.
    for i in 0..200 {
        let tilt = (i as f32 * 0.1).sin() * 0.05 + (rng.rand_float() - 0.5) * 0.01;
        let pos2 = Isometry::new(
            Vector::new(0.0, 0.99, 0.0),
            Vector::new(tilt as _, 0.0, (tilt * 0.5) as _),
        );
        let mut buffer = ContactBuffer::new();
        let _ = contact_manifold_cuboid_convex_hull(
            &pos1,
            &ground,
            &pos2,
            &hull,
            &params,
            &config,
            &mut manifold,
            &mut buffer,
        );

        assert!(manifold.len() <= 4);
        assert!(buffer.len() <= 4);
        for contact in buffer.contacts() {
            assert_relative_eq!(contact.normal.norm(), 1.0, epsilon = 1.0e-4);
        }
    }
}
