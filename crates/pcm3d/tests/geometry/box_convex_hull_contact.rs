use approx::assert_relative_eq;
use pcm3d::math::{Isometry, Point, Real, Vector};
use pcm3d::query::contact_manifolds::{
    contact_manifold_cuboid_convex_hull, ContactBuffer, ContactParams, PcmConfig,
    PersistentContactManifold,
};
use pcm3d::shape::{ConvexHull, Cuboid, MeshScale, ScaledConvexHull};

#[test]
fn box_touching_unit_cube_hull() {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull = ScaledConvexHull::unscaled(&hull);

    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(1.5, 0.0, 0.0);
    let params = ContactParams::default().with_contact_distance(0.01);
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();
    let mut buffer = ContactBuffer::new();

    assert!(contact_manifold_cuboid_convex_hull(
        &pos1,
        &cuboid,
        &pos2,
        &hull,
        &params,
        &config,
        &mut manifold,
        &mut buffer,
    ));

    assert_eq!(buffer.len(), 1);
    let contact = buffer.contacts()[0];
    assert_relative_eq!(contact.point.x, 1.0, epsilon = 1.0e-3);
    assert_relative_eq!(*contact.normal, Vector::x(), epsilon = 1.0e-3);
    assert_relative_eq!(contact.penetration, 0.0, epsilon = 1.0e-3);
}

#[test]
fn separated_box_and_hull_have_no_contact() {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull = ScaledConvexHull::unscaled(&hull);

    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(1.6, 0.3, -0.2);
    let params = ContactParams::default().with_contact_distance(0.05);
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();
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
    assert!(buffer.is_empty());
    assert!(manifold.is_empty());
}

#[test]
fn emitted_normals_are_unit() {
    let cuboid = Cuboid::new(Vector::new(1.0, 0.5, 0.75));
    let hull = ConvexHull::cuboid(&Vector::new(0.5, 0.5, 0.5)).unwrap();
    let hull = ScaledConvexHull::unscaled(&hull);
    let params = ContactParams::default().with_contact_distance(0.02);
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();
    let mut rng = oorandom::Rand32::new(42);

    for _ in 0..100 {
        let translation = Vector::new(
            rng.rand_float() * 2.0 - 1.0,
            rng.rand_float() * 2.0 - 1.0,
            rng.rand_float() * 2.0 - 1.0,
        ) * 1.6;
        let axisangle = Vector::new(rng.rand_float(), rng.rand_float(), rng.rand_float());
        let pos1 = Isometry::identity();
        let pos2 = Isometry::new(translation.cast::<Real>(), axisangle.cast::<Real>());
        let mut buffer = ContactBuffer::new();

        let _ = contact_manifold_cuboid_convex_hull(
            &pos1,
            &cuboid,
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
            assert!(contact.point.iter().all(|x| x.is_finite()));
            assert!(contact.penetration >= -params.contact_distance);
        }
    }
}

fn octahedron() -> ConvexHull {
    let points = vec![
        Point::new(1.0, 0.0, 0.0),
        Point::new(-1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, -1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 0.0, -1.0),
    ];
    ConvexHull::new(
        points,
        [
            [0, 2, 4],
            [0, 4, 3],
            [0, 3, 5],
            [0, 5, 2],
            [1, 4, 2],
            [1, 3, 4],
            [1, 5, 3],
            [1, 2, 5],
        ],
    )
    .unwrap()
}

// Pushes the `-x` tip of `hull`, located at `tip` from its center, `depth` deep into the `+x`
// face of a unit box.
fn tip_in_box_face(hull: &ScaledConvexHull, tip: Real, depth: Real) -> ContactBuffer {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(1.0 + tip - depth, 0.0, 0.0);
    let params = ContactParams::default().with_contact_distance(0.01);
    let config = PcmConfig::default();
    let mut manifold = PersistentContactManifold::new();
    let mut buffer = ContactBuffer::new();

    assert!(
        contact_manifold_cuboid_convex_hull(
            &pos1,
            &cuboid,
            &pos2,
            hull,
            &params,
            &config,
            &mut manifold,
            &mut buffer,
        ),
        "no contact at depth {}",
        depth
    );

    for contact in buffer.contacts() {
        assert_relative_eq!(*contact.normal, Vector::x(), epsilon = 1.0e-2);
        assert!(contact.penetration >= -params.contact_distance);
        assert!(contact.penetration <= depth + 1.0e-3);
    }

    buffer
}

#[test]
fn sharp_hull_tip_touching_box_face() {
    let hull = octahedron();
    let hull = ScaledConvexHull::unscaled(&hull);

    let buffer = tip_in_box_face(&hull, 1.0, 0.05);
    assert_eq!(buffer.len(), 1);
    let contact = buffer.contacts()[0];
    assert_relative_eq!(contact.penetration, 0.05, epsilon = 1.0e-3);
    assert_relative_eq!(contact.point, Point::new(0.95, 0.0, 0.0), epsilon = 1.0e-3);
}

#[test]
fn flattened_hull_tip_touching_box_face() {
    let hull = octahedron();
    let scale = MeshScale::from_scale(Vector::new(2.0, 0.5, 1.0)).unwrap();
    let hull = ScaledConvexHull::new(&hull, scale);

    for depth in [0.05, 0.1, 0.2, 0.3] {
        let buffer = tip_in_box_face(&hull, 2.0, depth);
        assert!(!buffer.is_empty());
    }

    let buffer = tip_in_box_face(&hull, 2.0, 0.05);
    assert_relative_eq!(buffer.contacts()[0].penetration, 0.05, epsilon = 1.0e-3);
}

#[test]
fn flattened_hull_tip_away_from_box_face() {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let hull = octahedron();
    let scale = MeshScale::from_scale(Vector::new(2.0, 0.5, 1.0)).unwrap();
    let hull = ScaledConvexHull::new(&hull, scale);
    let params = ContactParams::default().with_contact_distance(0.01);
    let config = PcmConfig::default();

    for gap in [0.02, 0.05, 0.2] {
        let pos2 = Isometry::translation(3.0 + gap, 0.0, 0.0);
        let mut manifold = PersistentContactManifold::new();
        let mut buffer = ContactBuffer::new();

        assert!(!contact_manifold_cuboid_convex_hull(
            &Isometry::identity(),
            &cuboid,
            &pos2,
            &hull,
            &params,
            &config,
            &mut manifold,
            &mut buffer,
        ));
        assert!(buffer.is_empty());
    }
}
