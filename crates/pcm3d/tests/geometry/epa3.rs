use approx::assert_relative_eq;
use pcm3d::math::{Isometry, Real, Vector};
use pcm3d::query::epa::{EpaResult, EPA};
use pcm3d::query::gjk::{self, GjkStatus, VoronoiSimplex, WarmStart};
use pcm3d::shape::{ConvexPrimitive, Cuboid};

fn epa_between_cuboids(pos12: &Isometry<Real>) -> EpaResult {
    let c = ConvexPrimitive::new(Cuboid::new(Vector::new(2.0, 1.0, 1.0)), 0.1);
    let mut simplex = VoronoiSimplex::new();
    let status = gjk::penetration_gjk(
        pos12,
        &c.shrunk(),
        &c.shrunk(),
        c.margin,
        c.margin,
        0.0,
        &mut WarmStart::new(),
        &mut simplex,
    )
    .status();
    assert_eq!(status, GjkStatus::Penetrating);

    EPA::new().penetration(pos12, &c, &c, &simplex)
}

#[test]
#[allow(non_snake_case)]
fn cuboid_cuboid_EPA() {
    match epa_between_cuboids(&Isometry::translation(3.5, 0.0, 0.0)) {
        EpaResult::Contact { normal1, depth, .. } => {
            assert_relative_eq!(depth, 0.5, epsilon = 1.0e-4);
            assert_relative_eq!(*normal1, Vector::x(), epsilon = 1.0e-4);
        }
        res => panic!("Penetration not found: {:?}", res),
    }

    match epa_between_cuboids(&Isometry::translation(0.0, 0.2, 0.0)) {
        EpaResult::Contact {
            point1,
            point2,
            normal1,
            depth,
        } => {
            assert_relative_eq!(depth, 1.8, epsilon = 1.0e-4);
            assert_relative_eq!(*normal1, Vector::y(), epsilon = 1.0e-4);
            assert_relative_eq!(point1.y, 1.0, epsilon = 1.0e-4);
            assert_relative_eq!(point2.y, -0.8, epsilon = 1.0e-4);
        }
        res => panic!("Penetration not found: {:?}", res),
    }
}
