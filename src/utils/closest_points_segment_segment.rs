use crate::math::{Point, Real};

/// Closest points between the segments `[a0, a1]` and `[b0, b1]`.
///
/// Returns the parameters `(s, t)` of the closest points along each segment,
/// both clamped to `[0, 1]`.
pub fn closest_points_segment_segment_parameters(
    a0: &Point<Real>,
    a1: &Point<Real>,
    b0: &Point<Real>,
    b1: &Point<Real>,
) -> (Real, Real) {
    // Inspired by Real-time collision detection by Christer Ericson.
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;

    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let _eps = crate::math::DEFAULT_EPSILON;

    if a <= _eps && e <= _eps {
        return (0.0, 0.0);
    }

    if a <= _eps {
        return (0.0, na::clamp(f / e, 0.0, 1.0));
    }

    let c = d1.dot(&r);

    if e <= _eps {
        return (na::clamp(-c / a, 0.0, 1.0), 0.0);
    }

    let b = d1.dot(&d2);
    let ae = a * e;
    let bb = b * b;
    let denom = ae - bb;

    // Use absolute and ulps error to test collinearity.
    let mut s = if denom > _eps && !ulps_eq!(ae, bb) {
        na::clamp((b * f - c * e) / denom, 0.0, 1.0)
    } else {
        0.0
    };

    let mut t = (b * s + f) / e;

    if t < 0.0 {
        t = 0.0;
        s = na::clamp(-c / a, 0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = na::clamp((b - c) / a, 0.0, 1.0);
    }

    (s, t)
}

/// Closest points between the segments `[a0, a1]` and `[b0, b1]`.
pub fn closest_points_segment_segment(
    a0: &Point<Real>,
    a1: &Point<Real>,
    b0: &Point<Real>,
    b1: &Point<Real>,
) -> (Point<Real>, Point<Real>) {
    let (s, t) = closest_points_segment_segment_parameters(a0, a1, b0, b1);
    (a0 + (a1 - a0) * s, b0 + (b1 - b0) * t)
}
