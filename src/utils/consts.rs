use crate::math::Real;

pub(crate) const COS_45_DEGREES: Real = 0.707106781;
