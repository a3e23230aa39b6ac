//! Various unsorted geometrical and logical operators.

pub use self::ccw_face_normal::{ccw_face_normal, ccw_polygon_normal};
pub use self::closest_points_segment_segment::{
    closest_points_segment_segment, closest_points_segment_segment_parameters,
};
pub use self::point_cloud_support_point::point_cloud_support_point_id;
pub use self::wops::{box_corner, sign_mask, WBasis, WSign};

pub(crate) use self::consts::*;

mod ccw_face_normal;
mod closest_points_segment_segment;
mod consts;
mod point_cloud_support_point;
mod wops;
