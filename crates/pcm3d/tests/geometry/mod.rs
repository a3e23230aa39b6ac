mod batch;
mod box_box_contact;
mod box_convex_hull_contact;
mod convex_hull_convex_hull_contact;
mod epa3;
mod persistent_manifold;
