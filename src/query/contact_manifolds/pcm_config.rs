use crate::math::Real;
use crate::query::contact_manifolds::MAX_MANIFOLD_POINTS;

/// Tunable thresholds of the persistent contact manifold generators.
///
/// Most values are ratios of a margin: the margins themselves scale with the size of the shapes
/// and with [`ContactParams::tolerance_length`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PcmConfig {
    /// The margin of a box, as a fraction of its smallest half-extent.
    pub box_margin_ratio: Real,
    /// The margin of a convex hull, as a fraction of the smallest distance from its center of
    /// mass to its faces.
    pub hull_margin_ratio: Real,
    /// The largest distance between a hull vertex and its shrunk counterpart, as a multiple of
    /// the hull margin.
    pub hull_max_margin_ratio: Real,
    /// The upper bound of every margin, as a fraction of the tolerance length.
    pub tolerance_margin_ratio: Real,
    /// A cached contact drifting laterally by more than this fraction of the smallest margin is
    /// dropped.
    pub project_breaking_ratio: Real,
    /// A new contact closer than this fraction of the smallest margin to a cached contact
    /// replaces it.
    pub replace_breaking_ratio: Real,
    /// The relative translation, as a fraction of the smallest margin, beyond which the cached
    /// contacts are recomputed. Indexed by the number of cached contacts.
    pub invalidation_translation_ratios: [Real; MAX_MANIFOLD_POINTS + 1],
    /// The relative rotation beyond which the cached contacts are recomputed, as a threshold on
    /// the absolute dot product of the two quaternions.
    pub invalidation_rotation_dot: Real,
    /// A new contact normal making a larger angle than this (as a cosine) with the cached
    /// normal triggers a full manifold regeneration.
    pub normal_distrust_dot: Real,
    /// If `true`, the first contact found between two shapes triggers a full manifold
    /// regeneration instead of being cached alone.
    ///
    /// An empty manifold has no cached normal to compare the new one against. With `true`, that
    /// missing normal counts as a distrusted one, so every first contact goes through a full
    /// regeneration. The default `false` caches a first GJK/EPA contact as a single point and
    /// lets later steps add more.
    pub regenerate_on_new_contact: bool,
}

impl Default for PcmConfig {
    fn default() -> Self {
        Self {
            box_margin_ratio: 0.15,
            hull_margin_ratio: 0.25,
            hull_max_margin_ratio: 2.0,
            tolerance_margin_ratio: 0.1,
            project_breaking_ratio: 0.8,
            replace_breaking_ratio: 0.05,
            invalidation_translation_ratios: [0.5, 0.125, 0.25, 0.375, 0.375],
            invalidation_rotation_dot: 0.9998,
            normal_distrust_dot: crate::utils::COS_45_DEGREES,
            regenerate_on_new_contact: false,
        }
    }
}

impl PcmConfig {
    /// Sets the box and convex hull margin ratios.
    pub fn with_margin_ratios(mut self, box_ratio: Real, hull_ratio: Real) -> Self {
        self.box_margin_ratio = box_ratio;
        self.hull_margin_ratio = hull_ratio;
        self
    }

    /// Sets the largest displacement of a shrunk hull vertex, as a multiple of the hull margin.
    pub fn with_hull_max_margin_ratio(mut self, ratio: Real) -> Self {
        self.hull_max_margin_ratio = ratio;
        self
    }

    /// Sets the breaking thresholds of the cached contacts.
    pub fn with_breaking_ratios(mut self, project: Real, replace: Real) -> Self {
        self.project_breaking_ratio = project;
        self.replace_breaking_ratio = replace;
        self
    }

    /// Sets the relative motion thresholds above which the cache is recomputed.
    pub fn with_invalidation(
        mut self,
        translation_ratios: [Real; MAX_MANIFOLD_POINTS + 1],
        rotation_dot: Real,
    ) -> Self {
        self.invalidation_translation_ratios = translation_ratios;
        self.invalidation_rotation_dot = rotation_dot;
        self
    }

    /// Sets the normal deviation (as a cosine) above which the manifold is regenerated.
    pub fn with_normal_distrust_dot(mut self, dot: Real) -> Self {
        self.normal_distrust_dot = dot;
        self
    }

    /// Sets whether a first contact regenerates the whole manifold.
    pub fn with_regenerate_on_new_contact(mut self, regenerate: bool) -> Self {
        self.regenerate_on_new_contact = regenerate;
        self
    }
}

/// Per-query contact parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactParams {
    /// Contacts separated by at most this distance are still reported.
    pub contact_distance: Real,
    /// The typical length of the simulated objects, bounding the shape margins.
    pub tolerance_length: Real,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            contact_distance: 0.0,
            tolerance_length: 1.0,
        }
    }
}

impl ContactParams {
    /// Creates new contact parameters.
    pub fn new(contact_distance: Real, tolerance_length: Real) -> Self {
        Self {
            contact_distance,
            tolerance_length,
        }
    }

    /// Sets the contact distance.
    pub fn with_contact_distance(mut self, contact_distance: Real) -> Self {
        self.contact_distance = contact_distance;
        self
    }

    /// Sets the tolerance length.
    pub fn with_tolerance_length(mut self, tolerance_length: Real) -> Self {
        self.tolerance_length = tolerance_length;
        self
    }
}
