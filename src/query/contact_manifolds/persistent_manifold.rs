use crate::math::{Isometry, Real, UnitVector, DEFAULT_EPSILON};
use crate::query::contact_manifolds::{
    contact_reduction, full_manifold, Contact, ContactBuffer, ContactParams, ContactPoint,
    PcmConfig, MAX_BUFFERED_CONTACTS,
};
use crate::query::epa::{EpaResult, EPA};
use crate::query::gjk::{self, GjkResult, VoronoiSimplex, WarmStart};
use crate::shape::{ConvexPrimitive, ConvexShape};
use arrayvec::ArrayVec;
#[cfg(not(feature = "std"))]
use na::ComplexField; // for .abs()

/// The maximum number of contacts cached by a [`PersistentContactManifold`].
pub const MAX_MANIFOLD_POINTS: usize = 4;

static_assertions::const_assert!(MAX_MANIFOLD_POINTS <= MAX_BUFFERED_CONTACTS);
static_assertions::assert_impl_all!(PersistentContactManifold: Send, Sync);

/// Counters of the work done by a [`PersistentContactManifold`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ManifoldStats {
    /// The number of GJK runs.
    pub gjk_calls: u32,
    /// The number of EPA runs.
    pub epa_calls: u32,
    /// The number of full manifold regenerations.
    pub full_regenerations: u32,
    /// The number of updates that reused the cached contacts as-is.
    pub reused: u32,
}

/// The outcome of [`PersistentContactManifold::update`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ManifoldUpdate {
    /// The shapes are not in contact.
    NoContact,
    /// The cached contacts are still valid and were refreshed in-place.
    Reused {
        /// The normal to emit the contacts with, in the local-space of the first shape.
        normal1: UnitVector<Real>,
    },
    /// A new contact was merged into the cached ones.
    Merged {
        /// The normal to emit the contacts with, in the local-space of the first shape.
        normal1: UnitVector<Real>,
    },
    /// The cached contacts cannot be trusted: the manifold must be rebuilt from scratch.
    NeedsFullRegeneration {
        /// Whether the separating-axis overlap test must decide the contact normal.
        overlap_test: bool,
        /// The contact found by GJK or EPA, if any.
        fallback: Option<ContactPoint>,
    },
}

/// A set of at most [`MAX_MANIFOLD_POINTS`] contacts between two convex shapes, kept from one
/// simulation step to the next.
///
/// The relative position of the shapes at the last recomputation is recorded together with the
/// contacts. As long as the shapes barely move relative to that position, the cached contacts are
/// only re-projected instead of being recomputed.
#[derive(Clone, Debug, Default)]
pub struct PersistentContactManifold {
    points: ArrayVec<ContactPoint, MAX_MANIFOLD_POINTS>,
    relative_transform: Option<Isometry<Real>>,
    warm_start: WarmStart,
    stats: ManifoldStats,
}

impl PersistentContactManifold {
    /// Creates an empty manifold.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached contacts.
    #[inline]
    pub fn points(&self) -> &[ContactPoint] {
        &self.points
    }

    /// The number of cached contacts.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Does this manifold contain no contact?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The relative position of the shapes at the last recomputation.
    #[inline]
    pub fn relative_transform(&self) -> Option<&Isometry<Real>> {
        self.relative_transform.as_ref()
    }

    /// The vertex ids used to warm-start the next GJK run.
    #[inline]
    pub fn warm_start(&self) -> &WarmStart {
        &self.warm_start
    }

    /// Counters of the work done by this manifold.
    #[inline]
    pub fn stats(&self) -> &ManifoldStats {
        &self.stats
    }

    /// Resets the work counters.
    pub fn reset_stats(&mut self) {
        self.stats = ManifoldStats::default();
    }

    /// Forgets everything: the next update recomputes the contacts from scratch.
    pub fn clear(&mut self) {
        self.points.clear();
        self.relative_transform = None;
        self.warm_start.clear();
    }

    /// The normal of the cached contacts, in the local-space of the first shape.
    #[inline]
    pub fn local_normal(&self) -> Option<UnitVector<Real>> {
        self.points.first().map(|pt| pt.local_n1)
    }

    /// Records `pos12` as the relative position the cached contacts were computed at.
    #[inline]
    pub fn set_relative_transform(&mut self, pos12: &Isometry<Real>) {
        self.relative_transform = Some(*pos12);
    }

    /// Re-projects the cached contacts for the new relative position `pos12`.
    ///
    /// A contact is dropped if its separation exceeds `contact_distance`, or if its points drifted
    /// apart, orthogonally to the normal, by more than `project_breaking_threshold`.
    /// Returns `true` if at least one contact was dropped.
    pub fn refresh(
        &mut self,
        pos12: &Isometry<Real>,
        contact_distance: Real,
        project_breaking_threshold: Real,
    ) -> bool {
        let initial_len = self.points.len();
        let sq_threshold = project_breaking_threshold * project_breaking_threshold;

        self.points.retain(|pt| {
            let p2 = pos12 * pt.local_p2;
            let sep = pt.separation(pos12);
            let projected = pt.local_p1 + *pt.local_n1 * sep;
            let sq_drift = (p2 - projected).norm_squared();

            if sep > contact_distance || sq_drift > sq_threshold {
                false
            } else {
                pt.penetration = -sep;
                true
            }
        });

        if self.points.len() != initial_len {
            log::trace!(
                "Refresh dropped {} of {} contacts.",
                initial_len - self.points.len(),
                initial_len
            );
            true
        } else {
            false
        }
    }

    /// Does the relative motion since the last recomputation require recomputing the contacts?
    ///
    /// The translation threshold grows with the number of cached contacts, as a fraction of
    /// `min_margin`.
    pub fn invalidate(&self, pos12: &Isometry<Real>, min_margin: Real, config: &PcmConfig) -> bool {
        let prev = match &self.relative_transform {
            Some(prev) => prev,
            None => return true,
        };

        let ratio = config.invalidation_translation_ratios[self.points.len()];
        let translation = (pos12.translation.vector - prev.translation.vector).norm();

        if translation > min_margin * ratio {
            return true;
        }

        let rot_dot = pos12.rotation.coords.dot(&prev.rotation.coords).abs();
        rot_dot < config.invalidation_rotation_dot
    }

    /// Adds a contact to this manifold.
    ///
    /// The new contact replaces any cached contact closer than `replace_breaking_threshold` on
    /// either shape. If the manifold overflows, it is reduced with
    /// [`contact_reduction::reduce_contacts`].
    pub fn add_manifold_point(&mut self, point: ContactPoint, replace_breaking_threshold: Real) {
        debug_assert!(point.is_valid());
        let sq_threshold = replace_breaking_threshold * replace_breaking_threshold;

        for pt in &mut self.points {
            if (pt.local_p1 - point.local_p1).norm_squared() < sq_threshold
                || (pt.local_p2 - point.local_p2).norm_squared() < sq_threshold
            {
                *pt = point;
                return;
            }
        }

        if let Err(overflow) = self.points.try_push(point) {
            let mut candidates: ArrayVec<ContactPoint, { MAX_MANIFOLD_POINTS + 1 }> =
                self.points.iter().copied().collect();
            candidates.push(overflow.element());
            self.points = contact_reduction::reduce_contacts(&candidates);
        }
    }

    /// Replaces the cached contacts by `candidates`, reduced to at most [`MAX_MANIFOLD_POINTS`].
    pub fn add_batch_manifold_contacts(&mut self, candidates: &[ContactPoint]) {
        self.points = contact_reduction::reduce_contacts(candidates);
    }

    /// Rebuilds this manifold from scratch with [`full_manifold::generate_full_manifold`].
    ///
    /// Returns the normal of the new contacts, in the local-space of the first shape, or `None` if
    /// the shapes are not in contact. If no new contact is found, the cached contacts are kept.
    pub fn regenerate(
        &mut self,
        pos12: &Isometry<Real>,
        shape1: &ConvexShape,
        shape2: &ConvexShape,
        overlap_test: bool,
        fallback: Option<&ContactPoint>,
        contact_distance: Real,
    ) -> Option<UnitVector<Real>> {
        self.stats.full_regenerations += 1;
        self.set_relative_transform(pos12);

        let (normal1, candidates) = match full_manifold::generate_full_manifold(
            pos12,
            shape1,
            shape2,
            overlap_test,
            fallback,
            contact_distance,
        ) {
            Some(res) => res,
            None => {
                self.points.clear();
                return None;
            }
        };

        if candidates.is_empty() {
            log::trace!("The full manifold generation found no contact, keeping the cache.");
            return self.local_normal();
        }

        log::trace!("Regenerated the manifold with {} candidates.", candidates.len());
        self.add_batch_manifold_contacts(&candidates);
        Some(normal1)
    }

    /// Writes the cached contacts into `buffer`, in world-space.
    ///
    /// Only contacts with a penetration of at least `-contact_distance` are written. Each contact
    /// is located on the second shape and uses the normal `normal1`, given in the local-space of
    /// the first shape. Returns the number of contacts written.
    pub fn emit(
        &self,
        pos1: &Isometry<Real>,
        pos2: &Isometry<Real>,
        normal1: &UnitVector<Real>,
        contact_distance: Real,
        buffer: &mut ContactBuffer,
    ) -> usize {
        let normal = pos1 * *normal1;

        if !normal.iter().all(|x| x.is_finite())
            || !relative_eq!(normal.norm_squared(), 1.0, epsilon = 1.0e-3)
        {
            log::debug!("Rejected the contacts with an invalid normal {:?}.", normal);
            return 0;
        }

        let mut num_written = 0;

        for pt in &self.points {
            if pt.penetration < -contact_distance {
                continue;
            }

            let contact = Contact {
                point: pos2 * pt.local_p2,
                normal,
                penetration: pt.penetration,
            };

            if !contact.point.iter().all(|x| x.is_finite()) || !contact.penetration.is_finite() {
                log::debug!("Rejected a non-finite contact {:?}.", contact);
                continue;
            }

            if !buffer.push(contact) {
                break;
            }

            num_written += 1;
        }

        num_written
    }

    /// Refreshes the cached contacts and, if needed, recomputes them with GJK and EPA.
    ///
    /// `pos12` is the position of the second shape relative to the first one. This does not
    /// perform any full regeneration itself: it returns [`ManifoldUpdate::NeedsFullRegeneration`]
    /// instead.
    pub fn update(
        &mut self,
        pos12: &Isometry<Real>,
        prim1: &ConvexPrimitive,
        prim2: &ConvexPrimitive,
        params: &ContactParams,
        config: &PcmConfig,
    ) -> ManifoldUpdate {
        let min_margin = prim1.margin.min(prim2.margin);
        let project_breaking_threshold = min_margin * config.project_breaking_ratio;
        let replace_breaking_threshold = min_margin * config.replace_breaking_ratio;

        let initial_len = self.points.len();
        let lost_contacts = self.refresh(pos12, params.contact_distance, project_breaking_threshold);

        if !lost_contacts && !self.invalidate(pos12, min_margin, config) {
            self.stats.reused += 1;
            return match self.local_normal() {
                Some(normal1) => ManifoldUpdate::Reused { normal1 },
                None => ManifoldUpdate::NoContact,
            };
        }

        let prev_normal = self.local_normal();
        let mut simplex = VoronoiSimplex::new();

        self.stats.gjk_calls += 1;
        let gjk_result = gjk::penetration_gjk(
            pos12,
            &prim1.shrunk(),
            &prim2.shrunk(),
            prim1.margin,
            prim2.margin,
            params.contact_distance,
            &mut self.warm_start,
            &mut simplex,
        );
        self.set_relative_transform(pos12);

        let new_point = match gjk_result {
            GjkResult::NonIntersect => {
                log::trace!("GJK found no contact.");
                return ManifoldUpdate::NoContact;
            }
            GjkResult::Degenerate => {
                return ManifoldUpdate::NeedsFullRegeneration {
                    overlap_test: true,
                    fallback: None,
                };
            }
            GjkResult::Contact {
                point1,
                point2,
                normal1,
                penetration,
            } => ContactPoint::new(
                point1,
                pos12.inverse_transform_point(&point2),
                normal1,
                penetration,
            ),
            GjkResult::Penetrating => {
                self.stats.epa_calls += 1;
                match EPA::new().penetration(pos12, prim1, prim2, &simplex) {
                    EpaResult::Contact {
                        point1,
                        point2,
                        normal1,
                        depth,
                    } => ContactPoint::new(
                        point1,
                        pos12.inverse_transform_point(&point2),
                        normal1,
                        depth,
                    ),
                    res => {
                        log::debug!(
                            "EPA failed ({:?}), falling back to a full regeneration.",
                            res.status()
                        );
                        return ManifoldUpdate::NeedsFullRegeneration {
                            overlap_test: true,
                            fallback: None,
                        };
                    }
                }
            }
        };

        if !new_point.is_valid() {
            log::debug!("Rejected an invalid contact {:?}.", new_point);
            return ManifoldUpdate::NeedsFullRegeneration {
                overlap_test: true,
                fallback: None,
            };
        }

        self.add_manifold_point(new_point, replace_breaking_threshold);

        let new_normal = new_point.local_n1;
        let regenerate = match prev_normal {
            Some(prev) => {
                prev.dot(&new_normal) < config.normal_distrust_dot
                    || self.points.len() < initial_len
            }
            None => config.regenerate_on_new_contact,
        };

        if regenerate {
            log::trace!("The new contact normal cannot be trusted, regenerating the manifold.");
            return ManifoldUpdate::NeedsFullRegeneration {
                overlap_test: false,
                fallback: Some(new_point),
            };
        }

        let normal1 = match prev_normal {
            Some(prev) => {
                UnitVector::try_new(prev.into_inner() + new_normal.into_inner(), DEFAULT_EPSILON)
                    .unwrap_or(new_normal)
            }
            None => new_normal,
        };

        ManifoldUpdate::Merged { normal1 }
    }
}
