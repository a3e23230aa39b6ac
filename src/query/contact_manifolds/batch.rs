use crate::math::{Isometry, Real};
use crate::query::contact_manifolds::{
    contact_manifold_convex_convex, ContactBuffer, ContactParams, PcmConfig,
    PersistentContactManifold,
};
use crate::shape::ConvexShape;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A pair of shapes, with the contact state owned by that pair.
#[derive(Clone, Debug)]
pub struct ContactPair<'a> {
    /// The world-space position of the first shape.
    pub pos1: Isometry<Real>,
    /// The first shape.
    pub shape1: ConvexShape<'a>,
    /// The world-space position of the second shape.
    pub pos2: Isometry<Real>,
    /// The second shape.
    pub shape2: ConvexShape<'a>,
    /// The contacts cached from one step to the next.
    pub manifold: PersistentContactManifold,
    /// The contacts written by the last call to [`compute_contact_pairs`].
    pub buffer: ContactBuffer,
    /// Did the last call to [`compute_contact_pairs`] write any contact?
    pub has_contacts: bool,
}

impl<'a> ContactPair<'a> {
    /// Creates a pair with an empty manifold.
    pub fn new(
        pos1: Isometry<Real>,
        shape1: impl Into<ConvexShape<'a>>,
        pos2: Isometry<Real>,
        shape2: impl Into<ConvexShape<'a>>,
    ) -> Self {
        Self {
            pos1,
            shape1: shape1.into(),
            pos2,
            shape2: shape2.into(),
            manifold: PersistentContactManifold::new(),
            buffer: ContactBuffer::new(),
            has_contacts: false,
        }
    }

    /// Clears the buffer of this pair, then writes its new contacts into it.
    pub fn update(&mut self, params: &ContactParams, config: &PcmConfig) -> bool {
        self.buffer.clear();
        self.has_contacts = contact_manifold_convex_convex(
            &self.pos1,
            &self.shape1,
            &self.pos2,
            &self.shape2,
            params,
            config,
            &mut self.manifold,
            &mut self.buffer,
        );
        self.has_contacts
    }
}

/// Updates the contacts of every pair.
///
/// Pairs are independent: with the `parallel` feature they are processed on the `rayon` thread
/// pool. Returns the number of pairs in contact.
pub fn compute_contact_pairs(
    pairs: &mut [ContactPair],
    params: &ContactParams,
    config: &PcmConfig,
) -> usize {
    #[cfg(not(feature = "parallel"))]
    {
        pairs
            .iter_mut()
            .map(|pair| pair.update(params, config) as usize)
            .sum()
    }

    #[cfg(feature = "parallel")]
    {
        pairs
            .par_iter_mut()
            .map(|pair| pair.update(params, config) as usize)
            .sum()
    }
}
