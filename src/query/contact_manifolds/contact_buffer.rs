use crate::math::{Point, Real, UnitVector};
use arrayvec::ArrayVec;

/// The maximum number of contacts a [`ContactBuffer`] can hold.
pub const MAX_BUFFERED_CONTACTS: usize = 64;

/// A contact, expressed in world-space, as consumed by a constraint solver.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contact {
    /// The contact point, located on the surface of the second shape.
    pub point: Point<Real>,
    /// The contact normal, pointing from the first shape toward the second shape.
    pub normal: UnitVector<Real>,
    /// The penetration depth. Negative if the shapes are separated.
    pub penetration: Real,
}

/// A bounded, append-only, list of world-space contacts.
#[derive(Clone, Debug, Default)]
pub struct ContactBuffer {
    contacts: ArrayVec<Contact, MAX_BUFFERED_CONTACTS>,
}

impl ContactBuffer {
    /// Creates an empty contact buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a contact.
    ///
    /// Returns `false`, and drops the contact, if the buffer is full.
    #[inline]
    pub fn push(&mut self, contact: Contact) -> bool {
        self.contacts.try_push(contact).is_ok()
    }

    /// Removes every contact.
    #[inline]
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// The contacts written so far.
    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// The number of contacts written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Is this buffer empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Is this buffer full?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.contacts.is_full()
    }
}
