//! Contact data reported by the physics backend.
//!
//! Contacts are transient: the backend clears and refills the [`Contacts`]
//! component of every character once per simulation step, before the
//! velocity update runs. Nothing in the controller keeps a contact around
//! for longer than the step that produced it.

use bevy::prelude::*;

/// Which shape of a contact pair the character is.
///
/// Physics engines report a single normal per pair, pointing from the first
/// shape toward the second. The side tells the controller whether the
/// reported normal must be flipped to be seen from the character.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactSide {
    /// The character is the first shape; the normal points away from it.
    #[default]
    First,
    /// The character is the second shape; the normal points into it.
    Second,
}

/// A single touching pair as seen by the physics engine this step.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactData {
    /// Contact normal, pointing from the first shape toward the second.
    pub normal: Vec2,
    /// Which side of the pair the character is on.
    pub side: ContactSide,
}

impl ContactData {
    /// Create a contact record.
    pub fn new(normal: Vec2, side: ContactSide) -> Self {
        Self { normal, side }
    }

    /// Surface normal pointing away from the touched surface into the character.
    #[inline]
    pub fn normal_from_body(&self) -> Vec2 {
        match self.side {
            ContactSide::First => -self.normal,
            ContactSide::Second => self.normal,
        }
    }
}

/// Contacts touching a character during the current simulation step.
///
/// The buffer keeps its allocation between steps, so refilling it in the
/// step does not allocate once the contact count has stabilised.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct Contacts {
    contacts: Vec<ContactData>,
}

impl Contacts {
    /// Drop every contact from the previous step.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Record a contact for the current step.
    pub fn push(&mut self, contact: ContactData) {
        self.contacts.push(contact);
    }

    /// Iterate the contacts of the current step.
    pub fn iter(&self) -> impl Iterator<Item = &ContactData> {
        self.contacts.iter()
    }

    /// Number of contacts captured this step.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether the character touched nothing this step.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl<'a> IntoIterator for &'a Contacts {
    type Item = &'a ContactData;
    type IntoIter = std::slice::Iter<'a, ContactData>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.iter()
    }
}
