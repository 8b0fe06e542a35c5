//! Ground detection from contact data.
//!
//! The grounded state is derived from the contacts touching the character
//! in the current physics step. It must be recomputed every step: a ground
//! state cached from an earlier step is one step stale and breaks jump
//! timing.

use bevy::prelude::*;

use crate::collision::ContactData;

/// Ground state derived from a single simulation step's contacts.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundState {
    /// Whether the best contact normal points upward.
    pub grounded: bool,
    /// The contact normal (seen from the character) with the largest
    /// vertical component, or zero when nothing is touching.
    pub normal: Vec2,
}

impl GroundState {
    /// Derive the ground state from the contacts touching the character.
    ///
    /// The normal with the largest `y` wins; among equal candidates the
    /// first one seen is kept. The normal is only used for the grounded flag
    /// and boost revocation, never for slope response, so the tie-break
    /// does not matter.
    pub fn from_contacts<'a>(contacts: impl IntoIterator<Item = &'a ContactData>) -> Self {
        let best = contacts
            .into_iter()
            .map(ContactData::normal_from_body)
            .fold(None, |best: Option<Vec2>, normal| match best {
                Some(current) if current.y >= normal.y => Some(current),
                _ => Some(normal),
            });

        match best {
            Some(normal) => Self {
                grounded: normal.y > 0.0,
                normal,
            },
            None => Self::airborne(),
        }
    }

    /// State with no contacts at all.
    pub fn airborne() -> Self {
        Self {
            grounded: false,
            normal: Vec2::ZERO,
        }
    }

    /// Whether the best contact is a ceiling-like surface.
    ///
    /// This is only true when every contact faces downward, since any floor
    /// or wall contact would have a larger vertical component.
    #[inline]
    pub fn touching_ceiling(&self) -> bool {
        self.normal.y < 0.0
    }
}
