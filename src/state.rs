//! Character state components.
//!
//! [`CharacterController`] marks a body as a player driven by the
//! controller and carries the ground state of the last simulation step
//! into the next frame's jump evaluation. [`Grounded`] and [`Airborne`] are
//! markers kept in sync with it for HUD and debug queries.

use bevy::prelude::*;

use crate::collision::Contacts;
use crate::config::MovementTuning;
use crate::detection::GroundState;
use crate::intent::InputSnapshot;
use crate::jump::JumpBoost;

/// Player body driven by the controller.
///
/// Only entities with this component get the custom velocity update; every
/// other body keeps the backend's default integration.
///
/// Spawning it also inserts [`MovementTuning`], [`InputSnapshot`],
/// [`JumpBoost`] and [`Contacts`] with their defaults unless the entity
/// already carries them.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
#[require(MovementTuning, InputSnapshot, JumpBoost, Contacts)]
pub struct CharacterController {
    /// Ground state of the last simulation step.
    ground: GroundState,
}

impl CharacterController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last simulation step found a floor-like contact.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.ground.grounded
    }

    /// Best contact normal of the last simulation step (zero when free).
    #[inline]
    pub fn ground_normal(&self) -> Vec2 {
        self.ground.normal
    }

    /// Ground state of the last simulation step.
    #[inline]
    pub fn ground(&self) -> GroundState {
        self.ground
    }

    pub(crate) fn set_ground(&mut self, ground: GroundState) {
        self.ground = ground;
    }
}

/// Marker component indicating the character is grounded.
///
/// This is a marker component - it has no data, just indicates state.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use platformer_controller::prelude::*;
///
/// fn check_grounded(grounded: Option<&Grounded>) -> bool {
///     grounded.is_some()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
