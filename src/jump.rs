//! Jump triggering and the gravity-suppression boost window.
//!
//! A jump adds the minimum launch velocity for the configured apex height
//! and opens a boost window. While the window is open and jump is held, the
//! velocity update integrates with zero gravity, which extends the jump by
//! up to `jump_boost_height`.

use bevy::prelude::*;

use crate::config::MovementTuning;
use crate::intent::InputSnapshot;

/// Remaining gravity-suppression time of the current jump.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
pub struct JumpBoost {
    /// Seconds of boost left. Never negative.
    remaining: f32,
}

impl JumpBoost {
    /// Seconds of boost left.
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whether the boost window is still open.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Gravity is suppressed only while jump is held inside the window.
    #[inline]
    pub fn suppresses_gravity(&self, jump_held: bool) -> bool {
        jump_held && self.is_active()
    }

    /// Open a boost window for a jump launched at `launch_velocity`.
    pub fn start(&mut self, tuning: &MovementTuning, launch_velocity: f32) {
        self.remaining = (tuning.jump_boost_height / launch_velocity).max(0.0);
    }

    /// Consume elapsed frame time.
    pub fn decay(&mut self, elapsed: f32) {
        self.remaining = (self.remaining - elapsed).max(0.0);
    }

    /// Close the window immediately.
    pub fn revoke(&mut self) {
        self.remaining = 0.0;
    }
}

/// Decide whether this frame starts a jump.
///
/// Runs once per rendered frame, before the physics steps, using the
/// grounded state of the last simulation step. Returns the body's new
/// velocity when a jump starts: the launch velocity is added to the current
/// vertical velocity, so motion inherited from a moving platform is kept.
///
/// Only a fresh press while grounded jumps. Holding the button, or pressing
/// it in the air, does nothing.
pub fn evaluate_jump(
    tuning: &MovementTuning,
    input: &InputSnapshot,
    was_grounded: bool,
    velocity: Vec2,
    boost: &mut JumpBoost,
) -> Option<Vec2> {
    if !(input.jump_just_pressed && was_grounded) {
        return None;
    }

    let launch = tuning.jump_launch_velocity();
    boost.start(tuning, launch);
    Some(velocity + Vec2::new(0.0, launch))
}
