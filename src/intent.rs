//! Per-frame player input.
//!
//! The controller never polls devices. A host (or the keyboard capture
//! helper in this module) produces an [`InputSnapshot`] once per rendered
//! frame and the simulation loop hands it to every player body.

use bevy::prelude::*;

/// Debounced control signals for one rendered frame.
///
/// # Example
///
/// ```rust
/// use platformer_controller::prelude::*;
///
/// let idle = InputSnapshot::default();
/// let pressed = idle.follow(false, true, true);
/// assert!(pressed.jump_just_pressed);
///
/// let held = pressed.follow(false, true, true);
/// assert!(held.jump_held);
/// assert!(!held.jump_just_pressed);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[reflect(Component)]
pub struct InputSnapshot {
    /// Move-left control is active.
    pub move_left: bool,
    /// Move-right control is active.
    pub move_right: bool,
    /// Jump control is held down.
    pub jump_held: bool,
    /// Jump control went from released to held this frame.
    pub jump_just_pressed: bool,
}

impl InputSnapshot {
    /// Create a snapshot from already edge-detected signals.
    pub fn new(move_left: bool, move_right: bool, jump_held: bool, jump_just_pressed: bool) -> Self {
        Self {
            move_left,
            move_right,
            jump_held,
            jump_just_pressed,
        }
    }

    /// Build the next frame's snapshot from raw held states.
    ///
    /// `jump_just_pressed` is derived from this snapshot's `jump_held`, for
    /// input sources that only report whether a control is down.
    pub fn follow(&self, move_left: bool, move_right: bool, jump_held: bool) -> Self {
        Self {
            move_left,
            move_right,
            jump_held,
            jump_just_pressed: jump_held && !self.jump_held,
        }
    }

    /// Capture a snapshot from Bevy's keyboard state.
    pub fn from_keyboard(keys: &ButtonInput<KeyCode>, bindings: &KeyBindings) -> Self {
        Self {
            move_left: keys.any_pressed(bindings.move_left.iter().copied()),
            move_right: keys.any_pressed(bindings.move_right.iter().copied()),
            jump_held: keys.any_pressed(bindings.jump.iter().copied()),
            jump_just_pressed: keys.any_just_pressed(bindings.jump.iter().copied()),
        }
    }

    /// Horizontal input axis: -1, 0 or 1.
    ///
    /// Opposite inputs cancel out instead of the last one winning.
    #[inline]
    pub fn horizontal_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.move_right {
            axis += 1.0;
        }
        if self.move_left {
            axis -= 1.0;
        }
        axis
    }
}

/// Keys mapped onto the controller's controls.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            move_right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            jump: vec![KeyCode::Space],
        }
    }
}
