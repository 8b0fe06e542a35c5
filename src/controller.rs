//! Per-step velocity shaping for player bodies.
//!
//! This replaces the engine's default velocity integration for the player
//! body only. Ground movement is not set directly: the player's shape gets
//! a surface velocity opposite to the desired motion plus a friction
//! coefficient, and the engine's own contact friction solver pulls the body
//! toward the target speed. Air movement has no surface to push against,
//! so it is blended in explicitly.

use bevy::prelude::*;

use crate::config::MovementTuning;
use crate::intent::InputSnapshot;

/// Parameters the engine hands to a velocity update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    /// Gravity acceleration for this step.
    pub gravity: Vec2,
    /// Velocity multiplier for this step.
    pub damping: f32,
    /// Step duration in seconds.
    pub dt: f32,
}

/// Result of a velocity update: the new body velocity and the surface
/// configuration the contact solver must use in the same step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityUpdate {
    pub velocity: Vec2,
    pub friction: f32,
    pub surface_velocity: Vec2,
}

/// Default engine integration: `v * damping + gravity * dt`.
#[inline]
pub fn integrate_velocity(velocity: Vec2, gravity: Vec2, damping: f32, dt: f32) -> Vec2 {
    velocity * damping + gravity * dt
}

/// Move `from` toward `to` by at most `max_delta`, never overshooting.
#[inline]
pub fn lerp_const(from: f32, to: f32, max_delta: f32) -> f32 {
    from + (to - from).clamp(-max_delta, max_delta)
}

/// Shape the player's velocity for one simulation step.
///
/// `grounded` is this step's ground state and `suppress_gravity` whether the
/// jump boost is active with jump held.
///
/// # Panics
///
/// Panics on a negative step duration.
pub fn shape_velocity(
    tuning: &MovementTuning,
    input: &InputSnapshot,
    grounded: bool,
    suppress_gravity: bool,
    velocity: Vec2,
    step: StepParams,
) -> VelocityUpdate {
    assert!(
        step.dt >= 0.0,
        "velocity update called with a negative step duration: {}",
        step.dt
    );

    // Damping still applies while gravity is suppressed.
    let gravity = if suppress_gravity { Vec2::ZERO } else { step.gravity };
    let mut velocity = integrate_velocity(velocity, gravity, step.damping, step.dt);

    let target_vx = input.horizontal_axis() * tuning.target_speed;

    // The feet move opposite to the player.
    let surface_velocity = Vec2::new(-target_vx, 0.0);
    let friction = if grounded { tuning.ground_friction() } else { 0.0 };

    if !grounded {
        velocity.x = lerp_const(velocity.x, target_vx, tuning.air_accel() * step.dt);
    }

    velocity.y = velocity.y.max(-tuning.fall_velocity);

    VelocityUpdate {
        velocity,
        friction,
        surface_velocity,
    }
}
