//! Movement tuning and engine-level physics settings.
//!
//! Accelerations are never configured directly. They are always derived
//! from the target speed and the time it takes to reach it, so that
//! "time to full speed" stays the knob designers turn.

use bevy::prelude::*;

/// Tuning constants for player movement.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct MovementTuning {
    /// Horizontal speed the player accelerates toward (units/second).
    pub target_speed: f32,

    /// Seconds to reach `target_speed` from rest while grounded.
    pub ground_accel_time: f32,

    /// Seconds to reach `target_speed` from rest while airborne.
    pub air_accel_time: f32,

    /// Apex height of a tap jump (units).
    pub jump_height: f32,

    /// Extra height gained by holding jump through the whole boost window.
    pub jump_boost_height: f32,

    /// Terminal falling speed (units/second, positive).
    pub fall_velocity: f32,

    /// Gravity magnitude used for jump and friction derivations (units/second^2).
    pub gravity: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            target_speed: 500.0,
            ground_accel_time: 0.1,
            air_accel_time: 0.25,
            jump_height: 50.0,
            jump_boost_height: 55.0,
            fall_velocity: 900.0,
            gravity: 2000.0,
        }
    }
}

impl MovementTuning {
    /// Create tuning with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tuning with slow air control and a long boost window.
    pub fn floaty() -> Self {
        Self {
            air_accel_time: 0.5,
            jump_boost_height: 90.0,
            fall_velocity: 600.0,
            ..default()
        }
    }

    /// Tuning with near-instant ground response and tight air control.
    pub fn snappy() -> Self {
        Self {
            ground_accel_time: 0.05,
            air_accel_time: 0.15,
            jump_boost_height: 35.0,
            ..default()
        }
    }

    /// Ground acceleration (units/second^2), derived from the accel time.
    #[inline]
    pub fn ground_accel(&self) -> f32 {
        self.target_speed / self.ground_accel_time
    }

    /// Air acceleration (units/second^2), derived from the accel time.
    #[inline]
    pub fn air_accel(&self) -> f32 {
        self.target_speed / self.air_accel_time
    }

    /// Friction coefficient applied to the player's shape while grounded.
    ///
    /// With the engine's Coulomb friction and a ground coefficient of 1, the
    /// friction impulse per step is bounded by `friction * gravity * dt`,
    /// so this ratio reproduces `ground_accel`.
    #[inline]
    pub fn ground_friction(&self) -> f32 {
        self.ground_accel() / self.gravity
    }

    /// Minimum launch velocity that reaches `jump_height` under `gravity`.
    #[inline]
    pub fn jump_launch_velocity(&self) -> f32 {
        (2.0 * self.jump_height * self.gravity).sqrt()
    }

    /// Seconds of gravity suppression granted by a jump.
    #[inline]
    pub fn jump_boost_window(&self) -> f32 {
        self.jump_boost_height / self.jump_launch_velocity()
    }

    /// Builder: set target speed.
    pub fn with_target_speed(mut self, speed: f32) -> Self {
        self.target_speed = speed;
        self
    }

    /// Builder: set ground and air acceleration times.
    pub fn with_accel_times(mut self, ground: f32, air: f32) -> Self {
        self.ground_accel_time = ground;
        self.air_accel_time = air;
        self
    }

    /// Builder: set jump apex and boost heights.
    pub fn with_jump(mut self, height: f32, boost_height: f32) -> Self {
        self.jump_height = height;
        self.jump_boost_height = boost_height;
        self
    }

    /// Builder: set terminal fall speed.
    pub fn with_fall_velocity(mut self, velocity: f32) -> Self {
        self.fall_velocity = velocity;
        self
    }

    /// Builder: set gravity magnitude.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }
}

/// World-level physics settings handed to the velocity update every step.
///
/// These play the role of the engine's space settings: the gravity vector
/// applied to every dynamic body and a per-second velocity damping.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Resource)]
pub struct PhysicsSpace {
    /// Gravity acceleration vector.
    pub gravity: Vec2,
    /// Fraction of velocity kept after one second (1.0 = no damping).
    pub damping: f32,
}

impl Default for PhysicsSpace {
    fn default() -> Self {
        Self::from_tuning(&MovementTuning::default())
    }
}

impl PhysicsSpace {
    /// Space settings whose gravity matches the tuning's gravity magnitude.
    pub fn from_tuning(tuning: &MovementTuning) -> Self {
        Self {
            gravity: Vec2::new(0.0, -tuning.gravity),
            damping: 1.0,
        }
    }

    /// Builder: set damping.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Velocity multiplier for a step of `dt` seconds.
    #[inline]
    pub fn damping_factor(&self, dt: f32) -> f32 {
        self.damping.powf(dt)
    }
}
