//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement
//! to work with the controller. The controller never integrates positions,
//! detects collisions or solves contacts itself; it only reads and writes
//! body velocity and shape surface parameters through the backend.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Besides the methods below, a backend plugin must:
/// - refill the [`Contacts`](crate::collision::Contacts) component of every
///   [`CharacterController`](crate::state::CharacterController) entity in
///   [`ControllerSet::CaptureContacts`](crate::ControllerSet::CaptureContacts);
/// - advance its world by exactly one fixed step, of
///   [`SimulationLoop::fixed_step`](crate::simulation::SimulationLoop::fixed_step)
///   seconds, in [`ControllerSet::Integrate`](crate::ControllerSet::Integrate).
///
/// Both sets live in the [`SimulationStep`](crate::SimulationStep) schedule,
/// which the simulation loop runs once per fixed step.
///
/// The contact solver must honour the shape's surface velocity: friction
/// drives the body's velocity plus its surface velocity toward the velocity
/// of the surface it touches. With a surface velocity of `-target`, a
/// grounded body is pulled toward `target`.
pub trait PlatformerPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the linear velocity of a body.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the linear velocity of a body.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Set the friction coefficient of the body's shape.
    ///
    /// Takes effect in the contact resolution of the current step.
    fn set_friction(world: &mut World, entity: Entity, friction: f32);

    /// Set the surface velocity of the body's shape.
    ///
    /// Takes effect in the contact resolution of the current step.
    fn set_surface_velocity(world: &mut World, entity: Entity, surface_velocity: Vec2);

    /// Get the current position of a body.
    fn get_position(world: &World, entity: Entity) -> Vec2;
}
