//! Core controller systems.
//!
//! The velocity update runs inside the [`SimulationStep`](crate::SimulationStep)
//! schedule once per fixed step. Jump triggering and boost decay run once per
//! rendered frame from [`simulation::update`]. All of them are generic over
//! the physics backend.

use bevy::prelude::*;

use crate::backend::PlatformerPhysicsBackend;
use crate::collision::Contacts;
use crate::config::{MovementTuning, PhysicsSpace};
use crate::controller::{shape_velocity, StepParams};
use crate::detection::GroundState;
use crate::intent::{InputSnapshot, KeyBindings};
use crate::jump::{evaluate_jump, JumpBoost};
use crate::simulation::{self, SimulationError, SimulationLoop};
use crate::state::{Airborne, CharacterController, Grounded};

/// Start jumps for players that pressed jump while grounded.
///
/// Uses the ground state of the last simulation step, so a press on the
/// frame the player lands is only honoured once a step has seen the floor.
pub fn trigger_jumps<B: PlatformerPhysicsBackend>(world: &mut World) {
    let players: Vec<(Entity, MovementTuning, InputSnapshot, bool)> = world
        .query::<(Entity, &MovementTuning, &InputSnapshot, &CharacterController)>()
        .iter(world)
        .filter(|(_, _, input, _)| input.jump_just_pressed)
        .map(|(e, tuning, input, controller)| (e, *tuning, *input, controller.is_grounded()))
        .collect();

    for (entity, tuning, input, was_grounded) in players {
        let Some(mut boost) = world.get::<JumpBoost>(entity).copied() else {
            continue;
        };

        let velocity = B::get_velocity(world, entity);
        if let Some(launched) = evaluate_jump(&tuning, &input, was_grounded, velocity, &mut boost) {
            debug!(
                "{entity}: jump launched at {:.1} with {:.3}s boost",
                launched.y,
                boost.remaining()
            );
            B::set_velocity(world, entity, launched);
            if let Some(mut stored) = world.get_mut::<JumpBoost>(entity) {
                *stored = boost;
            }
        } else if !was_grounded {
            trace!("{entity}: jump pressed while airborne, ignored");
        }
    }
}

/// Replace the default velocity integration for every player body.
///
/// Grounding and ceiling contact come from this step's contacts. A ceiling
/// hit ends the jump boost before gravity is evaluated. The shaped velocity
/// and the surface configuration are handed to the backend, whose contact
/// solver applies them in the same step.
pub fn update_player_velocity<B: PlatformerPhysicsBackend>(world: &mut World) {
    let Some(dt) = world
        .get_resource::<SimulationLoop>()
        .map(SimulationLoop::fixed_step)
    else {
        return;
    };
    let space = world.get_resource::<PhysicsSpace>().copied().unwrap_or_default();
    let step = StepParams {
        gravity: space.gravity,
        damping: space.damping_factor(dt),
        dt,
    };

    let players: Vec<(Entity, MovementTuning, InputSnapshot, JumpBoost, GroundState, bool)> = world
        .query::<(
            Entity,
            &MovementTuning,
            &InputSnapshot,
            &JumpBoost,
            &Contacts,
            &CharacterController,
        )>()
        .iter(world)
        .map(|(e, tuning, input, boost, contacts, controller)| {
            (
                e,
                *tuning,
                *input,
                *boost,
                GroundState::from_contacts(contacts),
                controller.is_grounded(),
            )
        })
        .collect();

    for (entity, tuning, input, mut boost, ground, was_grounded) in players {
        if ground.touching_ceiling() && boost.is_active() {
            debug!("{entity}: ceiling hit, jump boost revoked");
            boost.revoke();
        }

        let velocity = B::get_velocity(world, entity);
        let update = shape_velocity(
            &tuning,
            &input,
            ground.grounded,
            boost.suppresses_gravity(input.jump_held),
            velocity,
            step,
        );

        B::set_velocity(world, entity, update.velocity);
        B::set_friction(world, entity, update.friction);
        B::set_surface_velocity(world, entity, update.surface_velocity);

        if ground.grounded != was_grounded {
            debug!(
                "{entity}: {} (normal {:?})",
                if ground.grounded { "landed" } else { "left ground" },
                ground.normal
            );
        }
        trace!(
            "{entity}: v={:?} friction={:.3} surface_v={:?}",
            update.velocity,
            update.friction,
            update.surface_velocity
        );

        if let Some(mut stored) = world.get_mut::<JumpBoost>(entity) {
            *stored = boost;
        }
        if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
            controller.set_ground(ground);
        }
    }
}

/// Consume real frame time from every open boost window.
pub fn decay_jump_boosts(world: &mut World, elapsed: f32) {
    for mut boost in world.query::<&mut JumpBoost>().iter_mut(world) {
        if boost.is_active() {
            boost.decay(elapsed);
        }
    }
}

/// Sync the [`Grounded`] / [`Airborne`] markers with the controller state.
pub fn sync_state_markers(
    mut commands: Commands,
    q: Query<(Entity, &CharacterController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q {
        if controller.is_grounded() {
            if !has_grounded {
                commands.entity(entity).insert(Grounded);
            }
            if has_airborne {
                commands.entity(entity).remove::<Airborne>();
            }
        } else {
            if !has_airborne {
                commands.entity(entity).insert(Airborne);
            }
            if has_grounded {
                commands.entity(entity).remove::<Grounded>();
            }
        }
    }
}

/// Frame driver added to `Update` by
/// [`PlatformerControllerPlugin`](crate::PlatformerControllerPlugin).
///
/// Captures keyboard input when a `ButtonInput<KeyCode>` resource exists,
/// reads the frame time from Bevy's [`Time`] and advances the simulation
/// by one frame.
pub fn drive_simulation<B: PlatformerPhysicsBackend>(world: &mut World) {
    let previous = world
        .query_filtered::<&InputSnapshot, With<CharacterController>>()
        .iter(world)
        .next()
        .copied()
        .unwrap_or_default();

    let input = match (
        world.get_resource::<ButtonInput<KeyCode>>(),
        world.get_resource::<KeyBindings>(),
    ) {
        (Some(keys), Some(bindings)) => InputSnapshot::from_keyboard(keys, bindings),
        // Without a keyboard keep the held states and drop the edge.
        _ => previous.follow(previous.move_left, previous.move_right, previous.jump_held),
    };

    // Virtual time, so pausing or scaling the app clock pauses or scales
    // the jump boost window too.
    let elapsed = world
        .get_resource::<Time>()
        .map(|t| t.delta_secs())
        .unwrap_or(0.0);

    if let Err(err) = simulation::update::<B>(world, input, elapsed) {
        // No player yet is a normal state while a level loads.
        match err {
            SimulationError::NoPlayer => trace!("{err}"),
            _ => error!("{err}"),
        }
    }
}
