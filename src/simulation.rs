//! Frame loop and fixed-timestep stepping.
//!
//! [`update`] is the per-frame entry point. It hands the frame's input to
//! every player, evaluates jumps against the last step's ground state, runs
//! the [`SimulationStep`] schedule at a fixed timestep and finally decays the
//! jump boost timers by the real time that elapsed.

use bevy::prelude::*;
use thiserror::Error;

use crate::backend::PlatformerPhysicsBackend;
use crate::intent::InputSnapshot;
use crate::state::CharacterController;
use crate::systems;
use crate::SimulationStep;

/// Default fixed simulation timestep (180 Hz).
pub const DEFAULT_FIXED_STEP: f32 = 1.0 / 180.0;

/// Default cap on physics steps run in a single frame.
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;

/// How rendered frames map onto fixed physics steps.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    /// Exactly one fixed step per frame, whatever the frame duration.
    ///
    /// Simulated time is tied to frame cadence, so it drifts from real
    /// time at uneven frame rates.
    #[default]
    PerFrame,
    /// Accumulate real elapsed time and run as many whole fixed steps as it
    /// covers, carrying the remainder into the next frame.
    Accumulated,
}

/// Unrecoverable frame-loop states.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("no player body is registered with the controller")]
    NoPlayer,
    #[error("simulation loop resource is missing; add PlatformerControllerPlugin first")]
    MissingSimulationLoop,
}

/// Fixed-timestep stepping state, owned by the frame loop.
#[derive(Resource, Debug, Clone)]
pub struct SimulationLoop {
    fixed_step: f32,
    mode: StepMode,
    max_steps_per_frame: u32,
    accumulator: f32,
}

impl Default for SimulationLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_STEP)
    }
}

impl SimulationLoop {
    /// Create a loop with the given fixed step, stepping once per frame.
    ///
    /// # Panics
    ///
    /// Panics if `fixed_step` is not strictly positive and finite.
    pub fn new(fixed_step: f32) -> Self {
        assert!(
            fixed_step > 0.0 && fixed_step.is_finite(),
            "fixed step must be positive and finite, got {fixed_step}"
        );
        Self {
            fixed_step,
            mode: StepMode::PerFrame,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            accumulator: 0.0,
        }
    }

    /// Builder: set the step mode.
    pub fn with_mode(mut self, mode: StepMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: cap the number of accumulated steps per frame.
    pub fn with_max_steps_per_frame(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    /// Duration of one physics step in seconds.
    #[inline]
    pub fn fixed_step(&self) -> f32 {
        self.fixed_step
    }

    /// How frames are mapped onto fixed steps.
    #[inline]
    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Real time not yet covered by a fixed step (accumulated mode only).
    #[inline]
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }

    /// Number of fixed steps to run for a frame that took `elapsed` seconds.
    pub fn steps_for_frame(&mut self, elapsed: f32) -> u32 {
        match self.mode {
            StepMode::PerFrame => 1,
            StepMode::Accumulated => {
                self.accumulator += elapsed;

                let mut steps = 0;
                while self.accumulator >= self.fixed_step && steps < self.max_steps_per_frame {
                    self.accumulator -= self.fixed_step;
                    steps += 1;
                }

                if self.accumulator >= self.fixed_step {
                    warn!(
                        "simulation fell behind by {:.4}s; dropping backlog after {} steps",
                        self.accumulator, steps
                    );
                    self.accumulator %= self.fixed_step;
                }
                steps
            }
        }
    }
}

/// Advance the simulation by one rendered frame.
///
/// `elapsed` is the real time since the previous frame. It drives the jump
/// boost timer and, in [`StepMode::Accumulated`], the number of physics
/// steps; it never changes the physics step size.
///
/// # Panics
///
/// Panics if `elapsed` is negative or not finite.
pub fn update<B: PlatformerPhysicsBackend>(
    world: &mut World,
    input: InputSnapshot,
    elapsed: f32,
) -> Result<(), SimulationError> {
    assert!(
        elapsed >= 0.0 && elapsed.is_finite(),
        "frame elapsed time must be non-negative and finite, got {elapsed}"
    );

    let mut players = 0;
    for mut snapshot in world
        .query_filtered::<&mut InputSnapshot, With<CharacterController>>()
        .iter_mut(world)
    {
        *snapshot = input;
        players += 1;
    }
    if players == 0 {
        return Err(SimulationError::NoPlayer);
    }

    systems::trigger_jumps::<B>(world);

    let steps = world
        .get_resource_mut::<SimulationLoop>()
        .ok_or(SimulationError::MissingSimulationLoop)?
        .steps_for_frame(elapsed);
    for _ in 0..steps {
        world.run_schedule(SimulationStep);
    }

    systems::decay_jump_boosts(world, elapsed);
    Ok(())
}
