//! # `platformer_controller`
//!
//! A physics-integrated 2D platformer character controller with physics
//! backend abstraction.
//!
//! This crate provides a responsive, tuneable player controller that:
//! - Moves on the ground through the contact friction solver instead of
//!   setting velocity directly
//! - Blends in bounded air control while airborne
//! - Jumps to an exact apex height, extended by holding jump
//! - Caps fall speed at a terminal velocity
//! - Derives grounding from the contacts of each physics step
//! - Abstracts the physics backend (Rapier2D included)
//!
//! ## Architecture
//!
//! Each rendered frame:
//! 1. An [`InputSnapshot`](intent::InputSnapshot) is captured
//! 2. A jump is started if jump was just pressed while grounded
//! 3. The [`SimulationStep`] schedule runs at a fixed timestep. Each step
//!    captures contacts, shapes the player's velocity and surface, and
//!    then lets the backend integrate and solve contacts
//! 4. Jump boost timers are decayed by the real frame time
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use platformer_controller::prelude::*;
//!
//! // The controller pulls in tuning, input, boost and contact components.
//! let player = (CharacterController::new(), MovementTuning::snappy());
//!
//! // These can be spawned together with a backend body bundle.
//! ```

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod controller;
pub mod detection;
pub mod intent;
pub mod jump;
pub mod simulation;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::PlatformerPhysicsBackend;
    pub use crate::collision::{ContactData, ContactSide, Contacts};
    pub use crate::config::{MovementTuning, PhysicsSpace};
    pub use crate::detection::GroundState;
    pub use crate::intent::{InputSnapshot, KeyBindings};
    pub use crate::jump::JumpBoost;
    pub use crate::simulation::{SimulationError, SimulationLoop, StepMode};
    pub use crate::state::{Airborne, CharacterController, Grounded};
    pub use crate::{ControllerSet, PlatformerControllerPlugin, SimulationStep};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dPlayerBundle, Rapier2dTerrainBundle};
}

/// Schedule run once per fixed physics step.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationStep;

/// Ordered phases of a physics step inside [`SimulationStep`].
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    /// Backend refills [`Contacts`](collision::Contacts) for every player.
    CaptureContacts,
    /// Player velocity, friction and surface velocity are shaped.
    UpdateVelocity,
    /// Backend integrates bodies and solves contacts.
    Integrate,
}

/// Main plugin for the platformer controller.
///
/// This plugin is generic over a physics backend `B` which provides the actual
/// physics operations (velocity access, surface parameters, stepping).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier2dBackend`)
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,ignore
/// use bevy::prelude::*;
/// use platformer_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(PlatformerControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
///
/// Hosts that drive frames themselves disable the `Update` driver and call
/// [`simulation::update`] directly:
/// ```rust,ignore
/// app.add_plugins(PlatformerControllerPlugin::<MyBackend>::without_frame_driver());
/// simulation::update::<MyBackend>(app.world_mut(), input, elapsed)?;
/// ```
pub struct PlatformerControllerPlugin<B: backend::PlatformerPhysicsBackend> {
    frame_driver: bool,
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::PlatformerPhysicsBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            frame_driver: true,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::PlatformerPhysicsBackend> PlatformerControllerPlugin<B> {
    /// Plugin without the `Update` frame driver.
    pub fn without_frame_driver() -> Self {
        Self {
            frame_driver: false,
            ..Default::default()
        }
    }
}

impl<B: backend::PlatformerPhysicsBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<state::CharacterController>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<config::MovementTuning>();
        app.register_type::<config::PhysicsSpace>();
        app.register_type::<intent::InputSnapshot>();
        app.register_type::<jump::JumpBoost>();
        app.register_type::<collision::Contacts>();
        app.register_type::<detection::GroundState>();
        app.register_type::<simulation::StepMode>();

        app.init_resource::<simulation::SimulationLoop>();
        app.init_resource::<config::PhysicsSpace>();
        app.init_resource::<intent::KeyBindings>();

        app.init_schedule(SimulationStep);
        app.configure_sets(
            SimulationStep,
            (
                ControllerSet::CaptureContacts,
                ControllerSet::UpdateVelocity,
                ControllerSet::Integrate,
            )
                .chain(),
        );
        app.add_systems(
            SimulationStep,
            (
                systems::update_player_velocity::<B>,
                systems::sync_state_markers,
            )
                .chain()
                .in_set(ControllerSet::UpdateVelocity),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        if self.frame_driver {
            app.add_systems(Update, systems::drive_simulation::<B>);
        }
    }
}
