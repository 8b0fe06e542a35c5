//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.
//!
//! Rapier runs inside the [`SimulationStep`] schedule, so one simulation
//! step advances the Rapier world by exactly one fixed step. Surface
//! velocity is applied through a physics hook that writes the tangent
//! velocity of every solver contact touching a [`SurfaceVelocity`] shape.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

use crate::backend::PlatformerPhysicsBackend;
use crate::collision::{ContactData, ContactSide, Contacts};
use crate::config::PhysicsSpace;
use crate::simulation::SimulationLoop;
use crate::state::CharacterController;
use crate::{ControllerSet, SimulationStep};

/// Collision category of shapes a player can grab.
pub const GRABBABLE: Group = Group::GROUP_32;

/// Every category except [`GRABBABLE`].
pub const NOT_GRABBABLE: Group = Group::ALL.difference(GRABBABLE);

/// Corner radius of the player's rounded box.
pub const PLAYER_CORNER_RADIUS: f32 = 10.0;

/// Rapier2D physics backend for the platformer controller.
///
/// Velocity lives in Rapier's [`Velocity`], friction in [`Friction`] and
/// surface velocity in this crate's [`SurfaceVelocity`] component.
pub struct Rapier2dBackend;

impl PlatformerPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn set_friction(world: &mut World, entity: Entity, friction: f32) {
        if let Some(mut current) = world.get_mut::<Friction>(entity) {
            // Avoid change detection pushing an unchanged value to Rapier.
            if current.coefficient != friction {
                current.coefficient = friction;
            }
        }
    }

    fn set_surface_velocity(world: &mut World, entity: Entity, surface_velocity: Vec2) {
        if let Some(mut current) = world.get_mut::<SurfaceVelocity>(entity) {
            current.0 = surface_velocity;
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation.xy())
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation().xy())
            })
            .unwrap_or(Vec2::ZERO)
    }
}

/// Velocity of a shape's surface relative to its body.
///
/// The contact solver drives the body's velocity plus this surface velocity
/// toward the other shape's velocity plus its surface velocity. Only
/// colliders with [`ActiveHooks::MODIFY_SOLVER_CONTACTS`] are affected.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
pub struct SurfaceVelocity(pub Vec2);

/// Physics hooks applying [`SurfaceVelocity`] to solver contacts.
#[derive(SystemParam)]
pub struct SurfaceVelocityHooks<'w, 's> {
    surfaces: Query<'w, 's, &'static SurfaceVelocity>,
}

impl SurfaceVelocityHooks<'_, '_> {
    fn surface_velocity(&self, entity: Entity) -> Vec2 {
        self.surfaces.get(entity).map(|s| s.0).unwrap_or(Vec2::ZERO)
    }
}

impl BevyPhysicsHooks for SurfaceVelocityHooks<'_, '_> {
    fn modify_solver_contacts(&self, context: ContactModificationContextView) {
        let first = self.surface_velocity(context.collider1());
        let second = self.surface_velocity(context.collider2());
        if first == second {
            return;
        }

        // Rapier drives `v1 - v2 + tangent_velocity` to zero along the tangent.
        let tangent_velocity = first - second;
        for contact in context.raw.solver_contacts.iter_mut() {
            contact.tangent_velocity = tangent_velocity.into();
        }
    }
}

/// Plugin that sets up Rapier2D inside the simulation step.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SurfaceVelocity>();

        app.add_plugins(
            RapierPhysicsPlugin::<SurfaceVelocityHooks>::default().in_schedule(SimulationStep),
        );
        app.configure_sets(
            SimulationStep,
            (
                PhysicsSet::SyncBackend,
                PhysicsSet::StepSimulation,
                PhysicsSet::Writeback,
            )
                .chain()
                .in_set(ControllerSet::Integrate),
        );

        let fixed_step = app
            .world()
            .get_resource::<SimulationLoop>()
            .map(SimulationLoop::fixed_step)
            .unwrap_or(crate::simulation::DEFAULT_FIXED_STEP);
        app.insert_resource(TimestepMode::Fixed {
            dt: fixed_step,
            substeps: 1,
        });

        app.add_systems(
            SimulationStep,
            (sync_rapier_settings, capture_rapier_contacts)
                .chain()
                .in_set(ControllerSet::CaptureContacts),
        );
    }
}

/// Keep Rapier's timestep and gravity in line with the controller settings.
fn sync_rapier_settings(
    sim: Res<SimulationLoop>,
    space: Res<PhysicsSpace>,
    mut timestep: ResMut<TimestepMode>,
    mut configs: Query<&mut RapierConfiguration>,
) {
    if sim.is_changed() {
        *timestep = TimestepMode::Fixed {
            dt: sim.fixed_step(),
            substeps: 1,
        };
    }

    for mut config in &mut configs {
        if config.gravity != space.gravity {
            config.gravity = space.gravity;
        }
    }
}

/// Refill every player's [`Contacts`] from Rapier's narrow phase.
///
/// Only manifolds with at least one contact point count as touching.
fn capture_rapier_contacts(
    rapier_context: ReadRapierContext,
    mut q_players: Query<(Entity, &mut Contacts), With<CharacterController>>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, mut contacts) in &mut q_players {
        contacts.clear();

        for pair in context.contact_pairs_with(entity) {
            if !pair.has_any_active_contact() {
                continue;
            }

            let first: Option<Entity> = pair.collider1().into();
            let side = if first == Some(entity) {
                ContactSide::First
            } else {
                ContactSide::Second
            };

            for manifold in pair.manifolds() {
                if manifold.num_points() == 0 {
                    continue;
                }
                contacts.push(ContactData::new(manifold.normal(), side));
            }
        }
    }
}

/// Bundle for creating a player body with Rapier2D physics.
///
/// Mass 1 with rotation locked (infinite moment), no restitution and no
/// base friction. Gravity scale is zero because the controller applies
/// gravity itself. Friction is combined by multiplication so the ground
/// friction written by the controller is scaled by the terrain's friction.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use platformer_controller::prelude::*;
/// use platformer_controller::rapier::Rapier2dPlayerBundle;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 100.0, 0.0),
///         CharacterController::new(),
///         Rapier2dPlayerBundle::new(),
///         Rapier2dPlayerBundle::collider(Vec2::new(20.0, 40.0)),
///     ));
/// }
/// ```
#[derive(Bundle)]
pub struct Rapier2dPlayerBundle {
    pub rigid_body: RigidBody,
    pub velocity: Velocity,
    pub locked_axes: LockedAxes,
    pub gravity_scale: GravityScale,
    pub mass: ColliderMassProperties,
    pub friction: Friction,
    pub restitution: Restitution,
    pub surface_velocity: SurfaceVelocity,
    pub active_hooks: ActiveHooks,
}

impl Default for Rapier2dPlayerBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier2dPlayerBundle {
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::zero(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            gravity_scale: GravityScale(0.0),
            mass: ColliderMassProperties::Mass(1.0),
            friction: Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Multiply,
            },
            restitution: Restitution {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Multiply,
            },
            surface_velocity: SurfaceVelocity::default(),
            active_hooks: ActiveHooks::MODIFY_SOLVER_CONTACTS,
        }
    }

    /// Rounded box collider for a player of the given full size.
    ///
    /// The corner radius is included in `size`.
    pub fn collider(size: Vec2) -> Collider {
        let half = (size * 0.5 - Vec2::splat(PLAYER_CORNER_RADIUS)).max(Vec2::ZERO);
        Collider::round_cuboid(half.x, half.y, PLAYER_CORNER_RADIUS)
    }
}

/// Bundle for static level geometry.
///
/// Fully elastic with unit friction, and excluded from the
/// [`GRABBABLE`] category.
#[derive(Bundle)]
pub struct Rapier2dTerrainBundle {
    pub rigid_body: RigidBody,
    pub friction: Friction,
    pub restitution: Restitution,
    pub collision_groups: CollisionGroups,
}

impl Default for Rapier2dTerrainBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Fixed,
            friction: Friction {
                coefficient: 1.0,
                combine_rule: CoefficientCombineRule::Multiply,
            },
            restitution: Restitution {
                coefficient: 1.0,
                combine_rule: CoefficientCombineRule::Multiply,
            },
            collision_groups: CollisionGroups::new(NOT_GRABBABLE, NOT_GRABBABLE),
        }
    }
}
