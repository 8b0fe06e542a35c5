//! Deterministic test backend: an axis-aligned box between an optional flat
//! floor and ceiling.
//!
//! The contact solver is a one-body version of an impulse solver. A floor
//! contact cancels downward velocity, and the cancelled amount is the normal
//! impulse that bounds friction. Friction drives `velocity + surface_velocity`
//! toward the floor's velocity (zero).

#![allow(dead_code)]

use bevy::prelude::*;
use platformer_controller::prelude::*;
use platformer_controller::simulation;

/// Contact tolerance in world units.
pub const SLOP: f32 = 0.01;

pub const FRAME: f32 = 1.0 / 180.0;

#[derive(Resource, Debug, Clone, Copy)]
pub struct Arena {
    pub floor: Option<f32>,
    pub ceiling: Option<f32>,
    /// Friction coefficient of the floor surface.
    pub ground_friction: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            floor: Some(0.0),
            ceiling: None,
            ground_friction: 1.0,
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ArenaBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
    pub friction: f32,
    pub surface_velocity: Vec2,
}

impl ArenaBody {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extents: Vec2::new(10.0, 20.0),
            friction: 0.0,
            surface_velocity: Vec2::ZERO,
        }
    }

    fn on_floor(&self, arena: &Arena) -> bool {
        arena
            .floor
            .is_some_and(|floor| self.position.y - self.half_extents.y <= floor + SLOP)
    }

    fn on_ceiling(&self, arena: &Arena) -> bool {
        arena
            .ceiling
            .is_some_and(|ceiling| self.position.y + self.half_extents.y >= ceiling - SLOP)
    }
}

pub struct ArenaBackend;

impl PlatformerPhysicsBackend for ArenaBackend {
    fn plugin() -> impl Plugin {
        ArenaPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<ArenaBody>(entity)
            .map(|b| b.velocity)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut body) = world.get_mut::<ArenaBody>(entity) {
            body.velocity = velocity;
        }
    }

    fn set_friction(world: &mut World, entity: Entity, friction: f32) {
        if let Some(mut body) = world.get_mut::<ArenaBody>(entity) {
            body.friction = friction;
        }
    }

    fn set_surface_velocity(world: &mut World, entity: Entity, surface_velocity: Vec2) {
        if let Some(mut body) = world.get_mut::<ArenaBody>(entity) {
            body.surface_velocity = surface_velocity;
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<ArenaBody>(entity)
            .map(|b| b.position)
            .unwrap_or(Vec2::ZERO)
    }
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Arena>();
        app.add_systems(
            SimulationStep,
            capture_arena_contacts.in_set(ControllerSet::CaptureContacts),
        );
        app.add_systems(
            SimulationStep,
            integrate_arena_bodies.in_set(ControllerSet::Integrate),
        );
    }
}

fn capture_arena_contacts(arena: Res<Arena>, mut q: Query<(&ArenaBody, &mut Contacts)>) {
    for (body, mut contacts) in &mut q {
        contacts.clear();
        // The body is always the first shape; normals point from it outward.
        if body.on_floor(&arena) {
            contacts.push(ContactData::new(Vec2::NEG_Y, ContactSide::First));
        }
        if body.on_ceiling(&arena) {
            contacts.push(ContactData::new(Vec2::Y, ContactSide::First));
        }
    }
}

fn integrate_arena_bodies(
    arena: Res<Arena>,
    sim: Res<SimulationLoop>,
    mut q: Query<&mut ArenaBody>,
) {
    let dt = sim.fixed_step();
    for mut body in &mut q {
        if body.on_floor(&arena) && body.velocity.y < 0.0 {
            let normal_impulse = -body.velocity.y;
            body.velocity.y = 0.0;

            let max_friction = body.friction * arena.ground_friction * normal_impulse;
            let wanted = -body.surface_velocity.x - body.velocity.x;
            body.velocity.x += wanted.clamp(-max_friction, max_friction);
        }
        if body.on_ceiling(&arena) && body.velocity.y > 0.0 {
            body.velocity.y = 0.0;
        }

        let velocity = body.velocity;
        body.position += velocity * dt;

        let half_height = body.half_extents.y;
        if let Some(floor) = arena.floor {
            body.position.y = body.position.y.max(floor + half_height);
        }
        if let Some(ceiling) = arena.ceiling {
            body.position.y = body.position.y.min(ceiling - half_height);
        }
    }
}

/// App with the controller and the arena backend, driven manually.
pub fn create_test_app(arena: Arena) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(PlatformerControllerPlugin::<ArenaBackend>::without_frame_driver());
    app.insert_resource(arena);
    app
}

/// Spawn a player resting on the floor at y = 0.
pub fn spawn_grounded_player(app: &mut App) -> Entity {
    spawn_player(app, Vec2::new(0.0, 20.0))
}

pub fn spawn_player(app: &mut App, position: Vec2) -> Entity {
    app.world_mut()
        .spawn((CharacterController::new(), ArenaBody::at(position)))
        .id()
}

/// Advance one frame of [`FRAME`] seconds.
pub fn frame(app: &mut App, input: InputSnapshot) {
    frame_with(app, input, FRAME);
}

pub fn frame_with(app: &mut App, input: InputSnapshot, elapsed: f32) {
    simulation::update::<ArenaBackend>(app.world_mut(), input, elapsed)
        .expect("frame should advance with a player present");
}

pub fn velocity(app: &App, entity: Entity) -> Vec2 {
    ArenaBackend::get_velocity(app.world(), entity)
}

pub fn boost(app: &App, entity: Entity) -> JumpBoost {
    app.world()
        .get::<JumpBoost>(entity)
        .copied()
        .expect("player should carry a jump boost")
}

pub fn controller(app: &App, entity: Entity) -> CharacterController {
    app.world()
        .get::<CharacterController>(entity)
        .copied()
        .expect("player should carry a controller")
}

pub fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

pub fn right() -> InputSnapshot {
    InputSnapshot::new(false, true, false, false)
}

pub fn jump_pressed() -> InputSnapshot {
    InputSnapshot::new(false, false, true, true)
}

pub fn jump_held() -> InputSnapshot {
    InputSnapshot::new(false, false, true, false)
}
