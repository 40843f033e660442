use glam::Vec2;
use serde::Deserialize;

use crate::api::types::EntityId;
use crate::core::time::{FrameClock, Substeps};
use crate::error::GameError;
use crate::input::queue::InputQueue;
use crate::renderer::draw::DrawList;
use crate::systems::rng::Rng;
#[cfg(feature = "physics")]
use crate::core::physics::{CollisionPair, PhysicsWorld};

/// Configuration for the engine, provided by the game.
/// Every field has a default, so a JSON override may name only what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units. Also the lower bound games use for
    /// "fell off the world".
    pub world_height: f32,
    /// Duration of one physics substep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Physics substeps per rendered frame (default: 10).
    pub substeps: u32,
    /// Gravity vector. Y points down, so positive Y pulls toward the bottom.
    pub gravity: [f32; 2],
    /// Seed for the context RNG.
    pub seed: u64,
    /// Initial capacity of the draw list.
    pub max_draw_commands: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            fixed_dt: 1.0 / 60.0,
            substeps: 10,
            gravity: [0.0, 10.0],
            seed: 42,
            max_draw_commands: 256,
        }
    }
}

impl GameConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::from(self.gravity)
    }

    pub fn substep_schedule(&self) -> Substeps {
        Substeps::new(self.fixed_dt, self.substeps)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the world. An error here is fatal: the host stays uninitialized.
    fn init(&mut self, ctx: &mut EngineContext) -> Result<(), GameError>;

    /// One rendered frame. Games run their substep loop here, calling
    /// `ctx.step_physics()` once per substep.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Read-only render pass that fills the draw list.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub clock: FrameClock,
    pub rng: Rng,
    substeps: Substeps,
    world_size: Vec2,
    next_id: u32,
    quit_requested: bool,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Create a context whose world, clock and RNG follow `config`.
    pub fn from_config(config: &GameConfig) -> Self {
        let substeps = config.substep_schedule();
        #[cfg(feature = "physics")]
        let physics = {
            let mut world = PhysicsWorld::new(config.gravity());
            world.set_dt(substeps.dt());
            world
        };
        Self {
            clock: FrameClock::new(),
            rng: Rng::new(config.seed),
            substeps,
            world_size: Vec2::new(config.world_width, config.world_height),
            next_id: 1,
            quit_requested: false,
            #[cfg(feature = "physics")]
            physics,
            #[cfg(feature = "physics")]
            collision_events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Milliseconds since start-up, as advanced by the host.
    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    pub fn substeps(&self) -> Substeps {
        self.substeps
    }

    pub fn world_width(&self) -> f32 {
        self.world_size.x
    }

    pub fn world_height(&self) -> f32 {
        self.world_size.y
    }

    /// Ask the host to stop after this frame.
    pub fn request_quit(&mut self) {
        if !self.quit_requested {
            log::info!("quit requested");
        }
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Clear per-frame transient data (collision events).
    pub fn clear_frame_data(&mut self) {
        #[cfg(feature = "physics")]
        self.collision_events.clear();
    }

    /// Collision events gathered by every substep of the current frame.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Integrate one physics substep.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.physics.step_into(&mut self.collision_events);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for the read-only render pass.
pub struct RenderContext<'a> {
    pub draw: &'a mut DrawList,
    pub engine: &'a EngineContext,
}


#[cfg(test)]
#[cfg(feature = "physics")]
mod physics_tests {
    use super::*;
    use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};
    use crate::core::collision::CollisionCategory;

    #[test]
    fn step_physics_moves_bodies_under_configured_gravity() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        let block = ctx
            .physics
            .spawn(
                id,
                &BodyDesc::dynamic(50.0, 60.0).with_position(Vec2::new(100.0, 0.0)),
                &ColliderDesc::square(6.0),
                ColliderMaterial::default(),
                CollisionCategory::DEFAULT,
            )
            .unwrap();

        for _ in 0..ctx.substeps().count() {
            ctx.step_physics();
        }

        let pos = ctx.physics.position(&block.body);
        assert!(pos.y > 0.0, "Block should have moved down: y={}", pos.y);
    }

    #[test]
    fn frame_collisions_accumulate_until_cleared() {
        let mut ctx = EngineContext::from_config(&GameConfig {
            gravity: [0.0, 0.0],
            ..GameConfig::default()
        });
        for (x, vx) in [(0.0, 100.0), (20.0, -100.0)] {
            let id = ctx.next_id();
            ctx.physics
                .spawn(
                    id,
                    &BodyDesc::dynamic(1.0, 1.0)
                        .with_position(Vec2::new(x, 0.0))
                        .with_velocity(Vec2::new(vx, 0.0)),
                    &ColliderDesc::square(5.0),
                    ColliderMaterial::default(),
                    CollisionCategory::DEFAULT,
                )
                .unwrap();
        }

        for _ in 0..30 {
            ctx.step_physics();
        }
        assert!(!ctx.collisions().is_empty());
        ctx.clear_frame_data();
        assert!(ctx.collisions().is_empty());
    }
}
