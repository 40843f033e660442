use glam::Vec2;
use std::f32::consts::PI;
use swing_engine::*;

use crate::game::BLOCK;

pub const BLOCK_HALF_SIZE: f32 = 6.0;
/// Lifetime of a block before it is recycled, in milliseconds.
pub const BLOCK_TTL_MS: u64 = 3000;
/// Blocks spawn this far above the top of the world, at most.
pub const SPAWN_DEPTH: f32 = 50.0;

const BLOCK_MASS: f32 = 50.0;
const BLOCK_INERTIA: f32 = 60.0;
const START_ANGLE: f32 = 3.0 * PI / 2.0;
const BLOCK_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 1.0,
    friction: 0.3,
};
const BLOCK_Z: f32 = 2.0;

/// A falling block that respawns above the world when it drops out of view
/// or outlives its TTL.
pub struct Block {
    id: EntityId,
    body: PhysicsBody,
    expires_at: u64,
    spawn_min_x: f32,
    spawn_width: f32,
}

impl Block {
    /// Spawn a block somewhere in `[spawn_min_x, spawn_min_x + spawn_width)`
    /// horizontally, just above the world.
    pub fn new(ctx: &mut EngineContext, spawn_min_x: f32, spawn_width: f32) -> Result<Self, PhysicsError> {
        let id = ctx.next_id();
        let (body, expires_at) = Self::spawn(ctx, id, spawn_min_x, spawn_width)?;
        Ok(Self {
            id,
            body,
            expires_at,
            spawn_min_x,
            spawn_width,
        })
    }

    fn spawn(
        ctx: &mut EngineContext,
        id: EntityId,
        spawn_min_x: f32,
        spawn_width: f32,
    ) -> Result<(PhysicsBody, u64), PhysicsError> {
        let x = ctx.rng.range(spawn_min_x, spawn_min_x + spawn_width);
        let y = ctx.rng.range(-SPAWN_DEPTH, 0.0);
        let body = ctx.physics.spawn(
            id,
            &BodyDesc::dynamic(BLOCK_MASS, BLOCK_INERTIA)
                .with_position(Vec2::new(x, y))
                .with_angle(START_ANGLE),
            &ColliderDesc::square(BLOCK_HALF_SIZE),
            BLOCK_MATERIAL,
            BLOCK,
        )?;
        Ok((body, ctx.now_millis() + BLOCK_TTL_MS))
    }

    /// Replace the physics body with a fresh one at a new random pose and
    /// restart the TTL. On failure the old body is kept.
    pub fn reset(&mut self, ctx: &mut EngineContext) -> Result<(), PhysicsError> {
        let (body, expires_at) = Self::spawn(ctx, self.id, self.spawn_min_x, self.spawn_width)?;
        ctx.physics.remove_body(&self.body.body);
        self.body = body;
        self.expires_at = expires_at;
        Ok(())
    }

    /// Recycle the block if it fell out of the world or expired, then clear
    /// its accumulated forces. Runs before each substep.
    pub fn update(&mut self, ctx: &mut EngineContext) {
        let y = ctx.physics.position(&self.body.body).y;
        let fell_out = y > ctx.world_height();
        let expired = ctx.now_millis() >= self.expires_at;
        if fell_out || expired {
            log::debug!("recycling block {:?} (fell_out={}, expired={})", self.id, fell_out, expired);
            if let Err(err) = self.reset(ctx) {
                log::error!("failed to recycle block {:?}: {}", self.id, err);
            }
        }
        ctx.physics.clear_forces(&self.body.body);
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// The square drawn as a diamond: corners at 45° off the body's heading,
    /// ordered top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self, physics: &PhysicsWorld) -> [Vec2; 4] {
        let (position, angle) = physics.pose(&self.body.body);
        let heading = radians_to_drawing(angle);
        let radius = BLOCK_HALF_SIZE * std::f32::consts::SQRT_2;
        [-45.0, 45.0, -135.0, 135.0].map(|offset| position + drawing_offset(heading + offset, radius))
    }

    pub fn draw(&self, physics: &PhysicsWorld, draw: &mut DrawList) {
        draw.draw_quad(self.corners(physics), [Color::BLACK; 4], BLOCK_Z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weightless() -> EngineContext {
        EngineContext::from_config(&GameConfig {
            gravity: [0.0, 0.0],
            ..GameConfig::default()
        })
    }

    #[test]
    fn reset_stays_inside_spawn_region() {
        let mut ctx = weightless();
        let mut block = Block::new(&mut ctx, 200.0, 400.0).unwrap();
        for frame in 0..50 {
            ctx.clock.advance(16.0);
            block.reset(&mut ctx).unwrap();
            let pos = ctx.physics.position(&block.body().body);
            assert!((200.0..600.0).contains(&pos.x), "frame {frame}: x={}", pos.x);
            assert!((-SPAWN_DEPTH..0.0).contains(&pos.y), "frame {frame}: y={}", pos.y);
            assert!(block.expires_at() > ctx.now_millis());
        }
        assert_eq!(ctx.physics.body_count(), 1);
    }

    #[test]
    fn expired_block_resets_without_falling() {
        let mut ctx = weightless();
        let mut block = Block::new(&mut ctx, 200.0, 400.0).unwrap();
        let first = *block.body();

        ctx.clock.advance(2999.0);
        block.update(&mut ctx);
        assert_eq!(*block.body(), first);

        ctx.clock.advance(2.0);
        block.update(&mut ctx);
        assert_ne!(*block.body(), first);
        assert!(!ctx.physics.contains(&first.body));
        assert_eq!(block.expires_at(), 3001 + BLOCK_TTL_MS);
        assert_eq!(ctx.physics.body_count(), 1);
    }

    #[test]
    fn block_below_world_resets() {
        let mut ctx = weightless();
        let mut block = Block::new(&mut ctx, 200.0, 400.0).unwrap();
        let first = *block.body();
        ctx.physics.set_position(&first.body, Vec2::new(300.0, 601.0));
        block.update(&mut ctx);
        assert_ne!(*block.body(), first);
        assert!(ctx.physics.position(&block.body().body).y < 0.0);
    }

    #[test]
    fn update_clears_forces() {
        let mut ctx = weightless();
        let mut block = Block::new(&mut ctx, 200.0, 400.0).unwrap();
        ctx.physics.apply_force(&block.body().body, Vec2::new(0.0, 1000.0));
        block.update(&mut ctx);
        ctx.step_physics();
        assert_eq!(ctx.physics.velocity(&block.body().body), Vec2::ZERO);
    }

    #[test]
    fn starting_diamond_corners() {
        let mut ctx = weightless();
        let block = Block::new(&mut ctx, 200.0, 400.0).unwrap();
        let pos = ctx.physics.position(&block.body().body);
        let [tl, tr, bl, br] = block.corners(&ctx.physics);

        // Heading 3π/2 is a drawing angle of 360°, i.e. straight up.
        let r = BLOCK_HALF_SIZE;
        for (corner, expected) in [
            (tl, Vec2::new(-r, -r)),
            (tr, Vec2::new(r, -r)),
            (bl, Vec2::new(-r, r)),
            (br, Vec2::new(r, r)),
        ] {
            assert!((corner - pos).distance(expected) < 1e-3, "{corner} vs {expected}");
        }
    }
}
