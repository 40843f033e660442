use glam::Vec2;
use swing_engine::*;

use crate::block::Block;
use crate::bridge::Bridge;
use crate::wall::Wall;

const WORLD_W: f32 = 800.0;
const WORLD_H: f32 = 600.0;

// Collision categories
pub const WALL: CollisionCategory = CollisionCategory(1);
pub const SEGMENT: CollisionCategory = CollisionCategory(2);
pub const BLOCK: CollisionCategory = CollisionCategory(3);
pub const POST: CollisionCategory = CollisionCategory(4);

/// Terrain: (local endpoints, world position).
const WALLS: [([Vec2; 2], Vec2); 4] = [
    ([Vec2::ZERO, Vec2::new(250.0, 20.0)], Vec2::new(0.0, 290.0)),
    ([Vec2::ZERO, Vec2::new(-250.0, 20.0)], Vec2::new(800.0, 290.0)),
    ([Vec2::ZERO, Vec2::new(-100.0, 200.0)], Vec2::new(250.0, 310.0)),
    ([Vec2::ZERO, Vec2::new(100.0, 200.0)], Vec2::new(550.0, 310.0)),
];

const BRIDGE_SPAN: [Vec2; 2] = [Vec2::new(250.0, 310.0), Vec2::new(550.0, 310.0)];
const BRIDGE_SEGMENTS: usize = 10;
const BRIDGE_SAG: f32 = 0.0;

const BLOCK_COUNT: usize = 5;
/// Blocks never spawn within this distance of either side of the world.
const SPAWN_MARGIN: f32 = 200.0;

const BACKGROUND_Z: f32 = 0.0;
const LOGO_Z: f32 = 1.0;
const LOGO_LEFT: ImageId = ImageId(0);
const LOGO_RIGHT: ImageId = ImageId(1);

pub struct SwingBridge {
    walls: Vec<Wall>,
    blocks: Vec<Block>,
    bridge: Option<Bridge>,
}

impl SwingBridge {
    pub fn new() -> Self {
        Self {
            walls: Vec::new(),
            blocks: Vec::new(),
            bridge: None,
        }
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn bridge(&self) -> Option<&Bridge> {
        self.bridge.as_ref()
    }
}

impl Default for SwingBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SwingBridge {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            fixed_dt: 1.0 / 60.0,
            substeps: 10,
            gravity: [0.0, 10.0],
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) -> Result<(), GameError> {
        self.walls.clear();
        for (shape, position) in WALLS {
            self.walls.push(Wall::new(ctx, shape, position)?);
        }

        let spawn_width = (ctx.world_width() - 2.0 * SPAWN_MARGIN).max(0.0);
        self.blocks.clear();
        for _ in 0..BLOCK_COUNT {
            self.blocks.push(Block::new(ctx, SPAWN_MARGIN, spawn_width)?);
        }

        let bridge = Bridge::new(ctx, BRIDGE_SPAN, BRIDGE_SEGMENTS, BRIDGE_SAG).map_err(GameError::setup)?;
        self.bridge = Some(bridge);

        log::info!(
            "swing bridge ready: {} walls, {} blocks, {} bodies",
            self.walls.len(),
            self.blocks.len(),
            ctx.physics.body_count()
        );
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if input.key_pressed(KEY_ESCAPE) {
            ctx.request_quit();
            return;
        }

        for _ in 0..ctx.substeps().count() {
            if let Some(bridge) = &self.bridge {
                bridge.update(&mut ctx.physics);
            }
            for block in &mut self.blocks {
                block.update(ctx);
            }
            ctx.step_physics();
        }
    }

    fn render(&self, ctx: &mut RenderContext) {
        let physics = &ctx.engine.physics;
        let (w, h) = (ctx.engine.world_width(), ctx.engine.world_height());

        for block in &self.blocks {
            block.draw(physics, ctx.draw);
        }
        for wall in &self.walls {
            wall.draw(ctx.draw);
        }
        if let Some(bridge) = &self.bridge {
            bridge.draw(physics, ctx.draw);
        }

        ctx.draw.draw_quad(
            [Vec2::ZERO, Vec2::new(w, 0.0), Vec2::new(0.0, h), Vec2::new(w, h)],
            [Color::WHITE, Color::WHITE, Color::GRAY, Color::GRAY],
            BACKGROUND_Z,
        );
        ctx.draw.draw_image(LOGO_RIGHT, Vec2::new(w - 83.0, h - 43.0), LOGO_Z);
        ctx.draw.draw_image(LOGO_LEFT, Vec2::new(10.0, h - 43.0), LOGO_Z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (SwingBridge, EngineContext) {
        let mut game = SwingBridge::new();
        let mut ctx = EngineContext::from_config(&game.config());
        game.init(&mut ctx).unwrap();
        (game, ctx)
    }

    #[test]
    fn init_builds_the_scene() {
        let (game, ctx) = started();
        assert_eq!(game.walls().len(), 4);
        assert_eq!(game.blocks().len(), BLOCK_COUNT);
        assert_eq!(game.bridge().map(|b| b.segments().len()), Some(BRIDGE_SEGMENTS));
        assert_eq!(ctx.physics.body_count(), 4 + BLOCK_COUNT + BRIDGE_SEGMENTS + 2);
        assert_eq!(ctx.physics.joint_count(), BRIDGE_SEGMENTS + 1);
        assert_eq!(ctx.physics.collision_rule(BLOCK, SEGMENT), CollisionRule::Collide);
        assert_eq!(ctx.physics.collision_rule(BLOCK, WALL), CollisionRule::Collide);
    }

    #[test]
    fn blocks_fall_during_a_frame() {
        let (mut game, mut ctx) = started();
        let total_height = |game: &SwingBridge, ctx: &EngineContext| -> f32 {
            game.blocks()
                .iter()
                .map(|b| ctx.physics.position(&b.body().body).y)
                .sum()
        };
        let before = total_height(&game, &ctx);
        ctx.clock.advance(16.0);
        game.update(&mut ctx, &InputQueue::new());
        assert!(total_height(&game, &ctx) > before);
    }

    #[test]
    fn bridge_never_reports_wall_contacts() {
        let (mut game, mut ctx) = started();
        let input = InputQueue::new();
        for _ in 0..60 {
            ctx.clear_frame_data();
            ctx.clock.advance(1000.0 / 60.0);
            game.update(&mut ctx, &input);
            assert!(!ctx.collisions().iter().any(|e| e.is_between(SEGMENT, WALL)));
            assert!(!ctx.collisions().iter().any(|e| e.is_between(SEGMENT, SEGMENT)));
        }
        // Recycling keeps the body count steady.
        assert_eq!(ctx.physics.body_count(), 4 + BLOCK_COUNT + BRIDGE_SEGMENTS + 2);
    }

    #[test]
    fn escape_requests_quit_without_stepping() {
        let (mut game, mut ctx) = started();
        let first = game.blocks()[0].body().body;
        let y = ctx.physics.position(&first).y;

        let mut input = InputQueue::new();
        input.push(InputEvent::KeyDown { key_code: KEY_ESCAPE });
        game.update(&mut ctx, &input);

        assert!(ctx.quit_requested());
        assert_eq!(ctx.physics.position(&first).y, y);
    }

    #[test]
    fn render_emits_every_layer() {
        let (game, ctx) = started();
        let mut draw = DrawList::new();
        game.render(&mut RenderContext {
            draw: &mut draw,
            engine: &ctx,
        });

        // Block diamonds plus the background.
        assert_eq!(draw.quad_count() as usize, BLOCK_COUNT + 1);
        // Wall lines plus four edges per plank.
        assert_eq!(draw.line_count() as usize, 4 + BRIDGE_SEGMENTS * 4);
        assert_eq!(draw.image_count(), 2);
        assert!(draw.lines.iter().any(|l| l.z == 3.0));
        assert!(draw.quads.iter().any(|q| q.z == BACKGROUND_Z));
    }
}
