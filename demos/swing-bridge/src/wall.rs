use glam::Vec2;
use swing_engine::*;

use crate::game::WALL;

const WALL_RADIUS: f32 = 1.0;
const WALL_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.1,
    friction: 0.5,
};
const WALL_Z: f32 = 1.0;

/// Immovable terrain segment. Never changes after creation.
pub struct Wall {
    body: PhysicsBody,
    position: Vec2,
    shape: [Vec2; 2],
}

impl Wall {
    /// Register a fixed segment from `shape[0]` to `shape[1]`, both relative to `position`.
    pub fn new(ctx: &mut EngineContext, shape: [Vec2; 2], position: Vec2) -> Result<Self, PhysicsError> {
        let id = ctx.next_id();
        let body = ctx.physics.spawn(
            id,
            &BodyDesc::fixed().with_position(position),
            &ColliderDesc::Segment {
                a: shape[0],
                b: shape[1],
                radius: WALL_RADIUS,
            },
            WALL_MATERIAL,
            WALL,
        )?;
        Ok(Self { body, position, shape })
    }

    /// World-space endpoints.
    pub fn endpoints(&self) -> [Vec2; 2] {
        self.shape.map(|offset| self.position + offset)
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn draw(&self, draw: &mut DrawList) {
        let [a, b] = self.endpoints();
        draw.draw_line(a, b, Color::BLACK, WALL_Z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_offsets_from_position() {
        let mut ctx = EngineContext::new();
        let wall = Wall::new(
            &mut ctx,
            [Vec2::ZERO, Vec2::new(250.0, 20.0)],
            Vec2::new(0.0, 290.0),
        )
        .unwrap();
        assert_eq!(wall.endpoints(), [Vec2::new(0.0, 290.0), Vec2::new(250.0, 310.0)]);
    }

    #[test]
    fn wall_stays_put_under_gravity() {
        let mut ctx = EngineContext::new();
        let wall = Wall::new(
            &mut ctx,
            [Vec2::ZERO, Vec2::new(-100.0, 200.0)],
            Vec2::new(250.0, 310.0),
        )
        .unwrap();
        for _ in 0..60 {
            ctx.step_physics();
        }
        assert_eq!(ctx.physics.position(&wall.body().body), Vec2::new(250.0, 310.0));
        assert_eq!(ctx.physics.collider_category(wall.body().shape), Some(WALL));
    }

    #[test]
    fn draws_one_line() {
        let mut ctx = EngineContext::new();
        let wall = Wall::new(&mut ctx, [Vec2::ZERO, Vec2::X], Vec2::ZERO).unwrap();
        let mut list = DrawList::new();
        wall.draw(&mut list);
        assert_eq!(list.line_count(), 1);
    }
}
