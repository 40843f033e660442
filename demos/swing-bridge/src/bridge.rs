use glam::Vec2;
use swing_engine::*;
use thiserror::Error;

use crate::game::{POST, SEGMENT, WALL};

/// Half thickness of a bridge plank.
pub const BRIDGE_WIDTH: f32 = 2.0;

const SEGMENT_MASS: f32 = 60.0;
const SEGMENT_INERTIA: f32 = 10_000.0;
const SEGMENT_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.1,
    friction: 1.0,
};
const POST_HALF_SIZE: f32 = 1.0;
const BRIDGE_Z: f32 = 3.0;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("a bridge needs at least one segment")]
    NoSegments,
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// Chain of planks pinned edge to edge, hung between two fixed posts.
pub struct Bridge {
    segments: Vec<PhysicsBody>,
    posts: [PhysicsBody; 2],
    joints: Vec<JointHandle>,
    half_length: f32,
}

impl Bridge {
    /// Build a bridge from `endpoints[0]` to `endpoints[1]`. `sag` lengthens
    /// the chain beyond the straight span.
    pub fn new(
        ctx: &mut EngineContext,
        endpoints: [Vec2; 2],
        segments: usize,
        sag: f32,
    ) -> Result<Self, BridgeError> {
        if segments == 0 {
            return Err(BridgeError::NoSegments);
        }

        let [start, end] = endpoints;
        let half_length = (start.distance(end) + sag) / segments as f32 / 2.0;
        let heading = (end - start).normalize_or_zero();
        let angle = heading.y.atan2(heading.x);

        let physics = &mut ctx.physics;
        physics.set_collision_rule(SEGMENT, SEGMENT, CollisionRule::Ignore);
        physics.set_collision_rule(SEGMENT, WALL, CollisionRule::Ignore);
        physics.set_collision_rule(SEGMENT, POST, CollisionRule::Ignore);

        let plank = ColliderDesc::rect(half_length, BRIDGE_WIDTH);
        let mut bodies = Vec::with_capacity(segments);
        for i in 0..segments {
            let id = ctx.next_id();
            let position = start + heading * (half_length * 2.0 * i as f32);
            bodies.push(ctx.physics.spawn(
                id,
                &BodyDesc::dynamic(SEGMENT_MASS, SEGMENT_INERTIA)
                    .with_position(position)
                    .with_angle(angle),
                &plank,
                SEGMENT_MATERIAL,
                SEGMENT,
            )?);
        }

        let mut posts = Vec::with_capacity(2);
        for anchor in endpoints {
            let id = ctx.next_id();
            posts.push(ctx.physics.spawn(
                id,
                &BodyDesc::fixed().with_position(anchor),
                &ColliderDesc::square(POST_HALF_SIZE),
                SEGMENT_MATERIAL,
                POST,
            )?);
        }
        let posts = [posts[0], posts[1]];

        let leading = Vec2::new(-half_length, -BRIDGE_WIDTH);
        let trailing = Vec2::new(half_length, -BRIDGE_WIDTH);
        let mut joints = Vec::with_capacity(segments + 1);
        for pair in bodies.windows(2) {
            joints.push(ctx.physics.create_pin(&pair[0].body, &pair[1].body, trailing, leading)?);
        }
        let (first, last) = (bodies[0], bodies[segments - 1]);
        joints.push(ctx.physics.create_pin(&posts[0].body, &first.body, Vec2::ZERO, leading)?);
        joints.push(ctx.physics.create_pin(&posts[1].body, &last.body, Vec2::ZERO, trailing)?);

        log::info!(
            "bridge built: {} segments, half length {:.2}, {} joints",
            segments,
            half_length,
            joints.len()
        );

        Ok(Self {
            segments: bodies,
            posts,
            joints,
            half_length,
        })
    }

    /// Clear forces accumulated on every segment. Runs before each substep.
    pub fn update(&self, physics: &mut PhysicsWorld) {
        for segment in &self.segments {
            physics.clear_forces(&segment.body);
        }
    }

    pub fn half_length(&self) -> f32 {
        self.half_length
    }

    pub fn segments(&self) -> &[PhysicsBody] {
        &self.segments
    }

    pub fn posts(&self) -> &[PhysicsBody; 2] {
        &self.posts
    }

    pub fn joints(&self) -> &[JointHandle] {
        &self.joints
    }

    /// World-space corners of one plank, in outline order.
    pub fn corners_of(&self, physics: &PhysicsWorld, index: usize) -> Option<[Vec2; 4]> {
        let segment = self.segments.get(index)?;
        let (position, angle) = physics.pose(&segment.body);
        let (h, w) = (self.half_length, BRIDGE_WIDTH);
        Some(
            [
                Vec2::new(-h, -w),
                Vec2::new(h, -w),
                Vec2::new(h, w),
                Vec2::new(-h, w),
            ]
            .map(|corner| rotate_point(corner, angle, position)),
        )
    }

    /// Wireframe planks.
    pub fn draw(&self, physics: &PhysicsWorld, draw: &mut DrawList) {
        for index in 0..self.segments.len() {
            if let Some(corners) = self.corners_of(physics, index) {
                draw.draw_outline(&corners, Color::BLACK, BRIDGE_Z);
            }
        }
    }
}
