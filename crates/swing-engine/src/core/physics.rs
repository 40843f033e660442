use glam::Vec2;
use rapier2d::na;
use rapier2d::prelude::*;
use std::sync::Mutex;

use crate::api::types::EntityId;
use crate::core::collision::{CollisionCategory, CollisionRule, CollisionTable};
use crate::core::pose;
use crate::error::PhysicsError;

/// Anchor separations at or below this are pinned with a revolute joint.
const PIN_EPSILON: f32 = 1e-3;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> na::Vector2<f32> {
    na::Vector2::new(v.x, v.y)
}

fn vec2_to_point(v: Vec2) -> na::Point2<f32> {
    na::Point2::new(v.x, v.y)
}

fn na_to_vec2(v: &na::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Shoelace area; positive for counter-clockwise winding.
fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn interaction_groups(table: &CollisionTable, category: CollisionCategory) -> (InteractionGroups, InteractionGroups) {
    let membership = Group::from_bits_truncate(category.bit());
    let contacts = InteractionGroups::new(membership, Group::from_bits_truncate(table.contact_filter(category)));
    let solver = InteractionGroups::new(membership, Group::from_bits_truncate(table.solver_filter(category)));
    (contacts, solver)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How a body responds to forces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Moved by gravity, contacts and joints.
    Dynamic { mass: f32, inertia: f32 },
    /// Takes part in contacts and joints but never moves.
    Static,
}

impl BodyKind {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyKind::Dynamic { .. } => RigidBodyType::Dynamic,
            BodyKind::Static => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider, in the body's local frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderDesc {
    /// Line segment from `a` to `b`, thickened by `radius`.
    Segment { a: Vec2, b: Vec2, radius: f32 },
    /// Convex polygon; `offset` shifts every vertex.
    Polygon { vertices: Vec<Vec2>, offset: Vec2 },
}

impl ColliderDesc {
    /// Axis-aligned rectangle centered on the body.
    pub fn rect(half_width: f32, half_height: f32) -> Self {
        ColliderDesc::Polygon {
            vertices: vec![
                Vec2::new(-half_width, -half_height),
                Vec2::new(-half_width, half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(half_width, -half_height),
            ],
            offset: Vec2::ZERO,
        }
    }

    /// Square centered on the body.
    pub fn square(half_size: f32) -> Self {
        Self::rect(half_size, half_size)
    }

    fn build_collider(&self) -> Result<ColliderBuilder, PhysicsError> {
        match self {
            ColliderDesc::Segment { a, b, radius } => {
                if *radius > 0.0 {
                    Ok(ColliderBuilder::capsule_from_endpoints(
                        vec2_to_point(*a),
                        vec2_to_point(*b),
                        *radius,
                    ))
                } else {
                    Ok(ColliderBuilder::segment(vec2_to_point(*a), vec2_to_point(*b)))
                }
            }
            ColliderDesc::Polygon { vertices, offset } => {
                let area = signed_area(vertices);
                if vertices.len() < 3 || area.abs() <= f32::EPSILON {
                    return Err(PhysicsError::DegeneratePolygon(vertices.len()));
                }
                // Rapier wants counter-clockwise hulls.
                let mut points: Vec<_> = vertices.iter().map(|v| vec2_to_point(*v)).collect();
                if area < 0.0 {
                    points.reverse();
                }
                ColliderBuilder::convex_polyline(points)
                    .map(|builder| builder.translation(vec2_to_na(*offset)))
                    .ok_or(PhysicsError::DegeneratePolygon(vertices.len()))
            }
        }
    }
}

/// Surface properties of a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec2,
    /// Orientation in standard radians.
    pub angle: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

impl BodyDesc {
    /// A dynamic body with explicit mass and moment of inertia.
    pub fn dynamic(mass: f32, inertia: f32) -> Self {
        Self::new(BodyKind::Dynamic { mass, inertia })
    }

    /// An immovable body.
    pub fn fixed() -> Self {
        Self::new(BodyKind::Static)
    }

    fn new(kind: BodyKind) -> Self {
        Self {
            kind,
            position: Vec2::ZERO,
            angle: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_angular_velocity(mut self, angvel: f32) -> Self {
        self.angular_velocity = angvel;
        self
    }
}

/// Handle to a rigid body, tagged with the entity that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyHandle {
    pub entity: EntityId,
    pub(crate) raw: RigidBodyHandle,
}

/// Handle to a collider attached to a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeHandle(pub(crate) ColliderHandle);

/// Handle to a joint in the physics simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointHandle(pub(crate) ImpulseJointHandle);

/// Body plus its single collider, the common case for game objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body: BodyHandle,
    pub shape: ShapeHandle,
}

/// A collision event between two colliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub category_a: CollisionCategory,
    pub category_b: CollisionCategory,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// Whether this pair is between the two given categories, in either order.
    pub fn is_between(&self, a: CollisionCategory, b: CollisionCategory) -> bool {
        (self.category_a == a && self.category_b == b) || (self.category_a == b && self.category_b == a)
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        let mut guard = self.collisions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owns every body, collider and joint, the gravity vector and the
/// collision-category table. Wraps the Rapier2D pipeline behind a small API.
pub struct PhysicsWorld {
    gravity: na::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    collision_table: CollisionTable,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Y points down, so positive Y gravity pulls bodies toward the bottom of the screen.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            collision_table: CollisionTable::new(),
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vec2_to_na(gravity);
    }

    pub fn gravity(&self) -> Vec2 {
        na_to_vec2(&self.gravity)
    }

    /// Set the integration timestep used by every `step_into` call.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    // -- Bodies and colliders --

    /// Create a rigid body with no colliders. The EntityId is stored in the
    /// body's `user_data` for collision lookups.
    pub fn create_body(&mut self, entity: EntityId, desc: &BodyDesc) -> BodyHandle {
        let mut builder = RigidBodyBuilder::new(desc.kind.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.angle)
            .linvel(vec2_to_na(desc.velocity))
            .angvel(desc.angular_velocity)
            .user_data(entity.0 as u128);
        if let BodyKind::Dynamic { mass, inertia } = desc.kind {
            builder = builder.additional_mass_properties(MassProperties::new(na::Point2::origin(), mass, inertia));
        }
        let raw = self.bodies.insert(builder.build());
        BodyHandle { entity, raw }
    }

    /// Attach a collider to an existing body. Colliders add no mass; the
    /// body's mass and inertia come from its `BodyKind`.
    pub fn attach_collider(
        &mut self,
        body: &BodyHandle,
        desc: &ColliderDesc,
        material: ColliderMaterial,
        category: CollisionCategory,
    ) -> Result<ShapeHandle, PhysicsError> {
        if !self.bodies.contains(body.raw) {
            return Err(PhysicsError::UnknownBody(body.entity));
        }
        let builder = desc.build_collider()?;
        Ok(self.insert_collider(body, builder, material, category))
    }

    /// Create a body and one collider in a single call. The shape is validated
    /// before the body is created, so a failure leaves the world untouched.
    pub fn spawn(
        &mut self,
        entity: EntityId,
        desc: &BodyDesc,
        collider: &ColliderDesc,
        material: ColliderMaterial,
        category: CollisionCategory,
    ) -> Result<PhysicsBody, PhysicsError> {
        let builder = collider.build_collider()?;
        let body = self.create_body(entity, desc);
        let shape = self.insert_collider(&body, builder, material, category);
        Ok(PhysicsBody { body, shape })
    }

    fn insert_collider(
        &mut self,
        body: &BodyHandle,
        builder: ColliderBuilder,
        material: ColliderMaterial,
        category: CollisionCategory,
    ) -> ShapeHandle {
        let (contacts, solver) = interaction_groups(&self.collision_table, category);
        let collider = builder
            .restitution(material.restitution)
            .friction(material.friction)
            .density(0.0)
            .collision_groups(contacts)
            .solver_groups(solver)
            .user_data(category.to_user_data())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        ShapeHandle(self.colliders.insert_with_parent(collider, body.raw, &mut self.bodies))
    }

    /// Remove a body together with its colliders and joints.
    pub fn remove_body(&mut self, body: &BodyHandle) {
        self.bodies.remove(
            body.raw,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Remove a single collider, leaving its body in place.
    pub fn remove_collider(&mut self, shape: ShapeHandle) -> Result<(), PhysicsError> {
        self.colliders
            .remove(shape.0, &mut self.island_manager, &mut self.bodies, true)
            .map(|_| ())
            .ok_or(PhysicsError::UnknownCollider)
    }

    /// Whether the body is still part of the world.
    pub fn contains(&self, body: &BodyHandle) -> bool {
        self.bodies.contains(body.raw)
    }

    /// Category the collider was created with.
    pub fn collider_category(&self, shape: ShapeHandle) -> Option<CollisionCategory> {
        self.colliders
            .get(shape.0)
            .map(|c| CollisionCategory::from_user_data(c.user_data))
    }

    // -- Collision categories --

    /// Set how two categories interact. Applies to existing and future colliders.
    pub fn set_collision_rule(&mut self, a: CollisionCategory, b: CollisionCategory, rule: CollisionRule) {
        self.collision_table.set(a, b, rule);
        for (_, collider) in self.colliders.iter_mut() {
            let category = CollisionCategory::from_user_data(collider.user_data);
            let (contacts, solver) = interaction_groups(&self.collision_table, category);
            collider.set_collision_groups(contacts);
            collider.set_solver_groups(solver);
        }
    }

    pub fn collision_rule(&self, a: CollisionCategory, b: CollisionCategory) -> CollisionRule {
        self.collision_table.rule(a, b)
    }

    // -- Joints --

    /// Pin two bodies together at local anchors. The current world-space
    /// distance between the anchors is the distance held from now on; both
    /// bodies stay free to rotate about their anchor.
    pub fn create_pin(
        &mut self,
        body_a: &BodyHandle,
        body_b: &BodyHandle,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> Result<JointHandle, PhysicsError> {
        for body in [body_a, body_b] {
            if !self.bodies.contains(body.raw) {
                return Err(PhysicsError::UnknownBody(body.entity));
            }
        }

        let length = self
            .world_point(body_a, anchor_a)
            .distance(self.world_point(body_b, anchor_b));

        let joint: GenericJoint = if length <= PIN_EPSILON {
            RevoluteJointBuilder::new()
                .local_anchor1(vec2_to_point(anchor_a))
                .local_anchor2(vec2_to_point(anchor_b))
                .contacts_enabled(false)
                .build()
                .into()
        } else {
            GenericJointBuilder::new(JointAxesMask::empty())
                .coupled_axes(JointAxesMask::LIN_AXES)
                .limits(JointAxis::LinX, [length, length])
                .local_anchor1(vec2_to_point(anchor_a))
                .local_anchor2(vec2_to_point(anchor_b))
                .contacts_enabled(false)
                .build()
        };

        let handle = self.impulse_joints.insert(body_a.raw, body_b.raw, joint, true);
        Ok(JointHandle(handle))
    }

    /// Remove a joint from the simulation.
    pub fn remove_joint(&mut self, handle: JointHandle) {
        self.impulse_joints.remove(handle.0, true);
    }

    // -- Stepping --

    /// Integrate one step of `dt` and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            if let (Some((entity_a, category_a)), Some((entity_b, category_b))) =
                (self.collider_owner(h1), self.collider_owner(h2))
            {
                collision_events.push(CollisionPair {
                    entity_a,
                    entity_b,
                    category_a,
                    category_b,
                    started,
                });
            }
        }
    }

    /// Drop forces and torques accumulated on a body since the last step.
    pub fn clear_forces(&mut self, body: &BodyHandle) {
        if let Some(rb) = self.bodies.get_mut(body.raw) {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
    }

    /// Apply a continuous force; it stays until `clear_forces`.
    pub fn apply_force(&mut self, body: &BodyHandle, force: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.raw) {
            rb.add_force(vec2_to_na(force), true);
        }
    }

    // -- Body state --

    /// Current position and angle of a body.
    pub fn pose(&self, body: &BodyHandle) -> (Vec2, f32) {
        self.bodies
            .get(body.raw)
            .map(|rb| (na_to_vec2(rb.translation()), rb.rotation().angle()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    pub fn position(&self, body: &BodyHandle) -> Vec2 {
        self.pose(body).0
    }

    /// Orientation in standard radians.
    pub fn angle(&self, body: &BodyHandle) -> f32 {
        self.pose(body).1
    }

    pub fn set_position(&mut self, body: &BodyHandle, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.raw) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    pub fn set_angle(&mut self, body: &BodyHandle, angle: f32) {
        if let Some(rb) = self.bodies.get_mut(body.raw) {
            rb.set_rotation(na::UnitComplex::new(angle), true);
        }
    }

    pub fn velocity(&self, body: &BodyHandle) -> Vec2 {
        self.bodies
            .get(body.raw)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_velocity(&mut self, body: &BodyHandle, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.raw) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    pub fn angular_velocity(&self, body: &BodyHandle) -> f32 {
        self.bodies.get(body.raw).map(|rb| rb.angvel()).unwrap_or(0.0)
    }

    pub fn set_angular_velocity(&mut self, body: &BodyHandle, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.raw) {
            rb.set_angvel(angvel, true);
        }
    }

    /// World-space position of a point given in the body's local frame.
    pub fn world_point(&self, body: &BodyHandle, local: Vec2) -> Vec2 {
        let (pos, angle) = self.pose(body);
        pose::rotate_point(local, angle, pos)
    }

    // -- Counters --

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    // -- private helpers --

    fn collider_owner(&self, collider_handle: ColliderHandle) -> Option<(EntityId, CollisionCategory)> {
        let collider = self.colliders.get(collider_handle)?;
        let body = self.bodies.get(collider.parent()?)?;
        Some((
            EntityId(body.user_data as u32),
            CollisionCategory::from_user_data(collider.user_data),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
