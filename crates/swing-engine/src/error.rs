use thiserror::Error;

use crate::api::types::EntityId;

/// Failures reported by the physics world while building bodies, colliders and joints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// A handle points at a body that was never added or has been removed.
    #[error("body of entity {0:?} is not part of the physics world")]
    UnknownBody(EntityId),
    /// A collider handle points at a collider that no longer exists.
    #[error("collider is not part of the physics world")]
    UnknownCollider,
    /// Polygon vertices do not span a convex hull with area.
    #[error("polygon collider needs at least three non-collinear vertices, got {0}")]
    DegeneratePolygon(usize),
}

/// Failures that abort `Game::init`. Any of these is fatal to start-up.
#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    /// Game-defined setup failure.
    #[error("scene setup failed: {0}")]
    Setup(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GameError {
    /// Wrap a game-defined error as a setup failure.
    pub fn setup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        GameError::Setup(Box::new(err))
    }
}
