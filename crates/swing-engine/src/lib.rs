pub mod api;
pub mod core;
pub mod error;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::EntityId;
pub use crate::core::collision::{CollisionCategory, CollisionRule, CollisionTable};
pub use crate::core::pose::{drawing_offset, drawing_to_radians, radians_to_drawing, rotate_point};
pub use crate::core::time::{FrameClock, Substeps};
pub use error::{GameError, PhysicsError};
pub use input::queue::{InputEvent, InputQueue, KEY_ESCAPE};
pub use renderer::draw::{Color, DrawList, ImageId};
pub use systems::rng::Rng;

#[cfg(feature = "physics")]
pub use crate::core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyKind, BodyHandle, ShapeHandle,
    ColliderDesc, ColliderMaterial, CollisionPair, JointHandle,
};
