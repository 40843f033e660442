/// Unique identifier for a game object. Stored in its physics body's
/// `user_data` so collision reports can name both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);
