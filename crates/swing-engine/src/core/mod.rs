pub mod collision;
#[cfg(feature = "physics")]
pub mod physics;
pub mod pose;
pub mod time;
