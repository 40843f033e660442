pub mod draw;

pub use draw::{Color, DrawList, ImageCommand, ImageId, LineCommand, QuadCommand};
