use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Linear RGBA color, 4 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Identifier of an image the host has loaded (logo, overlay...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// A colored line segment. 9 floats per command.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct LineCommand {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub color: Color,
    /// Draw order; higher z draws on top.
    pub z: f32,
}

impl LineCommand {
    pub const FLOATS: usize = 9;
}

/// A filled quad with per-corner colors. 25 floats per command.
///
/// Corner order is top-left, top-right, bottom-left, bottom-right: the host
/// splits it into triangles (0, 1, 2) and (1, 3, 2).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct QuadCommand {
    pub corners: [[f32; 2]; 4],
    pub colors: [Color; 4],
    pub z: f32,
}

impl QuadCommand {
    pub const FLOATS: usize = 25;
}

/// An image drawn with its top-left corner at (x, y). 4 floats per command.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct ImageCommand {
    pub image: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ImageCommand {
    pub const FLOATS: usize = 4;
}

/// Draw commands collected during one render pass.
/// The host reads each list through its raw pointer and count.
pub struct DrawList {
    pub lines: Vec<LineCommand>,
    pub quads: Vec<QuadCommand>,
    pub images: Vec<ImageCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
            quads: Vec::with_capacity(capacity / 4),
            images: Vec::with_capacity(8),
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.quads.clear();
        self.images.clear();
    }

    pub fn draw_line(&mut self, p0: Vec2, p1: Vec2, color: Color, z: f32) {
        self.lines.push(LineCommand {
            x0: p0.x,
            y0: p0.y,
            x1: p1.x,
            y1: p1.y,
            color,
            z,
        });
    }

    /// Draw the closed outline through `points`, one line per edge.
    pub fn draw_outline(&mut self, points: &[Vec2], color: Color, z: f32) {
        for (i, &p) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            self.draw_line(p, next, color, z);
        }
    }

    pub fn draw_quad(&mut self, corners: [Vec2; 4], colors: [Color; 4], z: f32) {
        self.quads.push(QuadCommand {
            corners: corners.map(|c| [c.x, c.y]),
            colors,
            z,
        });
    }

    pub fn draw_image(&mut self, image: ImageId, pos: Vec2, z: f32) {
        self.images.push(ImageCommand {
            image: image.0 as f32,
            x: pos.x,
            y: pos.y,
            z,
        });
    }

    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn quad_count(&self) -> u32 {
        self.quads.len() as u32
    }

    pub fn image_count(&self) -> u32 {
        self.images.len() as u32
    }

    /// Raw pointer to line data for SharedArrayBuffer reads.
    pub fn lines_ptr(&self) -> *const f32 {
        self.lines.as_ptr() as *const f32
    }

    pub fn quads_ptr(&self) -> *const f32 {
        self.quads.as_ptr() as *const f32
    }

    pub fn images_ptr(&self) -> *const f32 {
        self.images.as_ptr() as *const f32
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_sizes_match_float_counts() {
        assert_eq!(std::mem::size_of::<LineCommand>(), LineCommand::FLOATS * 4);
        assert_eq!(std::mem::size_of::<QuadCommand>(), QuadCommand::FLOATS * 4);
        assert_eq!(std::mem::size_of::<ImageCommand>(), ImageCommand::FLOATS * 4);
    }

    #[test]
    fn outline_closes_the_loop() {
        let mut list = DrawList::new();
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        list.draw_outline(&square, Color::BLACK, 3.0);
        assert_eq!(list.line_count(), 4);
        let last = list.lines[3];
        assert_eq!((last.x1, last.y1), (0.0, 0.0));
    }

    #[test]
    fn line_floats_are_laid_out_in_order() {
        let mut list = DrawList::new();
        list.draw_line(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Color::WHITE, 5.0);
        let floats: &[f32] = bytemuck::cast_slice(&list.lines);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 1.0, 1.0, 1.0, 1.0, 5.0]);
    }

    #[test]
    fn clear_empties_every_list() {
        let mut list = DrawList::new();
        list.draw_line(Vec2::ZERO, Vec2::ONE, Color::BLACK, 1.0);
        list.draw_quad([Vec2::ZERO; 4], [Color::GRAY; 4], 0.0);
        list.draw_image(ImageId(1), Vec2::ZERO, 1.0);
        list.clear();
        assert_eq!(list.line_count() + list.quad_count() + list.image_count(), 0);
    }
}
