//! Angle-convention conversions and 2D rotation helpers.
//!
//! Two conventions meet here:
//! - *drawing* angles are degrees measured from "up", increasing clockwise
//!   (what the renderer and drawing code speak);
//! - *standard* angles are radians measured from +X, increasing
//!   counter-clockwise (what the physics world stores).
//!
//! With Y pointing down on screen both describe the same visual rotation.

use glam::Vec2;
use std::f32::consts::PI;

/// Convert a drawing angle (degrees from up, clockwise) to standard radians.
pub fn drawing_to_radians(degrees: f32) -> f32 {
    (degrees - 90.0) * PI / 180.0
}

/// Convert standard radians back to a drawing angle in degrees.
pub fn radians_to_drawing(radians: f32) -> f32 {
    radians * 180.0 / PI + 90.0
}

/// Unit vector pointing along a standard angle.
pub fn direction(radians: f32) -> Vec2 {
    Vec2::new(radians.cos(), radians.sin())
}

/// Offset of length `radius` along a drawing angle.
pub fn drawing_offset(degrees: f32, radius: f32) -> Vec2 {
    direction(drawing_to_radians(degrees)) * radius
}

/// Rotate `local` about the origin by `angle` radians, then translate by `position`.
pub fn rotate_point(local: Vec2, angle: f32, position: Vec2) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(
        local.x * cos - local.y * sin + position.x,
        local.y * cos + local.x * sin + position.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn wrap(angle: f32) -> f32 {
        angle.rem_euclid(2.0 * PI)
    }

    #[test]
    fn drawing_up_is_standard_minus_half_pi() {
        assert!((drawing_to_radians(0.0) + PI / 2.0).abs() < EPS);
        assert!(drawing_to_radians(90.0).abs() < EPS);
        assert!((radians_to_drawing(0.0) - 90.0).abs() < EPS);
    }

    #[test]
    fn conversion_round_trips() {
        for i in 0..64 {
            let theta = -7.0 + i as f32 * 0.23;
            let back = drawing_to_radians(radians_to_drawing(theta));
            let diff = (wrap(back) - wrap(theta)).abs();
            assert!(
                diff < EPS || (2.0 * PI - diff) < EPS,
                "theta={} back={}",
                theta,
                back
            );
        }
    }

    #[test]
    fn drawing_offset_matches_screen_directions() {
        // Y-down: "up" is negative Y, "right" is positive X.
        let up = drawing_offset(0.0, 10.0);
        assert!(up.x.abs() < EPS && (up.y + 10.0).abs() < EPS, "{:?}", up);
        let right = drawing_offset(90.0, 10.0);
        assert!((right.x - 10.0).abs() < EPS && right.y.abs() < EPS, "{:?}", right);
    }

    #[test]
    fn rotate_point_quarter_turn() {
        let p = rotate_point(Vec2::new(15.0, -2.0), PI / 2.0, Vec2::new(100.0, 50.0));
        assert!((p.x - 102.0).abs() < EPS, "{:?}", p);
        assert!((p.y - 65.0).abs() < EPS, "{:?}", p);
    }

    #[test]
    fn rotate_point_zero_angle_is_translation() {
        let p = rotate_point(Vec2::new(-3.0, 4.0), 0.0, Vec2::new(1.0, 1.0));
        assert_eq!(p, Vec2::new(-2.0, 5.0));
    }
}
