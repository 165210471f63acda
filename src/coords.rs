//! Canvas coordinate frames.
//!
//! Two parallel frames cover the canvas: window cursor positions and sprite
//! placement use a top-left origin with y growing downward, while the field
//! math and the field shader use a bottom-left origin with y growing upward.
//! The frames differ only in the direction of y, so a single mirror converts
//! both ways. Every conversion in the crate goes through [`flip_y`] to keep
//! the controller and the renderers from drifting apart.

use glam::Vec2;

/// Canvas extent in logical pixels. The rendered raster is fixed at this
/// size regardless of display scaling.
pub const CANVAS_SIZE: f32 = 500.0;

/// Mirror a point across the horizontal mid-line of the canvas, converting
/// between the top-left and bottom-left frames. The transform is its own
/// inverse.
#[inline]
pub fn flip_y(p: Vec2) -> Vec2 {
    Vec2::new(p.x, CANVAS_SIZE - p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_exact() {
        // 500 - y is exactly representable for these eighth-step values, so
        // converting there and back must reproduce the input bit for bit.
        for x in [0.0, 0.5, 123.25, 250.0, 499.75, 500.0] {
            for y in [0.0, 0.5, 86.125, 250.0, 499.75, 500.0] {
                let p = Vec2::new(x, y);
                assert_eq!(flip_y(flip_y(p)), p);
            }
        }
    }

    #[test]
    fn flips_only_y() {
        let p = flip_y(Vec2::new(120.0, 30.0));
        assert_eq!(p, Vec2::new(120.0, 470.0));
    }

    #[test]
    fn mid_line_is_fixed() {
        let mid = Vec2::new(77.0, CANVAS_SIZE / 2.0);
        assert_eq!(flip_y(mid), mid);
    }
}
