//! CPU twin of the per-pixel field pass.
//!
//! The fragment shader in `gpu/field.wgsl` is the production path; this
//! sequential version exists so the raster semantics stay testable without
//! a GPU. Both sample at pixel centers in the bottom-left frame and share
//! the encoding in [`crate::field::encode_rgba`].

use glam::Vec2;

use crate::coords::CANVAS_SIZE;
use crate::field::{encode_rgba, field_at};
use crate::scene::Scene;

/// Side length of the field raster in pixels.
pub const RASTER_SIZE: u32 = CANVAS_SIZE as u32;

/// A fully evaluated RGBA8 field image, rows stored top-down.
pub struct FieldRaster {
    pixels: Vec<u8>,
}

impl FieldRaster {
    /// Evaluate the field at every pixel center and encode it. The raster
    /// depends only on charges; sensors never influence it.
    pub fn render(scene: &Scene, flux_scale: f32) -> Self {
        let mut pixels = Vec::with_capacity((RASTER_SIZE * RASTER_SIZE * 4) as usize);
        for row in 0..RASTER_SIZE {
            // Rows are stored top-down while the math frame grows upward.
            let y = CANVAS_SIZE - (row as f32 + 0.5);
            for col in 0..RASTER_SIZE {
                let point = Vec2::new(col as f32 + 0.5, y);
                let field = field_at(point, scene.protons(), scene.electrons());
                let rgba = encode_rgba(field, flux_scale);
                pixels.extend(rgba.map(to_byte));
            }
        }
        Self { pixels }
    }

    /// Raw RGBA8 bytes, row-major from the top-left.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `col`, `row` counted from the top-left corner.
    pub fn rgba_at(&self, col: u32, row: u32) -> [u8; 4] {
        let i = ((row * RASTER_SIZE + col) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// Unorm conversion as the texture unit performs it. NaN channels land on
/// zero through the saturating cast.
fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityKind;

    #[test]
    fn empty_scene_renders_transparent_blue() {
        let raster = FieldRaster::render(&Scene::new(), 2000.0);
        assert_eq!(raster.rgba_at(0, 0), [0, 0, 255, 0]);
        assert_eq!(raster.rgba_at(250, 250), [0, 0, 255, 0]);
        assert_eq!(raster.rgba_at(499, 499), [0, 0, 255, 0]);
    }

    #[test]
    fn pixel_above_a_proton_points_up() {
        let mut scene = Scene::new();
        // On a pixel center: column 250, row 249 from the top.
        scene
            .insert(EntityKind::Proton, Vec2::new(250.5, 250.5))
            .unwrap();
        let raster = FieldRaster::render(&scene, 2000.0);
        // Fifty pixels above in the math frame is row 199 from the top.
        // Direction (0, 1) encodes red 0.5, green 1; magnitude 1/50²
        // times the flux scale gives alpha 0.8.
        assert_eq!(raster.rgba_at(250, 199), [128, 255, 255, 204]);
    }

    #[test]
    fn charge_pixel_is_the_singularity() {
        let mut scene = Scene::new();
        scene
            .insert(EntityKind::Proton, Vec2::new(250.5, 250.5))
            .unwrap();
        let raster = FieldRaster::render(&scene, 2000.0);
        // NaN in every derived channel collapses to zero bytes.
        assert_eq!(raster.rgba_at(250, 249), [0, 0, 255, 0]);
    }

    #[test]
    fn moving_a_sensor_leaves_the_raster_untouched() {
        let mut scene = Scene::new();
        scene.insert(EntityKind::Proton, Vec2::new(150.0, 340.0)).unwrap();
        scene.insert(EntityKind::Electron, Vec2::new(390.0, 120.0)).unwrap();
        let sensor = scene.insert(EntityKind::Sensor, Vec2::new(250.0, 250.0)).unwrap();

        let before = FieldRaster::render(&scene, 2000.0);
        scene.set_position(sensor, Vec2::new(60.0, 60.0));
        let after = FieldRaster::render(&scene, 2000.0);
        assert_eq!(before.pixels(), after.pixels());
    }
}
