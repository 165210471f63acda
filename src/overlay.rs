//! Sensor markers and field arrows.
//!
//! Each sensor draws as a filled disc with a thick line segment from its
//! center to `center + field * SENSOR_SCALE`, showing the local field
//! direction at a magnitude readable at canvas scale. The geometry is
//! tessellated on the CPU into a flat triangle list in the math frame and
//! handed to the overlay pass; with at most sixteen sensors this is a few
//! hundred vertices per frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::field::field_at;
use crate::scene::Scene;

/// Multiplier bringing inverse-square magnitudes at canvas-pixel distances
/// up to drawable lengths.
pub const SENSOR_SCALE: f32 = 200_000.0;

/// Radius of the sensor disc.
pub const MARKER_RADIUS: f32 = 8.0;

/// Stroke width of the field arrow.
pub const ARROW_WIDTH: f32 = 5.0;

/// Sensor disc fill, an instrument-panel amber.
pub const MARKER_COLOR: [f32; 4] = [237.0 / 255.0, 166.0 / 255.0, 85.0 / 255.0, 1.0];

/// Field arrow stroke.
pub const ARROW_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

const MARKER_SEGMENTS: usize = 24;

/// Upper bound on vertices one sensor can emit, for sizing GPU buffers.
pub const MAX_VERTICES_PER_SENSOR: usize = MARKER_SEGMENTS * 3 + 6;

/// One overlay vertex: math-frame position plus flat color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Endpoint of a sensor's arrow. Non-finite components of the scaled field
/// collapse to zero so the segment stays drawable next to a singularity.
pub fn arrow_tip(sensor: Vec2, field: Vec2) -> Vec2 {
    sensor + sanitize(field * SENSOR_SCALE)
}

fn sanitize(v: Vec2) -> Vec2 {
    let keep = |c: f32| if c.is_finite() { c } else { 0.0 };
    Vec2::new(keep(v.x), keep(v.y))
}

/// Tessellate every sensor into triangles, disc first so the arrow strokes
/// over it.
pub fn build(scene: &Scene) -> Vec<OverlayVertex> {
    let mut vertices = Vec::new();
    for &sensor in scene.sensors() {
        let field = field_at(sensor, scene.protons(), scene.electrons());
        push_disc(&mut vertices, sensor, MARKER_RADIUS, MARKER_COLOR);
        push_segment(
            &mut vertices,
            sensor,
            arrow_tip(sensor, field),
            ARROW_WIDTH,
            ARROW_COLOR,
        );
    }
    vertices
}

fn vertex(position: Vec2, color: [f32; 4]) -> OverlayVertex {
    OverlayVertex {
        position: position.to_array(),
        color,
    }
}

fn push_disc(out: &mut Vec<OverlayVertex>, center: Vec2, radius: f32, color: [f32; 4]) {
    use std::f32::consts::TAU;
    for i in 0..MARKER_SEGMENTS {
        let t0 = i as f32 / MARKER_SEGMENTS as f32 * TAU;
        let t1 = (i + 1) as f32 / MARKER_SEGMENTS as f32 * TAU;
        out.push(vertex(center, color));
        out.push(vertex(center + radius * Vec2::from_angle(t0), color));
        out.push(vertex(center + radius * Vec2::from_angle(t1), color));
    }
}

fn push_segment(out: &mut Vec<OverlayVertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = to - from;
    let len = dir.length();
    // A zero-length stroke paints nothing.
    if len == 0.0 {
        return;
    }
    let half = Vec2::new(-dir.y, dir.x) / len * (width / 2.0);
    let quad = [from + half, from - half, to - half, to + half];
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(vertex(quad[i], color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityKind;

    const DISC_VERTICES: usize = MARKER_SEGMENTS * 3;

    #[test]
    fn arrow_points_away_from_a_proton() {
        let sensor = Vec2::new(250.0, 300.0);
        let field = field_at(sensor, &[Vec2::new(250.0, 250.0)], &[]);
        let tip = arrow_tip(sensor, field);
        // Magnitude 1/50² scaled by 200000 is an 80 px arrow straight up.
        assert_eq!(tip.x, 250.0);
        assert!((tip.y - 380.0).abs() < 1e-3);
    }

    #[test]
    fn non_finite_components_collapse_individually() {
        let sensor = Vec2::new(100.0, 100.0);
        let tip = arrow_tip(sensor, Vec2::new(f32::NAN, 4.0e-4));
        assert_eq!(tip.x, 100.0);
        assert!((tip.y - 180.0).abs() < 1e-3);

        let tip = arrow_tip(sensor, Vec2::new(f32::INFINITY, f32::NEG_INFINITY));
        assert_eq!(tip, sensor);
    }

    #[test]
    fn sensor_without_field_draws_only_the_disc() {
        let mut scene = Scene::new();
        scene.insert(EntityKind::Sensor, Vec2::new(250.0, 250.0)).unwrap();
        let vertices = build(&scene);
        assert_eq!(vertices.len(), DISC_VERTICES);
        assert!(vertices.iter().all(|v| v.color == MARKER_COLOR));
    }

    #[test]
    fn sensor_on_a_charge_degenerates_to_the_disc() {
        let mut scene = Scene::new();
        let spot = Vec2::new(200.0, 200.0);
        scene.insert(EntityKind::Proton, spot).unwrap();
        scene.insert(EntityKind::Sensor, spot).unwrap();
        // The singular field sanitizes to a zero-length arrow.
        assert_eq!(build(&scene).len(), DISC_VERTICES);
    }

    #[test]
    fn arrow_strokes_over_the_disc() {
        let mut scene = Scene::new();
        scene.insert(EntityKind::Proton, Vec2::new(250.0, 250.0)).unwrap();
        scene.insert(EntityKind::Sensor, Vec2::new(250.0, 300.0)).unwrap();
        let vertices = build(&scene);
        assert_eq!(vertices.len(), DISC_VERTICES + 6);
        assert!(vertices[..DISC_VERTICES].iter().all(|v| v.color == MARKER_COLOR));
        assert!(vertices[DISC_VERTICES..].iter().all(|v| v.color == ARROW_COLOR));
    }

    #[test]
    fn every_sensor_reads_all_charges() {
        let mut scene = Scene::new();
        scene.insert(EntityKind::Proton, Vec2::new(100.0, 250.0)).unwrap();
        scene.insert(EntityKind::Electron, Vec2::new(400.0, 250.0)).unwrap();
        scene.insert(EntityKind::Sensor, Vec2::new(250.0, 250.0)).unwrap();
        let field = field_at(
            Vec2::new(250.0, 250.0),
            scene.protons(),
            scene.electrons(),
        );
        // Pushed by the proton and pulled by the electron: straight +x.
        assert!(field.x > 0.0);
        assert_eq!(field.y, 0.0);
        let tip = arrow_tip(Vec2::new(250.0, 250.0), field);
        assert!(tip.x > 250.0);
    }
}
