//! Inverse-square field evaluation.
//!
//! One formula backs every rendered pixel and every sensor arrow: each
//! proton contributes `(diff / dist) * (1 / dist²)` at the query point and
//! each electron the negated term. The fragment shader evaluates the same
//! expression per pixel, so any change here must be mirrored in
//! `gpu/field.wgsl` to keep the two renderings consistent.
//!
//! A query point exactly on a charge divides by zero and floods the result
//! with NaN. That is left alone on purpose: it shows up as a one-pixel
//! singularity at the charge itself, and the sensor layer substitutes zero
//! per component before drawing.

use glam::Vec2;

/// Superposed field at `point` from the given charge positions. Protons
/// push away from themselves, electrons pull toward themselves.
pub fn field_at(point: Vec2, protons: &[Vec2], electrons: &[Vec2]) -> Vec2 {
    let mut field = Vec2::ZERO;
    for charge in protons {
        field += contribution(point, *charge);
    }
    for charge in electrons {
        field -= contribution(point, *charge);
    }
    field
}

#[inline]
fn contribution(point: Vec2, charge: Vec2) -> Vec2 {
    let diff = point - charge;
    let dist = diff.length();
    (diff / dist) * (1.0 / (dist * dist))
}

/// Map a field vector to the shared RGBA encoding: unit direction components
/// shifted into [0, 1] for red and green, blue pinned to 1, and alpha the
/// magnitude scaled by `flux_scale`. A zero field encodes NaN color channels
/// behind a fully transparent alpha.
pub fn encode_rgba(field: Vec2, flux_scale: f32) -> [f32; 4] {
    let magnitude = field.length();
    let dir = field / magnitude;
    [
        (dir.x + 1.0) / 2.0,
        (dir.y + 1.0) / 2.0,
        1.0,
        magnitude * flux_scale,
    ]
}
