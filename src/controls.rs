//! Keyboard-driven session controls.
//!
//! Stands in for the widget panel of the usual lab UI: `1`, `2` and `3`
//! select what a click places (electron, proton, sensor) and the up and
//! down arrows step the flux scale, which feeds the alpha channel of the
//! field raster.

use winit::keyboard::KeyCode;

use crate::controller::Redraw;
use crate::scene::EntityKind;

/// Starting flux scale. At this value a lone charge stays visible out to
/// roughly a hundred pixels before the alpha falls off.
pub const FLUX_DEFAULT: f32 = 2000.0;
/// Flux change per arrow-key press.
pub const FLUX_STEP: f32 = 100.0;
/// Upper flux bound; the lower bound is zero.
pub const FLUX_MAX: f32 = 10_000.0;

/// Externally mutated, read-only for the interaction layer.
#[derive(Debug)]
pub struct Controls {
    placement: EntityKind,
    flux_scale: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    pub fn new() -> Self {
        Self {
            placement: EntityKind::Electron,
            flux_scale: FLUX_DEFAULT,
        }
    }

    /// Kind the next empty-canvas press will place.
    pub fn placement(&self) -> EntityKind {
        self.placement
    }

    /// Current alpha multiplier for the field raster.
    pub fn flux_scale(&self) -> f32 {
        self.flux_scale
    }

    /// Apply a pressed key and report the redraw it requires. Selecting a
    /// placement kind changes nothing on screen; a flux change invalidates
    /// the whole raster.
    pub fn key_pressed(&mut self, key: KeyCode) -> Redraw {
        match key {
            KeyCode::Digit1 => self.select(EntityKind::Electron),
            KeyCode::Digit2 => self.select(EntityKind::Proton),
            KeyCode::Digit3 => self.select(EntityKind::Sensor),
            KeyCode::ArrowUp => self.step_flux(FLUX_STEP),
            KeyCode::ArrowDown => self.step_flux(-FLUX_STEP),
            _ => Redraw::None,
        }
    }

    fn select(&mut self, kind: EntityKind) -> Redraw {
        if self.placement != kind {
            self.placement = kind;
            log::info!("placing {kind}s");
        }
        Redraw::None
    }

    fn step_flux(&mut self, delta: f32) -> Redraw {
        let stepped = (self.flux_scale + delta).clamp(0.0, FLUX_MAX);
        if stepped == self.flux_scale {
            return Redraw::None;
        }
        self.flux_scale = stepped;
        log::info!("flux scale {}", self.flux_scale);
        Redraw::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_select_the_placement_kind() {
        let mut controls = Controls::new();
        assert_eq!(controls.placement(), EntityKind::Electron);
        assert_eq!(controls.key_pressed(KeyCode::Digit2), Redraw::None);
        assert_eq!(controls.placement(), EntityKind::Proton);
        controls.key_pressed(KeyCode::Digit3);
        assert_eq!(controls.placement(), EntityKind::Sensor);
        controls.key_pressed(KeyCode::Digit1);
        assert_eq!(controls.placement(), EntityKind::Electron);
    }

    #[test]
    fn arrows_step_the_flux_scale() {
        let mut controls = Controls::new();
        assert_eq!(controls.key_pressed(KeyCode::ArrowUp), Redraw::Full);
        assert_eq!(controls.flux_scale(), FLUX_DEFAULT + FLUX_STEP);
        assert_eq!(controls.key_pressed(KeyCode::ArrowDown), Redraw::Full);
        assert_eq!(controls.flux_scale(), FLUX_DEFAULT);
    }

    #[test]
    fn flux_clamps_at_both_ends() {
        let mut controls = Controls::new();
        for _ in 0..200 {
            controls.key_pressed(KeyCode::ArrowDown);
        }
        assert_eq!(controls.flux_scale(), 0.0);
        // Stepping past a bound is not a change and needs no redraw.
        assert_eq!(controls.key_pressed(KeyCode::ArrowDown), Redraw::None);

        for _ in 0..200 {
            controls.key_pressed(KeyCode::ArrowUp);
        }
        assert_eq!(controls.flux_scale(), FLUX_MAX);
        assert_eq!(controls.key_pressed(KeyCode::ArrowUp), Redraw::None);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut controls = Controls::new();
        assert_eq!(controls.key_pressed(KeyCode::KeyQ), Redraw::None);
        assert_eq!(controls.placement(), EntityKind::Electron);
        assert_eq!(controls.flux_scale(), FLUX_DEFAULT);
    }
}
