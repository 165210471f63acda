//! Pointer interaction state machine.
//!
//! Three states: `Idle` (nothing under the cursor), `Hovering` (an entity in
//! pick range), `Grabbing` (button held, entity following the cursor).
//! Pressing over an entity grabs it; pressing over empty canvas places a new
//! entity of the externally selected kind and grabs that. Releasing or
//! leaving the surface always drops back to `Idle`; hover is not reclaimed
//! until the next move.
//!
//! Events arrive in the window's top-left frame and are flipped into the
//! math frame once, on entry, so the scene and both renderers never see
//! window coordinates.

use glam::Vec2;

use crate::coords::flip_y;
use crate::scene::{EntityKind, EntityRef, Scene};

/// What a handled pointer event requires of the renderer.
///
/// Sensors do not source the field, so mutating one leaves the field raster
/// valid and only the sensor layer needs recompositing. Variants are ordered
/// by strength, so outstanding requests collapse with `max`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Redraw {
    None,
    SensorsOnly,
    Full,
}

impl Redraw {
    fn for_mutation_of(kind: EntityKind) -> Self {
        if kind.is_charge() {
            Redraw::Full
        } else {
            Redraw::SensorsOnly
        }
    }
}

/// Current interaction state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerState {
    Idle,
    Hovering(EntityRef),
    Grabbing(EntityRef),
}

/// Owns the pointer state and drives all scene mutation.
#[derive(Debug)]
pub struct Controller {
    state: PointerState,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state: PointerState::Idle,
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    /// True while the cursor should use the pointer affordance.
    pub fn wants_pointer_cursor(&self) -> bool {
        !matches!(self.state, PointerState::Idle)
    }

    /// Cursor moved to `window_pos`. While grabbing this drags the held
    /// entity; otherwise it just refreshes the hover claim.
    pub fn pointer_move(&mut self, scene: &mut Scene, window_pos: Vec2) -> Redraw {
        let point = flip_y(window_pos);
        match self.state {
            PointerState::Grabbing(entity) => {
                // Bounds are unchecked; dragging past an edge parks the
                // entity off-canvas.
                scene.set_position(entity, point);
                Redraw::for_mutation_of(entity.kind)
            }
            PointerState::Idle | PointerState::Hovering(_) => {
                self.state = match scene.pick(point) {
                    Some(entity) => PointerState::Hovering(entity),
                    None => PointerState::Idle,
                };
                Redraw::None
            }
        }
    }

    /// Button pressed at `window_pos`. Grabs the hovered entity, or places a
    /// new one of `placement` kind on empty canvas. A full store rejects the
    /// placement and the press is swallowed.
    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        window_pos: Vec2,
        placement: EntityKind,
    ) -> Redraw {
        match self.state {
            PointerState::Hovering(entity) => {
                self.state = PointerState::Grabbing(entity);
                Redraw::None
            }
            PointerState::Idle => {
                let point = flip_y(window_pos);
                match scene.insert(placement, point) {
                    Ok(entity) => {
                        log::debug!(
                            "placed {} #{} at ({:.0}, {:.0})",
                            placement,
                            entity.index,
                            point.x,
                            point.y
                        );
                        self.state = PointerState::Grabbing(entity);
                        Redraw::for_mutation_of(placement)
                    }
                    Err(err) => {
                        log::warn!("{err}");
                        Redraw::None
                    }
                }
            }
            PointerState::Grabbing(_) => Redraw::None,
        }
    }

    /// Button released. The grabbed entity, if any, stays where it was last
    /// dragged.
    pub fn pointer_up(&mut self) -> Redraw {
        self.state = PointerState::Idle;
        Redraw::None
    }

    /// Cursor left the surface. Same release semantics as a button-up.
    pub fn pointer_leave(&mut self) -> Redraw {
        self.state = PointerState::Idle;
        Redraw::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::KIND_CAPACITY;

    #[test]
    fn redraw_requests_collapse_to_the_strongest() {
        assert_eq!(Redraw::None.max(Redraw::SensorsOnly), Redraw::SensorsOnly);
        assert_eq!(Redraw::SensorsOnly.max(Redraw::Full), Redraw::Full);
        assert_eq!(Redraw::Full.max(Redraw::None), Redraw::Full);
    }

    #[test]
    fn press_on_empty_canvas_places_and_grabs() {
        let mut scene = Scene::new();
        let mut ctl = Controller::new();
        let redraw = ctl.pointer_down(&mut scene, Vec2::new(100.0, 100.0), EntityKind::Proton);
        assert_eq!(redraw, Redraw::Full);
        assert_eq!(scene.count(EntityKind::Proton), 1);
        // Stored in the math frame.
        assert_eq!(scene.protons()[0], Vec2::new(100.0, 400.0));
        assert!(matches!(ctl.state(), PointerState::Grabbing(_)));
    }

    #[test]
    fn dragging_a_charge_forces_a_full_redraw() {
        let mut scene = Scene::new();
        let mut ctl = Controller::new();
        ctl.pointer_down(&mut scene, Vec2::new(100.0, 100.0), EntityKind::Electron);
        let redraw = ctl.pointer_move(&mut scene, Vec2::new(140.0, 90.0));
        assert_eq!(redraw, Redraw::Full);
        assert_eq!(scene.electrons()[0], Vec2::new(140.0, 410.0));
    }

    #[test]
    fn sensor_mutations_take_the_fast_path() {
        let mut scene = Scene::new();
        let mut ctl = Controller::new();
        let placed = ctl.pointer_down(&mut scene, Vec2::new(200.0, 200.0), EntityKind::Sensor);
        assert_eq!(placed, Redraw::SensorsOnly);
        let dragged = ctl.pointer_move(&mut scene, Vec2::new(210.0, 200.0));
        assert_eq!(dragged, Redraw::SensorsOnly);
    }

    #[test]
    fn press_over_an_entity_grabs_instead_of_placing() {
        let mut scene = Scene::new();
        scene.insert(EntityKind::Proton, Vec2::new(100.0, 400.0)).unwrap();
        let mut ctl = Controller::new();
        // Move close to the proton: 5 px off in window coordinates.
        ctl.pointer_move(&mut scene, Vec2::new(105.0, 103.0));
        assert!(matches!(ctl.state(), PointerState::Hovering(_)));

        let redraw = ctl.pointer_down(&mut scene, Vec2::new(105.0, 103.0), EntityKind::Electron);
        assert_eq!(redraw, Redraw::None);
        assert_eq!(scene.count(EntityKind::Electron), 0);
        assert!(matches!(
            ctl.state(),
            PointerState::Grabbing(EntityRef {
                kind: EntityKind::Proton,
                index: 0
            })
        ));
    }

    #[test]
    fn release_idles_until_the_next_move() {
        let mut scene = Scene::new();
        let mut ctl = Controller::new();
        ctl.pointer_down(&mut scene, Vec2::new(100.0, 100.0), EntityKind::Proton);
        assert_eq!(ctl.pointer_up(), Redraw::None);
        assert_eq!(ctl.state(), PointerState::Idle);
        assert!(!ctl.wants_pointer_cursor());
        // The entity is still there and hover comes back on the next move.
        ctl.pointer_move(&mut scene, Vec2::new(100.0, 100.0));
        assert!(ctl.wants_pointer_cursor());
    }

    #[test]
    fn leaving_the_surface_drops_the_grab() {
        let mut scene = Scene::new();
        let mut ctl = Controller::new();
        ctl.pointer_down(&mut scene, Vec2::new(100.0, 100.0), EntityKind::Sensor);
        ctl.pointer_move(&mut scene, Vec2::new(480.0, 20.0));
        ctl.pointer_leave();
        assert_eq!(ctl.state(), PointerState::Idle);
        assert_eq!(scene.sensors()[0], Vec2::new(480.0, 480.0));
    }

    #[test]
    fn placement_at_capacity_is_swallowed() {
        let mut scene = Scene::new();
        for i in 0..KIND_CAPACITY {
            scene
                .insert(EntityKind::Proton, Vec2::new(i as f32 * 30.0, 450.0))
                .unwrap();
        }
        let mut ctl = Controller::new();
        let redraw = ctl.pointer_down(&mut scene, Vec2::new(250.0, 250.0), EntityKind::Proton);
        assert_eq!(redraw, Redraw::None);
        assert_eq!(ctl.state(), PointerState::Idle);
        assert_eq!(scene.count(EntityKind::Proton), KIND_CAPACITY);
        // A different kind still places fine from the same spot.
        let other = ctl.pointer_down(&mut scene, Vec2::new(250.0, 250.0), EntityKind::Sensor);
        assert_eq!(other, Redraw::SensorsOnly);
    }
}
