//! Entity storage for charges and sensors.
//!
//! The scene keeps three flat lists, one per entity kind, each capped at
//! [`KIND_CAPACITY`] entries because the field uniform block reserves a
//! fixed slot per charge. Entities are only ever appended or moved, never
//! removed, so an [`EntityRef`] stays valid for the life of the scene.
//!
//! ```ignore
//! let mut scene = Scene::new();
//! let e = scene.insert(EntityKind::Electron, Vec2::new(100.0, 100.0))?;
//! scene.set_position(e, Vec2::new(120.0, 100.0));
//! ```

use std::error::Error;
use std::fmt;

use glam::Vec2;

/// Fixed capacity of each per-kind store.
pub const KIND_CAPACITY: usize = 16;

/// Squared pick radius for charges. Matches the 50 px sprite footprint.
pub const CHARGE_PICK_RADIUS_SQ: f32 = 625.0;

/// Squared pick radius for sensors, which draw much smaller than charges.
pub const SENSOR_PICK_RADIUS_SQ: f32 = 64.0;

/// The three things a user can place on the canvas.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntityKind {
    Electron,
    Proton,
    Sensor,
}

impl EntityKind {
    /// Whether entities of this kind source the field.
    pub fn is_charge(self) -> bool {
        !matches!(self, EntityKind::Sensor)
    }

    /// Squared hit-test threshold for this kind.
    pub fn pick_radius_sq(self) -> f32 {
        if self.is_charge() {
            CHARGE_PICK_RADIUS_SQ
        } else {
            SENSOR_PICK_RADIUS_SQ
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Electron => "electron",
            EntityKind::Proton => "proton",
            EntityKind::Sensor => "sensor",
        };
        f.write_str(name)
    }
}

/// Handle to one stored entity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub index: usize,
}

/// Rejection returned when an insert would grow a kind past its capacity.
/// Recovered where it occurs; callers log it and drop the placement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CapacityExceeded {
    pub kind: EntityKind,
    pub count: usize,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at capacity: {} store already holds {} entries",
            self.kind, self.count
        )
    }
}

impl Error for CapacityExceeded {}

/// All placed entities, grouped by kind. Positions live in the bottom-left
/// frame used by the field math; see [`crate::coords`].
#[derive(Default, Debug)]
pub struct Scene {
    electrons: Vec<Vec2>,
    protons: Vec<Vec2>,
    sensors: Vec<Vec2>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn electrons(&self) -> &[Vec2] {
        self.positions(EntityKind::Electron)
    }

    pub fn protons(&self) -> &[Vec2] {
        self.positions(EntityKind::Proton)
    }

    pub fn sensors(&self) -> &[Vec2] {
        self.positions(EntityKind::Sensor)
    }

    /// Positions of every entity of `kind`, in placement order.
    pub fn positions(&self, kind: EntityKind) -> &[Vec2] {
        match kind {
            EntityKind::Electron => &self.electrons,
            EntityKind::Proton => &self.protons,
            EntityKind::Sensor => &self.sensors,
        }
    }

    /// Number of live entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.positions(kind).len()
    }

    /// True once no further entity of `kind` fits.
    pub fn at_capacity(&self, kind: EntityKind) -> bool {
        self.count(kind) >= KIND_CAPACITY
    }

    /// Append an entity and hand back its handle, or report the full store.
    pub fn insert(
        &mut self,
        kind: EntityKind,
        position: Vec2,
    ) -> Result<EntityRef, CapacityExceeded> {
        if self.at_capacity(kind) {
            return Err(CapacityExceeded {
                kind,
                count: self.count(kind),
            });
        }
        let list = self.list_mut(kind);
        list.push(position);
        Ok(EntityRef {
            kind,
            index: list.len() - 1,
        })
    }

    /// Current position of `entity`.
    pub fn position(&self, entity: EntityRef) -> Vec2 {
        self.positions(entity.kind)[entity.index]
    }

    /// Move `entity` to `position`. Out-of-canvas positions are allowed;
    /// dragging past an edge parks the entity there.
    pub fn set_position(&mut self, entity: EntityRef, position: Vec2) {
        self.list_mut(entity.kind)[entity.index] = position;
    }

    /// Find the entity under `point`: the minimum squared distance among
    /// entities inside their kind's pick radius. Ties go to the earlier
    /// entry in scan order, electrons before protons before sensors. The
    /// radius test is strict, so a point exactly on the rim misses.
    pub fn pick(&self, point: Vec2) -> Option<EntityRef> {
        let scan = [EntityKind::Electron, EntityKind::Proton, EntityKind::Sensor];
        let mut best: Option<(f32, EntityRef)> = None;
        for kind in scan {
            let radius_sq = kind.pick_radius_sq();
            for (index, pos) in self.positions(kind).iter().enumerate() {
                let dist_sq = pos.distance_squared(point);
                if dist_sq < radius_sq && best.map_or(true, |(b, _)| dist_sq < b) {
                    best = Some((dist_sq, EntityRef { kind, index }));
                }
            }
        }
        best.map(|(_, entity)| entity)
    }

    fn list_mut(&mut self, kind: EntityKind) -> &mut Vec<Vec2> {
        match kind {
            EntityKind::Electron => &mut self.electrons,
            EntityKind::Proton => &mut self.protons,
            EntityKind::Sensor => &mut self.sensors,
        }
    }
}
