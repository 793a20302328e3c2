use core::fmt;

use crate::error::{FlockError, Result};
use crate::vector::Vector2D;

/// Fixed simulation bounds. `(0, 0)` is one corner, `(width, height)` the other.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FlockError::InvalidWorld { width, height });
        }
        Ok(Self { width, height })
    }
}

impl Default for World {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 570.0,
        }
    }
}

/// Handle returned when an attractor or detractor is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct MarkerId(pub u32);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A user-placed point force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub position: Vector2D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Attractor,
    Detractor,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Attractor => f.write_str("attractor"),
            MarkerKind::Detractor => f.write_str("detractor"),
        }
    }
}

/// World bounds plus the current attractor and detractor sets.
///
/// Markers keep insertion order, which is also the tie-break order for
/// nearest-attractor selection. Both kinds draw ids from one counter.
#[derive(Debug, Clone)]
pub struct Environment {
    world: World,
    attractors: Vec<Marker>,
    detractors: Vec<Marker>,
    next_id: u32,
}

impl Environment {
    pub fn new(world: World) -> Self {
        Self {
            world,
            attractors: Vec::new(),
            detractors: Vec::new(),
            next_id: 1,
        }
    }

    pub fn world(&self) -> World {
        self.world
    }

    pub fn attractors(&self) -> &[Marker] {
        &self.attractors
    }

    pub fn detractors(&self) -> &[Marker] {
        &self.detractors
    }

    pub fn place(&mut self, kind: MarkerKind, position: Vector2D) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.markers_mut(kind).push(Marker { id, position });
        id
    }

    pub fn remove(&mut self, kind: MarkerKind, id: MarkerId) -> Result<Marker> {
        let markers = self.markers_mut(kind);
        let index = markers
            .iter()
            .position(|m| m.id == id)
            .ok_or(FlockError::UnknownMarker(id))?;
        Ok(markers.remove(index))
    }

    /// Drops every marker. Ids keep counting up so stale handles stay invalid.
    pub fn clear(&mut self) {
        self.attractors.clear();
        self.detractors.clear();
    }

    fn markers_mut(&mut self, kind: MarkerKind) -> &mut Vec<Marker> {
        match kind {
            MarkerKind::Attractor => &mut self.attractors,
            MarkerKind::Detractor => &mut self.detractors,
        }
    }
}
