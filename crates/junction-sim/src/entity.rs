//! A single occupant of the intersection

use serde::{Deserialize, Serialize};

use junction_core::{Axis, Direction, EntityKind, Rect};

/// Entity identifier, unique within one world lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A vehicle or train travelling in a fixed direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub direction: Direction,
    pub speed: f64,
    pub rect: Rect,
    /// Cosmetic colour index, only meaningful to renderers
    pub tint: u8,
}

impl Entity {
    /// Create an entity whose footprint has its top-left corner at `(x, y)`
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        direction: Direction,
        speed: f64,
        x: f64,
        y: f64,
    ) -> Self {
        let (width, height) = kind.footprint(direction);
        Self {
            id,
            kind,
            direction,
            speed,
            rect: Rect::new(x, y, width, height),
            tint: 0,
        }
    }

    pub fn with_tint(mut self, tint: u8) -> Self {
        self.tint = tint;
        self
    }

    pub fn axis(&self) -> Axis {
        self.direction.axis()
    }

    pub fn leading_edge(&self) -> f64 {
        self.direction.leading_edge(&self.rect)
    }

    /// Own rect projected forward by `speed + sensor_margin`
    pub fn sensor_rect(&self) -> Rect {
        let reach = self.speed + self.kind.sensor_margin();
        let (dx, dy) = self.direction.unit();
        self.rect.translated(dx * reach, dy * reach)
    }

    /// Move one tick forward
    pub fn advance(&mut self) {
        let (dx, dy) = self.direction.unit();
        self.rect = self.rect.translated(dx * self.speed, dy * self.speed);
    }
}
