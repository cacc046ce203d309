//! Approach lanes and field geometry

use junction_core::{Direction, EntityKind, Rect, SimulationConfig, StopLineBands};

/// Approach lane, named after the field edge it enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    North,
    South,
    East,
    West,
}

impl Lane {
    pub const ALL: [Lane; 4] = [Lane::North, Lane::South, Lane::East, Lane::West];

    /// Travel direction of entities spawned on this lane
    pub fn direction(self) -> Direction {
        match self {
            Lane::North => Direction::South,
            Lane::South => Direction::North,
            Lane::East => Direction::East,
            Lane::West => Direction::West,
        }
    }
}

/// Precomputed geometry for one field configuration
#[derive(Debug, Clone)]
pub struct LaneLayout {
    spawn_rects: [Rect; 4],
    bands: StopLineBands,
    bounds: Rect,
}

impl LaneLayout {
    pub fn new(config: &SimulationConfig) -> Self {
        let kind = config.entity_kind;
        let spawn_rects = Lane::ALL.map(|lane| spawn_rect(config, kind, lane));
        Self {
            spawn_rects,
            bands: config.stop_line_bands(),
            bounds: Rect::new(0.0, 0.0, config.width, config.height)
                .inflated(config.despawn_margin),
        }
    }

    /// Footprint a new entity occupies when it enters on `lane`
    pub fn spawn_rect(&self, lane: Lane) -> Rect {
        self.spawn_rects[lane as usize]
    }

    pub fn bands(&self) -> &StopLineBands {
        &self.bands
    }

    /// Field inflated by the despawn margin
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

// Two lanes per road, centred on its quarter lines. Entities start just
// outside the field edge they enter from.
fn spawn_rect(config: &SimulationConfig, kind: EntityKind, lane: Lane) -> Rect {
    let (cx, cy) = (config.width / 2.0, config.height / 2.0);
    let quarter = config.road_width / 4.0;
    let (width, height) = kind.footprint(lane.direction());
    let gap = config.spawn_gap;

    let (x, y) = match lane {
        Lane::North => (cx + quarter - width / 2.0, -(gap + height)),
        Lane::South => (cx - quarter - width / 2.0, config.height + gap),
        Lane::East => (-(gap + width), cy - quarter - height / 2.0),
        Lane::West => (config.width + gap, cy + quarter - height / 2.0),
    };
    Rect::new(x, y, width, height)
}
