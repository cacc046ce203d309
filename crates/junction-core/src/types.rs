//! Common types used throughout junction

use serde::{Deserialize, Serialize};

use crate::error::JunctionError;

/// Reward value returned by the simulation
pub type Reward = f64;

/// Axis-aligned rectangle in field coordinates (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict overlap test. Rects sharing only an edge do not intersect,
    /// and empty rects intersect nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Copy of this rect moved by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Copy of this rect grown by `margin` on every side
    pub fn inflated(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }
}

/// The two perpendicular traffic flows through the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    NorthSouth,
    EastWest,
}

/// Direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::NorthSouth,
            Direction::East | Direction::West => Axis::EastWest,
        }
    }

    /// Unit step in field coordinates
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::North => (0.0, -1.0),
            Direction::South => (0.0, 1.0),
            Direction::East => (1.0, 0.0),
            Direction::West => (-1.0, 0.0),
        }
    }

    /// Coordinate of the edge facing the direction of travel
    pub fn leading_edge(self, rect: &Rect) -> f64 {
        match self {
            Direction::North => rect.top(),
            Direction::South => rect.bottom(),
            Direction::East => rect.right(),
            Direction::West => rect.left(),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{name}")
    }
}

/// Signal phase: which axis currently has right-of-way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Axis A: north/south traffic may cross
    NorthSouthGreen,
    /// Axis B: east/west traffic may cross
    EastWestGreen,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::NorthSouthGreen, Phase::EastWestGreen];

    pub fn index(self) -> usize {
        match self {
            Phase::NorthSouthGreen => 0,
            Phase::EastWestGreen => 1,
        }
    }

    pub fn green_axis(self) -> Axis {
        match self {
            Phase::NorthSouthGreen => Axis::NorthSouth,
            Phase::EastWestGreen => Axis::EastWest,
        }
    }

    pub fn is_red_for(self, axis: Axis) -> bool {
        self.green_axis() != axis
    }

    pub fn flipped(self) -> Phase {
        match self {
            Phase::NorthSouthGreen => Phase::EastWestGreen,
            Phase::EastWestGreen => Phase::NorthSouthGreen,
        }
    }
}

impl TryFrom<usize> for Phase {
    type Error = JunctionError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Phase::ALL
            .get(index)
            .copied()
            .ok_or(JunctionError::InvalidAction(index))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::NorthSouthGreen => write!(f, "N/S green"),
            Phase::EastWestGreen => write!(f, "E/W green"),
        }
    }
}

/// Kind of occupant using the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Vehicle,
    Train,
}

impl EntityKind {
    /// Extent along the direction of travel
    pub fn length(self) -> f64 {
        match self {
            EntityKind::Vehicle => 20.0,
            EntityKind::Train => 60.0,
        }
    }

    /// Extent across the direction of travel
    pub fn breadth(self) -> f64 {
        match self {
            EntityKind::Vehicle => 10.0,
            EntityKind::Train => 14.0,
        }
    }

    /// Extra look-ahead added to the speed when probing for obstacles
    pub fn sensor_margin(self) -> f64 {
        match self {
            EntityKind::Vehicle => 3.0,
            EntityKind::Train => 6.0,
        }
    }

    /// `(width, height)` of the footprint when travelling in `direction`
    pub fn footprint(self, direction: Direction) -> (f64, f64) {
        match direction.axis() {
            Axis::NorthSouth => (self.breadth(), self.length()),
            Axis::EastWest => (self.length(), self.breadth()),
        }
    }
}

/// Observation used by the agent: live entity counts per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct State {
    pub north_south: usize,
    pub east_west: usize,
}

impl State {
    pub fn new(north_south: usize, east_west: usize) -> Self {
        Self {
            north_south,
            east_west,
        }
    }

    pub fn count(&self, axis: Axis) -> usize {
        match axis {
            Axis::NorthSouth => self.north_south,
            Axis::EastWest => self.east_west,
        }
    }

    pub fn total(&self) -> usize {
        self.north_south + self.east_west
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.north_south, self.east_west)
    }
}
