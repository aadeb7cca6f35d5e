//! Sprite and traffic kind registry
//!
//! Static attribute tables for every kind of traffic the board generator can
//! place, plus the footprints of the sprites the road geometry is built from.
//! Footprints are in sprite units and get multiplied by the configured scale.

/// Width and height of a sprite in sprite units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Footprint converted to viewport pixels
    pub fn scaled(&self, scale: f32) -> Footprint {
        Footprint {
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// The player's car
pub const PLAYER_CAR_FOOTPRINT: Footprint = Footprint::new(40.0, 66.0);

/// One tile of the road strip (all lanes together)
pub const ROAD_FOOTPRINT: Footprint = Footprint::new(169.0, 154.0);

/// One tile of the roadside strip on either side of the road
pub const SIDEWAY_FOOTPRINT: Footprint = Footprint::new(78.0, 154.0);

/// How a kind of traffic behaves relative to its neighbours in a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficClass {
    /// Does not move on its own
    Static,
    /// Moves forward, but well below the baseline traffic speed
    Slow,
    /// Moves forward close to the baseline traffic speed
    Fast,
}

impl TrafficClass {
    /// Whether a fast vehicle coming up behind this class would be forced into it
    pub fn blocks_fast_traffic(&self) -> bool {
        matches!(self, TrafficClass::Static | TrafficClass::Slow)
    }
}

/// Kind of entity that can occupy a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Roadblock standing still on the road
    Obstacle,
    /// Yellow sports car
    FastVehicle,
    /// Green hatchback
    Vehicle,
    /// Purple city car
    SlowVehicle,
    /// Delivery truck
    Truck,
}

impl EntityKind {
    /// Every kind, in catalog order
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Obstacle,
        EntityKind::FastVehicle,
        EntityKind::Vehicle,
        EntityKind::SlowVehicle,
        EntityKind::Truck,
    ];

    pub fn footprint(&self) -> Footprint {
        match self {
            EntityKind::Obstacle => Footprint::new(48.0, 18.0),
            EntityKind::FastVehicle => Footprint::new(40.0, 62.0),
            EntityKind::Vehicle => Footprint::new(34.0, 46.0),
            EntityKind::SlowVehicle => Footprint::new(30.0, 46.0),
            EntityKind::Truck => Footprint::new(46.0, 84.0),
        }
    }

    /// Multiplier applied to the baseline traffic speed.
    /// Obstacles have no speed of their own.
    pub fn speed_coefficient(&self) -> f32 {
        match self {
            EntityKind::Obstacle => 0.0,
            EntityKind::FastVehicle => 0.8,
            EntityKind::Vehicle => 0.7,
            EntityKind::SlowVehicle => 0.4,
            EntityKind::Truck => 0.3,
        }
    }

    pub fn class(&self) -> TrafficClass {
        match self {
            EntityKind::Obstacle => TrafficClass::Static,
            EntityKind::FastVehicle | EntityKind::Vehicle => TrafficClass::Fast,
            EntityKind::SlowVehicle | EntityKind::Truck => TrafficClass::Slow,
        }
    }

    /// Relative weight used when picking a kind for an occupied cell
    pub fn spawn_weight(&self) -> u32 {
        match self {
            EntityKind::Obstacle => 2,
            _ => 1,
        }
    }

    pub fn is_vehicle(&self) -> bool {
        !matches!(self, EntityKind::Obstacle)
    }

    /// Single-character code used by the ASCII board and map dumps
    pub fn symbol(&self) -> char {
        match self {
            EntityKind::Obstacle => '#',
            EntityKind::FastVehicle => 'F',
            EntityKind::Vehicle => 'V',
            EntityKind::SlowVehicle => 'S',
            EntityKind::Truck => 'T',
        }
    }

    /// Tallest footprint of any kind, in sprite units
    pub fn max_height() -> f32 {
        Self::ALL
            .iter()
            .map(|kind| kind.footprint().height)
            .fold(0.0, f32::max)
    }

    /// Widest footprint of any kind, in sprite units
    pub fn max_width() -> f32 {
        Self::ALL
            .iter()
            .map(|kind| kind.footprint().width)
            .fold(0.0, f32::max)
    }
}
