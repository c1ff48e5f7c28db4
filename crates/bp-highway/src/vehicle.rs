//! The vehicle capability interface.

/// What behaviors may ask of a vehicle.  Positions are `[x, y]` in metres
/// with `x` along the road; lane `0` is the leftmost lane.
pub trait Vehicle {
    fn name(&self) -> &str;

    fn position(&self) -> [f64; 2];

    fn lane_index(&self) -> usize;

    fn speed(&self) -> f64;

    /// `true` if this vehicle is more than `margin` metres behind `other`.
    fn is_behind(&self, other: &dyn Vehicle, margin: f64) -> bool {
        self.position()[0] + margin < other.position()[0]
    }

    fn distance_to(&self, other: &dyn Vehicle) -> f64 {
        let [x0, y0] = self.position();
        let [x1, y1] = other.position();
        (x1 - x0).hypot(y1 - y0)
    }
}

/// A plain kinematic snapshot of one vehicle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleState {
    pub name:     String,
    pub position: [f64; 2],
    pub lane:     usize,
    pub speed:    f64,
}

impl VehicleState {
    pub fn new(name: impl Into<String>, x: f64, lane: usize, speed: f64, lane_width: f64) -> Self {
        Self { name: name.into(), position: [x, lane as f64 * lane_width], lane, speed }
    }
}

impl Vehicle for VehicleState {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> [f64; 2] {
        self.position
    }

    fn lane_index(&self) -> usize {
        self.lane
    }

    fn speed(&self) -> f64 {
        self.speed
    }
}
