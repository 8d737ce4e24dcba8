use crate::math::{distance, Point2d};
use crate::RoadId;

/// A single directed road segment in the network.
#[derive(Clone, Debug)]
pub struct Road {
    /// The road ID.
    id: RoadId,
    /// The display name of the road.
    name: String,
    /// The two end points of the road segment.
    ends: [Point2d; 2],
    /// The number of vehicles the road can carry before full saturation.
    capacity: u32,
    /// The number of vehicles currently assigned to the road.
    occupancy: u32,
    /// The average speed reported for the road, in km/h.
    avg_speed: f64,
    /// The speed reported when no vehicles are present, in km/h.
    nominal_speed: f64,
    /// The ratio of occupancy to capacity. Not clamped; may exceed 1.
    density: f64,
}

/// The attributes of a road.
pub struct RoadAttributes<'a> {
    /// The display name of the road.
    pub name: &'a str,
    /// The start end point of the road.
    pub from: Point2d,
    /// The end point of the road.
    pub to: Point2d,
    /// The number of vehicles the road can carry before full saturation.
    /// Must be positive.
    pub capacity: u32,
    /// The speed reported when no vehicles are present, in km/h.
    pub nominal_speed: f64,
}

impl Road {
    /// Creates a new road.
    pub(crate) fn new(id: RoadId, attribs: &RoadAttributes) -> Self {
        debug_assert!(attribs.capacity > 0);
        Self {
            id,
            name: attribs.name.to_owned(),
            ends: [attribs.from, attribs.to],
            capacity: attribs.capacity,
            occupancy: 0,
            avg_speed: attribs.nominal_speed,
            nominal_speed: attribs.nominal_speed,
            density: 0.0,
        }
    }

    /// Gets the road's ID.
    pub fn id(&self) -> RoadId {
        self.id
    }

    /// The display name of the road.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The two end points of the road segment.
    pub fn ends(&self) -> [Point2d; 2] {
        self.ends
    }

    /// The start end point of the road.
    pub fn from(&self) -> Point2d {
        self.ends[0]
    }

    /// The end point of the road.
    pub fn to(&self) -> Point2d {
        self.ends[1]
    }

    /// The length of the road segment in world units.
    pub fn length(&self) -> f64 {
        distance(self.ends[0], self.ends[1])
    }

    /// The direction of travel along the road, in radians.
    pub fn heading(&self) -> f64 {
        let dir = self.ends[1] - self.ends[0];
        dir.y.atan2(dir.x)
    }

    /// The number of vehicles the road can carry before full saturation.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// The number of vehicles currently assigned to the road.
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// The average speed reported for the road, in km/h.
    pub fn avg_speed(&self) -> f64 {
        self.avg_speed
    }

    /// The speed reported when no vehicles are present, in km/h.
    pub fn nominal_speed(&self) -> f64 {
        self.nominal_speed
    }

    /// The ratio of occupancy to capacity. Not clamped; may exceed 1.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Stores a new occupancy count and measured average speed,
    /// recomputing the road's density.
    ///
    /// An empty road reports its nominal speed rather than a measured
    /// average of zero.
    pub(crate) fn set_traffic(&mut self, occupancy: u32, avg_speed: f64) {
        self.occupancy = occupancy;
        self.avg_speed = if occupancy == 0 {
            self.nominal_speed
        } else {
            avg_speed
        };
        self.density = if self.capacity > 0 {
            occupancy as f64 / self.capacity as f64
        } else {
            0.0
        };
    }
}
