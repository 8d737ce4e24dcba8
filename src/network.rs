use crate::math::{distance, point_to_segment_distance, Point2d};
use crate::road::{Road, RoadAttributes};
use crate::{RoadId, RoadSet};
use itertools::Itertools;
use smallvec::SmallVec;

/// The static graph of roads under simulation.
///
/// Roads are owned by the network and referenced everywhere else by
/// [RoadId]. Connectivity between roads is a derived relation based on
/// end point proximity, not a stored adjacency list.
pub struct RoadNetwork {
    /// The roads in the network.
    roads: RoadSet,
    /// The distance below which two road end points are considered joined.
    connect_threshold: f64,
}

impl RoadNetwork {
    /// Creates an empty road network with the given connectivity threshold.
    pub fn new(connect_threshold: f64) -> Self {
        Self {
            roads: RoadSet::default(),
            connect_threshold,
        }
    }

    /// Adds a road to the network.
    pub fn add_road(&mut self, attribs: &RoadAttributes) -> RoadId {
        self.roads.insert_with_key(|id| Road::new(id, attribs))
    }

    /// Gets a reference to the road with the given ID.
    pub fn get(&self, road_id: RoadId) -> Option<&Road> {
        self.roads.get(road_id)
    }

    /// Returns an iterator over all the roads in the network.
    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    /// Returns an iterator over the IDs of all the roads in the network.
    pub fn road_ids(&self) -> impl Iterator<Item = RoadId> + '_ {
        self.roads.keys()
    }

    /// The number of roads in the network.
    pub fn len(&self) -> usize {
        self.roads.len()
    }

    /// Whether the network contains no roads.
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    /// Stores a road's occupancy count and measured average speed,
    /// recomputing its density. Unknown road IDs are ignored.
    pub fn update_occupancy(&mut self, road_id: RoadId, occupancy: u32, avg_speed: f64) {
        if let Some(road) = self.roads.get_mut(road_id) {
            road.set_traffic(occupancy, avg_speed);
        }
    }

    /// Returns the roads connected to the given road.
    ///
    /// Two roads are connected when any pair of their end points lies
    /// within the connectivity threshold. Roads crossing mid-span without
    /// near end points are deliberately not connected.
    pub fn connectivity_of(&self, road_id: RoadId) -> SmallVec<[RoadId; 8]> {
        let road = match self.roads.get(road_id) {
            Some(road) => road,
            None => return SmallVec::new(),
        };
        self.roads
            .values()
            .filter(|other| other.id() != road_id)
            .filter(|other| self.are_connected(road, other))
            .map(|other| other.id())
            .collect()
    }

    /// Whether any end point pair of the two roads lies within the
    /// connectivity threshold.
    fn are_connected(&self, a: &Road, b: &Road) -> bool {
        a.ends()
            .iter()
            .cartesian_product(b.ends().iter())
            .any(|(p, q)| distance(*p, *q) < self.connect_threshold)
    }

    /// Returns the road whose segment is closest to the given point,
    /// or `None` if every road is further than `max_distance`.
    pub fn nearest_road(&self, point: Point2d, max_distance: f64) -> Option<RoadId> {
        self.roads
            .values()
            .map(|road| {
                let dist = point_to_segment_distance(point, road.from(), road.to());
                (road.id(), dist)
            })
            .filter(|(_, dist)| *dist <= max_distance)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id)
    }
}
