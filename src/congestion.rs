use crate::fleet::Fleet;
use crate::network::RoadNetwork;
use crate::RoadId;
use itertools::Itertools;

/// Density at or above which a road is classified as congested.
pub const CONGESTED_DENSITY: f64 = 0.7;

/// Density at or above which a road is classified as moderately loaded.
pub const MODERATE_DENSITY: f64 = 0.4;

/// Density at or above which a road appears in the congested-roads ranking.
const RANKED_DENSITY: f64 = 0.3;

/// Maximum number of entries in the congested-roads ranking.
const RANKED_LIMIT: usize = 10;

/// The congestion classification of a road.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CongestionLevel {
    Free,
    Moderate,
    Congested,
}

impl CongestionLevel {
    /// Classifies a road density.
    pub fn classify(density: f64) -> Self {
        if density >= CONGESTED_DENSITY {
            CongestionLevel::Congested
        } else if density >= MODERATE_DENSITY {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Free
        }
    }
}

/// Recomputes per-road traffic measurements from the vehicle population.
#[derive(Default)]
pub struct CongestionMonitor;

impl CongestionMonitor {
    /// Pushes the current occupancy and measured average speed of every
    /// road into the network.
    ///
    /// Occupancy is the count of vehicles assigned to the road; the
    /// average speed is the arithmetic mean of their current speeds, 0
    /// for an empty road (the network substitutes the nominal speed).
    pub fn aggregate(&self, fleet: &Fleet, network: &mut RoadNetwork) {
        let road_ids: Vec<RoadId> = network.road_ids().collect();
        for road_id in road_ids {
            let mut count = 0u32;
            let mut total_speed = 0.0;
            for vehicle in fleet.iter().filter(|v| v.road_id() == road_id) {
                count += 1;
                total_speed += vehicle.speed();
            }
            let avg_speed = if count > 0 {
                total_speed / count as f64
            } else {
                0.0
            };
            network.update_occupancy(road_id, count, avg_speed);
        }
    }
}

/// The busiest roads, ranked by descending density.
pub(crate) fn congested_roads(network: &RoadNetwork) -> Vec<RoadId> {
    network
        .roads()
        .filter(|road| road.density() >= RANKED_DENSITY)
        .sorted_by(|a, b| {
            b.density()
                .partial_cmp(&a.density())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .take(RANKED_LIMIT)
        .map(|road| road.id())
        .collect()
}
