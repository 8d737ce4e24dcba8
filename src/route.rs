use crate::math::{point_along, Point2d};
use crate::network::RoadNetwork;
use crate::road::Road;
use crate::RoadId;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

/// A cyclic sequence of waypoints a vehicle patrols.
///
/// Routes model ambient traffic flow rather than trips: a vehicle that
/// exhausts its route restarts it in a reshuffled order instead of being
/// retired.
#[derive(Clone, Debug, Default)]
pub struct Route {
    /// The waypoints of the route.
    waypoints: SmallVec<[Point2d; 11]>,
    /// The index of the waypoint most recently reached.
    cursor: usize,
}

impl Route {
    /// Creates a route from a sequence of waypoints.
    pub fn new(waypoints: impl IntoIterator<Item = Point2d>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
            cursor: 0,
        }
    }

    /// The waypoints of the route.
    pub fn waypoints(&self) -> &[Point2d] {
        &self.waypoints
    }

    /// The index of the waypoint most recently reached.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The number of waypoints on the route.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the route has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The waypoint the vehicle should currently be heading towards.
    pub(crate) fn next_waypoint(&self) -> Option<Point2d> {
        if self.waypoints.is_empty() {
            return None;
        }
        Some(self.waypoints[(self.cursor + 1) % self.waypoints.len()])
    }

    /// Advances the cursor past a reached waypoint. Exhausting the
    /// sequence restarts it from the beginning in a reshuffled order.
    pub(crate) fn advance(&mut self, rng: &mut impl Rng) {
        if self.waypoints.is_empty() {
            return;
        }
        self.cursor += 1;
        if self.cursor >= self.waypoints.len() {
            self.cursor = 0;
            self.waypoints.shuffle(rng);
        }
    }
}

/// Builds a patrol route by walking the road graph from `start`.
///
/// A random interior point of the start road is chosen, then up to `hops`
/// connected roads are visited, each contributing its start end point and
/// a random interior point. The walk stops early when no connected road
/// exists, so the result holds at most `2 * hops + 1` waypoints. This is a
/// randomized local walk, not a path to a destination.
pub fn build_route(
    rng: &mut impl Rng,
    start: RoadId,
    network: &RoadNetwork,
    hops: usize,
) -> Route {
    let mut current = match network.get(start) {
        Some(road) => road,
        None => return Route::default(),
    };

    let mut waypoints: SmallVec<[Point2d; 11]> = SmallVec::new();
    waypoints.push(random_point_on(current, rng));

    for _ in 0..hops {
        let connected = network.connectivity_of(current.id());
        let next = match connected.choose(rng) {
            Some(id) => *id,
            None => break,
        };
        if let Some(road) = network.get(next) {
            waypoints.push(road.from());
            waypoints.push(random_point_on(road, rng));
            current = road;
        }
    }

    Route {
        waypoints,
        cursor: 0,
    }
}

/// Picks a uniformly random interior point of a road.
fn random_point_on(road: &Road, rng: &mut impl Rng) -> Point2d {
    point_along(road.from(), road.to(), rng.gen::<f64>())
}
