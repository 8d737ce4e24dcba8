//! Tests of road network geometry queries and route building.

use assert_approx_eq::assert_approx_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use urban_traffic::math::Point2d;
use urban_traffic::{build_route, map, RoadAttributes, RoadNetwork};

fn road(name: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> RoadAttributes<'_> {
    RoadAttributes {
        name,
        from: Point2d::new(x1, y1),
        to: Point2d::new(x2, y2),
        capacity: 10,
        nominal_speed: 40.0,
    }
}

/// Test that connectivity requires near end points; mid-span crossings
/// do not connect.
#[test]
fn connectivity_requires_near_end_points() {
    let mut network = RoadNetwork::new(40.0);
    let a = network.add_road(&road("A", 0.0, 0.0, 200.0, 0.0));
    let b = network.add_road(&road("B", 230.0, 0.0, 400.0, 0.0));
    let far = network.add_road(&road("Far", 0.0, 500.0, 200.0, 500.0));
    // Crosses A mid-span, but no end point pair is near.
    let crossing = network.add_road(&road("Crossing", 100.0, -200.0, 100.0, 200.0));

    let connected = network.connectivity_of(a);
    assert!(connected.contains(&b));
    assert!(!connected.contains(&far));
    assert!(!connected.contains(&crossing));

    // The relation is symmetric.
    assert!(network.connectivity_of(b).contains(&a));
}

/// Test that the nearest road query uses clamped segment distance and
/// respects the maximum distance.
#[test]
fn nearest_road_uses_segment_distance() {
    let mut network = RoadNetwork::new(40.0);
    let a = network.add_road(&road("A", 0.0, 0.0, 200.0, 0.0));
    let b = network.add_road(&road("B", 0.0, 100.0, 200.0, 100.0));

    assert_eq!(network.nearest_road(Point2d::new(50.0, 30.0), 50.0), Some(a));
    assert_eq!(network.nearest_road(Point2d::new(50.0, 70.0), 50.0), Some(b));
    assert_eq!(network.nearest_road(Point2d::new(50.0, 70.0), 10.0), None);

    // Beyond the segment end, the distance is to the end point itself.
    assert_eq!(network.nearest_road(Point2d::new(300.0, 0.0), 150.0), Some(a));
    assert_eq!(network.nearest_road(Point2d::new(300.0, 0.0), 50.0), None);
}

/// Test that a zero-length road degrades to a point instead of breaking
/// the distance math.
#[test]
fn zero_length_road_is_treated_as_a_point() {
    let mut network = RoadNetwork::new(40.0);
    let point_road = network.add_road(&road("Point", 100.0, 100.0, 100.0, 100.0));
    let neighbour = network.add_road(&road("Neighbour", 120.0, 100.0, 300.0, 100.0));

    assert_eq!(
        network.nearest_road(Point2d::new(100.0, 130.0), 50.0),
        Some(point_road)
    );
    assert_eq!(network.nearest_road(Point2d::new(100.0, 160.0), 50.0), None);

    assert!(network.connectivity_of(point_road).contains(&neighbour));
}

/// Test that the empty-road speed fallback reports the nominal speed.
#[test]
fn empty_road_reports_nominal_speed() {
    let mut network = RoadNetwork::new(40.0);
    let a = network.add_road(&road("A", 0.0, 0.0, 200.0, 0.0));

    network.update_occupancy(a, 4, 22.5);
    let r = network.get(a).unwrap();
    assert_eq!(r.occupancy(), 4);
    assert_approx_eq!(r.avg_speed(), 22.5);
    assert_approx_eq!(r.density(), 0.4);

    network.update_occupancy(a, 0, 0.0);
    let r = network.get(a).unwrap();
    assert_approx_eq!(r.avg_speed(), r.nominal_speed());
    assert_approx_eq!(r.density(), 0.0);
}

/// Test that generated routes are bounded by 2 * hops + 1 waypoints.
#[test]
fn route_walk_is_bounded() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut network = RoadNetwork::new(40.0);
    for attribs in map::sample_city() {
        network.add_road(&attribs);
    }

    let road_ids: Vec<_> = network.road_ids().collect();
    for road_id in road_ids {
        let route = build_route(&mut rng, road_id, &network, 4);
        assert!(!route.is_empty());
        assert!(route.len() <= 9);
        assert_eq!(route.cursor(), 0);
    }
}

/// Test that a route from an isolated road is a single point on it.
#[test]
fn isolated_road_route_stays_on_the_road() {
    let mut rng = StdRng::seed_from_u64(43);
    let mut network = RoadNetwork::new(40.0);
    let a = network.add_road(&road("Isla", 0.0, 0.0, 100.0, 0.0));

    let route = build_route(&mut rng, a, &network, 4);
    assert_eq!(route.len(), 1);
    let p = route.waypoints()[0];
    assert!((0.0..=100.0).contains(&p.x));
    assert_approx_eq!(p.y, 0.0);
}
