//! Tests of congestion aggregation, classification, and alerting.

use assert_approx_eq::assert_approx_eq;
use urban_traffic::math::Point2d;
use urban_traffic::{
    AlertSeverity, CongestionLevel, RoadAttributes, SimConfig, Simulation, VehicleKind, Viewport,
};

fn seeded_config(seed: u64) -> SimConfig {
    SimConfig {
        rng_seed: Some(seed),
        ..SimConfig::default()
    }
}

/// Test the reference congestion scenario: fifteen vehicles on a road
/// with capacity 20 read as density 0.75, classify as congested, and
/// raise exactly one danger alert; further spawns raise no second one.
#[test]
fn congested_road_raises_exactly_one_danger_alert() {
    let mut sim = Simulation::new(seeded_config(11)).unwrap();
    let road = sim.add_road(&RoadAttributes {
        name: "Av. Central",
        from: Point2d::new(0.0, 300.0),
        to: Point2d::new(400.0, 300.0),
        capacity: 20,
        nominal_speed: 50.0,
    });

    // Fourteen vehicles here; the fifteenth arrives through the spawn
    // gate on the first tick.
    for _ in 0..14 {
        sim.add_vehicle(VehicleKind::Car, road).unwrap();
    }
    sim.step(0.1);

    let r = sim.get_road(road).unwrap();
    assert_eq!(r.occupancy(), 15);
    assert_approx_eq!(r.density(), 0.75);
    assert_eq!(
        CongestionLevel::classify(r.density()),
        CongestionLevel::Congested
    );
    let danger = sim
        .get_alerts()
        .filter(|a| a.road == road && a.severity == AlertSeverity::Danger)
        .count();
    assert_eq!(danger, 1);

    // Step past the spawn interval so another vehicle arrives.
    sim.step(2.5);
    assert_eq!(sim.get_road(road).unwrap().occupancy(), 16);
    let danger = sim
        .get_alerts()
        .filter(|a| a.road == road && a.severity == AlertSeverity::Danger)
        .count();
    assert_eq!(danger, 1);
    assert_eq!(sim.get_alerts().count(), 1);
}

/// Test that occupancy counts assigned vehicles and density is always
/// occupancy over capacity.
#[test]
fn density_is_occupancy_over_capacity() {
    let mut sim = Simulation::new(seeded_config(12)).unwrap();
    let a = sim.add_road(&RoadAttributes {
        name: "Ancha",
        from: Point2d::new(0.0, 100.0),
        to: Point2d::new(400.0, 100.0),
        capacity: 8,
        nominal_speed: 50.0,
    });
    let b = sim.add_road(&RoadAttributes {
        name: "Vacía",
        from: Point2d::new(0.0, 500.0),
        to: Point2d::new(400.0, 500.0),
        capacity: 10,
        nominal_speed: 45.0,
    });

    for _ in 0..3 {
        sim.add_vehicle(VehicleKind::Taxi, a).unwrap();
    }
    sim.step(0.1);

    let assigned_to_a = sim.iter_vehicles().filter(|v| v.road_id() == a).count();
    let road_a = sim.get_road(a).unwrap();
    assert_eq!(road_a.occupancy() as usize, assigned_to_a);
    assert_approx_eq!(
        road_a.density(),
        road_a.occupancy() as f64 / road_a.capacity() as f64
    );

    // An empty road reports its nominal speed, never a misleading zero.
    let assigned_to_b = sim.iter_vehicles().filter(|v| v.road_id() == b).count();
    if assigned_to_b == 0 {
        let road_b = sim.get_road(b).unwrap();
        assert_approx_eq!(road_b.avg_speed(), road_b.nominal_speed());
        assert_approx_eq!(road_b.density(), 0.0);
    }
}

/// Test that alert retention is capped, dropping the oldest inserted,
/// with the most recent alert at the front.
#[test]
fn alert_retention_is_capped_fifo() {
    let mut sim = Simulation::new(seeded_config(13)).unwrap();
    sim.set_viewport(Viewport {
        width: 800.0,
        height: 2000.0,
        zoom: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    });

    // Twelve saturated roads, each far enough apart not to connect.
    let roads: Vec<_> = (0..12)
        .map(|i| {
            sim.add_road(&RoadAttributes {
                name: "Callejón",
                from: Point2d::new(0.0, 150.0 * i as f64),
                to: Point2d::new(30.0, 150.0 * i as f64),
                capacity: 1,
                nominal_speed: 30.0,
            })
        })
        .collect();
    for road in &roads {
        sim.add_vehicle(VehicleKind::Car, *road).unwrap();
    }

    sim.step(0.1);

    assert_eq!(sim.get_alerts().count(), 10);
    // Most recent first: alert IDs are assigned in raise order, so they
    // must be strictly decreasing from the front.
    let ids: Vec<u64> = sim.get_alerts().map(|a| a.id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
    // Twelve roads were saturated; the two oldest alerts were pushed out.
    let roads_with_alert = roads
        .iter()
        .filter(|road| sim.get_alerts().any(|a| a.road == **road))
        .count();
    assert_eq!(roads_with_alert, 10);

    // Another tick re-raises nothing.
    sim.step(0.1);
    assert_eq!(sim.get_alerts().count(), 10);
}

/// Test that alerts persist when density falls and leave only by age.
#[test]
fn alerts_age_out_instead_of_resolving() {
    let config = SimConfig {
        // Only the immediate first-tick spawn, no later arrivals.
        spawn_interval: 1e6,
        ..seeded_config(14)
    };
    let mut sim = Simulation::new(config).unwrap();
    let road = sim.add_road(&RoadAttributes {
        name: "Saturada",
        from: Point2d::new(0.0, 0.0),
        to: Point2d::new(400.0, 0.0),
        capacity: 1,
        nominal_speed: 50.0,
    });

    sim.step(0.1);
    assert_eq!(sim.get_alerts().count(), 1);

    // Drain the road; the alert is not resolved by falling density.
    let ids: Vec<_> = sim.iter_vehicles().map(|v| v.id()).collect();
    for id in ids {
        sim.remove_vehicle(id);
    }
    sim.step(1.0);
    assert_approx_eq!(sim.get_road(road).unwrap().density(), 0.0);
    assert_eq!(sim.get_alerts().count(), 1);

    // Thirty seconds on, it ages out.
    for _ in 0..3 {
        sim.step(10.0);
    }
    assert_eq!(sim.get_alerts().count(), 0);
}
