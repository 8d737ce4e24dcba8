use urban_traffic::{map, SimConfig, Simulation};

fn main() {
    env_logger::init();

    let mut sim = Simulation::new(SimConfig::default()).expect("default configuration is valid");
    for road in map::sample_city() {
        sim.add_road(&road);
    }

    // Roughly a minute of city traffic at 20 ticks per second.
    for _ in 0..1200 {
        sim.step(0.05);
        if sim.frame() % 200 == 0 {
            let stats = sim.get_stats();
            log::info!(
                "frame {}: {} vehicles ({} slow), avg speed {:.1} km/h, {} alerts",
                sim.frame(),
                stats.total_vehicles,
                stats.slow_vehicles,
                stats.avg_speed,
                stats.alert_count
            );
        }
    }

    let stats = sim.get_stats();
    let congested: Vec<&str> = sim
        .congested_roads()
        .iter()
        .filter_map(|id| sim.get_road(*id))
        .map(|road| road.name())
        .collect();
    let summary = serde_json::json!({
        "frames": sim.frame(),
        "vehicles": stats.total_vehicles,
        "slow_vehicles": stats.slow_vehicles,
        "avg_speed": stats.avg_speed,
        "alerts": stats.alert_count,
        "congested_roads": congested,
    });
    println!("{summary}");
}
