//! Feature-gated JSON snapshots of simulation state, intended for
//! external visualisers and frame-by-frame inspection.

use crate::Simulation;
use serde_json::{json, Value};

/// Serialises one frame of simulation state.
pub fn frame_json(sim: &Simulation) -> Value {
    json!({
        "frame": sim.frame(),
        "time": sim.time(),
        "roads": sim
            .iter_roads()
            .map(|road| {
                json!({
                    "name": road.name(),
                    "from": [road.from().x, road.from().y],
                    "to": [road.to().x, road.to().y],
                    "occupancy": road.occupancy(),
                    "density": road.density(),
                    "avg_speed": road.avg_speed(),
                })
            })
            .collect::<Vec<_>>(),
        "vehicles": sim
            .iter_vehicles()
            .map(|vehicle| {
                json!({
                    "kind": format!("{:?}", vehicle.kind()),
                    "pos": [vehicle.position().x, vehicle.position().y],
                    "heading": vehicle.heading(),
                    "speed": vehicle.speed(),
                })
            })
            .collect::<Vec<_>>(),
        "alerts": sim
            .get_alerts()
            .map(|alert| {
                json!({
                    "severity": format!("{:?}", alert.severity),
                    "title": alert.title,
                    "message": alert.message,
                    "timestamp": alert.timestamp,
                })
            })
            .collect::<Vec<_>>(),
    })
}
