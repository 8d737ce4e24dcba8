pub use alert::{Alert, AlertEngine, AlertSeverity};
pub use cgmath;
pub use config::SimConfig;
pub use congestion::{CongestionLevel, CongestionMonitor};
pub use fleet::{Fleet, VehicleFilter, Viewport};
pub use network::RoadNetwork;
pub use road::{Road, RoadAttributes};
pub use route::{build_route, Route};
pub use simulation::{Simulation, TrafficStats};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use vehicle::{Vehicle, VehicleAttributes, VehicleKind};

mod alert;
mod config;
mod congestion;
#[cfg(feature = "debug")]
pub mod debug;
mod fleet;
pub mod map;
pub mod math;
mod network;
mod road;
mod route;
mod simulation;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Road].
    pub struct RoadId;
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type RoadSet = SlotMap<RoadId, Road>;
type VehicleSet = SlotMap<VehicleId, Vehicle>;
