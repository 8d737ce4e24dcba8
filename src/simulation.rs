use crate::alert::{Alert, AlertEngine};
use crate::config::SimConfig;
use crate::congestion::{self, CongestionMonitor};
use crate::fleet::{Fleet, VehicleFilter, Viewport};
use crate::math::Point2d;
use crate::network::RoadNetwork;
use crate::road::{Road, RoadAttributes};
use crate::route::Route;
use crate::vehicle::{Vehicle, VehicleKind};
use crate::{RoadId, VehicleId};
use anyhow::Result;
use rand_distr::Normal;
use std::collections::HashMap;

/// Ratio of current to maximum speed below which a vehicle counts as slow.
const SLOW_RATIO: f64 = 0.4;

/// An urban traffic simulation.
///
/// The simulation is an explicitly constructed context owned by the host
/// loop. The host drives it by calling [step](Self::step) once per frame
/// and reads state back through the query methods between ticks; the
/// core never pushes.
pub struct Simulation {
    /// The configuration the simulation was constructed with.
    config: SimConfig,
    /// The road network.
    network: RoadNetwork,
    /// The vehicle population.
    fleet: Fleet,
    /// The per-tick congestion aggregation pass.
    monitor: CongestionMonitor,
    /// The alert engine.
    alerts: AlertEngine,
    /// The visible region used for off-screen eviction.
    viewport: Viewport,
    /// The simulation clock in s.
    time: f64,
    /// The current frame of simulation.
    frame: usize,
    /// The statistics snapshot of the last completed tick.
    stats: TrafficStats,
}

/// Aggregate statistics, recomputed as a fresh snapshot each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficStats {
    /// The number of vehicles matching the active filter.
    pub total_vehicles: usize,
    /// Filtered vehicles travelling below 40% of their maximum speed.
    pub slow_vehicles: usize,
    /// The mean speed of the filtered vehicles in km/h, 0 when none match.
    pub avg_speed: f64,
    /// The number of retained alerts.
    pub alert_count: usize,
}

impl Simulation {
    /// Creates a new simulation from a validated configuration.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            network: RoadNetwork::new(config.connect_threshold),
            fleet: Fleet::new(&config),
            monitor: CongestionMonitor,
            alerts: AlertEngine::new(),
            viewport: Viewport::default(),
            time: 0.0,
            frame: 0,
            stats: TrafficStats::default(),
            config,
        })
    }

    /// Adds a road to the network.
    pub fn add_road(&mut self, attribs: &RoadAttributes) -> RoadId {
        self.network.add_road(attribs)
    }

    /// Adds a vehicle of the given kind to the given road, with a patrol
    /// route walked from it. Returns `None` when the road does not exist
    /// or the population bound would be exceeded.
    pub fn add_vehicle(&mut self, kind: VehicleKind, road: RoadId) -> Option<VehicleId> {
        self.fleet.spawn_as(kind, road, &self.network, &self.config)
    }

    /// Removes a vehicle from the simulation.
    pub fn remove_vehicle(&mut self, vehicle_id: VehicleId) {
        self.fleet.remove(vehicle_id);
    }

    /// Replaces a vehicle's patrol route. Returns false if the vehicle
    /// does not exist.
    pub fn set_vehicle_route(&mut self, vehicle_id: VehicleId, route: Route) -> bool {
        self.fleet
            .with_vehicle_mut(vehicle_id, |vehicle| vehicle.set_route(route))
    }

    /// Moves a vehicle to a new position. Returns false if the vehicle
    /// does not exist.
    pub fn set_vehicle_position(&mut self, vehicle_id: VehicleId, pos: Point2d) -> bool {
        self.fleet
            .with_vehicle_mut(vehicle_id, |vehicle| vehicle.set_position(pos))
    }

    /// Sets the fixed destination a vehicle seeks when its route is
    /// empty. Returns false if the vehicle does not exist.
    pub fn set_vehicle_target(&mut self, vehicle_id: VehicleId, target: Point2d) -> bool {
        self.fleet
            .with_vehicle_mut(vehicle_id, |vehicle| vehicle.set_target(target))
    }

    /// Pauses or resumes a single vehicle, leaving the rest of the
    /// simulation running. Returns false if the vehicle does not exist.
    pub fn set_vehicle_paused(&mut self, vehicle_id: VehicleId, paused: bool) -> bool {
        self.fleet.with_vehicle_mut(vehicle_id, |vehicle| {
            if paused {
                vehicle.pause()
            } else {
                vehicle.resume()
            }
        })
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// One call is one tick: spawn, per-vehicle updates, occupancy
    /// aggregation, congestion classification, alerting, and eviction,
    /// in that order. A paused simulation returns immediately and
    /// retains all state, so resuming continues where it left off.
    pub fn step(&mut self, dt: f64) {
        if !self.fleet.is_running() {
            return;
        }
        let dt = dt * self.fleet.speed();
        self.time += dt;

        self.fleet.maybe_spawn(self.time, &self.network, &self.config);
        self.fleet.update_vehicles(dt, &self.network, &self.config);
        self.monitor.aggregate(&self.fleet, &mut self.network);
        self.alerts.scan(&self.network, &self.config, self.time);
        self.fleet.evict(&self.viewport);
        self.stats = self.compute_stats();
        self.frame += 1;
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The simulation clock in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The configuration the simulation was constructed with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The road network.
    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// The vehicle population.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Returns an iterator over all the roads in the network.
    pub fn iter_roads(&self) -> impl Iterator<Item = &Road> {
        self.network.roads()
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.fleet.iter()
    }

    /// Returns an iterator over the vehicles matching the active filter.
    pub fn iter_filtered_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.fleet.iter_filtered()
    }

    /// Gets a reference to the road with the given ID.
    pub fn get_road(&self, road_id: RoadId) -> Option<&Road> {
        self.network.get(road_id)
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.fleet.get(vehicle_id)
    }

    /// The statistics snapshot of the last completed tick.
    pub fn get_stats(&self) -> TrafficStats {
        self.stats
    }

    /// The retained alerts, most recent first.
    pub fn get_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.alerts()
    }

    /// The busiest roads, ranked by descending density.
    pub fn congested_roads(&self) -> Vec<RoadId> {
        congestion::congested_roads(&self.network)
    }

    /// Counts the vehicles of each kind in the whole population,
    /// ignoring the filter.
    pub fn kind_counts(&self) -> HashMap<VehicleKind, usize> {
        self.fleet.kind_counts()
    }

    /// Whether per-tick updates are running.
    pub fn is_running(&self) -> bool {
        self.fleet.is_running()
    }

    /// Resumes per-tick updates.
    pub fn play(&mut self) {
        self.fleet.play();
    }

    /// Freezes per-tick updates without discarding any state.
    pub fn pause(&mut self) {
        self.fleet.pause();
    }

    /// Toggles between playing and paused, returning the new state.
    pub fn toggle_play_pause(&mut self) -> bool {
        self.fleet.toggle_play_pause()
    }

    /// The playback speed multiplier.
    pub fn speed(&self) -> f64 {
        self.fleet.speed()
    }

    /// Sets the playback speed multiplier applied to `dt`.
    pub fn set_speed(&mut self, speed: f64) {
        self.fleet.set_speed(speed);
    }

    /// The active display filter.
    pub fn filter(&self) -> VehicleFilter {
        self.fleet.filter()
    }

    /// Sets the display filter. Non-matching vehicles keep being
    /// simulated; they are only excluded from filtered queries and stats.
    pub fn set_filter(&mut self, filter: VehicleFilter) {
        self.fleet.set_filter(filter);
        self.stats = self.compute_stats();
    }

    /// The visible region used for off-screen eviction.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the visible region. The host calls this as the user pans
    /// and zooms; the simulation only reads it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Clears the vehicle population and the alert history together, and
    /// zeroes the statistics snapshot.
    pub fn reset(&mut self) {
        self.fleet.clear();
        self.alerts.clear();
        self.stats = TrafficStats::default();
        log::info!("simulation reset");
    }

    /// Randomly scales each vehicle's maximum speed by a factor sampled
    /// from a normal distribution with a mean of 1 (no adjustment) and
    /// standard deviation of `stddev`, clamped to [0.75, 1.25].
    pub fn randomise_max_speeds(&mut self, stddev: f64) {
        let distr = Normal::new(1.0, stddev).expect("invalid standard deviation");
        self.fleet.adjust_max_speeds(&distr);
    }

    /// Computes a fresh statistics snapshot from the filtered population.
    fn compute_stats(&self) -> TrafficStats {
        let mut total_vehicles = 0;
        let mut slow_vehicles = 0;
        let mut total_speed = 0.0;
        for vehicle in self.fleet.iter_filtered() {
            total_vehicles += 1;
            total_speed += vehicle.speed();
            if vehicle.speed_ratio() < SLOW_RATIO {
                slow_vehicles += 1;
            }
        }
        let avg_speed = if total_vehicles > 0 {
            total_speed / total_vehicles as f64
        } else {
            0.0
        };
        TrafficStats {
            total_vehicles,
            slow_vehicles,
            avg_speed,
            alert_count: self.alerts.len(),
        }
    }
}
