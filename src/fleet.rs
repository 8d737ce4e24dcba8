use crate::config::SimConfig;
use crate::math::Point2d;
use crate::network::RoadNetwork;
use crate::route::build_route;
use crate::vehicle::{Vehicle, VehicleKind};
use crate::{RoadId, VehicleId, VehicleSet};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_distr::Distribution;
use std::collections::HashMap;

/// Vehicles whose projected screen position falls further than this
/// outside the viewport are evicted, in screen units.
const EVICT_MARGIN: f64 = 100.0;

/// The visible region used for off-screen eviction.
///
/// The viewport is a read-only external input: the host updates it as the
/// user pans and zooms, and the fleet only reads it.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// The viewport width in screen units.
    pub width: f64,
    /// The viewport height in screen units.
    pub height: f64,
    /// The zoom factor applied to world coordinates.
    pub zoom: f64,
    /// The horizontal pan offset in screen units.
    pub offset_x: f64,
    /// The vertical pan offset in screen units.
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Viewport {
    /// Whether a world-space point projects inside the viewport
    /// expanded by `margin` on every side.
    fn contains(&self, pos: Point2d, margin: f64) -> bool {
        let sx = pos.x * self.zoom + self.offset_x;
        let sy = pos.y * self.zoom + self.offset_y;
        sx >= -margin && sx <= self.width + margin && sy >= -margin && sy <= self.height + margin
    }
}

/// Restricts which vehicles are counted and listed.
///
/// Filtering is a view concern: non-matching vehicles keep being
/// simulated, they are only excluded from filtered queries and stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleFilter {
    /// All vehicles match.
    #[default]
    All,
    /// Only vehicles of the given kind match.
    Kind(VehicleKind),
}

impl VehicleFilter {
    /// Whether the given vehicle matches the filter.
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        match self {
            VehicleFilter::All => true,
            VehicleFilter::Kind(kind) => vehicle.kind() == *kind,
        }
    }
}

/// Spawns, updates and retires the simulated vehicle population.
pub struct Fleet {
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The simulation time of the last spawn attempt, in s.
    last_spawn: Option<f64>,
    /// Whether per-tick updates are running.
    running: bool,
    /// The playback speed multiplier applied to `dt`.
    speed: f64,
    /// The active display filter.
    filter: VehicleFilter,
    /// Source of randomness for spawning, route walks and reshuffles.
    rng: StdRng,
}

impl Fleet {
    /// Creates an empty fleet.
    pub(crate) fn new(config: &SimConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            vehicles: VehicleSet::default(),
            last_spawn: None,
            running: true,
            speed: 1.0,
            filter: VehicleFilter::All,
            rng,
        }
    }

    /// The number of vehicles being simulated.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the fleet holds no vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    /// Returns an iterator over all the vehicles in the fleet.
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Returns an iterator over the vehicles matching the active filter.
    pub fn iter_filtered(&self) -> impl Iterator<Item = &Vehicle> {
        let filter = self.filter;
        self.vehicles
            .values()
            .filter(move |vehicle| filter.matches(vehicle))
    }

    /// Counts the vehicles of each kind in the whole population.
    pub fn kind_counts(&self) -> HashMap<VehicleKind, usize> {
        self.vehicles.values().map(|vehicle| vehicle.kind()).counts()
    }

    /// Whether per-tick updates are running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resumes per-tick updates.
    pub fn play(&mut self) {
        self.running = true;
    }

    /// Freezes per-tick updates without discarding any state.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Toggles between playing and paused, returning the new state.
    pub fn toggle_play_pause(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// The playback speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Sets the playback speed multiplier.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// The active display filter.
    pub fn filter(&self) -> VehicleFilter {
        self.filter
    }

    /// Sets the display filter.
    pub fn set_filter(&mut self, filter: VehicleFilter) {
        self.filter = filter;
    }

    /// Removes every vehicle. The spawn gate is reset as well, so the
    /// next tick spawns immediately.
    pub(crate) fn clear(&mut self) {
        self.vehicles.clear();
        self.last_spawn = None;
    }

    /// Attempts one spawn if the spawn interval has elapsed since the
    /// previous attempt. The first tick spawns immediately.
    pub(crate) fn maybe_spawn(&mut self, now: f64, network: &RoadNetwork, config: &SimConfig) {
        if let Some(last) = self.last_spawn {
            if now - last < config.spawn_interval {
                return;
            }
        }
        self.last_spawn = Some(now);
        let _ = self.spawn(network, config);
    }

    /// Spawns a vehicle of a weighted random kind on a random road.
    pub(crate) fn spawn(
        &mut self,
        network: &RoadNetwork,
        config: &SimConfig,
    ) -> Option<VehicleId> {
        let road_id = network.road_ids().choose(&mut self.rng)?;
        let kind = VehicleKind::sample(&mut self.rng);
        self.spawn_as(kind, road_id, network, config)
    }

    /// Spawns a vehicle of the given kind on the given road, with a route
    /// walked from that road. A spawn that would exceed the population
    /// bound is silently rejected.
    pub(crate) fn spawn_as(
        &mut self,
        kind: VehicleKind,
        road_id: RoadId,
        network: &RoadNetwork,
        config: &SimConfig,
    ) -> Option<VehicleId> {
        if self.vehicles.len() >= config.max_vehicles {
            log::debug!("spawn rejected: fleet at capacity of {}", config.max_vehicles);
            return None;
        }
        let road = network.get(road_id)?;
        let route = build_route(&mut self.rng, road_id, network, config.route_hops);
        let pos = route.waypoints().first().copied().unwrap_or_else(|| road.from());
        let heading = road.heading();

        let id = self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, kind, road_id, pos, heading, route));
        log::debug!("spawned {:?} {:?} on {}", kind, id, road.name());
        Some(id)
    }

    /// Removes a vehicle from the fleet.
    pub(crate) fn remove(&mut self, vehicle_id: VehicleId) -> Option<Vehicle> {
        self.vehicles.remove(vehicle_id)
    }

    /// Advances the kinematic state of every vehicle.
    ///
    /// Neighbour positions are snapshotted at the start of the pass, so
    /// each vehicle sees the same pre-tick picture of its road.
    pub(crate) fn update_vehicles(&mut self, dt: f64, network: &RoadNetwork, config: &SimConfig) {
        let snapshot: Vec<(VehicleId, RoadId, Point2d)> = self
            .vehicles
            .iter()
            .map(|(id, vehicle)| (id, vehicle.road_id(), vehicle.position()))
            .collect();

        for (id, vehicle) in &mut self.vehicles {
            // A stale road key yields density 0 for the tick.
            let density = network
                .get(vehicle.road_id())
                .map(|road| road.density())
                .unwrap_or(0.0);
            let neighbours: Vec<Point2d> = snapshot
                .iter()
                .filter(|(other, road, _)| *other != id && *road == vehicle.road_id())
                .map(|(_, _, pos)| *pos)
                .collect();
            vehicle.update(dt, density, &neighbours, config, &mut self.rng);
        }
    }

    /// Removes every vehicle that has left the visible region by more
    /// than the eviction margin.
    pub(crate) fn evict(&mut self, viewport: &Viewport) {
        self.vehicles.retain(|id, vehicle| {
            let keep = viewport.contains(vehicle.position(), EVICT_MARGIN);
            if !keep {
                log::debug!("evicted {:?} at {:?}", id, vehicle.position());
            }
            keep
        });
    }

    /// Multiplies each vehicle's maximum speed by a factor sampled from
    /// the given distribution, clamped to [0.75, 1.25].
    pub(crate) fn adjust_max_speeds(&mut self, distr: &impl Distribution<f64>) {
        for (_, vehicle) in &mut self.vehicles {
            let factor = distr.sample(&mut self.rng).clamp(0.75, 1.25);
            vehicle.adjust_max_speed(factor);
        }
    }

    /// Applies a mutation to the vehicle with the given ID.
    pub(crate) fn with_vehicle_mut(
        &mut self,
        vehicle_id: VehicleId,
        f: impl FnOnce(&mut Vehicle),
    ) -> bool {
        match self.vehicles.get_mut(vehicle_id) {
            Some(vehicle) => {
                f(vehicle);
                true
            }
            None => false,
        }
    }
}
