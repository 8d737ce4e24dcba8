use crate::config::SimConfig;
use crate::math::Point2d;
use crate::route::Route;
use crate::{RoadId, VehicleId};
use cgmath::prelude::*;
use once_cell::sync::Lazy;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::f64::consts::FRAC_PI_2;

/// Factor converting speed into world units travelled per second.
const MOVE_SCALE: f64 = 0.05;

/// The distance at which a fixed target counts as reached, in world units.
const ARRIVE_RADIUS: f64 = 5.0;

/// The categories of vehicle that can be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleKind {
    Car,
    Bus,
    Motorcycle,
    Truck,
    Taxi,
}

/// The spawn distribution over vehicle kinds.
static KIND_DISTR: Lazy<WeightedIndex<u32>> = Lazy::new(|| {
    WeightedIndex::new(VehicleKind::ALL.map(|kind| kind.spawn_weight()))
        .expect("spawn weights are positive")
});

impl VehicleKind {
    /// Every vehicle kind.
    pub const ALL: [VehicleKind; 5] = [
        VehicleKind::Car,
        VehicleKind::Bus,
        VehicleKind::Motorcycle,
        VehicleKind::Truck,
        VehicleKind::Taxi,
    ];

    /// The default kinematic profile for this kind of vehicle.
    pub const fn attributes(self) -> VehicleAttributes {
        match self {
            VehicleKind::Car => VehicleAttributes {
                max_speed: 60.0,
                min_speed: 15.0,
                acceleration: 8.0,
                deceleration: 12.0,
                width: 12.0,
                length: 22.0,
            },
            VehicleKind::Bus => VehicleAttributes {
                max_speed: 40.0,
                min_speed: 10.0,
                acceleration: 4.0,
                deceleration: 8.0,
                width: 14.0,
                length: 40.0,
            },
            VehicleKind::Motorcycle => VehicleAttributes {
                max_speed: 70.0,
                min_speed: 20.0,
                acceleration: 15.0,
                deceleration: 18.0,
                width: 6.0,
                length: 12.0,
            },
            VehicleKind::Truck => VehicleAttributes {
                max_speed: 35.0,
                min_speed: 8.0,
                acceleration: 3.0,
                deceleration: 6.0,
                width: 16.0,
                length: 50.0,
            },
            VehicleKind::Taxi => VehicleAttributes {
                max_speed: 55.0,
                min_speed: 15.0,
                acceleration: 9.0,
                deceleration: 14.0,
                width: 12.0,
                length: 22.0,
            },
        }
    }

    /// The relative spawn weight of this kind, favouring cars and
    /// motorcycles over heavier vehicles.
    const fn spawn_weight(self) -> u32 {
        match self {
            VehicleKind::Car => 3,
            VehicleKind::Motorcycle => 2,
            _ => 1,
        }
    }

    /// Samples a kind from the weighted spawn distribution.
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self::ALL[KIND_DISTR.sample(rng)]
    }
}

/// The kinematic profile of a simulated vehicle.
#[derive(Clone, Copy, Debug)]
pub struct VehicleAttributes {
    /// The maximum speed in km/h.
    pub max_speed: f64,
    /// The speed the vehicle will not drop below under congestion, in km/h.
    pub min_speed: f64,
    /// The acceleration rate in km/h per second.
    pub acceleration: f64,
    /// The deceleration rate in km/h per second.
    pub deceleration: f64,
    /// The vehicle body width in world units.
    pub width: f64,
    /// The vehicle body length in world units.
    pub length: f64,
}

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID.
    id: VehicleId,
    /// The category the vehicle was spawned as.
    kind: VehicleKind,
    /// The kinematic profile, derived from the kind but overridable
    /// per instance.
    attribs: VehicleAttributes,
    /// The position of the vehicle in world space.
    pos: Point2d,
    /// The heading in radians.
    heading: f64,
    /// The current speed in km/h.
    speed: f64,
    /// The speed the vehicle is easing towards, in km/h.
    target_speed: f64,
    /// The road the vehicle is assigned to. A lookup key, not ownership;
    /// a stale key is tolerated.
    road: RoadId,
    /// The patrol route. When empty, the vehicle seeks `target` instead.
    route: Route,
    /// The fixed destination used when no route is assigned.
    target: Point2d,
    /// Whether the vehicle is advancing at all.
    moving: bool,
    /// Whether the vehicle is individually paused.
    paused: bool,
}

impl Vehicle {
    /// Creates a new vehicle.
    pub(crate) fn new(
        id: VehicleId,
        kind: VehicleKind,
        road: RoadId,
        pos: Point2d,
        heading: f64,
        route: Route,
    ) -> Self {
        let attribs = kind.attributes();
        Self {
            id,
            kind,
            attribs,
            pos,
            heading,
            speed: attribs.max_speed,
            target_speed: attribs.max_speed,
            road,
            route,
            target: pos,
            moving: true,
            paused: false,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The category the vehicle was spawned as.
    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    /// The vehicle's kinematic profile.
    pub fn attributes(&self) -> &VehicleAttributes {
        &self.attribs
    }

    /// The position of the vehicle in world space.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The heading in radians.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// The current speed in km/h.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The speed the vehicle is easing towards, in km/h.
    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    /// The ratio of current speed to maximum speed.
    pub fn speed_ratio(&self) -> f64 {
        self.speed / self.attribs.max_speed
    }

    /// The ID of the road the vehicle is assigned to.
    pub fn road_id(&self) -> RoadId {
        self.road
    }

    /// The vehicle's patrol route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Whether the vehicle is advancing at all.
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Whether the vehicle is individually paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Assigns a new patrol route, restarting from its first waypoint.
    pub fn set_route(&mut self, route: Route) {
        self.route = route;
    }

    /// Moves the vehicle to a new position.
    pub fn set_position(&mut self, pos: Point2d) {
        self.pos = pos;
    }

    /// Sets the fixed destination used when no route is assigned.
    pub fn set_target(&mut self, target: Point2d) {
        self.target = target;
        self.moving = true;
    }

    /// Pauses the vehicle without discarding its state.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes a paused vehicle.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Multiplies the vehicle's maximum speed by the given factor,
    /// never dropping it below the minimum speed.
    pub(crate) fn adjust_max_speed(&mut self, factor: f64) {
        self.attribs.max_speed = (self.attribs.max_speed * factor).max(self.attribs.min_speed);
    }

    /// Advances the vehicle's kinematic state by `dt` seconds.
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds
    /// * `density` - The density of the vehicle's assigned road
    /// * `neighbours` - Positions of the other vehicles on the same road
    pub(crate) fn update(
        &mut self,
        dt: f64,
        density: f64,
        neighbours: &[Point2d],
        config: &SimConfig,
        rng: &mut impl Rng,
    ) {
        if !self.moving || self.paused {
            return;
        }
        self.regulate_speed(dt, density, config.density_slowdown);
        if self.route.is_empty() {
            self.seek_target(dt);
        } else {
            self.follow_route(dt, rng);
        }
        self.avoid_neighbours(neighbours, config.safe_radius, config.brake_factor);
    }

    /// Eases the current speed towards a density-suppressed target speed.
    ///
    /// Density reduces the desired speed linearly, floored at the minimum
    /// speed so congestion produces queuing rather than a standstill.
    fn regulate_speed(&mut self, dt: f64, density: f64, slowdown: f64) {
        let a = &self.attribs;
        self.target_speed =
            (a.max_speed * (1.0 - slowdown * density)).clamp(a.min_speed, a.max_speed);
        if self.speed < self.target_speed {
            self.speed += a.acceleration * dt;
        } else if self.speed > self.target_speed {
            self.speed -= a.deceleration * dt;
        }
        self.speed = self.speed.clamp(a.min_speed, a.max_speed);
    }

    /// Moves along the route towards the waypoint after the cursor.
    ///
    /// A waypoint within one step is snapped onto exactly, never
    /// overshot, and the cursor advances cyclically.
    fn follow_route(&mut self, dt: f64, rng: &mut impl Rng) {
        let next = match self.route.next_waypoint() {
            Some(point) => point,
            None => return,
        };
        let delta = next - self.pos;
        let dist = delta.magnitude();
        self.heading = delta.y.atan2(delta.x);

        let step = self.speed * dt * MOVE_SCALE;
        if dist <= step {
            self.pos = next;
            self.route.advance(rng);
        } else {
            self.pos += delta * (step / dist);
        }
    }

    /// Moves towards the fixed target, stopping on arrival.
    fn seek_target(&mut self, dt: f64) {
        let delta = self.target - self.pos;
        let dist = delta.magnitude();
        if dist < ARRIVE_RADIUS {
            self.moving = false;
            return;
        }
        self.heading = delta.y.atan2(delta.x);

        let step = self.speed * dt * MOVE_SCALE;
        if dist <= step {
            self.pos = self.target;
        } else {
            self.pos += delta * (step / dist);
        }
    }

    /// Damps the current speed for every neighbour inside the safe radius
    /// whose bearing falls within the forward cone. The damping can
    /// compound across neighbours within a single tick.
    fn avoid_neighbours(&mut self, neighbours: &[Point2d], safe_radius: f64, brake_factor: f64) {
        for other in neighbours {
            let delta = *other - self.pos;
            if delta.magnitude() >= safe_radius {
                continue;
            }
            let bearing = delta.y.atan2(delta.x);
            let diff = (self.heading - bearing).abs();
            if diff < FRAC_PI_2 || diff > 3.0 * FRAC_PI_2 {
                self.speed *= brake_factor;
            }
        }
    }
}
