use anyhow::{bail, Result};

/// Configuration of a [Simulation](crate::Simulation).
///
/// Every field is named and carries a default matching the reference
/// tuning. The tunables with no stated physical derivation (connectivity
/// threshold, braking factor, density slowdown, safe radius) are exposed
/// here rather than hard-coded.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SimConfig {
    /// Maximum number of simulated vehicles.
    pub max_vehicles: usize,
    /// Minimum simulation time between spawn attempts, in s.
    pub spawn_interval: f64,
    /// Number of road hops walked when generating a patrol route.
    pub route_hops: usize,
    /// Distance below which two road end points are considered joined,
    /// in world units.
    pub connect_threshold: f64,
    /// Radius within which another vehicle triggers speed damping,
    /// in world units.
    pub safe_radius: f64,
    /// Multiplicative speed damping applied per nearby leading vehicle.
    pub brake_factor: f64,
    /// How strongly road density suppresses the desired speed.
    pub density_slowdown: f64,
    /// Maximum number of retained alerts.
    pub max_alerts: usize,
    /// Age beyond which an alert is pruned, in s.
    pub alert_max_age: f64,
    /// Seed for the simulation's random number generator. Leave unset
    /// for entropy-based seeding.
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_vehicles: 50,
            spawn_interval: 2.0,
            route_hops: 4,
            connect_threshold: 40.0,
            safe_radius: 40.0,
            brake_factor: 0.95,
            density_slowdown: 0.8,
            max_alerts: 10,
            alert_max_age: 30.0,
            rng_seed: None,
        }
    }
}

impl SimConfig {
    /// Checks the configuration for values the simulation cannot run
    /// with. Called once at construction; a validated configuration is
    /// never rejected later.
    pub fn validate(&self) -> Result<()> {
        if self.max_vehicles == 0 {
            bail!("max_vehicles must be positive");
        }
        if !(self.spawn_interval > 0.0) {
            bail!("spawn_interval must be positive, got {}", self.spawn_interval);
        }
        if self.route_hops == 0 {
            bail!("route_hops must be positive");
        }
        if !(self.connect_threshold > 0.0) {
            bail!(
                "connect_threshold must be positive, got {}",
                self.connect_threshold
            );
        }
        if !(self.safe_radius > 0.0) {
            bail!("safe_radius must be positive, got {}", self.safe_radius);
        }
        if !(0.0..=1.0).contains(&self.brake_factor) {
            bail!("brake_factor must lie in [0, 1], got {}", self.brake_factor);
        }
        if !(self.density_slowdown >= 0.0) {
            bail!(
                "density_slowdown must not be negative, got {}",
                self.density_slowdown
            );
        }
        if self.max_alerts == 0 {
            bail!("max_alerts must be positive");
        }
        if !(self.alert_max_age > 0.0) {
            bail!("alert_max_age must be positive, got {}", self.alert_max_age);
        }
        Ok(())
    }
}
