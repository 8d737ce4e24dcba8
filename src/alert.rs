use crate::config::SimConfig;
use crate::congestion::CongestionLevel;
use crate::network::RoadNetwork;
use crate::RoadId;
use std::collections::VecDeque;

/// The severity class of an advisory alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlertSeverity {
    Warning,
    Danger,
}

/// An advisory event derived from road congestion.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Alert {
    /// Monotonically increasing identifier, unique within the engine.
    pub id: u64,
    /// The severity class.
    pub severity: AlertSeverity,
    /// The road the alert concerns.
    pub road: RoadId,
    /// A short human-readable title.
    pub title: String,
    /// A human-readable description naming the road.
    pub message: String,
    /// The simulation time the alert was raised, in s.
    pub timestamp: f64,
}

/// Raises, deduplicates and retires congestion alerts.
///
/// At most one alert is retained per (road, severity) pair; repeated
/// threshold crossings are no-ops while that alert lives. Alerts are
/// never resolved when density drops; they leave only by ageing out or
/// by being pushed past the retention cap.
pub struct AlertEngine {
    /// Retained alerts, most recent first.
    alerts: VecDeque<Alert>,
    /// The next alert ID.
    next_id: u64,
}

impl AlertEngine {
    /// Creates an empty alert engine.
    pub(crate) fn new() -> Self {
        Self {
            alerts: VecDeque::new(),
            next_id: 0,
        }
    }

    /// The retained alerts, most recent first.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    /// The number of retained alerts.
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether no alerts are retained.
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Removes every retained alert.
    pub(crate) fn clear(&mut self) {
        self.alerts.clear();
    }

    /// Scans road densities, raising an alert for every road at or above
    /// the moderate threshold, then prunes aged-out alerts.
    pub(crate) fn scan(&mut self, network: &RoadNetwork, config: &SimConfig, now: f64) {
        for road in network.roads() {
            let (severity, title, message) = match CongestionLevel::classify(road.density()) {
                CongestionLevel::Congested => (
                    AlertSeverity::Danger,
                    "Heavy congestion",
                    format!("{} is congested", road.name()),
                ),
                CongestionLevel::Moderate => (
                    AlertSeverity::Warning,
                    "Moderate traffic",
                    format!("{} is carrying moderate traffic", road.name()),
                ),
                CongestionLevel::Free => continue,
            };
            self.raise(road.id(), severity, title, message, now, config.max_alerts);
        }
        self.alerts
            .retain(|alert| now - alert.timestamp < config.alert_max_age);
    }

    /// Raises an alert unless one with the same road and severity is
    /// already retained. New alerts are inserted at the front; entries
    /// beyond the retention cap are dropped from the back, oldest first.
    fn raise(
        &mut self,
        road: RoadId,
        severity: AlertSeverity,
        title: &str,
        message: String,
        now: f64,
        max_alerts: usize,
    ) {
        let duplicate = self
            .alerts
            .iter()
            .any(|alert| alert.road == road && alert.severity == severity);
        if duplicate {
            return;
        }

        log::info!("alert: {} ({:?})", message, severity);
        self.alerts.push_front(Alert {
            id: self.next_id,
            severity,
            road,
            title: title.to_owned(),
            message,
            timestamp: now,
        });
        self.next_id += 1;
        self.alerts.truncate(max_alerts);
    }
}
