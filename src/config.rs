//! Run configuration.
//!
//! The boundary between the CLI/scenario layer and the core: a
//! `RunConfig` that passed [`RunConfig::validate`] is the core's
//! external-input contract, so the dispatch loop itself never sees
//! malformed input. Scenario files deserialize straight into this
//! struct.

use serde::Deserialize;

use crate::error::{SimError, SimResult};

/// Tolerance for the routing-probability sum check. Exact `== 1.0`
/// comparison is brittle once the weights come from parsed text.
const ROUTING_SUM_TOLERANCE: f64 = 1e-6;

/// Capacity and service rate of one station.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerProfile {
    /// Maximum backlog length, excluding the request in service.
    pub capacity: usize,
    /// λ of the station's exponential service-time distribution.
    pub service_rate: f64,
}

/// Everything one run needs, immutable for the run's duration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Simulated time after which no new arrivals are scheduled.
    pub horizon: f64,
    /// λ of the exponential inter-arrival distribution.
    pub arrival_rate: f64,
    /// Per-station routing probabilities; must sum to 1.
    pub routing: Vec<f64>,
    /// One profile per station, parallel to `routing`.
    pub servers: Vec<ServerProfile>,
    /// PRNG seed; a fixed seed makes the run reproducible.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    123
}

impl RunConfig {
    /// Check every constraint the core assumes.
    ///
    /// The horizon accepts zero: a zero-horizon run is well-defined
    /// (no arrival is schedulable, the report is all zeros).
    pub fn validate(&self) -> SimResult<()> {
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(SimError::InvalidHorizon(self.horizon));
        }
        if !self.arrival_rate.is_finite() || self.arrival_rate <= 0.0 {
            return Err(SimError::InvalidRate {
                what: "arrival rate",
                rate: self.arrival_rate,
            });
        }
        if self.servers.is_empty() {
            return Err(SimError::NoServers);
        }
        if self.routing.len() != self.servers.len() {
            return Err(SimError::TopologyMismatch {
                routing: self.routing.len(),
                servers: self.servers.len(),
            });
        }
        for (index, &weight) in self.routing.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SimError::InvalidRoutingWeight { index, weight });
            }
        }
        let sum: f64 = self.routing.iter().sum();
        if (sum - 1.0).abs() > ROUTING_SUM_TOLERANCE {
            return Err(SimError::RoutingSumMismatch(sum));
        }
        for profile in &self.servers {
            if !profile.service_rate.is_finite() || profile.service_rate <= 0.0 {
                return Err(SimError::InvalidRate {
                    what: "service rate",
                    rate: profile.service_rate,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RunConfig {
        RunConfig {
            horizon: 100.0,
            arrival_rate: 2.0,
            routing: vec![0.5, 0.5],
            servers: vec![
                ServerProfile { capacity: 4, service_rate: 1.0 },
                ServerProfile { capacity: 2, service_rate: 3.0 },
            ],
            seed: 123,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_zero_horizon_is_allowed() {
        let mut config = valid();
        config.horizon = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_horizon_rejected() {
        let mut config = valid();
        config.horizon = -1.0;
        assert_eq!(config.validate(), Err(SimError::InvalidHorizon(-1.0)));
    }

    #[test]
    fn test_bad_arrival_rate_rejected() {
        let mut config = valid();
        config.arrival_rate = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidRate { what: "arrival rate", .. })
        ));
    }

    #[test]
    fn test_no_servers_rejected() {
        let mut config = valid();
        config.servers.clear();
        assert_eq!(config.validate(), Err(SimError::NoServers));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut config = valid();
        config.routing.push(0.0);
        assert_eq!(
            config.validate(),
            Err(SimError::TopologyMismatch { routing: 3, servers: 2 })
        );
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = valid();
        config.routing = vec![1.5, -0.5];
        assert_eq!(
            config.validate(),
            Err(SimError::InvalidRoutingWeight { index: 1, weight: -0.5 })
        );
    }

    #[test]
    fn test_sum_mismatch_rejected() {
        let mut config = valid();
        config.routing = vec![0.5, 0.4];
        assert!(matches!(
            config.validate(),
            Err(SimError::RoutingSumMismatch(_))
        ));
    }

    #[test]
    fn test_sum_within_tolerance_passes() {
        let mut config = valid();
        config.routing = vec![0.3, 0.7 + 1e-9];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_service_rate_rejected() {
        let mut config = valid();
        config.servers[1].service_rate = -3.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidRate { what: "service rate", .. })
        ));
    }

    #[test]
    fn test_deserializes_from_json() {
        let json = r#"{
            "horizon": 50.0,
            "arrival_rate": 1.5,
            "routing": [1.0],
            "servers": [{ "capacity": 8, "service_rate": 2.0 }]
        }"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, 123);
        assert_eq!(config.servers[0].capacity, 8);
        assert!(config.validate().is_ok());
    }
}
