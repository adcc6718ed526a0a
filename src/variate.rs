//! Random variates for the simulation.
//!
//! One `VariateSource` per run owns the single PRNG every draw in the
//! run consumes. With a fixed seed the sequence of draws, and with it
//! the whole run, is identical across executions. The source is
//! constructor-injected into the simulation rather than reached
//! through a global.

use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_distr::Exp;
use rand_pcg::Pcg64;

use crate::error::{SimError, SimResult};
use crate::server::ServerId;

/// Build an exponential distribution for a rate parameter.
///
/// Rejects zero, negative, and non-finite rates up front so sampling
/// in the dispatch loop cannot fail.
pub(crate) fn exponential(what: &'static str, rate: f64) -> SimResult<Exp<f64>> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(SimError::InvalidRate { what, rate });
    }
    Exp::new(rate).map_err(|_| SimError::InvalidRate { what, rate })
}

/// The shared random source for one run.
///
/// Holds the seeded PRNG, the inter-arrival distribution, and the
/// routing distribution. Server service-time distributions live on
/// the servers themselves but sample through [`VariateSource::sample`]
/// so all draws advance the same stream.
#[derive(Debug, Clone)]
pub struct VariateSource {
    rng: Pcg64,
    interarrival: Exp<f64>,
    routing: WeightedIndex<f64>,
}

impl VariateSource {
    /// Build a source from a seed, the global arrival rate, and the
    /// routing probabilities.
    ///
    /// The caller is expected to have validated the routing weights
    /// (see `RunConfig::validate`); degenerate weight sets that slip
    /// through are still rejected here rather than silently replaced.
    pub fn new(seed: u64, arrival_rate: f64, routing: &[f64]) -> SimResult<Self> {
        let interarrival = exponential("arrival rate", arrival_rate)?;
        let routing = WeightedIndex::new(routing.iter())
            .map_err(|e| SimError::DegenerateRouting(e.to_string()))?;
        Ok(VariateSource {
            rng: Pcg64::seed_from_u64(seed),
            interarrival,
            routing,
        })
    }

    /// Draw the interval until the next arrival.
    pub fn next_interarrival(&mut self) -> f64 {
        self.interarrival.sample(&mut self.rng)
    }

    /// Draw the station the next arrival is routed to.
    pub fn next_route(&mut self) -> ServerId {
        ServerId::new(self.routing.sample(&mut self.rng))
    }

    /// Draw from a caller-supplied exponential distribution.
    ///
    /// Used by `Server::sample_service_time` so per-server draws
    /// consume this source's stream instead of a private one.
    pub fn sample(&mut self, dist: &Exp<f64>) -> f64 {
        dist.sample(&mut self.rng)
    }
}
