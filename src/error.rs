//! Structured error types for the simulator.
//!
//! All errors surface at the configuration boundary: once a
//! `Simulation` has been built, the run itself has no recoverable
//! failure modes (a full backlog is a modeled outcome, not an error).
//! This keeps the hot loop free of `Result` plumbing while still
//! rejecting invalid input loudly instead of substituting defaults.

/// The top-level error type for the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    // ── Rate / horizon errors ─────────────────────────────

    /// A rate parameter was zero, negative, or non-finite.
    InvalidRate {
        what: &'static str,
        rate: f64,
    },

    /// The horizon was negative or non-finite.
    InvalidHorizon(f64),

    // ── Topology errors ───────────────────────────────────

    /// The configuration describes zero stations.
    NoServers,

    /// The routing distribution and the server list disagree in length.
    TopologyMismatch {
        routing: usize,
        servers: usize,
    },

    // ── Routing-distribution errors ───────────────────────

    /// A routing probability was negative or non-finite.
    InvalidRoutingWeight {
        index: usize,
        weight: f64,
    },

    /// The routing probabilities do not sum to 1.
    RoutingSumMismatch(f64),

    /// The routing distribution could not be built (e.g. all weights zero).
    DegenerateRouting(String),

    // ── Scenario / CLI errors ─────────────────────────────

    /// A scenario file could not be read or parsed.
    InvalidScenario(String),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidRate { what, rate } => {
                write!(f, "{} must be positive and finite, got {}", what, rate)
            }
            SimError::InvalidHorizon(h) => {
                write!(f, "horizon must be finite and non-negative, got {}", h)
            }
            SimError::NoServers => write!(f, "at least one server is required"),
            SimError::TopologyMismatch { routing, servers } => write!(
                f,
                "routing distribution has {} entries but {} servers are configured",
                routing, servers
            ),
            SimError::InvalidRoutingWeight { index, weight } => write!(
                f,
                "routing probability #{} must be a finite value >= 0, got {}",
                index, weight
            ),
            SimError::RoutingSumMismatch(sum) => {
                write!(f, "routing probabilities must sum to 1, got {}", sum)
            }
            SimError::DegenerateRouting(msg) => {
                write!(f, "routing distribution is unusable: {}", msg)
            }
            SimError::InvalidScenario(msg) => write!(f, "invalid scenario: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;
