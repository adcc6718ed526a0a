//! A single-channel service station.
//!
//! Each station serves one request at a time and holds a bounded FIFO
//! backlog of the arrival timestamps of requests waiting behind it.
//! The station itself only answers admission and sampling questions;
//! which handler mutates it and when is the simulation loop's job.

use std::collections::VecDeque;

use rand_distr::Exp;

use crate::error::SimResult;
use crate::time::SimTime;
use crate::variate::{exponential, VariateSource};

// ── Server ID ─────────────────────────────────────────────────────────

/// A station's index in the server array.
///
/// Newtype around `usize` rather than a bare integer to prevent
/// accidental confusion with other indices and counts at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerId(usize);

impl ServerId {
    /// Create a server ID from a raw index.
    #[inline]
    pub fn new(index: usize) -> Self {
        ServerId(index)
    }

    /// Return the underlying index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ServerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── Admission ─────────────────────────────────────────────────────────

/// Outcome of offering an arrival to a busy station's backlog.
///
/// `Rejected` is a modeled outcome, not an error — the caller counts
/// it as a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Rejected,
}

// ── Server ────────────────────────────────────────────────────────────

/// One single-channel service station.
///
/// Invariants, maintained by the arrival/departure handlers that are
/// the only mutators of a station:
/// - `backlog.len() <= capacity` at all times;
/// - an idle station has an empty backlog.
///
/// The service-time distribution is pre-built at construction so the
/// dispatch loop never has to handle a rate error mid-run.
#[derive(Debug, Clone)]
pub struct Server {
    id: ServerId,
    service_rate: f64,
    /// Maximum backlog length, excluding the request in service.
    capacity: usize,
    busy: bool,
    /// Arrival timestamps of waiting requests, front = earliest.
    backlog: VecDeque<SimTime>,
    service: Exp<f64>,
}

impl Server {
    /// Build a station. Fails on a non-positive or non-finite rate.
    pub fn new(id: ServerId, service_rate: f64, capacity: usize) -> SimResult<Self> {
        let service = exponential("service rate", service_rate)?;
        Ok(Server {
            id,
            service_rate,
            capacity,
            busy: false,
            backlog: VecDeque::new(),
            service,
        })
    }

    /// This station's ID.
    pub fn id(&self) -> ServerId {
        self.id
    }

    /// The configured service rate (λ of the service distribution).
    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }

    /// The maximum backlog length.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a request is currently in service.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Current backlog length.
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Draw one service duration for this station.
    ///
    /// Pure with respect to station state; advances the shared random
    /// stream owned by `source`.
    pub fn sample_service_time(&self, source: &mut VariateSource) -> f64 {
        source.sample(&self.service)
    }

    /// Offer an arrival to the backlog.
    ///
    /// Only called while the station is busy — an arrival at an idle
    /// station begins service immediately and never touches the
    /// backlog.
    pub fn try_admit(&mut self, arrival: SimTime) -> Admission {
        if self.backlog.len() < self.capacity {
            self.backlog.push_back(arrival);
            Admission::Accepted
        } else {
            Admission::Rejected
        }
    }

    /// Mark the station as serving a request.
    pub fn begin_service(&mut self) {
        self.busy = true;
    }

    /// Remove and return the earliest waiting arrival timestamp.
    ///
    /// `None` means the backlog is empty; the caller transitions the
    /// station to idle via [`Server::set_idle`].
    pub fn pop_next_waiting(&mut self) -> Option<SimTime> {
        self.backlog.pop_front()
    }

    /// Transition to idle. The backlog must already be empty.
    pub fn set_idle(&mut self) {
        debug_assert!(
            self.backlog.is_empty(),
            "{} going idle with {} waiting requests",
            self.id,
            self.backlog.len()
        );
        self.busy = false;
    }
}
