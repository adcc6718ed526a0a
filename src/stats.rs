//! Run statistics.
//!
//! `RunStats` is the accumulator the dispatch loop writes into;
//! `RunReport` is the finalized record handed to the caller once the
//! queue drains. Accumulation follows a fixed protocol: service time
//! is added when a service is *scheduled*, the serviced count and the
//! last-departure timestamp on each departure, and waiting time when
//! a backlogged request is promoted into service.

use serde::Serialize;

use crate::time::SimTime;

// ── Accumulator ───────────────────────────────────────────────────────

/// Running counters for one simulation run.
///
/// Zeroed at run start; mutated only by the arrival and departure
/// handlers; read once at termination via [`RunStats::finalize`].
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    serviced: u64,
    dropped: u64,
    total_service_time: f64,
    total_waiting_time: f64,
    last_departure_time: f64,
}

impl RunStats {
    /// Fresh, all-zero accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests fully served so far.
    pub fn serviced(&self) -> u64 {
        self.serviced
    }

    /// Requests dropped at a full backlog so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Account one scheduled service duration.
    pub fn add_service_time(&mut self, duration: f64) {
        self.total_service_time += duration;
    }

    /// Account the wait of one request promoted from the backlog.
    pub fn add_waiting_time(&mut self, waited: f64) {
        self.total_waiting_time += waited;
    }

    /// Account one completed service.
    pub fn record_departure(&mut self, at: SimTime) {
        self.serviced += 1;
        self.last_departure_time = at.seconds();
    }

    /// Account one request rejected at a full backlog.
    pub fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    /// Derive the final report.
    ///
    /// Averages are `0.0` when nothing was serviced — an empty run
    /// reports zeros, never NaN.
    pub fn finalize(&self) -> RunReport {
        let (avg_waiting_time, avg_service_time) = if self.serviced > 0 {
            (
                self.total_waiting_time / self.serviced as f64,
                self.total_service_time / self.serviced as f64,
            )
        } else {
            (0.0, 0.0)
        };
        RunReport {
            serviced: self.serviced,
            dropped: self.dropped,
            last_departure_time: self.last_departure_time,
            avg_waiting_time,
            avg_service_time,
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────

/// The aggregate result of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Requests fully served.
    pub serviced: u64,
    /// Requests dropped at a full backlog.
    pub dropped: u64,
    /// Timestamp of the last completed service (0 if none).
    pub last_departure_time: f64,
    /// Mean time spent waiting in a backlog, over serviced requests.
    pub avg_waiting_time: f64,
    /// Mean service duration, over serviced requests.
    pub avg_service_time: f64,
}

/// Compact five-field form: serviced, dropped, last departure,
/// average wait, average service.
impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {:.4} {:.4} {:.4}",
            self.serviced,
            self.dropped,
            self.last_departure_time,
            self.avg_waiting_time,
            self.avg_service_time
        )
    }
}
