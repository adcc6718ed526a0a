/// Simulation execution loop.
///
/// Drives the scheduler: pops events, advances the clock, dispatches
/// to the arrival or departure handler. The loop is purely synchronous
/// and single-threaded — determinism is trivial given the single
/// seeded variate source.

use crate::config::RunConfig;
use crate::error::SimResult;
use crate::event::{Event, EventKind};
use crate::scheduler::Scheduler;
use crate::server::{Admission, Server, ServerId};
use crate::stats::{RunReport, RunStats};
use crate::time::SimTime;
use crate::variate::VariateSource;

/// Top-level simulation driver.
///
/// Owns the event queue, the server array, the variate source, and
/// the statistics accumulator for the run's lifetime. Call
/// [`Simulation::run`] to drain the queue and get the report, or
/// [`Simulation::step`] to advance by exactly one event.
///
/// The queue always drains: arrivals stop being scheduled at the
/// horizon, and every dispatched event schedules at most one further
/// event at a strictly later time.
#[derive(Debug, Clone)]
pub struct Simulation {
    scheduler: Scheduler,
    servers: Vec<Server>,
    variates: VariateSource,
    stats: RunStats,
    clock: SimTime,
    horizon: f64,
    events_processed: u64,
}

impl Simulation {
    /// Build a simulation from a configuration and seed the first
    /// arrival.
    ///
    /// Validates the configuration; a `RunConfig` that passes
    /// [`RunConfig::validate`] cannot fail construction further down.
    pub fn new(config: &RunConfig) -> SimResult<Self> {
        config.validate()?;
        let variates = VariateSource::new(config.seed, config.arrival_rate, &config.routing)?;
        let servers = config
            .servers
            .iter()
            .enumerate()
            .map(|(i, profile)| {
                Server::new(ServerId::new(i), profile.service_rate, profile.capacity)
            })
            .collect::<SimResult<Vec<_>>>()?;

        let mut sim = Simulation {
            scheduler: Scheduler::new(),
            servers,
            variates,
            stats: RunStats::new(),
            clock: SimTime::ZERO,
            horizon: config.horizon,
            events_processed: 0,
        };
        sim.schedule_next_arrival(SimTime::ZERO);
        Ok(sim)
    }

    /// Current position of the simulation clock.
    pub fn current_time(&self) -> SimTime {
        self.clock
    }

    /// Total events dispatched so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Number of pending events.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Returns `true` when the queue is exhausted.
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_empty()
    }

    /// Read access to one station (test assertions, summaries).
    pub fn server(&self, id: ServerId) -> &Server {
        &self.servers[id.index()]
    }

    /// All stations.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Read access to the running counters.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Execute a single step: pop the earliest event, advance the
    /// clock, dispatch.
    ///
    /// Returns the dispatched event, or `None` if the queue is empty.
    pub fn step(&mut self) -> Option<Event> {
        let event = self.scheduler.pop_next()?;

        // Simulated time must never go backward.
        assert!(
            event.at >= self.clock,
            "time went backward: clock={}, event={}",
            self.clock,
            event.at
        );
        self.clock = event.at;
        self.events_processed += 1;

        match event.kind {
            EventKind::Arrival => self.on_arrival(event.at, event.server),
            EventKind::Departure => self.on_departure(event.at, event.server),
        }

        Some(event)
    }

    /// Run until the event queue is empty and finalize the report.
    pub fn run(&mut self) -> RunReport {
        while self.step().is_some() {}
        let report = self.stats.finalize();
        tracing::debug!(
            events = self.events_processed,
            serviced = report.serviced,
            dropped = report.dropped,
            "run complete"
        );
        report
    }

    /// A request arrives at station `target`.
    ///
    /// An idle station starts service immediately; a busy one offers
    /// the request to its backlog and counts a drop on rejection.
    /// Either way the next arrival is drawn and, if it falls before
    /// the horizon, scheduled.
    fn on_arrival(&mut self, at: SimTime, target: ServerId) {
        let idx = target.index();
        if !self.servers[idx].is_busy() {
            let service = self.servers[idx].sample_service_time(&mut self.variates);
            self.stats.add_service_time(service);
            self.scheduler
                .schedule(at.plus(service), EventKind::Departure, target);
            self.servers[idx].begin_service();
            tracing::trace!(server = idx, time = at.seconds(), service, "arrival began service");
        } else {
            match self.servers[idx].try_admit(at) {
                Admission::Accepted => {
                    tracing::trace!(server = idx, time = at.seconds(), "arrival queued");
                }
                Admission::Rejected => {
                    self.stats.record_dropped();
                    tracing::trace!(server = idx, time = at.seconds(), "arrival dropped");
                }
            }
        }
        self.schedule_next_arrival(at);
    }

    /// Station `target` finishes one service.
    ///
    /// Promotes the earliest waiting request if there is one (the
    /// station stays busy), otherwise the station goes idle. Waiting
    /// time is measured from the timestamp the request joined the
    /// backlog to this departure.
    fn on_departure(&mut self, at: SimTime, target: ServerId) {
        self.stats.record_departure(at);
        let idx = target.index();
        if let Some(joined) = self.servers[idx].pop_next_waiting() {
            self.stats.add_waiting_time(at.since(joined));
            let service = self.servers[idx].sample_service_time(&mut self.variates);
            self.stats.add_service_time(service);
            self.scheduler
                .schedule(at.plus(service), EventKind::Departure, target);
            tracing::trace!(server = idx, time = at.seconds(), service, "promoted from backlog");
        } else {
            self.servers[idx].set_idle();
            tracing::trace!(server = idx, time = at.seconds(), "station idle");
        }
    }

    /// Draw the next inter-arrival interval, then the routing target,
    /// and schedule the arrival unless it falls at or past the
    /// horizon.
    ///
    /// Both draws happen unconditionally, so the random stream
    /// advances the same way whether or not the arrival is
    /// schedulable. The draw order (interval, then route) is fixed:
    /// reordering would change the run under a fixed seed.
    fn schedule_next_arrival(&mut self, now: SimTime) {
        let interval = self.variates.next_interarrival();
        let target = self.variates.next_route();
        let at = now.plus(interval);
        if at.seconds() < self.horizon {
            self.scheduler.schedule(at, EventKind::Arrival, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerProfile;

    fn config(
        horizon: f64,
        arrival_rate: f64,
        routing: Vec<f64>,
        servers: Vec<(usize, f64)>,
        seed: u64,
    ) -> RunConfig {
        RunConfig {
            horizon,
            arrival_rate,
            routing,
            servers: servers
                .into_iter()
                .map(|(capacity, service_rate)| ServerProfile { capacity, service_rate })
                .collect(),
            seed,
        }
    }

    #[test]
    fn test_zero_horizon_runs_empty() {
        let mut sim =
            Simulation::new(&config(0.0, 5.0, vec![1.0], vec![(4, 1.0)], 1)).unwrap();
        let report = sim.run();
        assert_eq!(sim.events_processed(), 0);
        assert_eq!(report.serviced, 0);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.avg_waiting_time, 0.0);
        assert_eq!(report.avg_service_time, 0.0);
        assert_eq!(report.last_departure_time, 0.0);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut sim =
            Simulation::new(&config(50.0, 2.0, vec![0.5, 0.5], vec![(3, 1.0), (3, 2.0)], 7))
                .unwrap();
        let mut last = SimTime::ZERO;
        while let Some(event) = sim.step() {
            assert!(event.at >= last, "dispatched out of order");
            assert_eq!(sim.current_time(), event.at);
            last = event.at;
        }
        assert!(sim.is_finished());
    }

    #[test]
    fn test_backlog_never_exceeds_capacity() {
        let mut sim =
            Simulation::new(&config(100.0, 8.0, vec![0.5, 0.5], vec![(2, 1.0), (1, 1.0)], 3))
                .unwrap();
        while sim.step().is_some() {
            for server in sim.servers() {
                assert!(server.backlog_len() <= server.capacity());
                if !server.is_busy() {
                    assert_eq!(server.backlog_len(), 0, "idle station with a backlog");
                }
            }
        }
    }

    #[test]
    fn test_zero_capacity_never_queues() {
        // One slow station, no backlog allowed, arrivals far faster
        // than service: everything that lands on the busy station
        // must be dropped, and no waiting time can ever accrue.
        let mut sim =
            Simulation::new(&config(10.0, 50.0, vec![1.0], vec![(0, 0.05)], 9)).unwrap();
        let report = sim.run();
        assert!(report.dropped > 0);
        assert_eq!(report.avg_waiting_time, 0.0);
        assert_eq!(sim.server(ServerId::new(0)).backlog_len(), 0);
    }

    #[test]
    fn test_requests_are_conserved() {
        // Effectively unbounded backlog → no drops, and once the
        // queue drains every arrival has been serviced. Dispatched
        // events are then exactly arrivals + departures = 2 × serviced.
        let mut sim =
            Simulation::new(&config(200.0, 1.0, vec![1.0], vec![(usize::MAX, 2.0)], 21))
                .unwrap();
        let report = sim.run();
        assert_eq!(report.dropped, 0);
        assert!(report.serviced > 0);
        assert_eq!(sim.events_processed(), 2 * report.serviced);
    }

    #[test]
    fn test_drops_balance_the_event_count() {
        // With drops, arrivals = serviced + dropped once drained, so
        // dispatched events = 2 × serviced + dropped.
        let mut sim =
            Simulation::new(&config(50.0, 10.0, vec![1.0], vec![(1, 1.0)], 4)).unwrap();
        let report = sim.run();
        assert!(report.dropped > 0);
        assert_eq!(sim.events_processed(), 2 * report.serviced + report.dropped);
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let cfg = config(80.0, 3.0, vec![0.25, 0.75], vec![(2, 2.0), (5, 1.5)], 99);
        let report1 = Simulation::new(&cfg).unwrap().run();
        let report2 = Simulation::new(&cfg).unwrap().run();
        assert_eq!(report1, report2);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let cfg1 = config(80.0, 3.0, vec![1.0], vec![(2, 2.0)], 1);
        let cfg2 = config(80.0, 3.0, vec![1.0], vec![(2, 2.0)], 2);
        let report1 = Simulation::new(&cfg1).unwrap().run();
        let report2 = Simulation::new(&cfg2).unwrap().run();
        assert_ne!(report1, report2);
    }

    #[test]
    fn test_backlog_drains_past_horizon() {
        // A saturated station keeps departing after the horizon; the
        // run ends only when the queue is naturally empty.
        let mut sim =
            Simulation::new(&config(10.0, 20.0, vec![1.0], vec![(64, 1.0)], 13)).unwrap();
        let report = sim.run();
        assert!(sim.is_finished());
        assert!(report.last_departure_time > 10.0);
        for server in sim.servers() {
            assert!(!server.is_busy());
            assert_eq!(server.backlog_len(), 0);
        }
    }

    #[test]
    fn test_busy_run_accrues_waiting_time() {
        let mut sim =
            Simulation::new(&config(100.0, 5.0, vec![1.0], vec![(8, 1.0)], 17)).unwrap();
        let report = sim.run();
        assert!(report.serviced > 0);
        assert!(report.avg_waiting_time > 0.0);
        assert!(report.avg_service_time > 0.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = config(10.0, 0.0, vec![1.0], vec![(1, 1.0)], 1);
        assert!(Simulation::new(&bad).is_err());
    }
}
