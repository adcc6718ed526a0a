//! # Agner — Stochastic Queueing-Network Simulator
//!
//! A discrete-event simulation of N independent single-channel service
//! stations fed by one probabilistic arrival stream. Arrivals are
//! routed by a fixed discrete distribution; a busy station queues the
//! request up to a finite capacity or drops it. Inter-arrival and
//! service times are exponential. The run stops scheduling arrivals at
//! a configured horizon, drains naturally, and reports aggregate
//! throughput and latency.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │       Simulation          │ ← dispatch loop, owns everything below
//! │  ┌────────────────────┐  │
//! │  │     Scheduler       │  │ ← min-heap of events, (time, id) order
//! │  └────────────────────┘  │
//! │  ┌────────────────────┐  │
//! │  │    Server array     │  │ ← busy flag + bounded FIFO backlog
//! │  └────────────────────┘  │
//! │  ┌────────────────────┐  │
//! │  │   VariateSource     │  │ ← one seeded PRNG, all draws
//! │  └────────────────────┘  │
//! │  ┌────────────────────┐  │
//! │  │     RunStats        │  │ ← counters, finalized into RunReport
//! │  └────────────────────┘  │
//! └──────────────────────────┘
//! ```
//!
//! Determinism: a fixed seed fixes the whole run. All draws consume
//! one PRNG stream in a fixed order, and equal-time events dispatch in
//! insertion order.

pub mod config;
pub mod error;
pub mod event;
pub mod scheduler;
pub mod server;
pub mod simulation;
pub mod stats;
pub mod time;
pub mod variate;

// Re-exports for convenience.
pub use config::{RunConfig, ServerProfile};
pub use error::{SimError, SimResult};
pub use event::{Event, EventId, EventIdGen, EventKind};
pub use scheduler::Scheduler;
pub use server::{Admission, Server, ServerId};
pub use simulation::Simulation;
pub use stats::{RunReport, RunStats};
pub use time::SimTime;
pub use variate::VariateSource;
