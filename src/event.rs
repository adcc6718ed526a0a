/// Event records for the simulation.
///
/// Every state change in the model happens at an `Event`: a request
/// arriving at a station, or a station finishing one service. Events
/// are immutable records placed on the scheduler's priority queue and
/// dispatched in simulated-time order.

use std::cmp::Ordering;

use crate::server::ServerId;
use crate::time::SimTime;

// ── Event ID ──────────────────────────────────────────────────────────

/// A unique, strictly-increasing event identifier.
///
/// The monotonic nature of `EventId` breaks ties in the scheduler:
/// two events scheduled at the same `SimTime` are ordered by their
/// `EventId`, which corresponds to creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u64);

impl EventId {
    /// Wrap a raw u64 into an `EventId`.
    #[inline]
    pub fn new(raw: u64) -> Self {
        EventId(raw)
    }

    /// Return the raw value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E#{}", self.0)
    }
}

// ── Event ID Generator ───────────────────────────────────────────────

/// Strictly-increasing event-ID generator.
///
/// Each scheduler owns exactly one of these. The run is
/// single-threaded, so the counter is trivially deterministic.
#[derive(Debug, Clone)]
pub struct EventIdGen {
    next: u64,
}

impl EventIdGen {
    /// Create a generator starting at 0.
    pub fn new() -> Self {
        EventIdGen { next: 0 }
    }

    /// Mint the next event ID.
    pub fn next_id(&mut self) -> EventId {
        let id = EventId(self.next);
        self.next += 1;
        id
    }

    /// Peek at the next ID without consuming it.
    pub fn peek(&self) -> EventId {
        EventId(self.next)
    }
}

impl Default for EventIdGen {
    fn default() -> Self {
        Self::new()
    }
}

// ── Event Kind ────────────────────────────────────────────────────────

/// What happens at an event's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A new request enters the system, routed to one station.
    Arrival,

    /// A station finishes serving one request.
    Departure,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Arrival => write!(f, "Arrival"),
            EventKind::Departure => write!(f, "Departure"),
        }
    }
}

// ── Event ─────────────────────────────────────────────────────────────

/// A single simulation event.
///
/// Events are the atomic unit of execution. The scheduler orders them
/// by `(at, id)` to guarantee deterministic processing order even
/// when two events share a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Unique identifier (monotonically increasing).
    pub id: EventId,

    /// The simulated time at which this event is dispatched.
    pub at: SimTime,

    /// Arrival or Departure.
    pub kind: EventKind,

    /// The station this event concerns.
    pub server: ServerId,
}

impl Event {
    /// Convenience constructor.
    pub fn new(id: EventId, at: SimTime, kind: EventKind, server: ServerId) -> Self {
        Event { id, at, kind, server }
    }
}

/// Ordering: smallest `(at, id)` first.
///
/// Rust's `BinaryHeap` is a *max*-heap, so the natural ordering is
/// **reversed** here to turn it into a min-heap. Equal timestamps
/// fall back to ascending `EventId` — insertion order — so tie
/// handling is deterministic rather than whatever the heap happens
/// to yield.
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}] {} @ {}", self.id, self.at, self.kind, self.server)
    }
}
