/// Deterministic event scheduler.
///
/// Uses a `BinaryHeap` with reversed `Ord` on `Event` to act as a
/// min-heap keyed by `(at, event_id)`. Because event IDs are strictly
/// increasing and the heap is deterministic, two runs that schedule
/// the same events in the same order will always dispatch them in the
/// same order.

use std::collections::BinaryHeap;

use crate::event::{Event, EventId, EventIdGen, EventKind};
use crate::server::ServerId;
use crate::time::SimTime;

/// The pending-event queue.
///
/// Owns the heap and the ID generator. All scheduling goes through
/// this struct to ensure monotonic IDs and deterministic ordering.
/// No cross-event validation happens here; admission and horizon
/// logic live in the simulation loop.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Min-heap (via reversed Ord on Event).
    queue: BinaryHeap<Event>,

    /// Monotonic event-ID generator.
    id_gen: EventIdGen,
}

impl Scheduler {
    /// Create a new, empty scheduler.
    pub fn new() -> Self {
        Scheduler {
            queue: BinaryHeap::new(),
            id_gen: EventIdGen::new(),
        }
    }

    /// Schedule a new event at the given simulated time.
    ///
    /// O(log n). Returns the `EventId` assigned to this event.
    pub fn schedule(&mut self, at: SimTime, kind: EventKind, server: ServerId) -> EventId {
        let id = self.id_gen.next_id();
        self.queue.push(Event::new(id, at, kind, server));
        id
    }

    /// Pop the next event (earliest time, lowest ID).
    ///
    /// Returns `None` when the queue is exhausted.
    pub fn pop_next(&mut self) -> Option<Event> {
        self.queue.pop()
    }

    /// Peek at the next event without removing it.
    pub fn peek_next(&self) -> Option<&Event> {
        self.queue.peek()
    }

    /// Returns `true` if the event queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of pending events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
