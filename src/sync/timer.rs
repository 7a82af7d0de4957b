//! Timer-owning objects for debounce and throttle
//!
//! Both take an explicit `now` so the 100 ms event-loop tick drives them
//! and tests can feed synthetic instants. `Instant::now()` convenience
//! wrappers cover callers outside the loop.

use std::time::{Duration, Instant};

/// Delays an action until input pauses for a fixed interval.
/// Re-scheduling supersedes any pending deadline; `fire_at` reports true
/// exactly once per deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)arm the timer: the deadline moves to `now + delay`,
    /// cancelling any pending deadline.
    pub fn schedule_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    /// Drop any pending deadline
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True when the deadline has passed; the deadline is consumed so the
    /// action runs once per schedule.
    pub fn fire_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn fire(&mut self) -> bool {
        self.fire_at(Instant::now())
    }
}

/// Limits an action to at most once per interval regardless of trigger
/// frequency. The caller keeps its own latest pending value; this object
/// only answers "may I write now".
#[derive(Debug, Clone)]
pub struct WriteThrottle {
    min_gap: Duration,
    last: Option<Instant>,
}

impl WriteThrottle {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            last: None,
        }
    }

    /// Whether enough time has passed since the last marked write.
    /// The first call is always ready.
    pub fn ready_at(&self, now: Instant) -> bool {
        match self.last {
            Some(last) => now.duration_since(last) >= self.min_gap,
            None => true,
        }
    }

    /// Record that a write happened at `now`
    pub fn mark_at(&mut self, now: Instant) {
        self.last = Some(now);
    }

    pub fn ready(&self) -> bool {
        self.ready_at(Instant::now())
    }

    pub fn mark(&mut self) {
        self.mark_at(Instant::now());
    }
}
