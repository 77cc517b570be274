use std::time::{Duration, Instant};

use tracing::trace;

pub const DEFAULT_HIGHLIGHT_MS: u64 = 400;

/// Permission to clear the highlight raised by one particular mistake
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightTicket {
    pub generation: u64,
    pub due: Instant,
}

/// Transient error signal raised on every rejected keystroke.
///
/// Each raise bumps the generation. A clear carrying an older generation is
/// ignored, so a timer scheduled for an earlier mistake can never cut short the
/// highlight of a later one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    generation: u64,
    active: bool,
    duration: Duration,
}

impl Default for Highlight {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_HIGHLIGHT_MS))
    }
}

impl Highlight {
    pub fn new(duration: Duration) -> Self {
        Self {
            generation: 0,
            active: false,
            duration,
        }
    }

    pub fn raise(&mut self, now: Instant) -> HighlightTicket {
        self.generation += 1;
        self.active = true;
        HighlightTicket {
            generation: self.generation,
            due: now + self.duration,
        }
    }

    /// Returns true when the highlight was actually switched off
    pub fn clear(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.active {
            trace!(target: "highlight", generation, current = self.generation, "stale clear ignored");
            return false;
        }
        self.active = false;
        true
    }

    /// Drops the highlight and invalidates every outstanding ticket
    pub fn reset(&mut self) {
        self.generation += 1;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Deferred clears waiting for their due time
#[derive(Debug, Default)]
pub struct HighlightTimers {
    pending: Vec<HighlightTicket>,
}

impl HighlightTimers {
    pub fn schedule(&mut self, ticket: HighlightTicket) {
        self.pending.push(ticket);
    }

    /// Removes and returns the generations of every ticket due at `now`
    pub fn take_due(&mut self, now: Instant) -> Vec<u64> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = pending;
        due.into_iter().map(|t| t.generation).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_and_clear() {
        let now = Instant::now();
        let mut h = Highlight::default();
        let ticket = h.raise(now);
        assert!(h.is_active());
        assert_eq!(ticket.due, now + Duration::from_millis(400));
        assert!(h.clear(ticket.generation));
        assert!(!h.is_active());
    }

    #[test]
    fn test_stale_ticket_does_not_clear_newer_highlight() {
        let now = Instant::now();
        let mut h = Highlight::default();
        let first = h.raise(now);
        let second = h.raise(now + Duration::from_millis(300));

        assert!(!h.clear(first.generation));
        assert!(h.is_active());
        assert!(h.clear(second.generation));
        assert!(!h.is_active());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut h = Highlight::default();
        let ticket = h.raise(Instant::now());
        assert!(h.clear(ticket.generation));
        assert!(!h.clear(ticket.generation));
    }

    #[test]
    fn test_reset_invalidates_tickets() {
        let mut h = Highlight::default();
        let ticket = h.raise(Instant::now());
        h.reset();
        assert!(!h.is_active());
        let next = h.raise(Instant::now());
        assert!(!h.clear(ticket.generation));
        assert!(h.is_active());
        assert!(next.generation > ticket.generation);
    }

    #[test]
    fn test_timers_release_only_due_tickets() {
        let now = Instant::now();
        let mut h = Highlight::new(Duration::from_millis(100));
        let mut timers = HighlightTimers::default();
        timers.schedule(h.raise(now));
        timers.schedule(h.raise(now + Duration::from_millis(50)));

        assert!(timers.take_due(now + Duration::from_millis(99)).is_empty());
        assert_eq!(timers.take_due(now + Duration::from_millis(100)), vec![1]);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.take_due(now + Duration::from_millis(150)), vec![2]);
        assert!(timers.is_empty());
    }
}
