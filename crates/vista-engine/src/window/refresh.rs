use std::time::{Duration, Instant};

use crate::render::RefreshSignal;

/// Fixed-cadence host refresh signal.
///
/// A request made during a tick becomes due one interval after that tick
/// started; a request made outside a tick is due immediately. A due refresh
/// that the platform never delivers is re-issued every interval. Due times
/// past the range of `Instant` are never reached.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    last_tick: Option<Instant>,
    due: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
            due: None,
        }
    }

    /// When the next refresh should be issued, if one is requested.
    #[inline]
    pub fn due(&self) -> Option<Instant> {
        self.due
    }

    /// Returns `true` if a refresh should be issued at `now`.
    ///
    /// The request stays armed (retrying one interval later) until
    /// [`begin_tick`](Self::begin_tick) consumes it.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = now.checked_add(self.interval);
                true
            }
            _ => false,
        }
    }

    /// Marks the start of a tick at `now`, consuming the pending request.
    pub fn begin_tick(&mut self, now: Instant) {
        self.last_tick = Some(now);
        self.due = None;
    }

    /// Drops any pending request.
    pub fn cancel(&mut self) {
        self.due = None;
    }
}

impl RefreshSignal for RefreshTimer {
    fn request_refresh(&mut self) {
        self.due = match self.last_tick {
            Some(tick) => tick.checked_add(self.interval),
            None => Some(Instant::now()),
        };
    }
}
