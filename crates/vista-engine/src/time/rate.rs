use std::marker::PhantomData;
use std::time::{Duration, Instant};

/// Leading-edge rate limiter.
///
/// The first call while idle invokes the callback immediately and opens a
/// cooldown of `window`. Calls that land inside the cooldown are dropped,
/// not queued, so the first call of each window always wins. A window too
/// long to represent as an `Instant` never expires on its own; only
/// [`flush`](Throttle::flush) reopens it.
pub struct Throttle<A, F> {
    callback: F,
    window: Duration,
    cooldown: Cooldown,
    _args: PhantomData<fn(A)>,
}

#[derive(Debug, Copy, Clone)]
enum Cooldown {
    Idle,
    Until(Instant),
    Indefinite,
}

impl<A, F> Throttle<A, F>
where
    F: FnMut(A),
{
    pub fn new(window: Duration, callback: F) -> Self {
        Self {
            callback,
            window,
            cooldown: Cooldown::Idle,
            _args: PhantomData,
        }
    }

    /// Invokes the callback with `args` unless a cooldown is running at `now`.
    ///
    /// Returns `true` when the callback ran.
    pub fn call(&mut self, now: Instant, args: A) -> bool {
        if self.is_cooling(now) {
            return false;
        }

        self.cooldown = match now.checked_add(self.window) {
            Some(until) => Cooldown::Until(until),
            None => Cooldown::Indefinite,
        };
        (self.callback)(args);
        true
    }

    /// Cancels any running cooldown; the next call fires immediately.
    pub fn flush(&mut self) {
        self.cooldown = Cooldown::Idle;
    }

    #[inline]
    pub fn is_cooling(&self, now: Instant) -> bool {
        match self.cooldown {
            Cooldown::Idle => false,
            Cooldown::Until(until) => now < until,
            Cooldown::Indefinite => true,
        }
    }
}

/// Trailing-edge rate limiter.
///
/// Each call replaces any pending invocation with one due `window` after the
/// call, carrying the latest arguments. The host loop calls [`poll`] to fire
/// invocations whose quiet period has elapsed. An invocation whose due time
/// is past the range of `Instant` is never due; only [`flush`] fires it.
///
/// [`poll`]: Debounce::poll
/// [`flush`]: Debounce::flush
pub struct Debounce<A, F> {
    callback: F,
    window: Duration,
    pending: Option<(Option<Instant>, A)>,
}

impl<A, F> Debounce<A, F>
where
    F: FnMut(A),
{
    pub fn new(window: Duration, callback: F) -> Self {
        Self {
            callback,
            window,
            pending: None,
        }
    }

    /// Schedules the callback for `now + window` with `args`, superseding any
    /// pending invocation.
    pub fn call(&mut self, now: Instant, args: A) {
        self.pending = Some((now.checked_add(self.window), args));
    }

    /// Fires the pending invocation if it is due at `now`.
    ///
    /// Returns `true` when the callback ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((Some(due), args)) if due <= now => {
                (self.callback)(args);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Fires the pending invocation immediately, regardless of its deadline.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some((_, args)) => {
                (self.callback)(args);
                true
            }
            None => false,
        }
    }

    /// Drops the pending invocation without firing it.
    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|(_, args)| args)
    }

    /// When the pending invocation becomes due. `None` when nothing is
    /// pending or the pending invocation is never due.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and_then(|(due, _)| *due)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl FnMut(u32)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |v| sink.borrow_mut().push(v))
    }

    // ── throttle ──────────────────────────────────────────────────────────

    #[test]
    fn throttle_first_call_of_window_wins() {
        let t0 = Instant::now();
        let (log, cb) = recorder();
        let mut throttle = Throttle::new(Duration::from_millis(100), cb);

        assert!(throttle.call(at(t0, 0), 0));
        assert!(!throttle.call(at(t0, 10), 10));
        assert!(!throttle.call(at(t0, 50), 50));

        assert_eq!(*log.borrow(), vec![0]);
    }

    #[test]
    fn throttle_flush_rearms_immediately() {
        let t0 = Instant::now();
        let (log, cb) = recorder();
        let mut throttle = Throttle::new(Duration::from_millis(100), cb);

        throttle.call(at(t0, 0), 0);
        throttle.call(at(t0, 10), 10);
        throttle.call(at(t0, 50), 50);
        throttle.flush();
        assert!(throttle.call(at(t0, 70), 70));

        assert_eq!(*log.borrow(), vec![0, 70]);
    }

    #[test]
    fn throttle_reopens_after_window() {
        let t0 = Instant::now();
        let (log, cb) = recorder();
        let mut throttle = Throttle::new(Duration::from_millis(100), cb);

        throttle.call(at(t0, 0), 0);
        assert!(throttle.is_cooling(at(t0, 99)));
        assert!(!throttle.is_cooling(at(t0, 100)));
        throttle.call(at(t0, 100), 100);

        assert_eq!(*log.borrow(), vec![0, 100]);
    }

    #[test]
    fn throttle_unbounded_window_holds_until_flush() {
        let t0 = Instant::now();
        let (log, cb) = recorder();
        let mut throttle = Throttle::new(Duration::MAX, cb);

        assert!(throttle.call(t0, 1));
        assert!(throttle.is_cooling(at(t0, 86_400_000)));
        assert!(!throttle.call(at(t0, 86_400_000), 2));

        throttle.flush();
        assert!(throttle.call(at(t0, 86_400_001), 3));

        assert_eq!(*log.borrow(), vec![1, 3]);
    }

    // ── debounce ──────────────────────────────────────────────────────────

    #[test]
    fn debounce_fires_once_with_last_args_after_quiet_period() {
        let t0 = Instant::now();
        let (log, cb) = recorder();
        let mut debounce = Debounce::new(Duration::from_millis(50), cb);

        debounce.call(at(t0, 0), 0);
        debounce.call(at(t0, 10), 10);
        debounce.call(at(t0, 20), 20);

        assert!(!debounce.poll(at(t0, 50)));
        assert!(!debounce.poll(at(t0, 69)));
        assert_eq!(debounce.deadline(), Some(at(t0, 70)));
        assert!(debounce.poll(at(t0, 70)));
        assert!(!debounce.poll(at(t0, 200)));

        assert_eq!(*log.borrow(), vec![20]);
    }

    #[test]
    fn debounce_cancel_drops_pending() {
        let t0 = Instant::now();
        let (log, cb) = recorder();
        let mut debounce = Debounce::new(Duration::from_millis(50), cb);

        debounce.call(at(t0, 0), 1);
        assert_eq!(debounce.cancel(), Some(1));
        assert!(!debounce.is_pending());
        assert!(!debounce.poll(at(t0, 100)));

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn debounce_flush_fires_early() {
        let t0 = Instant::now();
        let (log, cb) = recorder();
        let mut debounce = Debounce::new(Duration::from_millis(50), cb);

        debounce.call(at(t0, 0), 7);
        assert!(debounce.flush());
        assert!(!debounce.flush());

        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn debounce_unbounded_window_only_fires_on_flush() {
        let t0 = Instant::now();
        let (log, cb) = recorder();
        let mut debounce = Debounce::new(Duration::MAX, cb);

        debounce.call(t0, 4);
        assert!(debounce.is_pending());
        assert_eq!(debounce.deadline(), None);
        assert!(!debounce.poll(at(t0, 86_400_000)));

        debounce.call(at(t0, 10), 5);
        assert!(debounce.flush());

        assert_eq!(*log.borrow(), vec![5]);
    }
}
