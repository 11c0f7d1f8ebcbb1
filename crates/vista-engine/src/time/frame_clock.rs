use std::time::{Duration, Instant};

/// Timing snapshot for one scheduler tick.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped by the clock.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick. This is the value handed to
    /// `Renderer::on_refresh`.
    pub now: Instant,

    /// Time since the clock was created or last reset.
    pub elapsed: Duration,

    /// Monotonic tick counter.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots for a render loop.
///
/// Delta time is clamped so a stalled or suspended host does not hand
/// animation code a multi-second step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose baseline is `origin`.
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            last: origin,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Replaces the delta-time clamps. An inverted pair is swapped.
    pub fn with_clamps(mut self, dt_min: Duration, dt_max: Duration) -> Self {
        let (lo, hi) = if dt_min <= dt_max {
            (dt_min, dt_max)
        } else {
            (dt_max, dt_min)
        };
        self.dt_min = lo;
        self.dt_max = hi;
        self
    }

    /// Rebases the clock, e.g. when the host resumes from suspension.
    ///
    /// The frame counter keeps counting.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.origin = now;
        self.last = now;
    }

    /// Advances the clock to the current time.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    ///
    /// Timestamps earlier than the previous tick produce the minimum delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            elapsed: now.saturating_duration_since(self.origin),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
