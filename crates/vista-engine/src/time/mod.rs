//! Time subsystem.
//!
//! Everything here is driven by explicit `Instant` timestamps supplied by the
//! host loop. Nothing spawns threads or arms OS timers:
//! - `FrameClock` produces one `FrameTime` per scheduler tick
//! - `Throttle` / `Debounce` coalesce bursts of host events and are polled
//!   by the same loop that drives rendering

mod frame_clock;
mod rate;

pub use frame_clock::{FrameClock, FrameTime};
pub use rate::{Debounce, Throttle};
