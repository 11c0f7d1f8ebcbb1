//! Application-facing contracts.
//!
//! This is the stable interface between the runtime (platform loop) and the
//! embedding application: lifecycle callbacks plus the context they receive.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{ViewerCtx, WindowCtx};
