//! Device pixel ratio resolution.
//!
//! The host's viewport-scaling declaration is probed once per resolver and
//! cached for the life of the process. The live pixel ratio is never cached,
//! so zoom and display migration are picked up on the next call.
//!
//! Hosts that never declared conscious viewport scaling get a ratio capped at
//! [`CAPPED_DPR`]; their backing stores stay proportional to what is visible.

mod environment;
mod resolver;

pub use environment::{DprEnvironment, ViewportScaling, WindowEnvironment};
pub use resolver::{resolve_dpr, DprResolver, CAPPED_DPR};
