//! Multi-scene render scheduling.
//!
//! One [`Renderer`] owns one shared [`Surface`] and any number of registered
//! scenes. Each tick it redraws exactly the scenes that are both visible and
//! dirty, in registration order, then asks the surface to present.
//!
//! The loop is self-rescheduling: while the renderer is active every tick
//! requests the next one from the host's [`RefreshSignal`], whether or not
//! any scene needed work.

mod report;
mod scheduler;
mod surface;

pub use report::{SceneFailure, TickReport};
pub use scheduler::{RefreshSignal, Renderer};
pub use surface::Surface;
