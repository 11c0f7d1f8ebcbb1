//! Vista engine crate.
//!
//! Rendering core for embeddable model viewers: many independently driven
//! scenes share one drawing surface, and only the scenes that are both
//! visible and dirty are redrawn on a given tick.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod dpr;
pub mod math;
pub mod render;
pub mod scene;
