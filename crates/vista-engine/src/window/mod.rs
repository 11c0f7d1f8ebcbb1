//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, the shared GPU surface and the
//! `Renderer`, and acts as the renderer's host refresh signal.

mod refresh;
mod runtime;

pub use refresh::RefreshTimer;
pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use winit::window::CursorIcon;
