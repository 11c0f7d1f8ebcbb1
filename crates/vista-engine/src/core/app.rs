use anyhow::Result;
use winit::event::WindowEvent;

use super::ctx::ViewerCtx;
use crate::time::FrameTime;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by viewer hosts.
pub trait App {
    /// Called once after the window, surface and renderer exist, before the
    /// first tick. Register scenes here.
    fn on_start(&mut self, ctx: &mut ViewerCtx<'_>) -> Result<()>;

    /// Called for every window event, after the runtime handled it (resizes
    /// have already been applied to the shared surface).
    fn on_window_event(&mut self, ctx: &mut ViewerCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Called once per refresh, immediately before the render tick.
    fn on_frame(&mut self, ctx: &mut ViewerCtx<'_>, time: FrameTime) -> AppControl;
}
