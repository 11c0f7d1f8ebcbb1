use winit::window::{CursorIcon, Window, WindowId};

use crate::coords::Vec2;
use crate::device::GpuSurface;
use crate::render::Renderer;
use crate::window::RuntimeCtx;

/// Window handle plus derived metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Logical window size as `(width, height)`.
    pub fn logical_size(&self) -> (f32, f32) {
        let logi: winit::dpi::LogicalSize<f64> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        (logi.width as f32, logi.height as f32)
    }

    /// Converts a physical cursor position to logical pixels.
    pub fn to_logical(&self, position: winit::dpi::PhysicalPosition<f64>) -> Vec2 {
        let p = position.to_logical::<f64>(self.window.scale_factor());
        Vec2::new(p.x as f32, p.y as f32)
    }

    pub fn set_cursor(&self, cursor: CursorIcon) {
        self.window.set_cursor(cursor);
    }
}

/// Context passed to every `core::App` callback.
pub struct ViewerCtx<'a> {
    pub window: WindowCtx<'a>,
    pub renderer: &'a mut Renderer<GpuSurface>,
    pub runtime: &'a mut RuntimeCtx,
}
