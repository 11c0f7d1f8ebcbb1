use anyhow::Result;
use winit::dpi::PhysicalSize;

/// Drawing surface shared by every scene of a renderer.
///
/// Scenes only reach the surface through `Scene::render`, which the renderer
/// calls one scene at a time.
pub trait Surface {
    /// Backing-store size in physical pixels.
    fn size(&self) -> PhysicalSize<u32>;

    /// Physical pixels per logical pixel of the backing store.
    fn pixel_ratio(&self) -> f64;

    /// Reallocates the backing store. Previous contents are discarded.
    fn resize(&mut self, size: PhysicalSize<u32>, pixel_ratio: f64);

    /// Makes pending writes visible.
    ///
    /// Called once at the end of every tick; must be cheap when nothing was
    /// written. Returns `true` if a frame was presented.
    fn present(&mut self) -> Result<bool>;
}
