use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::coords::Viewport;

use super::SceneState;

/// Shared reference to an application-owned scene.
///
/// Identity is the allocation: two handles name the same scene iff they point
/// at the same `Rc`.
pub type SceneHandle<S> = Rc<RefCell<dyn Scene<S>>>;

/// A drawable unit sharing the renderer's surface `S`.
pub trait Scene<S: ?Sized> {
    fn state(&self) -> &SceneState;

    fn state_mut(&mut self) -> &mut SceneState;

    /// Logical size of the scene's output.
    fn size(&self) -> Viewport;

    /// Draws the scene into the shared surface.
    ///
    /// On error the scene stays dirty and is retried on the next tick.
    fn render(&mut self, surface: &mut S) -> Result<()>;

    #[inline]
    fn is_dirty(&self) -> bool {
        self.state().is_dirty()
    }

    #[inline]
    fn is_visible(&self) -> bool {
        self.state().is_visible()
    }
}

/// Thin address of a scene allocation, ignoring trait-object metadata.
#[inline]
pub(crate) fn scene_addr<T: ?Sized>(scene: &Rc<RefCell<T>>) -> *const () {
    Rc::as_ptr(scene) as *const ()
}
