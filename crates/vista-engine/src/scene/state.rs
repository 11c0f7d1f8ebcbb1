/// Dirty/visible flags carried by every scene.
///
/// A fresh state is dirty (never rendered) and hidden until the host reports
/// it visible.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SceneState {
    dirty: bool,
    visible: bool,
}

impl SceneState {
    #[inline]
    pub const fn new() -> Self {
        Self {
            dirty: true,
            visible: false,
        }
    }

    #[inline]
    pub const fn visible() -> Self {
        Self {
            dirty: true,
            visible: true,
        }
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flags content as changed since the last successful render.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Updates visibility. Returns `true` if it changed.
    ///
    /// Hiding a scene keeps its dirty flag, so a change made while hidden is
    /// still drawn once the scene is shown again.
    #[inline]
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Called by the renderer after a successful render.
    #[inline]
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}
