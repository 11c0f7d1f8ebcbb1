/// High-level response after a swapchain error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Swapchain was reconfigured; presenting may resume next tick.
    Reconfigured,
    /// Transient error; skip this present and retry.
    SkipFrame,
    /// Fatal error (commonly OOM); the surface is unusable.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_recoverable(self) -> bool {
        self != Self::Fatal
    }
}
