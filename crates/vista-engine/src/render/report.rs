use std::fmt;
use std::time::Instant;

/// A scene whose render failed during a tick.
///
/// The scene keeps its dirty flag and is retried on the next tick.
#[derive(Debug)]
pub struct SceneFailure {
    /// Registry position of the scene at the time of the tick.
    pub index: usize,
    pub error: anyhow::Error,
}

impl fmt::Display for SceneFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene #{}: {:#}", self.index, self.error)
    }
}

/// Outcome of one scheduler tick.
#[derive(Debug)]
pub struct TickReport {
    pub tick: u64,
    pub timestamp: Instant,

    /// Scenes drawn this tick.
    pub rendered: usize,
    /// Registered scenes skipped because they were hidden.
    pub hidden: usize,
    /// Visible scenes skipped because nothing changed.
    pub clean: usize,

    pub failures: Vec<SceneFailure>,

    pub presented: bool,
    pub present_error: Option<anyhow::Error>,
}

impl TickReport {
    pub(crate) fn new(tick: u64, timestamp: Instant) -> Self {
        Self {
            tick,
            timestamp,
            rendered: 0,
            hidden: 0,
            clean: 0,
            failures: Vec::new(),
            presented: false,
            present_error: None,
        }
    }

    /// `true` if the tick neither rendered nor presented anything.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.rendered == 0 && !self.presented
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty() && self.present_error.is_none()
    }
}
