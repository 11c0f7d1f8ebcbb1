use winit::window::Window;

/// Environment variable consulted by [`ViewportScaling::from_env`].
pub const VIEWPORT_SCALING_ENV: &str = "VISTA_VIEWPORT_SCALING";

/// What the host declared about viewport scaling.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ViewportScaling {
    /// The host explicitly opted into device-pixel-ratio scaling.
    Declared,
    /// Layout metadata exists but carries no scaling directive.
    Undeclared,
    /// No layout metadata source exists (headless or embedded without one).
    #[default]
    Unavailable,
}

impl ViewportScaling {
    /// Reads the declaration from `VISTA_VIEWPORT_SCALING`.
    ///
    /// Accepts `declared` / `undeclared` (case-insensitive). Anything else,
    /// including an unset variable, yields `Unavailable`.
    pub fn from_env() -> Self {
        std::env::var(VIEWPORT_SCALING_ENV)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "declared" | "device" | "1" | "on" => Some(Self::Declared),
            "undeclared" | "off" | "0" => Some(Self::Undeclared),
            _ => None,
        }
    }

    #[inline]
    pub fn is_declared(self) -> bool {
        self == Self::Declared
    }
}

/// Host capabilities consumed by the DPR resolver.
pub trait DprEnvironment {
    /// One-shot layout declaration. Queried at most once per resolver.
    fn viewport_scaling(&self) -> ViewportScaling;

    /// Live physical-to-logical pixel ratio.
    fn device_pixel_ratio(&self) -> f64;
}

/// winit-backed environment: live scale factor from the window, declaration
/// from host configuration.
#[derive(Debug, Copy, Clone)]
pub struct WindowEnvironment<'a> {
    window: &'a Window,
    scaling: ViewportScaling,
}

impl<'a> WindowEnvironment<'a> {
    pub fn new(window: &'a Window, scaling: ViewportScaling) -> Self {
        Self { window, scaling }
    }
}

impl DprEnvironment for WindowEnvironment<'_> {
    fn viewport_scaling(&self) -> ViewportScaling {
        self.scaling
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_spellings() {
        assert_eq!(ViewportScaling::parse("Declared"), Some(ViewportScaling::Declared));
        assert_eq!(ViewportScaling::parse(" undeclared "), Some(ViewportScaling::Undeclared));
        assert_eq!(ViewportScaling::parse("1"), Some(ViewportScaling::Declared));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(ViewportScaling::parse("maybe"), None);
        assert_eq!(ViewportScaling::parse(""), None);
    }

    #[test]
    fn default_is_unavailable() {
        assert_eq!(ViewportScaling::default(), ViewportScaling::Unavailable);
        assert!(!ViewportScaling::default().is_declared());
    }
}
