use state::InitCell;

use super::{DprEnvironment, ViewportScaling};

/// Ratio used whenever the host has not declared viewport scaling.
pub const CAPPED_DPR: f64 = 1.0;

static GLOBAL: DprResolver = DprResolver::new();

/// Resolves the device pixel ratio with the process-wide resolver.
///
/// The first call anywhere in the process fixes the declaration probe.
pub fn resolve_dpr(env: &dyn DprEnvironment) -> f64 {
    GLOBAL.resolve(env)
}

/// Pixel-ratio resolver with a lazily probed, never-invalidated declaration.
pub struct DprResolver {
    declared: InitCell<bool>,
}

impl DprResolver {
    pub const fn new() -> Self {
        Self {
            declared: InitCell::new(),
        }
    }

    /// Returns the ratio to size backing stores with.
    ///
    /// Declared hosts get the live ratio, re-read on every call. Live values
    /// that are not positive and finite resolve to [`CAPPED_DPR`].
    pub fn resolve(&self, env: &dyn DprEnvironment) -> f64 {
        let declared = *self.declared.get_or_init(|| probe(env));
        if !declared {
            return CAPPED_DPR;
        }

        let live = env.device_pixel_ratio();
        if live.is_normal() && live > 0.0 {
            live
        } else {
            log::debug!("ignoring unusable device pixel ratio {live}");
            CAPPED_DPR
        }
    }

    /// Cached declaration, if the environment has been probed.
    pub fn declared(&self) -> Option<bool> {
        self.declared.try_get().copied()
    }
}

impl Default for DprResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn probe(env: &dyn DprEnvironment) -> bool {
    match env.viewport_scaling() {
        ViewportScaling::Declared => {
            log::debug!("viewport scaling declared; tracking live device pixel ratio");
            true
        }
        ViewportScaling::Undeclared => {
            log::warn!(
                "no viewport scaling directive declared; device pixel ratio capped at {CAPPED_DPR}"
            );
            false
        }
        ViewportScaling::Unavailable => {
            log::warn!(
                "no layout metadata available; device pixel ratio capped at {CAPPED_DPR}"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct FakeEnv {
        scaling: ViewportScaling,
        ratio: Cell<f64>,
        probes: Cell<usize>,
        reads: Cell<usize>,
    }

    impl FakeEnv {
        fn new(scaling: ViewportScaling, ratio: f64) -> Self {
            Self {
                scaling,
                ratio: Cell::new(ratio),
                probes: Cell::new(0),
                reads: Cell::new(0),
            }
        }
    }

    impl DprEnvironment for FakeEnv {
        fn viewport_scaling(&self) -> ViewportScaling {
            self.probes.set(self.probes.get() + 1);
            self.scaling
        }

        fn device_pixel_ratio(&self) -> f64 {
            self.reads.set(self.reads.get() + 1);
            self.ratio.get()
        }
    }

    #[test]
    fn undeclared_always_capped() {
        let resolver = DprResolver::new();
        let env = FakeEnv::new(ViewportScaling::Undeclared, 2.0);

        assert_eq!(resolver.resolve(&env), 1.0);
        env.ratio.set(3.0);
        assert_eq!(resolver.resolve(&env), 1.0);

        assert_eq!(env.probes.get(), 1);
        assert_eq!(resolver.declared(), Some(false));
    }

    #[test]
    fn unavailable_falls_back_to_cap() {
        let resolver = DprResolver::new();
        let env = FakeEnv::new(ViewportScaling::Unavailable, 2.5);
        assert_eq!(resolver.resolve(&env), CAPPED_DPR);
    }

    #[test]
    fn declared_tracks_live_ratio_without_reprobing() {
        let resolver = DprResolver::new();
        let env = FakeEnv::new(ViewportScaling::Declared, 2.0);

        assert_eq!(resolver.resolve(&env), 2.0);
        env.ratio.set(1.5);
        assert_eq!(resolver.resolve(&env), 1.5);
        env.ratio.set(3.0);
        assert_eq!(resolver.resolve(&env), 3.0);

        assert_eq!(env.probes.get(), 1);
        assert_eq!(env.reads.get(), 3);
    }

    #[test]
    fn first_probe_is_sticky() {
        let resolver = DprResolver::new();
        let declared = FakeEnv::new(ViewportScaling::Declared, 2.0);
        let undeclared = FakeEnv::new(ViewportScaling::Undeclared, 2.0);

        assert_eq!(resolver.resolve(&declared), 2.0);
        assert_eq!(resolver.resolve(&undeclared), 2.0);
        assert_eq!(undeclared.probes.get(), 0);
    }

    #[test]
    fn unusable_live_ratio_is_capped() {
        let resolver = DprResolver::new();
        let env = FakeEnv::new(ViewportScaling::Declared, f64::NAN);
        assert_eq!(resolver.resolve(&env), CAPPED_DPR);
        env.ratio.set(0.0);
        assert_eq!(resolver.resolve(&env), CAPPED_DPR);
        env.ratio.set(f64::INFINITY);
        assert_eq!(resolver.resolve(&env), CAPPED_DPR);
    }

    #[test]
    fn unprobed_resolver_reports_none() {
        assert_eq!(DprResolver::new().declared(), None);
    }

    // The only test that touches the process-wide resolver.
    #[test]
    fn process_wide_declaration_is_sticky() {
        let declared = FakeEnv::new(ViewportScaling::Declared, 2.0);
        assert_eq!(resolve_dpr(&declared), 2.0);

        let undeclared = FakeEnv::new(ViewportScaling::Undeclared, 1.5);
        assert_eq!(resolve_dpr(&undeclared), 1.5);
        assert_eq!(undeclared.probes.get(), 0);
        assert_eq!(GLOBAL.declared(), Some(true));
    }
}
