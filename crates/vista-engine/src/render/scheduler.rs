use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::anyhow;
use winit::dpi::{LogicalSize, PhysicalSize};

use crate::coords::Viewport;
use crate::dpr::CAPPED_DPR;
use crate::scene::{SceneHandle, SceneRegistry};

use super::{SceneFailure, Surface, TickReport};

/// Host capability: "call me again before the next display refresh".
pub trait RefreshSignal {
    fn request_refresh(&mut self);
}

/// Shared-surface scheduler for many independently updated scenes.
///
/// Per tick, in registry order:
/// - hidden scenes are left untouched; their dirty flag carries over
/// - visible, clean scenes are skipped
/// - visible, dirty scenes are rendered and marked clean on success
///
/// Render failures are isolated per scene: the failing scene stays dirty and
/// is reported in the [`TickReport`]; the rest of the tick proceeds.
pub struct Renderer<S: Surface> {
    surface: S,
    scenes: SceneRegistry<S>,
    active: bool,
    ticks: u64,
}

impl<S: Surface> Renderer<S> {
    /// Creates an inactive renderer owning `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            scenes: SceneRegistry::new(),
            active: false,
            ticks: 0,
        }
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Registers `scene`. Returns `false` if it was already registered.
    ///
    /// The scene's flags are not touched.
    pub fn register_scene(&mut self, scene: SceneHandle<S>) -> bool {
        let added = self.scenes.insert(scene);
        if added {
            log::debug!("registered scene ({} total)", self.scenes.len());
        }
        added
    }

    /// Unregisters `scene`. Returns `false` if it was not registered.
    pub fn unregister_scene<T: ?Sized>(&mut self, scene: &Rc<RefCell<T>>) -> bool {
        let removed = self.scenes.remove(scene);
        if removed {
            log::debug!("unregistered scene ({} remaining)", self.scenes.len());
        }
        removed
    }

    #[inline]
    pub fn contains<T: ?Sized>(&self, scene: &Rc<RefCell<T>>) -> bool {
        self.scenes.contains(scene)
    }

    /// Registered scenes in render order.
    #[inline]
    pub fn scenes(&self) -> impl Iterator<Item = &SceneHandle<S>> {
        self.scenes.iter()
    }

    #[inline]
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Largest logical size among registered scenes.
    ///
    /// Scenes that are currently borrowed elsewhere are skipped.
    pub fn scene_extent(&self) -> Viewport {
        self.scenes
            .iter()
            .filter_map(|s| s.try_borrow().ok().map(|s| s.size()))
            .fold(Viewport::default(), Viewport::union)
    }

    /// Number of ticks rendered so far.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activates the loop and requests the first refresh.
    ///
    /// Returns `false` if the renderer was already active.
    pub fn start(&mut self, host: &mut dyn RefreshSignal) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        host.request_refresh();
        log::debug!("render loop started");
        true
    }

    /// Stops the loop. A tick already in progress completes; no further
    /// refresh is requested.
    pub fn teardown(&mut self) {
        if self.active {
            log::debug!("render loop stopped after {} ticks", self.ticks);
        }
        self.active = false;
    }

    /// Host refresh callback.
    ///
    /// While active, runs one tick and requests the next refresh, whatever
    /// the tick did. While inactive, does nothing and returns `None`.
    pub fn on_refresh(
        &mut self,
        timestamp: Instant,
        host: &mut dyn RefreshSignal,
    ) -> Option<TickReport> {
        if !self.active {
            return None;
        }

        let report = self.render(timestamp);

        if self.active {
            host.request_refresh();
        }
        Some(report)
    }

    /// Runs one tick: draws every visible, dirty scene, then presents.
    pub fn render(&mut self, timestamp: Instant) -> TickReport {
        let mut report = TickReport::new(self.ticks, timestamp);
        self.ticks = self.ticks.wrapping_add(1);

        for (index, handle) in self.scenes.iter().enumerate() {
            let Ok(mut scene) = handle.try_borrow_mut() else {
                log::warn!("scene #{index} is borrowed during tick {}; retrying next tick", report.tick);
                report.failures.push(SceneFailure {
                    index,
                    error: anyhow!("scene is borrowed elsewhere"),
                });
                continue;
            };

            if !scene.is_visible() {
                report.hidden += 1;
                continue;
            }
            if !scene.is_dirty() {
                report.clean += 1;
                continue;
            }

            match scene.render(&mut self.surface) {
                Ok(()) => {
                    scene.state_mut().mark_clean();
                    report.rendered += 1;
                }
                Err(error) => {
                    log::warn!("scene #{index} failed to render: {error:#}");
                    report.failures.push(SceneFailure { index, error });
                }
            }
        }

        match self.surface.present() {
            Ok(presented) => report.presented = presented,
            Err(error) => {
                log::warn!("present failed on tick {}: {error:#}", report.tick);
                report.present_error = Some(error);
            }
        }

        report
    }

    /// Retargets the backing store to `logical × dpr`.
    ///
    /// `dpr` values that are not positive and finite are replaced by the
    /// capped ratio. The surface is only reallocated when the size or ratio
    /// actually changed. Returns the backing size in physical pixels.
    pub fn resize(&mut self, logical: LogicalSize<f64>, dpr: f64) -> PhysicalSize<u32> {
        let dpr = if dpr.is_normal() && dpr > 0.0 { dpr } else { CAPPED_DPR };
        let size: PhysicalSize<u32> = logical.to_physical(dpr);

        if size != self.surface.size() || dpr != self.surface.pixel_ratio() {
            log::debug!(
                "backing store {}x{} -> {}x{} (dpr {dpr})",
                self.surface.size().width,
                self.surface.size().height,
                size.width,
                size.height,
            );
            self.surface.resize(size, dpr);
        }

        size
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{bail, Result};

    use super::*;
    use crate::scene::{Scene, SceneState};

    #[derive(Default)]
    struct TestSurface {
        size: PhysicalSize<u32>,
        ratio: f64,
        draws: Vec<&'static str>,
        pending: bool,
        presents: usize,
        resizes: usize,
    }

    impl TestSurface {
        fn draw(&mut self, label: &'static str) {
            self.draws.push(label);
            self.pending = true;
        }
    }

    impl Surface for TestSurface {
        fn size(&self) -> PhysicalSize<u32> {
            self.size
        }
        fn pixel_ratio(&self) -> f64 {
            self.ratio
        }
        fn resize(&mut self, size: PhysicalSize<u32>, pixel_ratio: f64) {
            self.size = size;
            self.ratio = pixel_ratio;
            self.resizes += 1;
        }
        fn present(&mut self) -> Result<bool> {
            if !std::mem::take(&mut self.pending) {
                return Ok(false);
            }
            self.presents += 1;
            Ok(true)
        }
    }

    struct TestScene {
        label: &'static str,
        state: SceneState,
        size: Viewport,
        renders: usize,
        failures_left: usize,
    }

    impl Scene<TestSurface> for TestScene {
        fn state(&self) -> &SceneState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut SceneState {
            &mut self.state
        }
        fn size(&self) -> Viewport {
            self.size
        }
        fn render(&mut self, surface: &mut TestSurface) -> Result<()> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                bail!("context lost");
            }
            self.renders += 1;
            surface.draw(self.label);
            Ok(())
        }
    }

    /// Builds a scene with the given flags.
    fn scene(label: &'static str, dirty: bool, visible: bool) -> Rc<RefCell<TestScene>> {
        let mut state = SceneState::new();
        state.set_visible(visible);
        if !dirty {
            state.mark_clean();
        }
        Rc::new(RefCell::new(TestScene {
            label,
            state,
            size: Viewport::new(100.0, 50.0),
            renders: 0,
            failures_left: 0,
        }))
    }

    #[derive(Default)]
    struct CountingHost {
        requests: usize,
    }

    impl RefreshSignal for CountingHost {
        fn request_refresh(&mut self) {
            self.requests += 1;
        }
    }

    fn renderer() -> Renderer<TestSurface> {
        Renderer::new(TestSurface::default())
    }

    // ── admission ─────────────────────────────────────────────────────────

    #[test]
    fn hidden_scene_is_untouched() {
        let mut r = renderer();
        let a = scene("a", true, false);
        r.register_scene(a.clone());

        for _ in 0..3 {
            let report = r.render(Instant::now());
            assert_eq!(report.hidden, 1);
        }

        assert_eq!(a.borrow().renders, 0);
        assert!(a.borrow().is_dirty());
    }

    #[test]
    fn visible_dirty_scene_renders_once_and_is_cleaned() {
        let mut r = renderer();
        let a = scene("a", true, true);
        r.register_scene(a.clone());

        let report = r.render(Instant::now());

        assert_eq!(report.rendered, 1);
        assert_eq!(a.borrow().renders, 1);
        assert!(!a.borrow().is_dirty());
    }

    #[test]
    fn visible_clean_scene_is_skipped() {
        let mut r = renderer();
        let a = scene("a", false, true);
        r.register_scene(a.clone());

        let report = r.render(Instant::now());

        assert_eq!(report.clean, 1);
        assert_eq!(a.borrow().renders, 0);
        assert!(report.is_idle());
    }

    #[test]
    fn back_to_back_ticks_render_once() {
        let mut r = renderer();
        let a = scene("a", true, true);
        r.register_scene(a.clone());

        r.render(Instant::now());
        r.render(Instant::now());

        assert_eq!(a.borrow().renders, 1);
    }

    #[test]
    fn change_made_while_hidden_renders_when_shown() {
        let mut r = renderer();
        let a = scene("a", false, true);
        r.register_scene(a.clone());

        a.borrow_mut().state_mut().set_visible(false);
        a.borrow_mut().state_mut().mark_dirty();
        r.render(Instant::now());
        assert_eq!(a.borrow().renders, 0);

        a.borrow_mut().state_mut().set_visible(true);
        r.render(Instant::now());
        assert_eq!(a.borrow().renders, 1);
        assert!(!a.borrow().is_dirty());
    }

    #[test]
    fn scenes_render_in_registration_order() {
        let mut r = renderer();
        for label in ["c", "a", "b"] {
            r.register_scene(scene(label, true, true));
        }

        r.render(Instant::now());

        assert_eq!(r.surface().draws, vec!["c", "a", "b"]);
    }

    #[test]
    fn only_dirty_visible_scene_renders() {
        let mut r = renderer();
        let a = scene("a", true, true);
        let b = scene("b", false, false);
        r.register_scene(a.clone());
        r.register_scene(b.clone());

        r.render(Instant::now());
        assert_eq!(a.borrow().renders, 1);
        assert!(!a.borrow().is_dirty());
        assert_eq!(b.borrow().renders, 0);
        assert!(!b.borrow().is_dirty());
        assert!(!b.borrow().is_visible());

        r.render(Instant::now());
        assert_eq!(a.borrow().renders, 1);
        assert_eq!(b.borrow().renders, 0);
    }

    // ── registration ──────────────────────────────────────────────────────

    #[test]
    fn duplicate_registration_keeps_one_entry() {
        let mut r = renderer();
        let a = scene("a", true, true);

        assert!(r.register_scene(a.clone()));
        assert!(!r.register_scene(a.clone()));
        assert_eq!(r.scene_count(), 1);

        r.render(Instant::now());
        assert_eq!(a.borrow().renders, 1);
    }

    #[test]
    fn unregistering_unknown_scene_is_noop() {
        let mut r = renderer();
        let a = scene("a", true, true);
        r.register_scene(a.clone());

        assert!(!r.unregister_scene(&scene("stranger", true, true)));
        assert_eq!(r.scene_count(), 1);
    }

    #[test]
    fn registration_does_not_touch_flags() {
        let mut r = renderer();
        let a = scene("a", false, true);
        r.register_scene(a.clone());
        assert!(r.unregister_scene(&a));

        let s = a.borrow();
        assert!(!s.is_dirty());
        assert!(s.is_visible());
        assert!(!r.contains(&a));
    }

    #[test]
    fn unregistered_scene_is_not_rendered() {
        let mut r = renderer();
        let a = scene("a", true, true);
        r.register_scene(a.clone());
        r.unregister_scene(&a);

        r.render(Instant::now());
        assert_eq!(a.borrow().renders, 0);
        assert!(a.borrow().is_dirty());
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn failing_scene_stays_dirty_and_others_render() {
        let mut r = renderer();
        let a = scene("a", true, true);
        let b = scene("b", true, true);
        a.borrow_mut().failures_left = 1;
        r.register_scene(a.clone());
        r.register_scene(b.clone());

        let report = r.render(Instant::now());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 0);
        assert!(report.failures[0].to_string().contains("context lost"));
        assert!(a.borrow().is_dirty());
        assert_eq!(b.borrow().renders, 1);

        let report = r.render(Instant::now());
        assert!(report.is_ok());
        assert_eq!(a.borrow().renders, 1);
        assert!(!a.borrow().is_dirty());
    }

    #[test]
    fn borrowed_scene_is_reported_and_retried() {
        let mut r = renderer();
        let a = scene("a", true, true);
        r.register_scene(a.clone());

        {
            let _held = a.borrow();
            let report = r.render(Instant::now());
            assert_eq!(report.failures.len(), 1);
        }

        r.render(Instant::now());
        assert_eq!(a.borrow().renders, 1);
    }

    // ── presentation ──────────────────────────────────────────────────────

    #[test]
    fn presents_only_after_writes() {
        let mut r = renderer();
        let a = scene("a", true, true);
        r.register_scene(a.clone());

        assert!(r.render(Instant::now()).presented);
        assert!(!r.render(Instant::now()).presented);
        assert_eq!(r.surface().presents, 1);
    }

    // ── loop ──────────────────────────────────────────────────────────────

    #[test]
    fn inactive_renderer_ignores_refresh() {
        let mut r = renderer();
        let mut host = CountingHost::default();
        r.register_scene(scene("a", true, true));

        assert!(r.on_refresh(Instant::now(), &mut host).is_none());
        assert_eq!(host.requests, 0);
        assert_eq!(r.tick_count(), 0);
    }

    #[test]
    fn loop_reschedules_on_idle_ticks() {
        let mut r = renderer();
        let mut host = CountingHost::default();

        assert!(r.start(&mut host));
        assert!(!r.start(&mut host));
        assert_eq!(host.requests, 1);

        for _ in 0..5 {
            let report = r.on_refresh(Instant::now(), &mut host).unwrap();
            assert!(report.is_idle());
        }
        assert_eq!(host.requests, 6);
        assert_eq!(r.tick_count(), 5);
    }

    #[test]
    fn teardown_stops_rescheduling() {
        let mut r = renderer();
        let mut host = CountingHost::default();
        let a = scene("a", true, true);
        r.register_scene(a.clone());
        r.start(&mut host);

        r.on_refresh(Instant::now(), &mut host);
        r.teardown();
        a.borrow_mut().state_mut().mark_dirty();

        assert!(r.on_refresh(Instant::now(), &mut host).is_none());
        assert_eq!(host.requests, 2);
        assert!(!r.is_active());
        assert_eq!(a.borrow().renders, 1);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_scales_logical_size_by_dpr() {
        let mut r = renderer();
        let size = r.resize(LogicalSize::new(400.0, 300.0), 2.0);
        assert_eq!(size, PhysicalSize::new(800, 600));
        assert_eq!(r.surface().ratio, 2.0);
    }

    #[test]
    fn resize_unchanged_skips_reallocation() {
        let mut r = renderer();
        r.resize(LogicalSize::new(400.0, 300.0), 1.5);
        r.resize(LogicalSize::new(400.0, 300.0), 1.5);
        assert_eq!(r.surface().resizes, 1);

        r.resize(LogicalSize::new(400.0, 300.0), 2.0);
        assert_eq!(r.surface().resizes, 2);
    }

    #[test]
    fn resize_with_unusable_dpr_uses_cap() {
        let mut r = renderer();
        assert_eq!(r.resize(LogicalSize::new(10.0, 10.0), f64::NAN), PhysicalSize::new(10, 10));
        assert_eq!(r.resize(LogicalSize::new(10.0, 10.0), -2.0), PhysicalSize::new(10, 10));
        assert_eq!(r.surface().ratio, CAPPED_DPR);
    }

    #[test]
    fn scene_extent_is_largest_scene() {
        let mut r = renderer();
        let a = scene("a", true, true);
        let b = scene("b", true, true);
        b.borrow_mut().size = Viewport::new(60.0, 120.0);
        r.register_scene(a);
        r.register_scene(b);

        assert_eq!(r.scene_extent(), Viewport::new(100.0, 120.0));
    }
}
