use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, ViewerCtx, WindowCtx};
use crate::device::{GpuInit, GpuSurface};
use crate::dpr::{resolve_dpr, ViewportScaling, WindowEnvironment};
use crate::render::{Renderer, Surface, TickReport};
use crate::time::{Debounce, FrameClock, Throttle};

use super::RefreshTimer;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// What the host declares about viewport scaling. Anything but
    /// `Declared` caps the backing store at one physical pixel per logical
    /// pixel.
    pub viewport_scaling: ViewportScaling,

    /// Cadence of the host refresh signal.
    pub refresh_interval: Duration,

    /// Quiet period after the last resize before the settled size is logged.
    pub resize_settle: Duration,

    /// Minimum spacing between tick statistics log lines.
    pub stats_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "vista".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            viewport_scaling: ViewportScaling::from_env(),
            refresh_interval: Duration::from_micros(16_667),
            resize_settle: Duration::from_millis(150),
            stats_interval: Duration::from_secs(2),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(title.into()));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    SetTitle(String),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

/// Backing-store geometry after a resize, reported once resizing settles.
#[derive(Debug, Copy, Clone)]
struct ResizeInfo {
    window: PhysicalSize<u32>,
    backing: PhysicalSize<u32>,
    dpr: f64,
}

#[derive(Debug, Copy, Clone)]
struct TickStats {
    tick: u64,
    scenes: usize,
    rendered: usize,
    hidden: usize,
    failures: usize,
}

fn log_resize_settled(info: ResizeInfo) {
    log::info!(
        "surface settled: window {}x{}, backing {}x{} at dpr {}",
        info.window.width,
        info.window.height,
        info.backing.width,
        info.backing.height,
        info.dpr,
    );
}

fn log_tick_stats(stats: TickStats) {
    log::debug!(
        "tick {}: {} scenes, {} rendered, {} hidden, {} failed",
        stats.tick,
        stats.scenes,
        stats.rendered,
        stats.hidden,
        stats.failures,
    );
}

/// Live window + renderer, created on `resumed`.
struct ViewerHost {
    window: Arc<Window>,
    renderer: Renderer<GpuSurface>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    host: Option<ViewerHost>,
    refresh: RefreshTimer,
    clock: FrameClock,
    resize_settled: Debounce<ResizeInfo, fn(ResizeInfo)>,
    stats: Throttle<TickStats, fn(TickStats)>,

    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            refresh: RefreshTimer::new(config.refresh_interval),
            resize_settled: Debounce::new(config.resize_settle, log_resize_settled as fn(ResizeInfo)),
            stats: Throttle::new(config.stats_interval, log_tick_stats as fn(TickStats)),
            clock: FrameClock::default(),
            config,
            gpu_init,
            app,
            host: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_host(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let surface = pollster::block_on(GpuSurface::new(Arc::clone(&window), self.gpu_init.clone()))
            .context("GPU initialization failed for window")?;

        let mut host = ViewerHost {
            window,
            renderer: Renderer::new(surface),
        };
        retarget_backing(&mut host, self.config.viewport_scaling);

        let mut runtime_ctx = RuntimeCtx::default();
        {
            let mut ctx = viewer_ctx(&mut host, &mut runtime_ctx);
            self.app
                .on_start(&mut ctx)
                .context("application failed to start")?;
        }

        log::info!("viewer started with {} scenes", host.renderer.scene_count());

        self.clock.reset();
        host.renderer.start(&mut self.refresh);
        self.host = Some(host);
        self.queue_commands(runtime_ctx);
        Ok(())
    }

    fn handle_resize(&mut self) {
        let Some(host) = self.host.as_mut() else {
            return;
        };

        let window = host.window.inner_size();
        host.renderer.surface_mut().resize_swapchain(window);
        let info = retarget_backing(host, self.config.viewport_scaling);
        self.resize_settled.call(Instant::now(), info);
    }

    fn redraw(&mut self) {
        let Some(host) = self.host.as_mut() else {
            return;
        };

        let time = self.clock.tick();
        let mut runtime_ctx = RuntimeCtx::default();

        let control = {
            let mut ctx = viewer_ctx(host, &mut runtime_ctx);
            self.app.on_frame(&mut ctx, time)
        };
        if control == AppControl::Exit {
            runtime_ctx.exit();
        }

        self.refresh.begin_tick(time.now);
        if let Some(report) = host.renderer.on_refresh(time.now, &mut self.refresh) {
            self.stats.call(time.now, tick_stats(&report, host.renderer.scene_count()));
        }

        if host.renderer.surface().is_lost() {
            log::error!("GPU surface lost; shutting down");
            runtime_ctx.exit();
        }

        self.queue_commands(runtime_ctx);
    }

    fn queue_commands(&mut self, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::SetTitle(title) => {
                    if let Some(host) = &self.host {
                        host.window.set_title(&title);
                    }
                }
                Command::Exit => self.request_exit(),
            }
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.as_mut() {
            host.renderer.teardown();
        }
        self.refresh.cancel();
        self.resize_settled.cancel();
        event_loop.exit();
    }
}

fn viewer_ctx<'a>(host: &'a mut ViewerHost, runtime: &'a mut RuntimeCtx) -> ViewerCtx<'a> {
    ViewerCtx {
        window: WindowCtx {
            id: host.window.id(),
            window: host.window.as_ref(),
        },
        renderer: &mut host.renderer,
        runtime,
    }
}

fn tick_stats(report: &TickReport, scenes: usize) -> TickStats {
    TickStats {
        tick: report.tick,
        scenes,
        rendered: report.rendered,
        hidden: report.hidden,
        failures: report.failures.len(),
    }
}

/// Recomputes the backing store as `logical × resolve_dpr()` and applies it.
fn retarget_backing(host: &mut ViewerHost, scaling: ViewportScaling) -> ResizeInfo {
    let window = host.window.inner_size();
    let logical: LogicalSize<f64> = window.to_logical(host.window.scale_factor());
    let dpr = resolve_dpr(&WindowEnvironment::new(&host.window, scaling));
    let backing = resize_backing(&mut host.renderer, logical, dpr);

    ResizeInfo {
        window,
        backing,
        dpr,
    }
}

/// Resizes the renderer's surface and marks every registered scene dirty
/// when the backing store was reallocated, since its previous contents are
/// gone. Hidden scenes are marked too; they draw once shown.
fn resize_backing<S: Surface>(
    renderer: &mut Renderer<S>,
    logical: LogicalSize<f64>,
    dpr: f64,
) -> PhysicalSize<u32> {
    let before = (renderer.surface().size(), renderer.surface().pixel_ratio());
    let backing = renderer.resize(logical, dpr);
    let after = (renderer.surface().size(), renderer.surface().pixel_ratio());

    if before != after {
        for scene in renderer.scenes() {
            match scene.try_borrow_mut() {
                Ok(mut scene) => scene.state_mut().mark_dirty(),
                Err(_) => log::warn!("scene borrowed during resize; it may show stale content"),
            }
        }
    }

    backing
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }

        if let Err(e) = self.create_host(event_loop) {
            log::error!("failed to start viewer: {e:#}");
            self.request_exit();
            self.shutdown(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            self.shutdown(event_loop);
            return;
        }

        let now = Instant::now();
        self.resize_settled.poll(now);

        if self.refresh.poll(now) {
            if let Some(host) = &self.host {
                host.window.request_redraw();
            }
        }

        let next = [self.refresh.due(), self.resize_settled.deadline()]
            .into_iter()
            .flatten()
            .min();

        event_loop.set_control_flow(match next {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            self.shutdown(event_loop);
            return;
        }

        if self.host.as_ref().map(|h| h.window.id()) != Some(window_id) {
            return;
        }

        // Runtime-managed lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => self.request_exit(),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.handle_resize(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }

        if !matches!(event, WindowEvent::RedrawRequested) {
            let mut runtime_ctx = RuntimeCtx::default();
            let control = match self.host.as_mut() {
                Some(host) => {
                    let mut ctx = viewer_ctx(host, &mut runtime_ctx);
                    self.app.on_window_event(&mut ctx, &event)
                }
                None => AppControl::Continue,
            };
            if control == AppControl::Exit {
                runtime_ctx.exit();
            }
            self.queue_commands(runtime_ctx);
        }

        if self.exit_requested {
            self.shutdown(event_loop);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.take() {
            log::info!(
                "viewer exiting after {} ticks",
                host.renderer.tick_count()
            );
        }
    }
}
