mod tile;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use vista_engine::coords::{Rect, Vec2};
use vista_engine::core::{App, AppControl, ViewerCtx};
use vista_engine::device::{GpuInit, GpuSurface};
use vista_engine::dpr::ViewportScaling;
use vista_engine::logging::{init_logging, LoggingConfig};
use vista_engine::scene::{Scene, SceneHandle};
use vista_engine::time::FrameTime;
use vista_engine::window::{CursorIcon, Runtime, RuntimeConfig};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use tile::ModelTile;

const TITLE: &str = "Vista Studio";
const GAP: f32 = 8.0;
const SPIN_SPEED: f32 = 0.9;

const PALETTE: [[f32; 3]; 4] = [
    [0.90, 0.36, 0.30],
    [0.32, 0.70, 0.46],
    [0.34, 0.52, 0.92],
    [0.92, 0.76, 0.30],
];

type Tiles = Rc<Vec<Rc<RefCell<ModelTile>>>>;

/// Four model tiles sharing one window surface.
struct Studio {
    tiles: Tiles,
    /// Latest cursor position not yet applied to the tiles. The outer
    /// `None` means nothing changed; `Some(None)` means the cursor left.
    cursor: Option<Option<Vec2>>,
    spinning: bool,
}

impl Studio {
    fn new() -> Self {
        let tiles: Tiles = Rc::new(
            PALETTE
                .iter()
                .map(|&c| Rc::new(RefCell::new(ModelTile::new(c))))
                .collect(),
        );

        Self {
            tiles,
            cursor: None,
            spinning: true,
        }
    }

    /// 2×2 grid over the logical window, `GAP` between tiles.
    fn layout(&self, (w, h): (f32, f32)) {
        let cw = (w - GAP) * 0.5;
        let ch = (h - GAP) * 0.5;

        for (i, tile) in self.tiles.iter().enumerate() {
            let col = (i % 2) as f32;
            let row = (i / 2) as f32;
            let cell = Rect::new(GAP * 0.5 + col * cw, GAP * 0.5 + row * ch, cw, ch);
            tile.borrow_mut().set_region(cell.inset(GAP * 0.5));
        }
    }

    fn set_visible(&self, visible: bool) {
        for tile in self.tiles.iter() {
            if let Ok(mut tile) = tile.try_borrow_mut() {
                tile.state_mut().set_visible(visible);
            }
        }
    }

    /// Records the cursor position; `None` when it left the window.
    fn cursor_moved(&mut self, cursor: Option<Vec2>) {
        self.cursor = Some(cursor);
    }

    /// Applies the most recent cursor position, once per refresh.
    fn sync_hover(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            set_hover(&self.tiles, cursor);
        }
    }

    fn title(&self) -> String {
        if self.spinning {
            TITLE.to_string()
        } else {
            format!("{TITLE} (paused)")
        }
    }
}

fn set_hover(tiles: &[Rc<RefCell<ModelTile>>], cursor: Option<Vec2>) {
    for tile in tiles {
        let mut tile = tile.borrow_mut();
        let over = cursor.is_some_and(|p| tile.region().contains(p));
        tile.set_hovered(over);
    }
}

impl App for Studio {
    fn on_start(&mut self, ctx: &mut ViewerCtx<'_>) -> Result<()> {
        self.layout(ctx.window.logical_size());

        for tile in self.tiles.iter() {
            let handle: SceneHandle<GpuSurface> = tile.clone();
            ctx.renderer.register_scene(handle);
        }

        ctx.window.set_cursor(CursorIcon::Crosshair);
        ctx.runtime.set_title(self.title());
        log::info!("studio ready: {} tiles", ctx.renderer.scene_count());
        Ok(())
    }

    fn on_window_event(&mut self, ctx: &mut ViewerCtx<'_>, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.layout(ctx.window.logical_size());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Some(ctx.window.to_logical(*position)));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_moved(None);
            }
            WindowEvent::Occluded(occluded) => {
                log::debug!("window occluded: {occluded}");
                self.set_visible(!occluded);
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match &event.logical_key {
                    Key::Named(NamedKey::Escape) => return AppControl::Exit,
                    Key::Named(NamedKey::Space) if !event.repeat => {
                        self.spinning = !self.spinning;
                        ctx.runtime.set_title(self.title());
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, _ctx: &mut ViewerCtx<'_>, time: FrameTime) -> AppControl {
        self.sync_hover();

        if self.spinning {
            for (i, tile) in self.tiles.iter().enumerate() {
                let speed = SPIN_SPEED * (1.0 + i as f32 * 0.25);
                tile.borrow_mut().rotate(time.dt * speed);
            }
        }
        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        viewport_scaling: ViewportScaling::Declared,
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Studio::new())
}
