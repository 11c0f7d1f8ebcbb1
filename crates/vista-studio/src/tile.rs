use anyhow::Result;
use vista_engine::coords::{PixelRect, Rect, Viewport};
use vista_engine::device::GpuSurface;
use vista_engine::math::{clamp, step};
use vista_engine::render::Surface;
use vista_engine::scene::{Scene, SceneState};

const BACKGROUND: [f32; 3] = [0.08, 0.09, 0.11];
const HOVER_BACKGROUND: [f32; 3] = [0.14, 0.16, 0.20];
const AMBIENT: f32 = 0.12;
const RADIUS: f32 = 0.78;

/// One viewer tile: a lit sphere standing in for a loaded model.
///
/// The tile owns a region of the shared surface in logical pixels and
/// re-shades it on the CPU whenever it is dirty.
pub struct ModelTile {
    state: SceneState,
    region: Rect,
    base: [f32; 3],
    angle: f32,
    hovered: bool,
    scratch: Vec<u8>,
}

impl ModelTile {
    pub fn new(base: [f32; 3]) -> Self {
        Self {
            state: SceneState::visible(),
            region: Rect::default(),
            base,
            angle: 0.0,
            hovered: false,
            scratch: Vec::new(),
        }
    }

    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn set_region(&mut self, region: Rect) {
        if self.region != region {
            self.region = region;
            self.state.mark_dirty();
        }
    }

    /// Advances the light orbit.
    pub fn rotate(&mut self, radians: f32) {
        if radians != 0.0 {
            self.angle = (self.angle + radians) % std::f32::consts::TAU;
            self.state.mark_dirty();
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.state.mark_dirty();
        }
    }

    fn shade_into(&mut self, px: PixelRect) {
        self.scratch.clear();
        self.scratch.reserve(px.area() * 4);

        let light = light_dir(self.angle);
        let background = if self.hovered {
            HOVER_BACKGROUND
        } else {
            BACKGROUND
        };
        let half = px.width.min(px.height) as f32 * 0.5;
        let cx = px.width as f32 * 0.5;
        let cy = px.height as f32 * 0.5;

        for y in 0..px.height {
            for x in 0..px.width {
                let u = (x as f32 + 0.5 - cx) / half;
                let v = (y as f32 + 0.5 - cy) / half;
                let rgb = shade(u, v, light, self.base, background);
                self.scratch.extend_from_slice(&to_rgba8(rgb));
            }
        }
    }
}

impl Scene<GpuSurface> for ModelTile {
    fn state(&self) -> &SceneState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    fn size(&self) -> Viewport {
        self.region.viewport()
    }

    fn render(&mut self, surface: &mut GpuSurface) -> Result<()> {
        // Off-surface tiles have nothing to draw.
        let Some(px) = self.region.to_pixels(surface.pixel_ratio(), surface.size()) else {
            return Ok(());
        };

        self.shade_into(px);
        surface.write_pixels(px, &self.scratch)
    }
}

fn light_dir(angle: f32) -> [f32; 3] {
    let (s, c) = angle.sin_cos();
    normalize([c, -0.6, s.abs() + 0.35])
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len == 0.0 {
        return v;
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

/// Colour of the tile at normalized coordinates `(u, v)`, where the unit
/// square spans the shorter side of the tile.
fn shade(u: f32, v: f32, light: [f32; 3], base: [f32; 3], background: [f32; 3]) -> [f32; 3] {
    let r2 = (u * u + v * v) / (RADIUS * RADIUS);
    let inside = 1.0 - step(1.0, r2) as f32;
    if inside == 0.0 {
        return background;
    }

    let nz = (1.0 - r2).sqrt();
    let n = [u / RADIUS, v / RADIUS, nz];
    let lambert = clamp(n[0] * light[0] + n[1] * light[1] + n[2] * light[2], 0.0, 1.0);
    let k = AMBIENT + (1.0 - AMBIENT) * lambert;

    [base[0] * k, base[1] * k, base[2] * k]
}

fn to_rgba8(rgb: [f32; 3]) -> [u8; 4] {
    let c = |v: f32| (clamp(v, 0.0, 1.0) * 255.0).round() as u8;
    [c(rgb[0]), c(rgb[1]), c(rgb[2]), 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 3] = [1.0, 0.0, 0.0];

    // ── shade ────────────────────────────────────────────────────────────

    #[test]
    fn outside_the_sphere_is_background() {
        let light = light_dir(0.0);
        assert_eq!(shade(0.95, 0.0, light, RED, BACKGROUND), BACKGROUND);
        assert_eq!(shade(0.0, -1.0, light, RED, BACKGROUND), BACKGROUND);
    }

    #[test]
    fn lit_side_is_brighter_than_shadow_side() {
        let light = normalize([1.0, 0.0, 0.2]);
        let lit = shade(0.5, 0.0, light, RED, BACKGROUND);
        let dark = shade(-0.5, 0.0, light, RED, BACKGROUND);
        assert!(lit[0] > dark[0]);
    }

    #[test]
    fn shadow_side_keeps_ambient() {
        let light = normalize([1.0, 0.0, 0.0]);
        let dark = shade(-0.7, 0.0, light, RED, BACKGROUND);
        assert!((dark[0] - AMBIENT).abs() < 1e-4);
    }

    #[test]
    fn rgba8_clamps_and_is_opaque() {
        assert_eq!(to_rgba8([2.0, -1.0, 0.5]), [255, 0, 128, 255]);
    }

    // ── flags ────────────────────────────────────────────────────────────

    #[test]
    fn rotation_wraps_and_reports_dirty() {
        let mut tile = ModelTile::new(RED);
        tile.rotate(std::f32::consts::TAU + 0.5);
        assert!((tile.angle - 0.5).abs() < 1e-5);
        assert!(tile.state().is_dirty());
    }

    #[test]
    fn region_drives_size() {
        let mut tile = ModelTile::new(RED);
        tile.set_region(Rect::new(8.0, 8.0, 120.0, 90.0));
        assert_eq!(tile.size(), Viewport::new(120.0, 90.0));
        assert_eq!(tile.region(), Rect::new(8.0, 8.0, 120.0, 90.0));
    }

    #[test]
    fn shading_fills_the_whole_region() {
        let mut tile = ModelTile::new(RED);
        let px = PixelRect {
            x: 4,
            y: 2,
            width: 7,
            height: 3,
        };
        tile.shade_into(px);
        assert_eq!(tile.scratch.len(), px.area() * 4);
        assert!(tile.scratch.chunks(4).all(|p| p[3] == 255));
    }
}
