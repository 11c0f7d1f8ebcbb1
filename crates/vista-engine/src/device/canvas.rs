use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::PixelRect;
use crate::render::Surface;

use super::blit::Blitter;
use super::{surface, Gpu, GpuInit};

/// Persistent backing store behind the shared surface.
struct Canvas {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: PhysicalSize<u32>,
}

/// GPU implementation of the renderer's shared [`Surface`].
///
/// Scenes write RGBA8 pixels into a canvas texture sized to the backing
/// resolution (`logical × dpr`). The canvas survives across ticks, so a
/// scene that is not redrawn keeps its last image. Presenting blits the
/// canvas over the whole swapchain image, scaling when the backing
/// resolution differs from the window's.
pub struct GpuSurface {
    window: Arc<Window>,
    gpu: Gpu,
    blitter: Blitter,
    canvas_format: wgpu::TextureFormat,
    canvas: Option<Canvas>,
    pixel_ratio: f64,
    needs_present: bool,
    lost: bool,
}

impl GpuSurface {
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let gpu = Gpu::new(Arc::clone(&window), &init).await?;
        let blitter = Blitter::new(gpu.device(), gpu.surface_format(), init.upscale_filter);
        let canvas_format = surface::canvas_format_for(gpu.surface_format());

        let info = gpu.adapter_info();
        log::info!(
            "gpu ready: {} ({:?}), swapchain {:?}, canvas {:?}",
            info.name,
            info.backend,
            gpu.surface_format(),
            canvas_format,
        );

        Ok(Self {
            window,
            gpu,
            blitter,
            canvas_format,
            canvas: None,
            pixel_ratio: 1.0,
            needs_present: false,
            lost: false,
        })
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// `true` once the device reported an unrecoverable swapchain error.
    #[inline]
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Tracks the window's physical size. The canvas is untouched; the next
    /// present rescales it onto the new swapchain.
    pub fn resize_swapchain(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
        self.needs_present = true;
    }

    /// Copies tightly packed RGBA8 rows into `rect` of the canvas.
    pub fn write_pixels(&mut self, rect: PixelRect, rgba: &[u8]) -> Result<()> {
        anyhow::ensure!(!self.lost, "surface lost");
        let canvas = self.canvas.as_ref().context("backing store has zero size")?;

        anyhow::ensure!(
            rect.x as u64 + rect.width as u64 <= canvas.size.width as u64
                && rect.y as u64 + rect.height as u64 <= canvas.size.height as u64,
            "region {rect:?} exceeds backing store {}x{}",
            canvas.size.width,
            canvas.size.height,
        );
        anyhow::ensure!(
            rgba.len() == rect.area() * 4,
            "expected {} bytes for {}x{} region, got {}",
            rect.area() * 4,
            rect.width,
            rect.height,
            rgba.len(),
        );

        if rect.area() == 0 {
            return Ok(());
        }

        self.gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &canvas.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: rect.x,
                    y: rect.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(rect.width * 4),
                rows_per_image: Some(rect.height),
            },
            wgpu::Extent3d {
                width: rect.width,
                height: rect.height,
                depth_or_array_layers: 1,
            },
        );

        self.needs_present = true;
        Ok(())
    }

    fn allocate_canvas(&self, size: PhysicalSize<u32>) -> Canvas {
        let device = self.gpu.device();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("vista canvas"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.canvas_format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.blitter.bind(device, &view);

        Canvas {
            texture,
            bind_group,
            size,
        }
    }
}

impl Surface for GpuSurface {
    fn size(&self) -> PhysicalSize<u32> {
        self.canvas
            .as_ref()
            .map(|c| c.size)
            .unwrap_or(PhysicalSize::new(0, 0))
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn resize(&mut self, size: PhysicalSize<u32>, pixel_ratio: f64) {
        self.needs_present = true;

        if size.width == 0 || size.height == 0 {
            self.canvas = None;
            self.pixel_ratio = pixel_ratio;
            return;
        }

        let max_dim = self.gpu.device().limits().max_texture_dimension_2d;
        let (fitted, scale) = surface::fit_to_limit(size, max_dim);
        if scale < 1.0 {
            log::warn!(
                "backing store {}x{} exceeds device limit {max_dim}; using {}x{}",
                size.width,
                size.height,
                fitted.width,
                fitted.height,
            );
        }

        self.pixel_ratio = pixel_ratio * scale;
        self.canvas = Some(self.allocate_canvas(fitted));
    }

    fn present(&mut self) -> Result<bool> {
        if !self.needs_present || self.lost {
            return Ok(false);
        }

        let swapchain = self.gpu.size();
        if swapchain.width == 0 || swapchain.height == 0 {
            // Minimized; keep the request until there is something to show on.
            return Ok(false);
        }

        let Some(canvas) = self.canvas.as_ref() else {
            self.needs_present = false;
            return Ok(false);
        };

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let msg = err.to_string();
                let action = self.gpu.handle_surface_error(err);
                if !action.is_recoverable() {
                    self.lost = true;
                }
                anyhow::bail!("could not acquire swapchain image ({action:?}): {msg}");
            }
        };

        self.blitter.draw(&mut frame.encoder, &frame.view, &canvas.bind_group);

        self.window.pre_present_notify();
        self.gpu.submit(frame);
        self.needs_present = false;

        Ok(true)
    }
}

impl std::fmt::Debug for GpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuSurface")
            .field("size", &self.size())
            .field("pixel_ratio", &self.pixel_ratio)
            .field("swapchain", &self.gpu.size())
            .field("lost", &self.lost)
            .finish()
    }
}

