use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        if let Some(f) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(f);
        }
    }

    caps.formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Canvas format whose bytes pass through the blit unchanged.
///
/// Scene pixels are RGBA8 in display encoding; matching the swapchain's
/// sRGB-ness keeps decode on sample and encode on write symmetric.
pub(crate) fn canvas_format_for(swapchain: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if swapchain.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

/// Clamps a backing size to the device's texture limit, preserving aspect.
///
/// Returns the allocatable size and the scale applied (`1.0` when it fits).
pub(crate) fn fit_to_limit(size: PhysicalSize<u32>, max_dim: u32) -> (PhysicalSize<u32>, f64) {
    let largest = size.width.max(size.height);
    if largest <= max_dim || largest == 0 {
        return (size, 1.0);
    }

    let scale = max_dim as f64 / largest as f64;
    let fitted = PhysicalSize::new(
        ((size.width as f64 * scale).floor() as u32).clamp(1, max_dim),
        ((size.height as f64 * scale).floor() as u32).clamp(1, max_dim),
    );
    (fitted, scale)
}

pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    // wgpu rejects 0x0 configurations; keep the size and defer.
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
