/// A swapchain image acquired for one present.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// image.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
