//! GPU device + shared surface.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the window swapchain
//! - owning the persistent canvas that scenes write into, and blitting it to
//!   the swapchain on present

mod blit;
mod canvas;
mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use canvas::GpuSurface;
pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
