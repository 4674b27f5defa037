//! GPU device + surface management.
//!
//! Responsibilities:
//! - create the wgpu Instance/Adapter/Device/Queue
//! - create and configure the Surface (swapchain)
//! - acquire frames and hand out encoders/views for rendering
//! - map surface errors to recover/skip/abort decisions

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
