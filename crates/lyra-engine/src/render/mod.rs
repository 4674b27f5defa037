//! GPU rendering subsystem.
//!
//! The line renderer consumes assembled visual programs and issues GPU
//! commands via wgpu. Because every filter chain produces a different WGSL
//! module, pipelines are cached by assembled source rather than built once.
//!
//! Convention:
//! - CPU geometry is in visual-local units; the generated vertex shader
//!   applies the composed visual→framebuffer transform and converts to NDC.
//! - A draw failure for one visual is reported to the caller and leaves the
//!   renderer ready for the next visual.

mod common;
mod ctx;
mod line;

pub use ctx::{RenderCtx, RenderTarget};
pub use line::LineRenderer;
