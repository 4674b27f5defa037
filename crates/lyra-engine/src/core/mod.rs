//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the driver
//! application: event callbacks plus a consistent per-frame context. Runtime
//! internals stay out of driver code.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
