//! Coordinate and geometry types shared across the engine.
//!
//! Canonical CPU space ("document" space):
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Framebuffer space (what fragment-stage filter snippets see) is physical
//! pixels with the origin at the bottom-left, +Y up. The transform system owns
//! the conversion between the two.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
