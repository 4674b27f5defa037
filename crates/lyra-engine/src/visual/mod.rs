//! Drawable visual objects.
//!
//! Responsibilities:
//! - own geometry (a vertex buffer, immutable once built)
//! - hold the visual's local transform and ordered filter attachments
//! - assemble the per-visual shader program for the renderer
//!
//! Extending the engine with a new visual kind:
//! - add a module here owning its geometry payload
//! - give it an `assemble` built on [`crate::shader::ShaderBuilder`]
//! - add a matching renderer under `render`

mod line;

pub use line::LineVisual;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Vec2;

/// Error raised when a visual cannot produce a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualError {
    /// The visual has no local transform; its geometry cannot be placed.
    MissingTransform,
}

impl fmt::Display for VisualError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualError::MissingTransform => {
                write!(f, "visual has no transform assigned")
            }
        }
    }
}

impl std::error::Error for VisualError {}

/// Process-unique visual identity.
///
/// Renderers key per-visual GPU resources on this, so it must stay stable for
/// the visual's whole lifetime and never be reused across visuals.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VisualId(u64);

impl VisualId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ordered vertex positions, fixed at construction.
///
/// Immutable by API: a visual with different geometry is a new visual (and a
/// new buffer). This is what lets renderers upload once and reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    positions: Vec<Vec2>,
}

impl VertexBuffer {
    pub fn new(positions: Vec<Vec2>) -> Self {
        Self { positions }
    }

    #[inline]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
