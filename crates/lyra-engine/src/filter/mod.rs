//! Attachable shader-chain filters.
//!
//! A filter contributes a WGSL snippet at one of four fixed hook points of a
//! visual's shader program, plus one `vec4` uniform parameter slot that is
//! re-read every frame. Filters are open for extension: downstream crates
//! implement [`Filter`] and attach instances without the visual or renderer
//! changing.
//!
//! Filters are shared across visuals via `Rc<dyn Filter>`; the engine's
//! threading model is single-threaded and frame-driven, so interior
//! mutability (the clipper's bounds) uses `Cell`.

mod alpha;
mod clipper;
mod color;

pub use alpha::Alpha;
pub use clipper::Clipper;
pub use color::ColorFilter;

use std::fmt;

/// Fixed splice sites in the assembled shader.
///
/// Vertex hooks run in the vertex stage around the visual→framebuffer
/// transform; fragment hooks run in the fragment stage around the visual's
/// own color output. See [`crate::shader`] for the names each snippet has in
/// scope.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Hook {
    /// Vertex stage, before the transform. Snippets see `pos` in visual space.
    VertexPre,
    /// Vertex stage, after the transform. Snippets see `pos` in framebuffer space.
    VertexPost,
    /// Fragment stage, first look at the shaded color (runs ahead of the
    /// post chain).
    FragmentPre,
    /// Fragment stage, after the visual's shading; where post-effects live.
    FragmentPost,
}

impl Hook {
    #[inline]
    pub fn is_fragment(self) -> bool {
        matches!(self, Hook::FragmentPre | Hook::FragmentPost)
    }
}

/// A shader-injection capability attachable to a visual.
///
/// Implementations are stateless with respect to the visual: one instance may
/// be attached to many visuals, or to the same visual more than once, in
/// which case each attachment applies the effect again.
pub trait Filter {
    /// The hook point this filter's snippet is spliced into.
    fn hook(&self) -> Hook;

    /// WGSL statements for the hook point.
    ///
    /// Fragment-hook snippets have in scope: `color: vec4<f32>` (mutable
    /// output color), `coord: vec2<f32>` (framebuffer coordinate, origin
    /// bottom-left, +Y up), and `params: vec4<f32>` (this attachment's
    /// parameter slot). Vertex-hook snippets see `pos: vec2<f32>` and
    /// `params`. `discard` is permitted in fragment snippets.
    fn snippet(&self) -> String;

    /// Parameter slot contents, re-read every frame before drawing.
    fn params(&self) -> [f32; 4] {
        [0.0; 4]
    }
}

/// Error raised by filter constructors and setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A parameter was outside its valid domain. Parameters fail fast rather
    /// than being clamped.
    InvalidFilterParameter {
        filter: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::InvalidFilterParameter { filter, reason } => {
                write!(f, "invalid {filter} parameter: {reason}")
            }
        }
    }
}

impl std::error::Error for FilterError {}
