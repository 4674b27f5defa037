//! Color model shared between visuals and renderers.
//!
//! Colors are straight-alpha linear RGBA. Straight alpha (not premultiplied)
//! is load-bearing here: the opacity filter scales the alpha channel alone
//! and must leave RGB untouched. Renderers blend with
//! `SrcAlpha / OneMinusSrcAlpha` to match.

mod color;

pub use color::Color;
