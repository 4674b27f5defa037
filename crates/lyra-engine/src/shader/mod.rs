//! WGSL program assembly.
//!
//! A visual's shader is generated, not hand-written: a fixed line-shader
//! template with four splice sites (vertex/fragment x pre/post) receives one
//! wrapper function per attached filter, chained in attachment order. The
//! registry of splice sites is statically enumerated: a filter declares its
//! hook, the builder buckets it, and the template names never change.
//!
//! Names in scope for spliced snippets are part of the contract and are
//! documented on [`Filter::snippet`](crate::filter::Filter::snippet).

mod assembly;

pub use assembly::{ProgramSource, ShaderBuilder};
