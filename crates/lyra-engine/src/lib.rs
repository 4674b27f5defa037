//! Lyra engine crate.
//!
//! A scene-graph-less rendering core for 2D vector visuals: visuals own their
//! geometry, transforms compose through a named stage chain, and filters splice
//! shader snippets into fixed hook points of each visual's program.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod transform;
pub mod filter;
pub mod shader;
pub mod visual;
pub mod render;
