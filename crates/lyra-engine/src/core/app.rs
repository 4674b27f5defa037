use winit::event::WindowEvent;

use crate::coords::Viewport;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the driver.
///
/// Callbacks are dispatched serially on the event-loop thread; nothing in the
/// engine calls back re-entrantly, so driver state never sees a frame and a
/// resize interleave.
pub trait App {
    /// Called for raw window events the runtime does not consume itself.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called when the drawable area changes, with the new logical viewport
    /// and scale factor. Also called once right after the window exists, so
    /// viewport-derived state can be configured before the first frame.
    fn on_resize(&mut self, viewport: Viewport, scale_factor: f32) {
        let _ = (viewport, scale_factor);
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
