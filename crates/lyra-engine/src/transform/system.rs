use crate::coords::{Vec2, Viewport};

use super::{StTransform, TransformError};

/// Named coordinate spaces, ordered from most local to most device-bound.
///
/// - `Visual`: a visual's own geometry units
/// - `Document`: logical pixels, origin top-left, +Y down
/// - `Framebuffer`: physical pixels, origin bottom-left, +Y up (the space
///   fragment-stage filter snippets observe)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Visual,
    Document,
    Framebuffer,
}

impl Stage {
    #[inline]
    fn index(self) -> usize {
        match self {
            Stage::Visual => 0,
            Stage::Document => 1,
            Stage::Framebuffer => 2,
        }
    }
}

/// The stage chain for one visual.
///
/// Holds the visual→document stage (set by the driver, typically mirroring the
/// visual's own transform) and the document→framebuffer stage (derived from
/// the viewport by [`auto_configure`]). Drivers mutate this between frames
/// only; drawing reads it.
///
/// Nothing is cached: [`effective`] recomposes from the current stages on
/// every call, so mappings are always consistent with the latest
/// configuration.
///
/// [`auto_configure`]: TransformSystem::auto_configure
/// [`effective`]: TransformSystem::effective
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSystem {
    visual_to_document: StTransform,
    document_to_framebuffer: StTransform,
}

impl TransformSystem {
    /// A system with identity stages. Call [`auto_configure`] before drawing.
    ///
    /// [`auto_configure`]: TransformSystem::auto_configure
    pub fn new() -> Self {
        Self {
            visual_to_document: StTransform::IDENTITY,
            document_to_framebuffer: StTransform::IDENTITY,
        }
    }

    #[inline]
    pub fn visual_to_document(&self) -> StTransform {
        self.visual_to_document
    }

    #[inline]
    pub fn set_visual_to_document(&mut self, t: StTransform) {
        self.visual_to_document = t;
    }

    #[inline]
    pub fn document_to_framebuffer(&self) -> StTransform {
        self.document_to_framebuffer
    }

    /// Recomputes the document→framebuffer stage for the given surface.
    ///
    /// Document space is logical top-left/+Y-down; framebuffer space is
    /// physical bottom-left/+Y-up. With `s = scale_factor` the stage is
    /// `scale (s, -s), translate (0, viewport.height * s)`: the Y flip plus
    /// the DPI scale.
    ///
    /// Must be called whenever the surface size or scale factor changes;
    /// mappings derived before the call are stale.
    pub fn auto_configure(&mut self, viewport: Viewport, scale_factor: f32) {
        let s = scale_factor;
        self.document_to_framebuffer = StTransform::new(
            Vec2::new(s, -s),
            Vec2::new(0.0, viewport.height * s),
        );
    }

    /// Composed mapping from one named stage to another.
    ///
    /// Forward requests (toward the framebuffer) compose the stage chain
    /// directly and cannot fail. Backward requests invert the forward mapping
    /// and fail with [`TransformError::UnsupportedTransform`] when a stage in
    /// between is degenerate. `from == to` yields the identity.
    pub fn effective(&self, from: Stage, to: Stage) -> Result<StTransform, TransformError> {
        if from.index() > to.index() {
            return self.effective(to, from)?.inverse();
        }

        let mut t = StTransform::IDENTITY;
        // Walk forward through the chain; later stages compose on the left.
        if from.index() < 1 && to.index() >= 1 {
            t = self.visual_to_document * t;
        }
        if from.index() < 2 && to.index() >= 2 {
            t = self.document_to_framebuffer * t;
        }
        Ok(t)
    }
}

impl Default for TransformSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::coords::Rect;

    use super::*;

    fn configured(w: f32, h: f32, scale: f32) -> TransformSystem {
        let mut sys = TransformSystem::new();
        sys.auto_configure(Viewport::new(w, h), scale);
        sys
    }

    // ── auto_configure ────────────────────────────────────────────────────

    #[test]
    fn auto_configure_flips_y_and_scales() {
        let sys = configured(800.0, 800.0, 1.0);
        let t = sys.document_to_framebuffer();

        // Document top-left → framebuffer top-left corner (y = height).
        assert_eq!(t.map(Vec2::zero()), Vec2::new(0.0, 800.0));
        assert_eq!(t.map(Vec2::new(100.0, 800.0)), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn auto_configure_applies_scale_factor() {
        let sys = configured(400.0, 300.0, 2.0);
        let t = sys.document_to_framebuffer();
        assert_eq!(t.map(Vec2::new(10.0, 0.0)), Vec2::new(20.0, 600.0));
    }

    // ── effective ─────────────────────────────────────────────────────────

    #[test]
    fn effective_same_stage_is_identity() {
        let sys = configured(800.0, 600.0, 1.0);
        for stage in [Stage::Visual, Stage::Document, Stage::Framebuffer] {
            assert_eq!(sys.effective(stage, stage).unwrap(), StTransform::IDENTITY);
        }
    }

    #[test]
    fn effective_matches_manual_composition() {
        let mut sys = configured(800.0, 800.0, 1.0);
        sys.set_visual_to_document(StTransform::from_translate(Vec2::new(400.0, 50.0)));

        let manual = sys.document_to_framebuffer() * sys.visual_to_document();
        let eff = sys.effective(Stage::Visual, Stage::Framebuffer).unwrap();

        for p in [Vec2::zero(), Vec2::new(350.0, 20.0), Vec2::new(-5.0, 5.0)] {
            assert_eq!(eff.map(p), manual.map(p));
        }
    }

    #[test]
    fn effective_backward_inverts() {
        let mut sys = configured(800.0, 800.0, 1.0);
        sys.set_visual_to_document(StTransform::from_translate(Vec2::new(400.0, 50.0)));

        let fwd = sys.effective(Stage::Visual, Stage::Framebuffer).unwrap();
        let back = sys.effective(Stage::Framebuffer, Stage::Visual).unwrap();

        let p = Vec2::new(30.0, -10.0);
        let round = back.map(fwd.map(p));
        assert!((round.x - p.x).abs() < 1e-4 && (round.y - p.y).abs() < 1e-4);
    }

    #[test]
    fn effective_backward_fails_on_degenerate_stage() {
        let mut sys = configured(800.0, 800.0, 1.0);
        sys.set_visual_to_document(StTransform::from_scale(Vec2::new(0.0, 1.0)));

        assert_eq!(
            sys.effective(Stage::Framebuffer, Stage::Visual),
            Err(TransformError::UnsupportedTransform)
        );
    }

    #[test]
    fn effective_is_recomputed_after_reconfigure() {
        let mut sys = configured(800.0, 800.0, 1.0);
        let before = sys.effective(Stage::Document, Stage::Framebuffer).unwrap();

        sys.auto_configure(Viewport::new(400.0, 400.0), 1.0);
        let after = sys.effective(Stage::Document, Stage::Framebuffer).unwrap();

        assert_ne!(before, after);
        assert_eq!(after.map(Vec2::zero()), Vec2::new(0.0, 400.0));
    }

    // ── clip-bounds re-derivation on resize ───────────────────────────────

    #[test]
    fn reference_rect_rederives_consistently_across_resize() {
        // A visual translated to (400, 50) with reference region
        // [50, -15, 250, 30] in its own space.
        let reference = Rect::new(50.0, -15.0, 250.0, 30.0);
        let mut sys = TransformSystem::new();
        sys.set_visual_to_document(StTransform::from_translate(Vec2::new(400.0, 50.0)));

        sys.auto_configure(Viewport::new(800.0, 800.0), 1.0);
        let tr = sys.effective(Stage::Visual, Stage::Framebuffer).unwrap();
        assert_eq!(tr.map_rect(reference), Rect::new(450.0, 735.0, 250.0, 30.0));

        sys.auto_configure(Viewport::new(400.0, 400.0), 1.0);
        let tr = sys.effective(Stage::Visual, Stage::Framebuffer).unwrap();
        assert_eq!(tr.map_rect(reference), Rect::new(450.0, 335.0, 250.0, 30.0));
    }
}
