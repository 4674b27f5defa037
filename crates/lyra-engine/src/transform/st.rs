use std::ops::Mul;

use crate::coords::{Rect, Vec2};

use super::TransformError;

/// Scale-then-translate transform: `map(p) = p * scale + translate`.
///
/// A pure value type with no side effects. Composition is via `Mul`:
/// `a * b` maps through `b` first, then `a`, mirroring function composition.
/// Composition is associative and `IDENTITY` is its unit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StTransform {
    pub scale: Vec2,
    pub translate: Vec2,
}

impl StTransform {
    pub const IDENTITY: StTransform = StTransform {
        scale: Vec2::splat(1.0),
        translate: Vec2::zero(),
    };

    #[inline]
    pub const fn new(scale: Vec2, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    #[inline]
    pub const fn from_scale(scale: Vec2) -> Self {
        Self {
            scale,
            translate: Vec2::zero(),
        }
    }

    #[inline]
    pub const fn from_translate(translate: Vec2) -> Self {
        Self {
            scale: Vec2::splat(1.0),
            translate,
        }
    }

    /// Applies scale, then translate.
    #[inline]
    pub fn map(self, p: Vec2) -> Vec2 {
        p * self.scale + self.translate
    }

    /// Maps a rect corner-wise and normalizes.
    ///
    /// Negative scale axes flip the rect; normalization keeps the result's
    /// extents non-negative.
    #[inline]
    pub fn map_rect(self, r: Rect) -> Rect {
        Rect::from_corners(self.map(r.min()), self.map(r.max()))
    }

    /// Returns the inverse mapping.
    ///
    /// Fails when either scale axis is zero: the mapping collapses an axis
    /// and cannot be undone.
    pub fn inverse(self) -> Result<StTransform, TransformError> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return Err(TransformError::UnsupportedTransform);
        }

        let inv_scale = Vec2::new(1.0 / self.scale.x, 1.0 / self.scale.y);
        Ok(StTransform {
            scale: inv_scale,
            translate: -self.translate * inv_scale,
        })
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.scale.is_finite() && self.translate.is_finite()
    }
}

impl Default for StTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `a * b` applies `b` first, then `a`.
impl Mul for StTransform {
    type Output = StTransform;

    #[inline]
    fn mul(self, rhs: StTransform) -> StTransform {
        StTransform {
            scale: self.scale * rhs.scale,
            translate: self.scale * rhs.translate + self.translate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn st(sx: f32, sy: f32, tx: f32, ty: f32) -> StTransform {
        StTransform::new(Vec2::new(sx, sy), Vec2::new(tx, ty))
    }

    // ── map / compose ─────────────────────────────────────────────────────

    #[test]
    fn map_scales_then_translates() {
        let t = st(2.0, 3.0, 10.0, -5.0);
        assert_eq!(t.map(Vec2::new(1.0, 1.0)), Vec2::new(12.0, -2.0));
    }

    #[test]
    fn identity_maps_points_unchanged() {
        let p = Vec2::new(7.5, -3.25);
        assert_eq!(StTransform::IDENTITY.map(p), p);
    }

    #[test]
    fn compose_applies_rhs_first() {
        let a = st(2.0, 2.0, 100.0, 0.0);
        let b = st(1.0, 1.0, 5.0, 5.0);
        // b first: (1,1) -> (6,6); then a: (112, 12).
        assert_eq!((a * b).map(Vec2::new(1.0, 1.0)), Vec2::new(112.0, 12.0));
    }

    #[test]
    fn compose_is_associative() {
        let a = st(2.0, 0.5, 3.0, -1.0);
        let b = st(-1.0, 4.0, 0.0, 7.0);
        let c = st(0.25, 1.0, -6.0, 2.0);

        for p in [Vec2::zero(), Vec2::new(1.0, 1.0), Vec2::new(-13.5, 42.0)] {
            assert!(close(((a * b) * c).map(p), (a * (b * c)).map(p)));
        }
    }

    #[test]
    fn compose_with_identity_is_noop() {
        let t = st(3.0, -2.0, 8.0, 1.0);
        let p = Vec2::new(2.0, 2.0);
        assert_eq!((t * StTransform::IDENTITY).map(p), t.map(p));
        assert_eq!((StTransform::IDENTITY * t).map(p), t.map(p));
    }

    // ── inverse ───────────────────────────────────────────────────────────

    #[test]
    fn inverse_round_trips_points() {
        let t = st(2.0, -0.5, 40.0, 800.0);
        let inv = t.inverse().unwrap();

        for p in [Vec2::zero(), Vec2::new(350.0, 20.0), Vec2::new(-7.0, 3.0)] {
            assert!(close(inv.map(t.map(p)), p));
            assert!(close(t.map(inv.map(p)), p));
        }
    }

    #[test]
    fn inverse_of_degenerate_scale_fails() {
        assert_eq!(
            st(0.0, 1.0, 0.0, 0.0).inverse(),
            Err(TransformError::UnsupportedTransform)
        );
        assert_eq!(
            st(1.0, 0.0, 2.0, 2.0).inverse(),
            Err(TransformError::UnsupportedTransform)
        );
    }

    // ── map_rect ──────────────────────────────────────────────────────────

    #[test]
    fn map_rect_translates() {
        let t = StTransform::from_translate(Vec2::new(400.0, 50.0));
        let r = t.map_rect(Rect::new(50.0, -15.0, 250.0, 30.0));
        assert_eq!(r, Rect::new(450.0, 35.0, 250.0, 30.0));
    }

    #[test]
    fn map_rect_normalizes_under_flip() {
        // Negative y scale flips the rect; extents stay positive.
        let t = st(1.0, -1.0, 0.0, 800.0);
        let r = t.map_rect(Rect::new(450.0, 35.0, 250.0, 30.0));
        assert_eq!(r, Rect::new(450.0, 735.0, 250.0, 30.0));
    }
}
