use std::cell::Cell;

use crate::coords::Rect;

use super::{Filter, FilterError, Hook};

/// Rectangular fragment clip.
///
/// Discards every fragment whose framebuffer coordinate falls outside
/// `bounds` (half-open test, matching [`Rect::contains`]). Bounds live in
/// framebuffer space (physical pixels, origin bottom-left), so drivers
/// typically derive them by mapping a reference region through a
/// [`TransformSystem`](crate::transform::TransformSystem) and re-derive them
/// after every resize.
///
/// Bounds are interior-mutable: a single clipper shared by several visuals is
/// updated in one place via [`set_bounds`](Clipper::set_bounds), the sole
/// mutation path, and the new bounds take effect on the next draw.
pub struct Clipper {
    bounds: Cell<Rect>,
}

impl Clipper {
    /// Creates a clipper with the given framebuffer-space bounds.
    ///
    /// Zero-area and non-finite rects are rejected: an empty clip would
    /// silently discard everything, which is never what a driver means.
    pub fn new(bounds: Rect) -> Result<Self, FilterError> {
        Ok(Self {
            bounds: Cell::new(Self::validated(bounds)?),
        })
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    /// Replaces the clip bounds. Same validation as [`Clipper::new`].
    pub fn set_bounds(&self, bounds: Rect) -> Result<(), FilterError> {
        self.bounds.set(Self::validated(bounds)?);
        Ok(())
    }

    fn validated(bounds: Rect) -> Result<Rect, FilterError> {
        if !bounds.is_finite() {
            return Err(FilterError::InvalidFilterParameter {
                filter: "clipper",
                reason: "bounds must be finite",
            });
        }
        let bounds = bounds.normalized();
        if bounds.is_empty() {
            return Err(FilterError::InvalidFilterParameter {
                filter: "clipper",
                reason: "bounds must have positive area",
            });
        }
        Ok(bounds)
    }
}

impl Filter for Clipper {
    fn hook(&self) -> Hook {
        Hook::FragmentPost
    }

    fn snippet(&self) -> String {
        // params = (x, y, w, h) of the clip rect, framebuffer space.
        "if (coord.x < params.x || coord.x >= params.x + params.z ||\n    \
            coord.y < params.y || coord.y >= params.y + params.w) {\n    \
            discard;\n\
        }"
        .to_string()
    }

    fn params(&self) -> [f32; 4] {
        let b = self.bounds.get();
        [b.origin.x, b.origin.y, b.size.x, b.size.y]
    }
}

#[cfg(test)]
mod tests {
    use crate::coords::Vec2;

    use super::*;

    #[test]
    fn rejects_zero_area_bounds() {
        assert!(Clipper::new(Rect::new(0.0, 0.0, 0.0, 50.0)).is_err());
        assert!(Clipper::new(Rect::new(0.0, 0.0, 200.0, 0.0)).is_err());
    }

    #[test]
    fn rejects_non_finite_bounds() {
        assert!(Clipper::new(Rect::new(f32::NAN, 0.0, 10.0, 10.0)).is_err());
        assert!(Clipper::new(Rect::new(0.0, 0.0, f32::INFINITY, 10.0)).is_err());
    }

    #[test]
    fn normalizes_negative_extents() {
        let c = Clipper::new(Rect::new(10.0, 10.0, -4.0, 5.0)).unwrap();
        assert_eq!(c.bounds(), Rect::new(6.0, 10.0, 4.0, 5.0));
    }

    #[test]
    fn set_bounds_validates_and_applies() {
        let c = Clipper::new(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();

        assert!(c.set_bounds(Rect::new(1.0, 1.0, 0.0, 1.0)).is_err());
        assert_eq!(c.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));

        c.set_bounds(Rect::new(5.0, 5.0, 20.0, 20.0)).unwrap();
        assert_eq!(c.bounds(), Rect::new(5.0, 5.0, 20.0, 20.0));
    }

    #[test]
    fn params_mirror_current_bounds() {
        let c = Clipper::new(Rect::new(500.0, 725.0, 200.0, 50.0)).unwrap();
        assert_eq!(c.params(), [500.0, 725.0, 200.0, 50.0]);

        c.set_bounds(Rect::new(450.0, 335.0, 250.0, 30.0)).unwrap();
        assert_eq!(c.params(), [450.0, 335.0, 250.0, 30.0]);
    }

    #[test]
    fn clip_test_semantics_match_rect_containment() {
        // The snippet's keep/discard test is Rect::contains over the bounds.
        let bounds = Rect::new(500.0, 725.0, 200.0, 50.0);
        assert!(bounds.contains(Vec2::new(600.0, 740.0)));
        assert!(!bounds.contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn snippet_discards_outside_params_rect() {
        let c = Clipper::new(Rect::new(500.0, 725.0, 200.0, 50.0)).unwrap();
        let s = c.snippet();
        assert!(s.contains("discard"));
        assert!(s.contains("params.x + params.z"));
        assert!(s.contains("params.y + params.w"));
    }
}
