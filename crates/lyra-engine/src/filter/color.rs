use crate::paint::Color;

use super::{Filter, FilterError, Hook};

/// Componentwise color tint.
///
/// Multiplies the output color by a fixed RGBA vector. Multiplies rather than
/// replaces, so tints compose with other filters and with the visual's own
/// color; a `(1, 0, 0, 1)` tint keeps only the red channel, the classic
/// anaglyph half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorFilter {
    rgba: Color,
}

impl ColorFilter {
    /// Creates a tint from a multiplier color.
    ///
    /// Channels may exceed 1 (brightening is legal) but must be finite.
    pub fn new(rgba: Color) -> Result<Self, FilterError> {
        if !rgba.is_finite() {
            return Err(FilterError::InvalidFilterParameter {
                filter: "color",
                reason: "tint channels must be finite",
            });
        }
        Ok(Self { rgba })
    }

    #[inline]
    pub fn rgba(&self) -> Color {
        self.rgba
    }
}

impl Filter for ColorFilter {
    fn hook(&self) -> Hook {
        Hook::FragmentPost
    }

    fn snippet(&self) -> String {
        "color = color * params;".to_string()
    }

    fn params(&self) -> [f32; 4] {
        self.rgba.to_array()
    }
}
