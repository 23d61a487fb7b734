//! Predicates that reject colors before and after quantization.

use crate::PackedColor;

/// An interface for rejecting colors that should not become swatches.
///
/// Filters must be pure: the same color always gives the same answer.
pub trait Filter {
    /// Returns `true` if the given color should be excluded.
    fn should_ignore(&self, color: PackedColor) -> bool;
}

impl<F: Fn(PackedColor) -> bool> Filter for F {
    #[inline]
    fn should_ignore(&self, color: PackedColor) -> bool {
        self(color)
    }
}

/// A filter rejecting colors that are too close to pure black or pure white.
///
/// Such colors rarely make usable accent colors.
///
/// # Examples
/// ```
/// # use swatchcut::{Filter, LightnessFilter, PackedColor};
/// let filter = LightnessFilter::new();
/// assert!(filter.should_ignore(PackedColor::WHITE));
/// assert!(!filter.should_ignore(PackedColor::new(255, 0, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightnessFilter {
    /// Colors with a lightness at or below this value are ignored.
    pub black_max_lightness: f64,
    /// Colors with a lightness at or above this value are ignored.
    pub white_min_lightness: f64,
}

impl LightnessFilter {
    /// The default maximum lightness of near-black colors.
    pub const BLACK_MAX_LIGHTNESS: f64 = 0.05;

    /// The default minimum lightness of near-white colors.
    pub const WHITE_MIN_LIGHTNESS: f64 = 0.95;

    /// Creates a new [`LightnessFilter`] with the default thresholds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            black_max_lightness: Self::BLACK_MAX_LIGHTNESS,
            white_min_lightness: Self::WHITE_MIN_LIGHTNESS,
        }
    }

    /// Sets the lightness at or below which colors are considered black.
    #[must_use]
    pub const fn black_max_lightness(mut self, lightness: f64) -> Self {
        self.black_max_lightness = lightness;
        self
    }

    /// Sets the lightness at or above which colors are considered white.
    #[must_use]
    pub const fn white_min_lightness(mut self, lightness: f64) -> Self {
        self.white_min_lightness = lightness;
        self
    }
}

impl Default for LightnessFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LightnessFilter {
    fn should_ignore(&self, color: PackedColor) -> bool {
        let lightness = color.hsl().lightness;
        lightness <= self.black_max_lightness || lightness >= self.white_min_lightness
    }
}

/// A filter that accepts every color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl Filter for NoFilter {
    #[inline]
    fn should_ignore(&self, _: PackedColor) -> bool {
        false
    }
}
