//! The swatch type returned by the quantizer.

use crate::{ContrastOptions, PackedColor};
use palette::{encoding, Hsl};

/// A representative color of an image.
///
/// `population` is the number of pixels represented by the swatch, and `ratio` is
/// `population` divided by the total number of pixels in the source image.
/// Ratios across a palette need not sum to `1.0`, since filtered colors are never counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    /// The color of the swatch.
    color: PackedColor,
    /// The number of pixels that map to this swatch.
    population: u32,
    /// `population` as a fraction of all pixels in the source image.
    ratio: f64,
}

impl Swatch {
    /// Creates a new [`Swatch`], computing its ratio over `total_count` pixels.
    ///
    /// A `total_count` of `0` gives a ratio of `0.0`.
    #[must_use]
    pub fn new(color: PackedColor, population: u32, total_count: u32) -> Self {
        let ratio = if total_count == 0 {
            0.0
        } else {
            f64::from(population) / f64::from(total_count)
        };

        Self { color, population, ratio }
    }

    /// The color of the swatch.
    #[must_use]
    pub const fn color(&self) -> PackedColor {
        self.color
    }

    /// The number of pixels represented by the swatch.
    #[must_use]
    pub const fn population(&self) -> u32 {
        self.population
    }

    /// The proportion of the image represented by the swatch.
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }

    /// The color as a `#rrggbb` string.
    #[must_use]
    pub fn hex(&self) -> String {
        self.color.to_string()
    }

    /// The hue, saturation, and lightness of the color.
    #[must_use]
    pub fn hsl(&self) -> Hsl<encoding::Srgb, f64> {
        self.color.hsl()
    }

    /// Black or white, whichever is readable as title text on this swatch.
    #[must_use]
    pub fn title_text_color(&self, options: ContrastOptions) -> PackedColor {
        self.color.text_color(options.title)
    }

    /// Black or white, whichever is readable as body text on this swatch.
    #[must_use]
    pub fn body_text_color(&self, options: ContrastOptions) -> PackedColor {
        self.color.text_color(options.body)
    }
}
