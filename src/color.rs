//! The packed 24-bit color type and the color math used by filters and swatches.

use crate::Error;
use palette::{encoding, Hsl, IntoColor, LinSrgb, Srgb};
use std::{fmt::Display, str::FromStr};

/// A 24-bit RGB color packed into a `u32` as `0x00RRGGBB`.
///
/// Ordering and hashing follow the packed integer value,
/// so sorting packed colors sorts by red, then green, then blue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PackedColor(u32);

impl PackedColor {
    /// Pure black, `#000000`.
    pub const BLACK: Self = Self(0x00_00_00);

    /// Pure white, `#ffffff`.
    pub const WHITE: Self = Self(0xff_ff_ff);

    /// Packs the given red, green, and blue components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Creates a [`PackedColor`] from a raw `0xRRGGBB` value, discarding any bits above the low 24.
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    /// Creates a [`PackedColor`] from an array of `[red, green, blue]` components.
    #[must_use]
    pub const fn from_components([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }

    /// Returns the raw `0xRRGGBB` value.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// Returns the `[red, green, blue]` components.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn components(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// The red component.
    #[must_use]
    pub const fn red(self) -> u8 {
        self.components()[0]
    }

    /// The green component.
    #[must_use]
    pub const fn green(self) -> u8 {
        self.components()[1]
    }

    /// The blue component.
    #[must_use]
    pub const fn blue(self) -> u8 {
        self.components()[2]
    }

    /// Converts the color to hue, saturation, and lightness.
    ///
    /// Saturation and lightness are in `0.0..=1.0`.
    #[must_use]
    pub fn hsl(self) -> Hsl<encoding::Srgb, f64> {
        Srgb::from(self).into_format::<f64>().into_color()
    }

    /// The WCAG relative luminance of the color, in `0.0..=1.0`.
    #[must_use]
    pub fn relative_luminance(self) -> f64 {
        let linear: LinSrgb<f64> = Srgb::from(self).into_format::<f64>().into_linear();
        0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
    }

    /// Returns white if white text on this color meets `min_contrast`, otherwise black.
    #[must_use]
    pub fn text_color(self, min_contrast: f64) -> Self {
        if contrast_ratio(Self::WHITE, self) >= min_contrast {
            Self::WHITE
        } else {
            Self::BLACK
        }
    }
}

/// The WCAG contrast ratio between two colors, in `1.0..=21.0`.
///
/// This is WCAG's `(lighter + 0.05) / (darker + 0.05)` form, not a bare ratio of luminances,
/// so white body text is only chosen for backgrounds with a luminance of about `0.183` or less.
/// The order of the arguments does not matter.
#[must_use]
pub fn contrast_ratio(foreground: PackedColor, background: PackedColor) -> f64 {
    let a = foreground.relative_luminance();
    let b = background.relative_luminance();
    let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Minimum contrast ratios used to pick a readable text color for a swatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastOptions {
    /// The minimum contrast for title (large) text.
    pub title: f64,
    /// The minimum contrast for body text.
    pub body: f64,
}

impl ContrastOptions {
    /// The default minimum contrast for title text.
    pub const MIN_CONTRAST_TITLE_TEXT: f64 = 3.0;

    /// The default minimum contrast for body text.
    pub const MIN_CONTRAST_BODY_TEXT: f64 = 4.5;

    /// Creates a new [`ContrastOptions`] with the default thresholds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            title: Self::MIN_CONTRAST_TITLE_TEXT,
            body: Self::MIN_CONTRAST_BODY_TEXT,
        }
    }
}

impl Default for ContrastOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PackedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl FromStr for PackedColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            u32::from_str_radix(hex, 16)
                .map(Self)
                .map_err(|_| Error::InvalidHex)
        } else {
            Err(Error::InvalidHex)
        }
    }
}

impl From<u32> for PackedColor {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl From<PackedColor> for u32 {
    fn from(color: PackedColor) -> Self {
        color.into_inner()
    }
}

impl From<[u8; 3]> for PackedColor {
    fn from(components: [u8; 3]) -> Self {
        Self::from_components(components)
    }
}

impl From<PackedColor> for [u8; 3] {
    fn from(color: PackedColor) -> Self {
        color.components()
    }
}

impl From<Srgb<u8>> for PackedColor {
    fn from(srgb: Srgb<u8>) -> Self {
        Self::from_components(srgb.into())
    }
}

impl From<PackedColor> for Srgb<u8> {
    fn from(color: PackedColor) -> Self {
        Srgb::from(color.components())
    }
}

#[cfg(feature = "image")]
impl From<image::Rgb<u8>> for PackedColor {
    fn from(image::Rgb(components): image::Rgb<u8>) -> Self {
        Self::from_components(components)
    }
}

#[cfg(feature = "image")]
impl From<image::Rgba<u8>> for PackedColor {
    fn from(image::Rgba([r, g, b, _]): image::Rgba<u8>) -> Self {
        Self::new(r, g, b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack() {
        let color = PackedColor::new(0xba, 0xda, 0x55);
        assert_eq!(color.into_inner(), 0x00ba_da55);
        assert_eq!(color.components(), [0xba, 0xda, 0x55]);
        assert_eq!((color.red(), color.green(), color.blue()), (0xba, 0xda, 0x55));
        assert_eq!(PackedColor::from_u32(0xff12_3456).into_inner(), 0x12_3456);
    }

    #[test]
    fn ordering_follows_packed_value() {
        let mut colors = vec![
            PackedColor::new(0, 0, 255),
            PackedColor::new(255, 0, 0),
            PackedColor::new(0, 255, 0),
        ];
        colors.sort();
        assert_eq!(
            colors,
            vec![
                PackedColor::new(0, 0, 255),
                PackedColor::new(0, 255, 0),
                PackedColor::new(255, 0, 0),
            ]
        );
    }

    #[test]
    fn hex_round_trip() {
        let color = PackedColor::new(0xba, 0xda, 0x55);
        assert_eq!(color.to_string(), "#bada55");
        assert_eq!("#bada55".parse::<PackedColor>(), Ok(color));
        assert_eq!("BADA55".parse::<PackedColor>(), Ok(color));
        assert_eq!("#bada5".parse::<PackedColor>(), Err(Error::InvalidHex));
        assert_eq!("#+bada5".parse::<PackedColor>(), Err(Error::InvalidHex));
        assert_eq!(PackedColor::BLACK.to_string(), "#000000");
    }

    #[test]
    fn lightness_of_primaries() {
        assert!((PackedColor::new(255, 0, 0).hsl().lightness - 0.5).abs() < 1e-9);
        assert!(PackedColor::WHITE.hsl().lightness > 0.999);
        assert!(PackedColor::BLACK.hsl().lightness < 1e-9);
    }

    #[test]
    fn luminance_and_contrast() {
        assert!(PackedColor::BLACK.relative_luminance().abs() < 1e-9);
        assert!((PackedColor::WHITE.relative_luminance() - 1.0).abs() < 1e-9);
        let max = contrast_ratio(PackedColor::WHITE, PackedColor::BLACK);
        assert!((max - 21.0).abs() < 1e-9);
        let same = contrast_ratio(PackedColor::new(10, 20, 30), PackedColor::new(10, 20, 30));
        assert_eq!(same, 1.0);
    }

    #[test]
    fn text_color_picks_readable_side() {
        let options = ContrastOptions::default();
        assert_eq!(PackedColor::new(0, 0, 128).text_color(options.body), PackedColor::WHITE);
        assert_eq!(PackedColor::new(255, 255, 0).text_color(options.body), PackedColor::BLACK);
    }

    #[test]
    fn body_text_cutoff_uses_offsets() {
        let body = ContrastOptions::MIN_CONTRAST_BODY_TEXT;

        // luminance ~0.20, which a bare luminance ratio would pair with white
        let gray = PackedColor::new(124, 124, 124);
        assert!((gray.relative_luminance() - 0.2).abs() < 0.01);
        assert!(contrast_ratio(PackedColor::WHITE, gray) < body);
        assert_eq!(gray.text_color(body), PackedColor::BLACK);

        // luminance ~0.16
        let darker = PackedColor::new(110, 110, 110);
        assert!(contrast_ratio(PackedColor::WHITE, darker) >= body);
        assert_eq!(darker.text_color(body), PackedColor::WHITE);
    }

    #[test]
    fn srgb_conversions() {
        let srgb = Srgb::new(1u8, 2, 3);
        let color = PackedColor::from(srgb);
        assert_eq!(Srgb::<u8>::from(color), srgb);
    }
}
