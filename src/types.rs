//! Contains various types needed across the crate.

use crate::{PackedColor, MAX_PIXELS};
use std::{fmt::Display, ops::Deref};

/// The error type for all fallible operations in this crate.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    /// The requested palette size was zero.
    #[error("palette size must be at least 1, got {0}")]
    InvalidPaletteSize(u32),
    /// The length of an input was above the maximum supported value.
    ///
    /// The inner value is the maximum supported value.
    #[error("above the maximum length of {0}")]
    AboveMaxLen(u32),
    /// A crop region did not lie within the bounds of the image.
    #[error(
        "region {width}x{height} at ({x}, {y}) is outside the {image_width}x{image_height} image"
    )]
    RegionOutOfBounds {
        /// The left edge of the region.
        x: u32,
        /// The top edge of the region.
        y: u32,
        /// The width of the region.
        width: u32,
        /// The height of the region.
        height: u32,
        /// The width of the image.
        image_width: u32,
        /// The height of the image.
        image_height: u32,
    },
    /// A crop region had a zero width or height.
    #[error("region must have a nonzero width and height")]
    EmptyRegion,
    /// A scale ratio or target area was not finite and positive.
    #[error("invalid scale factor {0}")]
    InvalidScale(f64),
    /// A string could not be parsed as a `#rrggbb` color.
    #[error("invalid hex color")]
    InvalidHex,
}

/// A simple new type wrapper around `&'a [PackedColor]` with the invariant that the length of the
/// inner slice must not be greater than [`MAX_PIXELS`].
///
/// # Examples
/// Use `try_into` or [`ColorSlice::from_truncated`] to create [`ColorSlice`]s.
/// ```
/// # use swatchcut::{ColorSlice, Error, PackedColor};
/// # fn main() -> Result<(), Error> {
/// let pixels = vec![PackedColor::new(255, 0, 0)];
/// let colors: ColorSlice = pixels.as_slice().try_into()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorSlice<'a>(&'a [PackedColor]);

impl<'a> ColorSlice<'a> {
    /// Creates a [`ColorSlice`] without ensuring that its length
    /// is less than or equal to [`MAX_PIXELS`].
    #[allow(unused)]
    pub(crate) const fn new_unchecked(colors: &'a [PackedColor]) -> Self {
        Self(colors)
    }

    /// Creates a new [`ColorSlice`] by truncating the input slice to a max length of [`MAX_PIXELS`].
    #[must_use]
    pub fn from_truncated(colors: &'a [PackedColor]) -> Self {
        Self(&colors[..colors.len().min(MAX_PIXELS as usize)])
    }

    /// Returns the length of the slice as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn num_colors(&self) -> u32 {
        self.0.len() as u32
    }
}

impl<'a> AsRef<[PackedColor]> for ColorSlice<'a> {
    fn as_ref(&self) -> &[PackedColor] {
        self
    }
}

impl<'a> Deref for ColorSlice<'a> {
    type Target = [PackedColor];

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<'a> From<ColorSlice<'a>> for &'a [PackedColor] {
    fn from(val: ColorSlice<'a>) -> Self {
        val.0
    }
}

impl<'a> TryFrom<&'a [PackedColor]> for ColorSlice<'a> {
    type Error = Error;

    fn try_from(slice: &'a [PackedColor]) -> Result<Self, Self::Error> {
        if slice.len() <= MAX_PIXELS as usize {
            Ok(Self(slice))
        } else {
            Err(Error::AboveMaxLen(MAX_PIXELS))
        }
    }
}

/// This type is used to specify the maximum number of swatches to extract.
///
/// This is a simple new type wrapper around `u32` with the invariant that it must be nonzero.
/// A size of `0` is rejected with [`Error::InvalidPaletteSize`].
/// There is no upper bound: a palette size above the number of distinct colors
/// simply returns every color.
///
/// # Examples
/// ```
/// # use swatchcut::{Error, PaletteSize};
/// # fn main() -> Result<(), Error> {
/// let size = PaletteSize::try_from(16u16)?;
/// let size: PaletteSize = 1024u32.try_into()?;
/// assert_eq!(PaletteSize::from_clamped(0), PaletteSize::MIN);
/// assert!(PaletteSize::try_from(0u16).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PaletteSize(u32);

impl PaletteSize {
    /// The smallest supported palette size, a single swatch.
    pub const MIN: Self = Self(1);

    /// The largest representable palette size.
    pub const MAX: Self = Self(u32::MAX);

    /// The default palette size of `16`.
    pub const DEFAULT: Self = Self(16);

    /// Gets the inner `u32` value.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// Creates a [`PaletteSize`], turning a `0` into [`PaletteSize::MIN`].
    #[must_use]
    pub const fn from_clamped(value: u32) -> Self {
        if value == 0 {
            Self::MIN
        } else {
            Self(value)
        }
    }
}

impl Default for PaletteSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<PaletteSize> for u32 {
    fn from(val: PaletteSize) -> Self {
        val.into_inner()
    }
}

impl From<PaletteSize> for usize {
    fn from(val: PaletteSize) -> Self {
        usize::try_from(val.into_inner()).unwrap_or(usize::MAX)
    }
}

impl TryFrom<u32> for PaletteSize {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(Error::InvalidPaletteSize(value))
        } else {
            Ok(PaletteSize(value))
        }
    }
}

impl TryFrom<u16> for PaletteSize {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        u32::from(value).try_into()
    }
}

impl TryFrom<u8> for PaletteSize {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        u32::from(value).try_into()
    }
}

impl Display for PaletteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn palette_size_bounds() {
        assert_eq!(PaletteSize::try_from(0u32), Err(Error::InvalidPaletteSize(0)));
        assert_eq!(PaletteSize::try_from(1u8), Ok(PaletteSize::MIN));
        assert_eq!(PaletteSize::try_from(257u32).map(u32::from), Ok(257));
        assert_eq!(PaletteSize::try_from(u32::MAX), Ok(PaletteSize::MAX));
        assert_eq!(usize::from(PaletteSize::try_from(300u16).unwrap()), 300);
        assert_eq!(PaletteSize::from_clamped(0), PaletteSize::MIN);
        assert_eq!(PaletteSize::from_clamped(5000).into_inner(), 5000);
        assert_eq!(PaletteSize::default().into_inner(), 16);
    }

    #[test]
    fn invalid_palette_size_message() {
        let message = Error::InvalidPaletteSize(0).to_string();
        assert_eq!(message, "palette size must be at least 1, got 0");
    }

    #[test]
    fn color_slice_from_slice() {
        let pixels = [PackedColor::new(1, 2, 3); 4];
        let colors = ColorSlice::try_from(pixels.as_slice());
        assert_eq!(colors.map(|c| c.num_colors()), Ok(4));
        assert_eq!(ColorSlice::from_truncated(&pixels).len(), 4);
    }
}
