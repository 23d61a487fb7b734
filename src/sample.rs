//! Flattening images into packed pixels, with optional cropping and downscaling.

use crate::{Error, PackedColor, MAX_PIXELS};
use image::{
    imageops::{self, FilterType},
    GenericImageView, Pixel,
};

/// The default number of pixels to downscale images to before quantization (`112 × 112`).
pub const DEFAULT_RESIZE_AREA: u32 = 112 * 112;

/// A rectangular region of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// The left edge of the region.
    pub x: u32,
    /// The top edge of the region.
    pub y: u32,
    /// The width of the region.
    pub width: u32,
    /// The height of the region.
    pub height: u32,
}

impl Region {
    /// Creates a new [`Region`].
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Checks that the region is nonempty and lies within an image of the given dimensions.
    fn check_bounds(self, (image_width, image_height): (u32, u32)) -> Result<(), Error> {
        let Self { x, y, width, height } = self;
        if width == 0 || height == 0 {
            Err(Error::EmptyRegion)
        } else if u64::from(x) + u64::from(width) > u64::from(image_width)
            || u64::from(y) + u64::from(height) > u64::from(image_height)
        {
            Err(Error::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                image_width,
                image_height,
            })
        } else {
            Ok(())
        }
    }
}

/// How to downscale an image before sampling its pixels.
///
/// Images are only ever shrunk, never enlarged.
/// Downscaling uses nearest neighbor sampling so that no new colors are introduced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resize {
    /// Use every pixel of the image.
    None,
    /// Shrink the image so that it has at most (roughly) this many pixels,
    /// keeping the aspect ratio.
    Area(u32),
    /// Scale each dimension by this ratio, rounding up.
    Ratio(f64),
}

impl Default for Resize {
    fn default() -> Self {
        Self::Area(DEFAULT_RESIZE_AREA)
    }
}

impl Resize {
    /// Returns the scaled dimensions for an image of the given dimensions,
    /// or `None` if the image should be left as is.
    #[allow(clippy::cast_precision_loss)]
    fn dimensions(self, (width, height): (u32, u32)) -> Result<Option<(u32, u32)>, Error> {
        let ratio = match self {
            Resize::None => return Ok(None),
            Resize::Area(0) => return Err(Error::InvalidScale(0.0)),
            Resize::Area(area) => {
                let pixels = u64::from(width) * u64::from(height);
                if pixels <= u64::from(area) {
                    return Ok(None);
                }
                (f64::from(area) / pixels as f64).sqrt()
            }
            Resize::Ratio(ratio) => {
                if !ratio.is_finite() || ratio <= 0.0 {
                    return Err(Error::InvalidScale(ratio));
                }
                ratio
            }
        };

        if ratio >= 1.0 {
            Ok(None)
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let scale = |n: u32| ((f64::from(n) * ratio).ceil() as u32).max(1);
            Ok(Some((scale(width), scale(height))))
        }
    }
}

/// Returns all of the pixels of the image in row-major order, discarding alpha.
///
/// # Errors
/// Returns [`Error::AboveMaxLen`] if the image has more than [`MAX_PIXELS`] pixels.
pub fn pixels<I, P>(image: &I) -> Result<Vec<PackedColor>, Error>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    if u64::from(width) * u64::from(height) > u64::from(MAX_PIXELS) {
        return Err(Error::AboveMaxLen(MAX_PIXELS));
    }

    Ok(image
        .pixels()
        .map(|(_, _, pixel)| PackedColor::from(pixel.to_rgb()))
        .collect())
}

/// Downscales the image according to `resize` and returns its pixels.
fn resized_pixels<I, P>(image: &I, resize: Resize) -> Result<Vec<PackedColor>, Error>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = u8> + 'static,
{
    match resize.dimensions(image.dimensions())? {
        Some((width, height)) => {
            log::debug!(
                "downscaling {}x{} image to {width}x{height}",
                image.width(),
                image.height()
            );
            pixels(&imageops::resize(image, width, height, FilterType::Nearest))
        }
        None => pixels(image),
    }
}

/// Returns the pixels of the image after cropping it to `region` (if any)
/// and then downscaling it according to `resize`.
///
/// # Errors
/// Returns an error if the region is empty or out of bounds, if `resize` is invalid,
/// or if the sampled image has more than [`MAX_PIXELS`] pixels.
pub fn sample<I, P>(
    image: &I,
    region: Option<Region>,
    resize: Resize,
) -> Result<Vec<PackedColor>, Error>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = u8> + 'static,
{
    if let Some(region) = region {
        region.check_bounds(image.dimensions())?;
        let Region { x, y, width, height } = region;
        resized_pixels(&*image.view(x, y, width, height), resize)
    } else {
        resized_pixels(image, resize)
    }
}
