//! Contains the [`SwatchPipeline`] builder struct for the high level API.

use crate::{
    color_cut,
    sample::{self, Region, Resize},
    ColorHistogram, ColorSlice, Error, LightnessFilter, PackedColor, PaletteSize, Swatch,
};
use image::{GenericImageView, Pixel};

/// A builder struct to specify options for extracting swatches from an image.
///
/// By default, the image is downscaled to roughly `112 × 112` pixels,
/// near-black and near-white colors are ignored,
/// and at most [`PaletteSize::DEFAULT`] swatches are returned.
///
/// # Examples
/// ```no_run
/// # use swatchcut::{SwatchPipeline, PaletteSize, sample::{Region, Resize}};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
///
/// let swatches = SwatchPipeline::new(&img)
///     .palette_size(PaletteSize::try_from(8u8)?)
///     .region(Region::new(0, 0, 64, 64))
///     .resize(Resize::None)
///     .swatches()?;
///
/// for swatch in swatches {
///     println!("{} {:.2}", swatch.hex(), swatch.ratio());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SwatchPipeline<'a, I> {
    /// The source image.
    image: &'a I,
    /// The maximum number of swatches.
    k: PaletteSize,
    /// The part of the image to sample, or `None` for the whole image.
    region: Option<Region>,
    /// How to downscale the image before sampling.
    resize: Resize,
    /// The filter for near-black and near-white colors.
    filter: LightnessFilter,
}

impl<'a, I> Clone for SwatchPipeline<'a, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I> Copy for SwatchPipeline<'a, I> {}

impl<'a, I, P> SwatchPipeline<'a, I>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = u8> + 'static,
{
    /// Creates a new [`SwatchPipeline`] over the given image with default options.
    #[must_use]
    pub fn new(image: &'a I) -> Self {
        Self {
            image,
            k: PaletteSize::default(),
            region: None,
            resize: Resize::default(),
            filter: LightnessFilter::default(),
        }
    }

    /// Sets the maximum number of swatches to return.
    ///
    /// The default is [`PaletteSize::DEFAULT`].
    #[must_use]
    pub fn palette_size(mut self, size: PaletteSize) -> Self {
        self.k = size;
        self
    }

    /// Only sample pixels from the given region of the image.
    ///
    /// The region is checked against the image once the pipeline is run.
    #[must_use]
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Sets how to downscale the image before quantization.
    ///
    /// The default is [`Resize::Area`] with [`DEFAULT_RESIZE_AREA`](sample::DEFAULT_RESIZE_AREA).
    #[must_use]
    pub fn resize(mut self, resize: Resize) -> Self {
        self.resize = resize;
        self
    }

    /// Sets the filter used to ignore near-black and near-white colors.
    #[must_use]
    pub fn filter(mut self, filter: LightnessFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Crops and downscales the image, returning the remaining pixels.
    fn sampled_pixels(&self) -> Result<Vec<PackedColor>, Error> {
        let pixels = sample::sample(self.image, self.region, self.resize)?;
        log::debug!("sampled {} pixels", pixels.len());
        Ok(pixels)
    }

    /// Runs the pipeline and returns the swatches, in no particular order.
    ///
    /// # Errors
    /// Returns an error if the region is empty or out of bounds or if the resize option is invalid.
    pub fn swatches(self) -> Result<Vec<Swatch>, Error> {
        let pixels = self.sampled_pixels()?;
        let histogram = ColorHistogram::new(ColorSlice::try_from(pixels.as_slice())?);
        Ok(color_cut::swatches(&histogram, self.k, &self.filter))
    }

    /// Runs the pipeline in parallel and returns the swatches, in no particular order.
    ///
    /// The output is the same as [`SwatchPipeline::swatches`].
    ///
    /// # Errors
    /// Returns an error if the region is empty or out of bounds or if the resize option is invalid.
    #[cfg(feature = "threads")]
    pub fn swatches_par(self) -> Result<Vec<Swatch>, Error> {
        let pixels = self.sampled_pixels()?;
        let histogram = ColorHistogram::new_par(ColorSlice::try_from(pixels.as_slice())?);
        Ok(color_cut::swatches(&histogram, self.k, &self.filter))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Left half red, right quarter green, and the rest white.
    fn test_image() -> RgbImage {
        RgbImage::from_fn(64, 32, |x, _| match x {
            0..=31 => Rgb([200, 30, 30]),
            32..=47 => Rgb([30, 180, 60]),
            _ => Rgb([255, 255, 255]),
        })
    }

    #[test]
    fn default_pipeline() {
        let image = test_image();
        let mut swatches = SwatchPipeline::new(&image).swatches().unwrap();
        swatches.sort_by_key(|s| std::cmp::Reverse(s.population()));

        assert_eq!(swatches.len(), 2);
        assert_eq!(swatches[0].color(), PackedColor::new(200, 30, 30));
        assert_eq!(swatches[0].ratio(), 0.5);
        assert_eq!(swatches[1].color(), PackedColor::new(30, 180, 60));
        assert_eq!(swatches[1].ratio(), 0.25);
    }

    #[test]
    fn custom_filter_keeps_white() {
        let image = test_image();
        let filter = LightnessFilter::new().white_min_lightness(1.1);
        let swatches = SwatchPipeline::new(&image)
            .filter(filter)
            .resize(Resize::None)
            .swatches()
            .unwrap();

        assert_eq!(swatches.len(), 3);
        assert!(swatches.iter().any(|s| s.color() == PackedColor::WHITE));
    }

    #[test]
    fn palette_size_limits_output() {
        let image = test_image();
        let swatches = SwatchPipeline::new(&image)
            .palette_size(PaletteSize::MIN)
            .swatches()
            .unwrap();

        assert_eq!(swatches.len(), 1);
        assert_eq!(swatches[0].population(), 32 * 32 + 16 * 32);
    }

    #[test]
    fn region_selects_pixels() {
        let image = test_image();
        let swatches = SwatchPipeline::new(&image)
            .region(Region::new(32, 0, 16, 32))
            .swatches()
            .unwrap();

        assert_eq!(swatches.len(), 1);
        assert_eq!(swatches[0].color(), PackedColor::new(30, 180, 60));
        assert_eq!(swatches[0].ratio(), 1.0);
    }

    #[test]
    fn invalid_options_are_errors() {
        let image = test_image();
        let pipeline = SwatchPipeline::new(&image);
        assert_eq!(
            pipeline.region(Region::new(0, 0, 0, 1)).swatches(),
            Err(Error::EmptyRegion)
        );
        assert!(pipeline.region(Region::new(60, 0, 8, 1)).swatches().is_err());
        assert_eq!(
            pipeline.resize(Resize::Ratio(-1.0)).swatches(),
            Err(Error::InvalidScale(-1.0))
        );
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let image = RgbImage::from_fn(300, 200, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            Rgb([x as u8, y as u8, (x ^ y) as u8])
        });

        let pipeline = SwatchPipeline::new(&image).resize(Resize::None);
        assert_eq!(pipeline.swatches().unwrap(), pipeline.swatches_par().unwrap());
    }
}
