#![allow(dead_code)]

use std::sync::OnceLock;

use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;
use swatchcut::PackedColor;

/// Every pixel is an independent random color.
fn noise(width: u32, height: u32) -> RgbImage {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
    RgbImage::from_fn(width, height, |_, _| Rgb(rng.gen()))
}

/// Smooth color ramps along both axes.
#[allow(clippy::cast_possible_truncation)]
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width) as u8;
        let g = (y * 255 / height) as u8;
        Rgb([r, g, r / 2 + g / 2])
    })
}

/// Large flat regions of a few colors with light noise, like a photo of a poster.
fn blocks(width: u32, height: u32) -> RgbImage {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(1);
    let palette = (0..12).map(|_| rng.gen::<[u8; 3]>()).collect::<Vec<_>>();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b] = palette[((x / 64 + y / 64) % 12) as usize];
        let jitter = rng.gen_range(0..4);
        Rgb([r.saturating_add(jitter), g.saturating_add(jitter), b.saturating_add(jitter)])
    })
}

pub fn bench_images() -> &'static [(String, RgbImage)] {
    static IMAGES: OnceLock<Vec<(String, RgbImage)>> = OnceLock::new();
    IMAGES.get_or_init(|| {
        let (width, height) = (1920, 1080);
        vec![
            ("noise".to_owned(), noise(width, height)),
            ("gradient".to_owned(), gradient(width, height)),
            ("blocks".to_owned(), blocks(width, height)),
        ]
    })
}

pub fn to_pixels(image: &RgbImage) -> Vec<PackedColor> {
    image.pixels().map(|&pixel| pixel.into()).collect()
}
