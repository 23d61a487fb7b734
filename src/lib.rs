//! A library for extracting representative color swatches from images.
//!
//! `swatchcut` finds the dominant, visually distinct colors of an image using
//! color cut quantization: a median cut variant that splits the color box with the
//! greatest `population × volume`. Colors close to pure black or white are ignored,
//! and each resulting [`Swatch`] records how much of the image it represents.
//!
//! # Features
//! To reduce dependencies and compile times, `swatchcut` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes parallel versions of the pixel counting functions via [`rayon`].
//! - `image`: enables integration with the [`image`] crate, including cropping and
//!   downscaling (see the [`sample`] module) and the [`SwatchPipeline`] builder.
//!
//! # High-Level API
//! To get started with the high-level API, see [`SwatchPipeline`]:
//! ```no_run
//! # use swatchcut::{SwatchPipeline, PaletteSize};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgb8();
//!
//! let swatches = SwatchPipeline::new(&img)
//!     .palette_size(PaletteSize::try_from(6u8)?) // at most 6 swatches
//!     .swatches_par()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Low-Level API
//! If you already have the pixels, use [`quantize`] or the functions in [`color_cut`]:
//! ```
//! # use swatchcut::{quantize, ColorSlice, LightnessFilter, PackedColor};
//! # fn main() -> Result<(), swatchcut::Error> {
//! let pixels = vec![PackedColor::new(200, 40, 40); 16];
//! let swatches = quantize(pixels.as_slice().try_into()?, 4, &LightnessFilter::new())?;
//! assert_eq!(swatches.len(), 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod color;
mod color_counts;
mod filter;
mod swatch;
mod types;

#[cfg(feature = "image")]
mod api;

pub mod color_cut;

#[cfg(feature = "image")]
pub mod sample;

pub use color::*;
pub use color_counts::*;
pub use filter::*;
pub use swatch::*;
pub use types::*;

pub use color_cut::quantize;
#[cfg(feature = "threads")]
pub use color_cut::quantize_par;

#[cfg(feature = "image")]
pub use api::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;
