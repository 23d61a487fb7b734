//! Contains the high level pipeline builder API.

mod swatch_pipeline;

pub use swatch_pipeline::SwatchPipeline;
