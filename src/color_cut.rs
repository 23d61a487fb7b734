//! Color cut quantization (population-weighted median cut).
//!
//! The RGB color space is treated as a cube which is recursively divided into boxes.
//! At each step, the box with the greatest `population × volume` is split at the
//! population-weighted median along its widest channel, until the requested number of
//! boxes is reached or the best box cannot be split any further.
//! Each box is then averaged into a single [`Swatch`].
//!
//! Unlike plain median cut, which gives boxes roughly equal populations,
//! prioritizing by volume favors picking out visually distinct colors
//! over colors that are merely representative.
//!
//! Colors too close to black or white (as decided by a [`Filter`]) are removed
//! before quantization and again from the averaged swatches.

use crate::{ColorHistogram, ColorSlice, Error, Filter, PackedColor, PaletteSize, Swatch};
use std::{cmp::Ordering, collections::BinaryHeap};

/// The number of channels in a color.
const N: usize = 3;

/// A color and the number of pixels with that color.
type Entry = (PackedColor, u32);

/// Returns the sort key of a color when splitting along the given channel.
///
/// The split channel is the most significant, followed by the remaining channels.
#[inline]
fn channel_key(color: PackedColor, channel: usize) -> [u8; N] {
    let [r, g, b] = color.components();
    match channel {
        0 => [r, g, b],
        1 => [g, r, b],
        _ => [b, g, r],
    }
}

/// A box of colors given by an inclusive range of indices into the color arena.
///
/// A box owns no colors, it is only a view into the arena.
/// It must be used with the same arena it was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColorBox {
    /// The first index in the box.
    lower: usize,
    /// The last index in the box (inclusive).
    upper: usize,
    /// The total number of pixels in the box.
    population: u64,
    /// The minimum value of each channel.
    min: [u8; N],
    /// The maximum value of each channel.
    max: [u8; N],
}

impl ColorBox {
    /// Creates a new [`ColorBox`] over `arena[lower..=upper]`.
    fn new(arena: &[Entry], lower: usize, upper: usize) -> Self {
        debug_assert!(lower <= upper && upper < arena.len());

        let mut min = [u8::MAX; N];
        let mut max = [u8::MIN; N];
        let mut population = 0;

        for &(color, count) in &arena[lower..=upper] {
            for (c, v) in color.components().into_iter().enumerate() {
                min[c] = min[c].min(v);
                max[c] = max[c].max(v);
            }
            population += u64::from(count);
        }

        Self { lower, upper, population, min, max }
    }

    /// The number of colors in the box.
    fn num_colors(&self) -> usize {
        self.upper - self.lower + 1
    }

    /// Whether the box holds more than one color and can therefore be split.
    fn can_split(&self) -> bool {
        self.population > 1 && self.upper > self.lower
    }

    /// The product of each channel's range, where each range counts both its endpoints.
    fn volume(&self) -> u64 {
        (0..N)
            .map(|c| u64::from(self.max[c] - self.min[c]) + 1)
            .product()
    }

    /// The split priority of the box.
    fn priority(&self) -> u64 {
        self.population * self.volume()
    }

    /// Returns the channel with the greatest range. Ties favor red, then green.
    fn longest_channel(&self) -> usize {
        let [r, g, b] = [0, 1, 2].map(|c| self.max[c] - self.min[c]);
        if r >= g && r >= b {
            0
        } else if g >= b {
            1
        } else {
            2
        }
    }

    /// Finds the index to split at, which will be the last index of the lower box.
    ///
    /// The range must already be sorted along the split channel.
    fn split_point(&self, arena: &[Entry]) -> usize {
        let half = self.population / 2;

        let mut running = 0;
        let mut median = self.upper;
        for (i, &(_, count)) in arena[self.lower..=self.upper].iter().enumerate() {
            running += u64::from(count);
            if running >= half {
                median = self.lower + i;
                break;
            }
        }

        if median == self.lower {
            median += 1;
        }

        // the upper box must keep at least one color
        median.min(self.upper - 1)
    }

    /// Splits the box in two at the population-weighted median of its widest channel.
    ///
    /// The colors in the box's range are reordered in place.
    /// The returned boxes cover exactly the range of `self`, lower half first.
    fn split(self, arena: &mut [Entry]) -> (Self, Self) {
        debug_assert!(self.can_split());

        let channel = self.longest_channel();
        arena[self.lower..=self.upper]
            .sort_unstable_by_key(|&(color, _)| channel_key(color, channel));

        let median = self.split_point(arena);
        let lower = Self::new(arena, self.lower, median);
        let upper = Self::new(arena, median + 1, self.upper);

        log::trace!(
            "split {} colors along channel {channel} into {} and {}",
            self.num_colors(),
            lower.num_colors(),
            upper.num_colors()
        );

        (lower, upper)
    }

    /// Returns the population-weighted average color of the box.
    fn average_color(&self, arena: &[Entry]) -> PackedColor {
        let mut sums = [0u64; N];
        for &(color, count) in &arena[self.lower..=self.upper] {
            for (sum, v) in sums.iter_mut().zip(color.components()) {
                *sum += u64::from(v) * u64::from(count);
            }
        }

        // each color has a nonzero count, so population > 0
        #[allow(clippy::cast_possible_truncation)]
        PackedColor::from_components(sums.map(|sum| (sum / self.population) as u8))
    }

    /// Returns the average color of the box as a swatch over `total_count` pixels.
    fn swatch(&self, arena: &[Entry], total_count: u32) -> Swatch {
        #[allow(clippy::cast_possible_truncation)]
        Swatch::new(self.average_color(arena), self.population as u32, total_count)
    }
}

/// A [`ColorBox`] ordered by its priority.
struct Prioritized(u64, ColorBox);

impl PartialOrd for Prioritized {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Prioritized {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Eq for Prioritized {}

impl PartialEq for Prioritized {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// A max-priority queue of boxes. Boxes with equal priority pop in an unspecified order.
struct BoxQueue(BinaryHeap<Prioritized>);

impl BoxQueue {
    /// Creates a new, empty [`BoxQueue`] with room for `capacity` boxes.
    fn with_capacity(capacity: usize) -> Self {
        Self(BinaryHeap::with_capacity(capacity))
    }

    /// The number of boxes in the queue.
    fn len(&self) -> usize {
        self.0.len()
    }

    /// Adds a box to the queue.
    fn push(&mut self, color_box: ColorBox) {
        self.0.push(Prioritized(color_box.priority(), color_box));
    }

    /// Removes the box with the greatest priority.
    fn pop(&mut self) -> Option<ColorBox> {
        self.0.pop().map(|Prioritized(_, color_box)| color_box)
    }

    /// Consumes the queue, returning the boxes in an unspecified order.
    fn into_boxes(self) -> impl Iterator<Item = ColorBox> {
        self.0.into_iter().map(|Prioritized(_, color_box)| color_box)
    }
}

/// The state for a single color cut quantization.
struct ColorCut<'a, F: Filter> {
    /// The unfiltered colors and their counts.
    ///
    /// Sorted ascending until the first split, after which boxes reorder their own ranges.
    arena: Vec<Entry>,
    /// The total number of pixels in the source image, including filtered ones.
    total_count: u32,
    /// The filter used for the colors and the final swatches.
    filter: &'a F,
}

impl<'a, F: Filter> ColorCut<'a, F> {
    /// Creates a new [`ColorCut`] holding the colors from `histogram` that pass the filter.
    fn new(histogram: &ColorHistogram, filter: &'a F) -> Self {
        let arena = histogram
            .iter()
            .filter(|&(color, _)| !filter.should_ignore(color))
            .collect::<Vec<_>>();

        log::debug!(
            "{} of {} colors remain after filtering",
            arena.len(),
            histogram.len()
        );

        Self {
            arena,
            total_count: histogram.total_count(),
            filter,
        }
    }

    /// Splits boxes until there are `k` of them or the best box cannot be split.
    ///
    /// The arena must not be empty.
    fn boxes(&mut self, k: usize) -> BoxQueue {
        let mut queue = BoxQueue::with_capacity(k.min(self.arena.len()));
        queue.push(ColorBox::new(&self.arena, 0, self.arena.len() - 1));

        while queue.len() < k {
            let Some(color_box) = queue.pop() else {
                break;
            };

            if color_box.can_split() {
                let (lower, upper) = color_box.split(&mut self.arena);
                queue.push(lower);
                queue.push(upper);
            } else {
                queue.push(color_box);
                log::debug!("stopped splitting at {} of {k} boxes", queue.len());
                break;
            }
        }

        queue
    }

    /// Computes the swatches.
    fn swatches(mut self, k: PaletteSize) -> Vec<Swatch> {
        let k = usize::from(k);
        let total_count = self.total_count;

        if self.arena.len() <= k {
            log::debug!("{} colors fit in {k} swatches, skipping quantization", self.arena.len());
            self.arena
                .iter()
                .map(|&(color, count)| Swatch::new(color, count, total_count))
                .collect()
        } else {
            let filter = self.filter;
            let queue = self.boxes(k);
            queue
                .into_boxes()
                .map(|color_box| color_box.swatch(&self.arena, total_count))
                .filter(|swatch| !filter.should_ignore(swatch.color()))
                .collect()
        }
    }
}

/// Computes at most `palette_size` swatches from the given `histogram`.
///
/// Colors rejected by `filter` are excluded before quantization,
/// and swatches whose averaged color is rejected are excluded afterwards.
/// Swatch ratios are always relative to the histogram's total pixel count.
///
/// If no more than `palette_size` colors pass the filter, each becomes its own swatch
/// and no quantization takes place.
/// The swatches are returned in no particular order.
///
/// # Examples
/// ```
/// # use swatchcut::{color_cut, ColorHistogram, ColorSlice, LightnessFilter, PackedColor, PaletteSize};
/// let pixels = [
///     PackedColor::new(255, 0, 0),
///     PackedColor::new(255, 0, 0),
///     PackedColor::new(0, 255, 0),
///     PackedColor::new(0, 0, 255),
/// ];
/// let histogram = ColorHistogram::new(ColorSlice::from_truncated(&pixels));
/// let palette_size = PaletteSize::try_from(2u8).unwrap();
/// let swatches = color_cut::swatches(&histogram, palette_size, &LightnessFilter::new());
/// assert_eq!(swatches.len(), 2);
/// ```
pub fn swatches(
    histogram: &ColorHistogram,
    palette_size: PaletteSize,
    filter: &impl Filter,
) -> Vec<Swatch> {
    ColorCut::new(histogram, filter).swatches(palette_size)
}

/// Computes at most `max_colors` swatches from the given pixels.
///
/// # Errors
/// Returns [`Error::InvalidPaletteSize`] if `max_colors` is `0`.
pub fn quantize(
    pixels: ColorSlice,
    max_colors: u32,
    filter: &impl Filter,
) -> Result<Vec<Swatch>, Error> {
    let palette_size = PaletteSize::try_from(max_colors)?;
    Ok(swatches(&ColorHistogram::new(pixels), palette_size, filter))
}

/// Computes at most `max_colors` swatches from the given pixels,
/// counting the pixels in parallel.
///
/// The splitting itself is sequential, so the output is the same as [`quantize`].
///
/// # Errors
/// Returns [`Error::InvalidPaletteSize`] if `max_colors` is `0`.
#[cfg(feature = "threads")]
pub fn quantize_par(
    pixels: ColorSlice,
    max_colors: u32,
    filter: &(impl Filter + Sync),
) -> Result<Vec<Swatch>, Error> {
    let palette_size = PaletteSize::try_from(max_colors)?;
    Ok(swatches(&ColorHistogram::new_par(pixels), palette_size, filter))
}
