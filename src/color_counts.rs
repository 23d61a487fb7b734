//! Contains the code for color/pixel deduplication into a sorted color histogram.

use crate::{ColorSlice, PackedColor};
use bitvec::vec::BitVec;
#[cfg(feature = "threads")]
use rayon::prelude::*;
use std::ops::Range;

/// A byte-sized Radix
const RADIX: usize = u8::MAX as usize + 1;

/// Returns the range associated with the `i`-th chunk.
#[inline]
fn chunk_range(chunks: &[u32], i: usize) -> Range<usize> {
    (chunks[i] as usize)..(chunks[i + 1] as usize)
}

/// Computes the prefix sum of the array in place.
#[inline]
fn prefix_sum<const M: usize>(counts: &mut [u32; M]) {
    for i in 1..M {
        counts[i] += counts[i - 1];
    }
}

/// Deduplicated colors and their frequency counts.
///
/// The colors are unique and sorted in ascending order of their packed value,
/// and `counts[i]` is the number of pixels that had the color `colors[i]`.
/// A histogram is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorHistogram {
    /// The unique colors in ascending order.
    colors: Vec<PackedColor>,
    /// The number of times each color was present in the original pixels.
    counts: Vec<u32>,
    /// The total number of pixels in the original color slice/image.
    total_count: u32,
}

impl ColorHistogram {
    /// Returns the slice of unique colors, sorted in ascending order.
    #[must_use]
    pub fn colors(&self) -> &[PackedColor] {
        &self.colors
    }

    /// Returns a slice for the number of times each unique color was present in the original pixels.
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Returns the number of original pixels.
    ///
    /// This is equal to the sum of [`ColorHistogram::counts`].
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Returns the number of unique colors.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_colors(&self) -> u32 {
        self.colors.len() as u32
    }

    /// Returns the number of unique colors as a `usize`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether or not the histogram has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns an iterator over each unique color and its count.
    pub fn iter(&self) -> impl Iterator<Item = (PackedColor, u32)> + '_ {
        self.colors.iter().copied().zip(self.counts.iter().copied())
    }

    /// Returns the number of pixels with the given color, or `0` if it was not present.
    #[must_use]
    pub fn count_of(&self, color: PackedColor) -> u32 {
        self.colors
            .binary_search(&color)
            .map_or(0, |i| self.counts[i])
    }

    /// Creates a new [`ColorHistogram`] from a [`ColorSlice`].
    ///
    /// Pixels are first bucketed by their red component,
    /// then each bucket is counted by its green and blue components.
    pub fn new(pixels: ColorSlice) -> Self {
        if pixels.is_empty() {
            Self::default()
        } else {
            let total_count = pixels.num_colors();

            let mut colors = Vec::new();
            let mut counts = Vec::new();
            let mut green_blue = vec![[0; 2]; pixels.len()];

            let mut lower_counts = vec![[0u32; RADIX]; RADIX];
            let mut bitmask: BitVec = BitVec::repeat(false, RADIX * RADIX);

            let mut red_prefix = [0u32; RADIX + 1];
            for color in pixels.iter() {
                red_prefix[usize::from(color.red())] += 1;
            }
            prefix_sum(&mut red_prefix);

            for color in pixels.iter() {
                let [r, g, b] = color.components();
                let r = usize::from(r);
                let j = red_prefix[r] - 1;
                green_blue[j as usize] = [g, b];
                red_prefix[r] = j;
            }
            red_prefix[RADIX] = total_count;

            for r in 0..RADIX {
                let chunk = chunk_range(&red_prefix, r);

                if !chunk.is_empty() {
                    let green_blue = &green_blue[chunk.clone()];

                    #[allow(clippy::cast_possible_truncation)]
                    let r = r as u8;

                    if chunk.len() < RADIX * RADIX / 4 {
                        for gb in green_blue {
                            let [g, b] = gb.map(usize::from);
                            lower_counts[g][b] += 1;
                            bitmask.set(g * RADIX + b, true);
                        }

                        for i in bitmask.iter_ones() {
                            let g = i / RADIX;
                            let b = i % RADIX;
                            #[allow(clippy::cast_possible_truncation)]
                            colors.push(PackedColor::new(r, g as u8, b as u8));
                            counts.push(lower_counts[g][b]);
                            lower_counts[g][b] = 0;
                        }

                        bitmask.fill(false);
                    } else {
                        for &[g, b] in green_blue {
                            lower_counts[usize::from(g)][usize::from(b)] += 1;
                        }

                        for (g, row) in lower_counts.iter_mut().enumerate() {
                            for (b, count) in row.iter_mut().enumerate() {
                                if *count > 0 {
                                    #[allow(clippy::cast_possible_truncation)]
                                    colors.push(PackedColor::new(r, g as u8, b as u8));
                                    counts.push(*count);
                                    *count = 0;
                                }
                            }
                        }
                    }
                }
            }

            log::debug!(
                "histogram: {} unique colors from {total_count} pixels",
                colors.len()
            );

            Self { colors, counts, total_count }
        }
    }

    /// Merges two histograms into one by summing the counts of shared colors.
    ///
    /// Both inputs are sorted, so this is a single linear merge.
    #[cfg_attr(not(feature = "threads"), allow(unused))]
    fn merge(self, other: Self) -> Self {
        let len = self.len() + other.len();
        let mut colors = Vec::with_capacity(len);
        let mut counts = Vec::with_capacity(len);

        let mut left = self.iter().peekable();
        let mut right = other.iter().peekable();

        loop {
            let next = match (left.peek(), right.peek()) {
                (Some(&(a, n)), Some(&(b, m))) => {
                    if a < b {
                        left.next();
                        (a, n)
                    } else if b < a {
                        right.next();
                        (b, m)
                    } else {
                        left.next();
                        right.next();
                        (a, n + m)
                    }
                }
                (Some(&entry), None) => {
                    left.next();
                    entry
                }
                (None, Some(&entry)) => {
                    right.next();
                    entry
                }
                (None, None) => break,
            };

            colors.push(next.0);
            counts.push(next.1);
        }

        Self {
            colors,
            counts,
            total_count: self.total_count + other.total_count,
        }
    }
}

#[cfg(feature = "threads")]
impl ColorHistogram {
    /// Creates a new [`ColorHistogram`] in parallel from a [`ColorSlice`].
    ///
    /// Each thread counts a chunk of the pixels and the partial histograms are then merged.
    /// The result is identical to [`ColorHistogram::new`].
    pub fn new_par(pixels: ColorSlice) -> Self {
        if pixels.is_empty() {
            Self::default()
        } else {
            let chunk_size = pixels.len().div_ceil(rayon::current_num_threads());

            pixels
                .par_chunks(chunk_size)
                .map(|chunk| Self::new(ColorSlice::new_unchecked(chunk)))
                .reduce_with(Self::merge)
                .unwrap_or_default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;
    use rand::{seq::SliceRandom, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn assert_valid_histogram(histogram: &ColorHistogram, pixels: ColorSlice) {
        assert_eq!(histogram.total_count(), pixels.num_colors());
        assert_eq!(histogram.colors().len(), histogram.counts().len());
        assert_eq!(
            histogram.counts().iter().map(|&n| u64::from(n)).sum::<u64>(),
            u64::from(pixels.num_colors())
        );

        let colors = histogram.colors();
        for i in 1..colors.len() {
            assert!(colors[i - 1] < colors[i]);
        }
    }

    fn naive_histogram(pixels: &[PackedColor]) -> (Vec<PackedColor>, Vec<u32>) {
        let mut sorted = pixels.to_vec();
        sorted.sort_unstable();
        let mut colors = Vec::new();
        let mut counts: Vec<u32> = Vec::new();
        for color in sorted {
            if colors.last() == Some(&color) {
                *counts.last_mut().unwrap() += 1;
            } else {
                colors.push(color);
                counts.push(1);
            }
        }
        (colors, counts)
    }

    #[test]
    fn empty_input() {
        let empty_input = ColorSlice::new_unchecked(&[]);

        let histogram = ColorHistogram::new(empty_input);
        assert!(histogram.is_empty() && histogram.counts().is_empty());
        assert_eq!(histogram.total_count(), 0);

        #[cfg(feature = "threads")]
        {
            let histogram = ColorHistogram::new_par(empty_input);
            assert!(histogram.is_empty() && histogram.counts().is_empty());
            assert_eq!(histogram.total_count(), 0);
        }
    }

    #[test]
    fn matches_sort_and_count() {
        let pixels = test_pixels_1024();
        let expected = naive_histogram(&pixels);

        let slice = ColorSlice::try_from(pixels.as_slice()).unwrap();
        let histogram = ColorHistogram::new(slice);
        assert_valid_histogram(&histogram, slice);
        assert_eq!(histogram.colors(), expected.0.as_slice());
        assert_eq!(histogram.counts(), expected.1.as_slice());

        // for testing non-bitvec branches
        let pixels = [pixels.as_slice(); 32].concat();
        let pixels = pixels
            .iter()
            .map(|c| PackedColor::new(7, c.green(), c.blue()))
            .collect::<Vec<_>>();
        let expected = naive_histogram(&pixels);

        let slice = ColorSlice::try_from(pixels.as_slice()).unwrap();
        let histogram = ColorHistogram::new(slice);
        assert_valid_histogram(&histogram, slice);
        assert_eq!(histogram.colors(), expected.0.as_slice());
        assert_eq!(histogram.counts(), expected.1.as_slice());
    }

    #[test]
    fn many_repeated_colors() {
        let pixels = test_pixels_repeated(4096, 10);
        let expected = naive_histogram(&pixels);

        let slice = ColorSlice::try_from(pixels.as_slice()).unwrap();
        let histogram = ColorHistogram::new(slice);
        assert_valid_histogram(&histogram, slice);
        assert!(histogram.len() <= 10);
        assert_eq!(histogram.colors(), expected.0.as_slice());
        assert_eq!(histogram.counts(), expected.1.as_slice());
    }

    #[test]
    fn add_duplicate_color() {
        let mut pixels = test_pixels_1024();
        let duplicate = pixels[0];

        let without_duplicate = {
            let slice = ColorSlice::try_from(pixels.as_slice()).unwrap();
            ColorHistogram::new(slice)
        };

        pixels.push(duplicate);
        let slice = ColorSlice::try_from(pixels.as_slice()).unwrap();
        let with_duplicate = ColorHistogram::new(slice);
        assert_valid_histogram(&with_duplicate, slice);

        assert_eq!(with_duplicate.colors(), without_duplicate.colors());
        assert_eq!(
            with_duplicate.count_of(duplicate),
            without_duplicate.count_of(duplicate) + 1
        );
        assert_eq!(with_duplicate.total_count(), without_duplicate.total_count() + 1);
    }

    #[test]
    fn reordered_input() {
        let pixels = test_pixels_1024();
        let mut reordered = pixels.clone();
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
        reordered.shuffle(&mut rng);

        let expected = ColorHistogram::new(ColorSlice::try_from(pixels.as_slice()).unwrap());
        let actual = ColorHistogram::new(ColorSlice::try_from(reordered.as_slice()).unwrap());
        assert_eq!(actual, expected);
    }

    #[test]
    fn count_of_missing_color() {
        let pixels = [PackedColor::new(1, 1, 1), PackedColor::new(1, 1, 1)];
        let histogram = ColorHistogram::new(ColorSlice::new_unchecked(&pixels));
        assert_eq!(histogram.count_of(PackedColor::new(1, 1, 1)), 2);
        assert_eq!(histogram.count_of(PackedColor::new(2, 1, 1)), 0);
        assert_eq!(histogram.iter().collect::<Vec<_>>(), vec![(PackedColor::new(1, 1, 1), 2)]);
    }

    #[test]
    fn merge_sums_shared_colors() {
        let a = [PackedColor::new(0, 0, 1), PackedColor::new(0, 0, 3)];
        let b = [PackedColor::new(0, 0, 2), PackedColor::new(0, 0, 3)];
        let merged = ColorHistogram::new(ColorSlice::new_unchecked(&a))
            .merge(ColorHistogram::new(ColorSlice::new_unchecked(&b)));

        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            vec![
                (PackedColor::new(0, 0, 1), 1),
                (PackedColor::new(0, 0, 2), 1),
                (PackedColor::new(0, 0, 3), 2),
            ]
        );
        assert_eq!(merged.total_count(), 4);
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let pixels = test_pixels_1024();
        let slice = ColorSlice::try_from(pixels.as_slice()).unwrap();
        assert_eq!(ColorHistogram::new(slice), ColorHistogram::new_par(slice));

        let pixels = [pixels.as_slice(); 64].concat();
        let slice = ColorSlice::try_from(pixels.as_slice()).unwrap();
        let single = ColorHistogram::new(slice);
        assert_valid_histogram(&single, slice);
        assert_eq!(single, ColorHistogram::new_par(slice));
    }
}
