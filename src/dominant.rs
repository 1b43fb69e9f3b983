//! Dominant color extraction: downsample, then k-means in RGB space.

use image::{RgbImage, imageops::FilterType};
use log::{debug, trace};
use palette::Srgb;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::RgbColor;
use crate::error::{ColorAnalysisError, Result};

type Sample = [f64; 3];

/// A group of similar pixels, represented by its mean color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorCluster {
    pub centroid: RgbColor,
    /// Number of resampled pixels assigned to this cluster.
    pub population: usize,
}

/// Why Lloyd's iteration stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stop {
    Stable,
    Converged,
    IterationCap,
}

/// Reduces an image to a handful of representative colors.
#[derive(Clone, Debug)]
pub struct DominantColorExtractor {
    pub sample_size: u32,
    pub clusters: usize,
    pub seed: u64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for DominantColorExtractor {
    fn default() -> Self {
        Self {
            sample_size: 100,
            clusters: 3,
            seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

impl DominantColorExtractor {
    /// Cluster centroids of `img`, rounded to 8-bit channels, in cluster order.
    ///
    /// Always returns exactly `clusters` colors; images with fewer distinct
    /// colors yield repeated centroids.
    pub fn dominant_colors(&self, img: &RgbImage) -> Result<Vec<RgbColor>> {
        Ok(self
            .extract_clusters(img)?
            .into_iter()
            .map(|c| c.centroid)
            .collect())
    }

    /// Like [`dominant_colors`](Self::dominant_colors) but keeps cluster sizes.
    ///
    /// Steps performed:
    /// 1. Resample to `sample_size`×`sample_size` (bilinear).
    /// 2. Seed `clusters` centroids with k-means++ from a fixed-seed RNG.
    /// 3. Run Lloyd's algorithm until assignments settle, the centroids stop
    ///    moving, or `max_iterations` is hit.
    pub fn extract_clusters(&self, img: &RgbImage) -> Result<Vec<ColorCluster>> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(ColorAnalysisError::InvalidImage { width: w, height: h });
        }
        if self.clusters == 0 {
            return Err(ColorAnalysisError::invalid_config("clusters", self.clusters));
        }
        if self.sample_size == 0 {
            return Err(ColorAnalysisError::invalid_config("sample_size", self.sample_size));
        }

        let samples = resample(img, self.sample_size);
        debug!(
            "resampled {w}x{h} image to {} samples for k={}",
            samples.len(),
            self.clusters
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = kmeans_plus_plus(&samples, self.clusters, &mut rng);
        let (assignments, iterations, stop) = lloyd(
            &samples,
            &mut centroids,
            self.max_iterations,
            self.tolerance,
        );
        debug!("k-means finished after {iterations} iterations ({stop:?})");

        let mut population = vec![0usize; centroids.len()];
        for &a in &assignments {
            population[a] += 1;
        }

        Ok(centroids
            .iter()
            .zip(population)
            .map(|(c, population)| ColorCluster {
                centroid: round_sample(c),
                population,
            })
            .collect())
    }
}

// ------------------------------------------------------------
// Resampling
// ------------------------------------------------------------

/// Flatten `img` into RGB samples on a `size`×`size` grid.
fn resample(img: &RgbImage, size: u32) -> Vec<Sample> {
    // Fast path – no scaling required.
    let owned;
    let grid = if img.dimensions() == (size, size) {
        img
    } else {
        owned = image::imageops::resize(img, size, size, FilterType::Triangle);
        &owned
    };

    grid.pixels()
        .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
        .collect()
}

// ------------------------------------------------------------
// k-means
// ------------------------------------------------------------

#[inline(always)]
fn dist2(a: &Sample, b: &Sample) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Index of the nearest centroid; ties go to the lower index.
#[inline]
fn nearest(sample: &Sample, centroids: &[Sample]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, c) in centroids.iter().enumerate() {
        let d = dist2(sample, c);
        if d < best_dist {
            best_dist = d;
            best_idx = idx;
        }
    }
    best_idx
}

/// k-means++ seeding: the first centroid is a uniform pick, every further one
/// is drawn with probability proportional to its squared distance from the
/// closest centroid chosen so far.
fn kmeans_plus_plus<R: Rng>(samples: &[Sample], k: usize, rng: &mut R) -> Vec<Sample> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(samples[rng.random_range(0..samples.len())]);

    let mut closest: Vec<f64> = samples.iter().map(|s| dist2(s, &centroids[0])).collect();

    while centroids.len() < k {
        let total: f64 = closest.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = None;
            let mut last_positive = 0;
            for (idx, &d) in closest.iter().enumerate() {
                if d <= 0.0 {
                    continue;
                }
                last_positive = idx;
                if target < d {
                    chosen = Some(idx);
                    break;
                }
                target -= d;
            }
            // Rounding can leave `target` just past the final weight.
            let chosen = chosen.unwrap_or(last_positive);
            samples[chosen]
        } else {
            // Every sample already coincides with a centroid.
            trace!("k-means++ ran out of distinct samples at {} centroids", centroids.len());
            samples[rng.random_range(0..samples.len())]
        };

        for (d, s) in closest.iter_mut().zip(samples) {
            *d = d.min(dist2(s, &next));
        }
        centroids.push(next);
    }

    centroids
}

/// Lloyd's algorithm. Updates `centroids` in place and returns the final
/// assignment of every sample, the number of iterations run and why it stopped.
fn lloyd(
    samples: &[Sample],
    centroids: &mut [Sample],
    max_iterations: usize,
    tolerance: f64,
) -> (Vec<usize>, usize, Stop) {
    let k = centroids.len();
    let mut assignments: Vec<usize> = samples.iter().map(|s| nearest(s, centroids)).collect();

    for iteration in 1..=max_iterations {
        // Recompute means; an empty cluster keeps its previous centroid.
        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (s, &a) in samples.iter().zip(&assignments) {
            sums[a][0] += s[0];
            sums[a][1] += s[1];
            sums[a][2] += s[2];
            counts[a] += 1;
        }

        let mut shift = 0.0;
        for ((c, sum), &n) in centroids.iter_mut().zip(&sums).zip(&counts) {
            if n == 0 {
                continue;
            }
            let n = n as f64;
            let mean = [sum[0] / n, sum[1] / n, sum[2] / n];
            shift += dist2(c, &mean);
            *c = mean;
        }

        let mut changed = 0usize;
        for (s, a) in samples.iter().zip(assignments.iter_mut()) {
            let idx = nearest(s, centroids);
            if idx != *a {
                *a = idx;
                changed += 1;
            }
        }
        trace!("iteration {iteration}: {changed} reassigned, shift {shift:.6}");

        if changed == 0 {
            return (assignments, iteration, Stop::Stable);
        }
        if shift <= tolerance {
            return (assignments, iteration, Stop::Converged);
        }
    }

    (assignments, max_iterations, Stop::IterationCap)
}

fn round_sample(c: &Sample) -> RgbColor {
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Srgb::new(channel(c[0]), channel(c[1]), channel(c[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
        ImageBuffer::from_pixel(w, h, Rgb(rgb))
    }

    #[test]
    fn solid_image_yields_k_identical_centroids() {
        let extractor = DominantColorExtractor::default();
        let colors = extractor
            .dominant_colors(&solid(37, 53, [12, 200, 99]))
            .expect("valid image");
        assert_eq!(colors.len(), 3);
        assert!(colors.iter().all(|&c| c == Srgb::new(12, 200, 99)));
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let extractor = DominantColorExtractor::default();
        for (w, h) in [(0, 0), (0, 10), (10, 0)] {
            let err = extractor.dominant_colors(&RgbImage::new(w, h)).unwrap_err();
            assert!(
                matches!(err, ColorAnalysisError::InvalidImage { width, height } if width == w && height == h),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn zero_clusters_is_rejected() {
        let extractor = DominantColorExtractor {
            clusters: 0,
            ..Default::default()
        };
        let err = extractor.dominant_colors(&solid(4, 4, [1, 2, 3])).unwrap_err();
        assert!(matches!(err, ColorAnalysisError::InvalidConfig { parameter: "clusters", .. }));
    }

    #[test]
    fn separates_three_bands() {
        // 100x100 keeps the pixels untouched by resampling.
        let img = ImageBuffer::from_fn(100, 100, |x, _| match x {
            0..=49 => Rgb([200, 30, 30]),
            50..=79 => Rgb([20, 40, 180]),
            _ => Rgb([250, 250, 250]),
        });
        let clusters = DominantColorExtractor::default()
            .extract_clusters(&img)
            .expect("valid image");

        let mut found: Vec<_> = clusters.iter().map(|c| (c.centroid, c.population)).collect();
        found.sort_by_key(|&(_, n)| std::cmp::Reverse(n));
        assert_eq!(
            found,
            vec![
                (Srgb::new(200, 30, 30), 5000),
                (Srgb::new(20, 40, 180), 3000),
                (Srgb::new(250, 250, 250), 2000),
            ]
        );
    }

    #[test]
    fn two_colors_leave_a_duplicate_centroid() {
        let img = ImageBuffer::from_fn(100, 100, |_, y| {
            if y < 50 { Rgb([0, 0, 128]) } else { Rgb([255, 140, 0]) }
        });
        let colors = DominantColorExtractor::default()
            .dominant_colors(&img)
            .expect("valid image");
        assert_eq!(colors.len(), 3);
        assert!(colors.contains(&Srgb::new(0, 0, 128)));
        assert!(colors.contains(&Srgb::new(255, 140, 0)));
        assert!(
            colors
                .iter()
                .all(|&c| c == Srgb::new(0, 0, 128) || c == Srgb::new(255, 140, 0))
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let img = ImageBuffer::from_fn(160, 90, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
        });
        let extractor = DominantColorExtractor::default();
        let first = extractor.extract_clusters(&img).expect("valid image");
        let second = extractor.extract_clusters(&img).expect("valid image");
        assert_eq!(first, second);
        assert_eq!(first.iter().map(|c| c.population).sum::<usize>(), 10_000);
    }

    #[test]
    fn resample_produces_fixed_grid() {
        let samples = resample(&solid(640, 480, [9, 8, 7]), 100);
        assert_eq!(samples.len(), 10_000);
        assert!(samples.iter().all(|s| *s == [9.0, 8.0, 7.0]));
    }

    #[test]
    fn rounding_clamps_to_channel_range() {
        assert_eq!(round_sample(&[254.6, -0.4, 127.5]), Srgb::new(255, 0, 128));
    }
}
