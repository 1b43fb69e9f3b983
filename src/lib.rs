use std::collections::BTreeSet;
use std::sync::LazyLock;

use image::RgbImage;
use js_sys::Array;
use log::debug;
use palette::Srgb;
use wasm_bindgen::prelude::*;

pub mod dominant;
pub mod error;
pub mod family;
pub mod fashion;
pub mod lab;
pub mod naming;

pub use dominant::{ColorCluster, DominantColorExtractor};
pub use error::{ColorAnalysisError, Result};
pub use family::{ColorFamily, colors_compatible};
pub use fashion::{FASHION_COLORS, PaletteEntry, PaletteIndex};
pub use lab::{LabColor, delta_e, srgb_to_lab};
pub use naming::{ColorMatch, ColorNamer};

/// An 8-bit sRGB color.
pub type RgbColor = Srgb<u8>;

/// Unique color names found in one image. Iteration order is alphabetical and
/// carries no meaning.
pub type ColorNames = BTreeSet<&'static str>;

// ------------------------------------------------------------
// Configuration
// ------------------------------------------------------------

/// Tunables for [`ColorAnalyzer`]. The defaults reproduce the reference
/// behaviour: 100×100 sampling grid, three clusters, seed 42.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzerConfig {
    /// Side of the square grid the image is resampled to before clustering.
    pub sample_size: u32,
    /// Number of dominant colors to extract.
    pub clusters: usize,
    pub seed: u64,
    pub max_iterations: usize,
    /// Total squared centroid movement under which k-means counts as converged.
    pub tolerance: f64,
    /// Dominant colors with every channel above this are treated as background
    /// and never named.
    pub background_cutoff: u8,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let extractor = DominantColorExtractor::default();
        Self {
            sample_size: extractor.sample_size,
            clusters: extractor.clusters,
            seed: extractor.seed,
            max_iterations: extractor.max_iterations,
            tolerance: extractor.tolerance,
            background_cutoff: 240,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(ColorAnalysisError::invalid_config("sample_size", self.sample_size));
        }
        if self.clusters == 0 {
            return Err(ColorAnalysisError::invalid_config("clusters", self.clusters));
        }
        if self.max_iterations == 0 {
            return Err(ColorAnalysisError::invalid_config("max_iterations", self.max_iterations));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(ColorAnalysisError::invalid_config("tolerance", self.tolerance));
        }
        Ok(())
    }
}

// ------------------------------------------------------------
// Pipeline
// ------------------------------------------------------------

/// Dominant colors of one image, with the name each one received.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorAnalysis {
    pub clusters: Vec<ColorCluster>,
    /// One entry per cluster, `None` for colors dropped as background.
    pub names: Vec<Option<&'static str>>,
}

impl ColorAnalysis {
    /// Deduplicated names of every non-background cluster.
    pub fn color_names(&self) -> ColorNames {
        self.names.iter().flatten().copied().collect()
    }
}

/// Extracts and names the dominant colors of garment images.
///
/// Holds only immutable data, so one analyzer can serve any number of threads.
#[derive(Clone, Debug)]
pub struct ColorAnalyzer {
    extractor: DominantColorExtractor,
    palette: PaletteIndex,
    background_cutoff: u8,
}

impl Default for ColorAnalyzer {
    fn default() -> Self {
        Self {
            extractor: DominantColorExtractor::default(),
            palette: PaletteIndex::fashion(),
            background_cutoff: AnalyzerConfig::default().background_cutoff,
        }
    }
}

impl ColorAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: DominantColorExtractor {
                sample_size: config.sample_size,
                clusters: config.clusters,
                seed: config.seed,
                max_iterations: config.max_iterations,
                tolerance: config.tolerance,
            },
            palette: PaletteIndex::fashion(),
            background_cutoff: config.background_cutoff,
        })
    }

    pub fn palette(&self) -> &PaletteIndex {
        &self.palette
    }

    pub fn namer(&self) -> ColorNamer<'_> {
        ColorNamer::new(&self.palette)
    }

    /// Whether `rgb` is bright enough on every channel to count as backdrop.
    ///
    /// Separate from the namer's own "white" rule: this gate drops the color
    /// entirely instead of naming it.
    pub fn is_background(&self, rgb: RgbColor) -> bool {
        let cutoff = self.background_cutoff;
        rgb.red > cutoff && rgb.green > cutoff && rgb.blue > cutoff
    }

    /// Full analysis of `img`, keeping the clusters next to their names.
    ///
    /// Steps performed:
    /// 1. Extract the dominant colors.
    /// 2. Drop near-white background colors.
    /// 3. Name every remaining color.
    pub fn analyze_detailed(&self, img: &RgbImage) -> Result<ColorAnalysis> {
        let clusters = self.extractor.extract_clusters(img)?;
        let namer = self.namer();

        let names = clusters
            .iter()
            .map(|cluster| {
                let rgb = cluster.centroid;
                if self.is_background(rgb) {
                    debug!("dropping background color {rgb:?}");
                    None
                } else {
                    Some(namer.name(rgb))
                }
            })
            .collect();

        Ok(ColorAnalysis { clusters, names })
    }

    /// Unique names of the non-background dominant colors of `img`.
    pub fn analyze(&self, img: &RgbImage) -> Result<ColorNames> {
        let names = self.analyze_detailed(img)?.color_names();
        debug!("named colors: {names:?}");
        Ok(names)
    }
}

static DEFAULT_ANALYZER: LazyLock<ColorAnalyzer> = LazyLock::new(ColorAnalyzer::default);

/// Name the dominant colors of a decoded RGB image with the default settings.
///
/// Fails only when the image has zero width or height.
pub fn analyze_colors(img: &RgbImage) -> Result<ColorNames> {
    DEFAULT_ANALYZER.analyze(img)
}

/// Decode `input` (any format `image` understands), drop alpha, and analyze it.
pub fn analyze_bytes(input: &[u8], analyzer: &ColorAnalyzer) -> Result<ColorAnalysis> {
    let img = image::load_from_memory(input)?.to_rgb8();
    analyzer.analyze_detailed(&img)
}

// ------------------------------------------------------------
// WASM bindings
// ------------------------------------------------------------

/// Decode an encoded image and return its color names as a JS array of strings.
#[wasm_bindgen]
pub fn analyze_garment_colors(input: Vec<u8>) -> std::result::Result<Array, JsValue> {
    let analysis = analyze_bytes(&input, &DEFAULT_ANALYZER)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let names = Array::new();
    for name in analysis.color_names() {
        names.push(&JsValue::from_str(name));
    }
    Ok(names)
}

/// "neutral", "warm" or "cool".
#[wasm_bindgen]
pub fn color_family(name: String) -> String {
    ColorFamily::of(&name).as_str().to_owned()
}

#[wasm_bindgen(js_name = colorsCompatible)]
pub fn colors_compatible_js(a: String, b: String) -> bool {
    colors_compatible(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn default_config_is_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[test]
    fn config_rejects_unusable_values() {
        let bad = [
            AnalyzerConfig { sample_size: 0, ..Default::default() },
            AnalyzerConfig { clusters: 0, ..Default::default() },
            AnalyzerConfig { max_iterations: 0, ..Default::default() },
            AnalyzerConfig { tolerance: f64::NAN, ..Default::default() },
        ];
        for config in bad {
            assert!(
                matches!(
                    ColorAnalyzer::new(config.clone()),
                    Err(ColorAnalysisError::InvalidConfig { .. })
                ),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn background_gate_needs_every_channel() {
        let analyzer = ColorAnalyzer::default();
        assert!(analyzer.is_background(Srgb::new(241, 241, 241)));
        assert!(!analyzer.is_background(Srgb::new(240, 255, 255)));
        assert!(!analyzer.is_background(Srgb::new(245, 245, 220)));
    }

    #[test]
    fn detailed_analysis_marks_background() {
        let img = ImageBuffer::from_fn(100, 100, |x, _| {
            if x < 60 { Rgb([0, 0, 128]) } else { Rgb([250, 250, 250]) }
        });
        let analysis = ColorAnalyzer::default()
            .analyze_detailed(&img)
            .expect("valid image");
        assert_eq!(analysis.clusters.len(), 3);
        for (cluster, name) in analysis.clusters.iter().zip(&analysis.names) {
            if cluster.centroid == Srgb::new(250, 250, 250) {
                assert_eq!(*name, None);
            } else {
                assert_eq!(*name, Some("navy"));
            }
        }
        assert_eq!(analysis.color_names(), ColorNames::from(["navy"]));
    }

    #[test]
    fn analyze_bytes_decodes_png() {
        let img: RgbImage = ImageBuffer::from_pixel(20, 30, Rgb([0, 128, 0]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("png encode");

        let analysis = analyze_bytes(&png, &ColorAnalyzer::default()).expect("decodable");
        assert_eq!(analysis.color_names(), ColorNames::from(["green"]));
    }

    #[test]
    fn analyze_bytes_reports_decode_errors() {
        let err = analyze_bytes(b"not an image", &ColorAnalyzer::default()).unwrap_err();
        assert!(matches!(err, ColorAnalysisError::Decode(_)));
    }
}
