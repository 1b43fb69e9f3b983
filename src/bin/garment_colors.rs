use clap::Parser;
use std::fs;
use std::path::PathBuf;
use garment_colors_wasm::{AnalyzerConfig, ColorAnalyzer, ColorFamily, analyze_bytes};
use anyhow::Context;
use anyhow::Result;
use serde_json::{Map, Value, json};

/// Name the dominant colors of garment photos.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of dominant colors to extract
    #[arg(short = 'k', long, default_value_t = 3)]
    clusters: usize,

    /// Side of the square grid images are resampled to before clustering
    #[arg(short, long, default_value_t = 100)]
    sample_size: u32,

    /// Seed for k-means initialisation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Upper bound on k-means iterations
    #[arg(long, default_value_t = 300)]
    max_iterations: usize,

    /// Dominant colors with all channels above this value are ignored as background
    #[arg(short = 'b', long, default_value_t = 240)]
    background_cutoff: u8,

    /// Print one JSON object per image instead of plain text
    #[arg(long)]
    json: bool,

    /// Also report the warm/cool/neutral family of each color
    #[arg(short, long)]
    families: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let analyzer = ColorAnalyzer::new(AnalyzerConfig {
        sample_size: args.sample_size,
        clusters: args.clusters,
        seed: args.seed,
        max_iterations: args.max_iterations,
        background_cutoff: args.background_cutoff,
        ..Default::default()
    })
    .context("invalid analyzer settings")?;

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let analysis = analyze_bytes(&bytes, &analyzer)
            .with_context(|| format!("analyzing {}", input.display()))?;
        let names = analysis.color_names();

        if args.json {
            let dominant: Vec<String> = analysis
                .clusters
                .iter()
                .map(|c| {
                    let rgb = c.centroid;
                    format!("#{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue)
                })
                .collect();
            let mut report = json!({
                "image": input.display().to_string(),
                "color": names,
                "dominant": dominant,
            });
            if args.families {
                let families: Map<String, Value> = names
                    .iter()
                    .map(|&name| (name.to_owned(), json!(ColorFamily::of(name).as_str())))
                    .collect();
                report["families"] = Value::Object(families);
            }
            println!("{report}");
        } else {
            let listed: Vec<String> = names
                .iter()
                .map(|&name| {
                    if args.families {
                        format!("{name} ({})", ColorFamily::of(name))
                    } else {
                        name.to_owned()
                    }
                })
                .collect();
            println!("{}: {}", input.display(), listed.join(", "));
        }
    }

    Ok(())
}
