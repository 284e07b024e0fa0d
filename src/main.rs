// Example runner for the `pixel_features` library.
//
// Usage: pixel_features [config.json]
//
// Without a config it evaluates a default neighborhood of features on two synthetic
// stacked gradient images. Set `RUST_LOG=debug` for per-stage logging.

use anyhow::Context;
use image::{Rgb, RgbImage};
use pixel_features::{FeatureConfig, FeatureSpec, ParallelFeaturePipeline, SampleMatrix};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_WIDTH: u32 = 64;
const DEMO_HEIGHT: u32 = 48;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    // --- 1. Configuration ---
    let config = match env::args().nth(1) {
        Some(path) => FeatureConfig::from_json_file(&path)
            .with_context(|| format!("loading feature config from {path}"))?,
        None => default_config()?,
    };
    info!(
        width = config.image_width,
        height = config.image_height,
        features = config.features.len(),
        "feature configuration ready"
    );

    // --- 2. Sample Matrix ---
    let width = u32::try_from(config.image_width).context("image width exceeds u32")?;
    let height = u32::try_from(config.image_height).context("image height exceeds u32")?;
    let images = [gradient(width, height, 0), gradient(width, height, 96)];
    let mut matrix = SampleMatrix::<f32>::from_images(&images)?;
    if config.needs_scale_channel() {
        let scale = (0..matrix.n_samples())
            .map(|i| 1.0 + ((i / config.image_width) % config.image_height) as f32 / 16.0)
            .collect();
        matrix = matrix.with_scale_channel(scale)?;
    }

    // --- 3. Feature Evaluation ---
    let pipeline = ParallelFeaturePipeline::new(config)?;
    let names = pipeline.column_names(matrix.n_channels());
    let design = pipeline.materialize(Arc::new(matrix)).await?;

    // --- 4. Summary ---
    println!(
        "Materialized {} samples x {} features with {} workers",
        design.nrows(),
        design.ncols(),
        pipeline.workers()
    );
    for (name, column) in names.iter().zip(design.columns()).take(8) {
        let mean = column.mean().unwrap_or(0.0);
        println!("  {name:<40} mean {mean:>10.3}");
    }
    Ok(())
}

fn default_config() -> pixel_features::Result<FeatureConfig> {
    let mut features = vec![FeatureSpec::Identity];
    features.extend(FeatureSpec::offset_candidates(1)?);
    features.push(FeatureSpec::ScaleInvariantDifference {
        x1: 8,
        y1: 0,
        x2: -8,
        y2: 0,
    });
    Ok(FeatureConfig {
        image_width: DEMO_WIDTH as usize,
        image_height: DEMO_HEIGHT as usize,
        features,
        workers: None,
    })
}

fn gradient(width: u32, height: u32, shift: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgb([r, g, r.wrapping_add(shift)])
    })
}
