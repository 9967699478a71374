//! Render command - reproject a region of the mosaic into a PNG.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use mosaiclayer::fetch::SchemeRouter;
use mosaiclayer::{GeographicRectangle, WorkerPool};
use tracing::{info, warn};

use super::common::{config_path, load_mosaic};
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Mosaic description file (default: ~/.mosaiclayer/config.ini)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output PNG path
    #[arg(long, short)]
    pub output: PathBuf,

    /// Region bounds in degrees; all four are required to select a region
    #[arg(long, allow_hyphen_values = true, requires_all = ["south", "east", "north"])]
    pub west: Option<f64>,
    #[arg(long, allow_hyphen_values = true, requires_all = ["west", "east", "north"])]
    pub south: Option<f64>,
    #[arg(long, allow_hyphen_values = true, requires_all = ["west", "south", "north"])]
    pub east: Option<f64>,
    #[arg(long, allow_hyphen_values = true, requires_all = ["west", "south", "east"])]
    pub north: Option<f64>,

    /// Output width in pixels (default: from config)
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels (default: from config)
    #[arg(long)]
    pub height: Option<u32>,
}

impl RenderArgs {
    /// Requested region, or `None` for the whole mosaic.
    pub fn region(&self) -> Result<Option<GeographicRectangle>, CliError> {
        match (self.west, self.south, self.east, self.north) {
            (Some(w), Some(s), Some(e), Some(n)) => {
                Ok(Some(GeographicRectangle::from_degrees(w, s, e, n)?))
            }
            _ => Ok(None),
        }
    }
}

/// Run the render command.
pub async fn run(args: RenderArgs) -> Result<(), CliError> {
    let path = config_path(args.config.clone());
    let file = load_mosaic(&path)?;
    let sources = file.sources()?;
    let width = args.width.unwrap_or(file.mosaic.width);
    let height = args.height.unwrap_or(file.mosaic.height);

    let fetcher = SchemeRouter::new().map_err(|e| CliError::Fetcher(e.to_string()))?;
    let pool = WorkerPool::initialize_all(sources, file.mosaic.pool, Arc::new(fetcher)).await?;
    let mosaic = pool.rectangle();

    let rectangle = match args.region()? {
        Some(region) => match region.intersection(&mosaic) {
            Some(clamped) => clamped,
            None => {
                pool.shutdown().await;
                return Err(CliError::OutsideMosaic(region.to_string()));
            }
        },
        None => mosaic,
    };

    let started = Instant::now();
    let result = pool.request_with_stats(rectangle, width, height).await;
    pool.shutdown().await;
    let (bitmap, stats) = result?;

    for worker in &stats {
        info!(
            total_ms = worker.total_time().as_millis() as u64,
            cache_hit_rate = worker.cache.hit_rate(),
            "{}",
            worker
        );
    }
    info!(
        rectangle = %rectangle,
        width,
        height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Render complete"
    );

    if bitmap.is_transparent() {
        warn!(rectangle = %rectangle, "No source image covers the rendered region");
    }

    bitmap
        .into_image()
        .save(&args.output)
        .map_err(|error| CliError::Output {
            path: args.output.clone(),
            error,
        })?;

    println!("Rendered {} ({}x{})", rectangle, width, height);
    println!("Saved to {}", args.output.display());
    Ok(())
}
