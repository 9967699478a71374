//! Extent command - print the geographic bounds of a mosaic.

use std::path::PathBuf;
use std::sync::Arc;

use mosaiclayer::fetch::SchemeRouter;
use mosaiclayer::WorkerPool;

use super::common::{config_path, load_mosaic};
use crate::error::CliError;

/// Run the extent command.
///
/// Initializes the worker pool so the reported bounds are exactly the ones
/// a render would use.
pub async fn run(config: Option<PathBuf>) -> Result<(), CliError> {
    let path = config_path(config);
    let file = load_mosaic(&path)?;
    let sources = file.sources()?;
    let image_count = sources.len();

    let fetcher = SchemeRouter::new().map_err(|e| CliError::Fetcher(e.to_string()))?;
    let pool = WorkerPool::initialize_all(sources, file.mosaic.pool, Arc::new(fetcher)).await?;

    let (west, south, east, north) = pool.rectangle().to_degrees();
    println!("Mosaic: {}", path.display());
    println!("  Images:  {}", image_count);
    println!("  Workers: {}", pool.concurrency());
    println!("  West:    {:.6}°", west);
    println!("  South:   {:.6}°", south);
    println!("  East:    {:.6}°", east);
    println!("  North:   {:.6}°", north);

    pool.shutdown().await;
    Ok(())
}
