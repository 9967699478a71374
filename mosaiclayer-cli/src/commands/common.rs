//! Helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use mosaiclayer::config::{config_file_path, MosaicFile};

use crate::error::CliError;

/// Resolve the config path from the CLI argument, falling back to
/// `~/.mosaiclayer/config.ini`.
pub fn config_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path.unwrap_or_else(config_file_path)
}

/// Load a mosaic description, reporting the path on failure.
pub fn load_mosaic(path: &Path) -> Result<MosaicFile, CliError> {
    let file = MosaicFile::load_from(path)?;
    tracing::debug!(
        path = %path.display(),
        images = file.images.len(),
        "Loaded mosaic description"
    );
    Ok(file)
}
