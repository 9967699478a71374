//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use mosaiclayer::config::ConfigFileError;
use mosaiclayer::geo::RectangleError;
use mosaiclayer::PoolError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Mosaic description could not be loaded
    Config(ConfigFileError),
    /// Worker pool failed to start or render
    Mosaic(PoolError),
    /// Region bounds given on the command line are invalid
    Region(RectangleError),
    /// Requested region lies entirely outside the mosaic
    OutsideMosaic(String),
    /// Failed to create the image fetcher
    Fetcher(String),
    /// Failed to write the output image
    Output {
        path: PathBuf,
        error: image::ImageError,
    },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(ConfigFileError::NotFound(_)) => {
                eprintln!();
                eprintln!("Pass a mosaic description with --config <file>, or create");
                eprintln!("  {}", mosaiclayer::config::config_file_path().display());
            }
            CliError::Mosaic(PoolError::EmptyMosaic) => {
                eprintln!();
                eprintln!("Add at least one [image.<name>] section to the config file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Mosaic(e) => write!(f, "Mosaic error: {}", e),
            CliError::Region(e) => write!(f, "Invalid region: {}", e),
            CliError::OutsideMosaic(region) => {
                write!(f, "Region {} does not overlap the mosaic", region)
            }
            CliError::Fetcher(msg) => write!(f, "Failed to create image fetcher: {}", msg),
            CliError::Output { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            CliError::Region(e) => Some(e),
            CliError::Output { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<PoolError> for CliError {
    fn from(e: PoolError) -> Self {
        CliError::Mosaic(e)
    }
}

impl From<RectangleError> for CliError {
    fn from(e: RectangleError) -> Self {
        CliError::Region(e)
    }
}
