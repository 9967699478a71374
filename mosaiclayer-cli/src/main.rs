//! MosaicLayer CLI - Command-line interface
//!
//! Inspects and renders image mosaics described by an INI file.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mosaiclayer::logging::{default_log_dir, default_log_file, init_logging};

use crate::commands::render::RenderArgs;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "mosaiclayer")]
#[command(version, about = "Seamless on-demand reprojection of image mosaics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the geographic bounds of a mosaic
    Extent {
        /// Mosaic description file (default: ~/.mosaiclayer/config.ini)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
    /// Reproject the mosaic, or a region of it, into a PNG
    Render(RenderArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging = match init_logging(&default_log_dir(), default_log_file()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {}", e);
            None
        }
    };

    let result = run(cli.command).await;
    // Flush the log file before exiting
    drop(logging);

    if let Err(e) = result {
        e.exit();
    }
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Extent { config } => commands::extent::run(config).await,
        Commands::Render(args) => commands::render::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_with_region() {
        let cli = Cli::try_parse_from([
            "mosaiclayer",
            "render",
            "--output",
            "out.png",
            "--west",
            "-10",
            "--south",
            "-5",
            "--east",
            "10",
            "--north",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.west, Some(-10.0));
                assert_eq!(args.north, Some(5.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_partial_region_rejected() {
        let result = Cli::try_parse_from([
            "mosaiclayer",
            "render",
            "--output",
            "out.png",
            "--west",
            "-10",
        ]);
        assert!(result.is_err());
    }
}
