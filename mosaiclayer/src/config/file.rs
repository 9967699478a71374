//! Mosaic description file handling (`~/.mosaiclayer/config.ini` by default).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ini::Ini;
use thiserror::Error;

use crate::geo::ProjectedRectangle;
use crate::mosaic::MosaicConfig;
use crate::projection::projection_by_name;
use crate::source::{SourceError, SourceImage};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Config file does not exist
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read or parse config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Required key absent from a section
    #[error("Missing configuration: {section}.{key}")]
    MissingKey { section: String, key: String },

    /// Image URL could not be made absolute
    #[error("Invalid image source in [{section}]: {source}")]
    Source {
        section: String,
        #[source]
        source: SourceError,
    },
}

/// One `[image.<name>]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    /// Section suffix after `image.`.
    pub name: String,
    /// URL or path as written in the file.
    pub url: String,
    /// Projection name (see [`projection_by_name`]).
    pub projection: String,
    pub projected_rectangle: ProjectedRectangle,
}

impl ImageSettings {
    /// Builds the source image.
    ///
    /// Relative paths are resolved against `base_dir` when given.
    pub fn to_source(&self, base_dir: Option<&Path>) -> Result<SourceImage, ConfigFileError> {
        let section = format!("image.{}", self.name);
        let projection =
            projection_by_name(&self.projection).ok_or_else(|| ConfigFileError::InvalidValue {
                section: section.clone(),
                key: "projection".to_string(),
                value: self.projection.clone(),
                reason: "must be 'geographic' or 'web_mercator'".to_string(),
            })?;

        let url = match base_dir {
            Some(dir) if !has_scheme(&self.url) && Path::new(&self.url).is_relative() => {
                dir.join(&self.url).to_string_lossy().into_owned()
            }
            _ => self.url.clone(),
        };

        SourceImage::new(url, self.projected_rectangle, Arc::clone(&projection))
            .map_err(|source| ConfigFileError::Source { section, source })
    }
}

fn has_scheme(url: &str) -> bool {
    url.split_once("://")
        .map(|(scheme, _)| scheme.len() > 1)
        .unwrap_or(false)
}

/// A parsed mosaic description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MosaicFile {
    pub mosaic: MosaicConfig,
    /// Images in file order.
    pub images: Vec<ImageSettings>,
    /// Directory of the file it was loaded from.
    pub base_dir: Option<PathBuf>,
}

impl MosaicFile {
    /// Load from the default path (~/.mosaiclayer/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Err(ConfigFileError::NotFound(path.to_path_buf()));
        }

        let ini = Ini::load_from_file(path)?;
        let mut file = super::parser::parse_ini(&ini)?;
        file.base_dir = path.parent().map(Path::to_path_buf);
        Ok(file)
    }

    /// Parse from INI text. Relative image paths resolve against the
    /// current directory.
    pub fn parse(content: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(content).map_err(ini::Error::Parse)?;
        super::parser::parse_ini(&ini)
    }

    /// Source images in file order.
    pub fn sources(&self) -> Result<Vec<SourceImage>, ConfigFileError> {
        self.images
            .iter()
            .map(|image| image.to_source(self.base_dir.as_deref()))
            .collect()
    }
}

/// Get the path to the config directory (~/.mosaiclayer).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mosaiclayer")
}

/// Get the path to the config file (~/.mosaiclayer/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
